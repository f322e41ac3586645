use chrono::{Duration, NaiveDate, NaiveDateTime};
use mchart_core::{Orientation, TrialMeasurements};
use mchart_experiment::export::{parse_csv, parse_json, to_csv, to_json};
use mchart_experiment::{LogLayout, SessionConfig, SessionEvent, TrialStateMachine};
use mchart_timing::ManualClock;
use test_log::test;

fn clock() -> ManualClock {
    let start: NaiveDateTime = NaiveDate::from_ymd_opt(2025, 6, 2)
        .and_then(|d| d.and_hms_opt(14, 0, 0))
        .unwrap();
    ManualClock::with_tick(start, Duration::milliseconds(400))
}

#[test]
fn alternating_orientations_in_call_order() {
    let mut machine = TrialStateMachine::new(SessionConfig::default(), clock()).unwrap();
    let angles = [0.0, 0.1, 0.2, 0.5, 1.0, 1.5, 2.0];
    for angle in angles {
        machine.confirm_angle(angle).unwrap();
    }

    let log = machine.log();
    assert_eq!(log.len(), angles.len());

    let mut expected = Orientation::Horizontal;
    for (entry, angle) in log.iter().zip(angles) {
        let TrialMeasurements::Single(m) = entry.measurements else {
            panic!("alternating log holds single measurements");
        };
        assert_eq!(m.orientation, expected);
        assert_eq!(m.angle.degrees(), angle);
        assert_eq!(m.score, ((2.0 - angle) * 50.0 * 10.0_f64).round() / 10.0);
        expected = expected.next();
    }

    for pair in log.entries().windows(2) {
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }
}

#[test]
fn rejected_confirms_leave_the_log_untouched() {
    let mut machine = TrialStateMachine::new(SessionConfig::default(), clock()).unwrap();
    machine.confirm_angle(0.5).unwrap();
    let before = machine.log().clone();

    assert!(machine.confirm_angle(-0.1).unwrap_err().is_invalid_input());
    assert!(machine.confirm_angle(2.1).unwrap_err().is_invalid_input());
    assert!(
        machine
            .handle_event(SessionEvent::SetAngle {
                orientation: Orientation::Vertical,
                angle: 2.1,
            })
            .unwrap_err()
            .is_invalid_input()
    );

    assert_eq!(machine.log(), &before);
    assert_eq!(machine.awaiting(), Some(Orientation::Vertical));
}

#[test]
fn alternating_csv_round_trip() {
    let mut machine = TrialStateMachine::new(SessionConfig::default(), clock()).unwrap();
    for angle in [0.3, 0.7, 0.0, 1.9] {
        machine.confirm_angle(angle).unwrap();
    }

    let csv = to_csv(machine.log());
    assert!(csv.starts_with("Timestamp,Direction,Dash Spacing,Score\n"));
    assert_eq!(csv.lines().count(), 5);

    let parsed = parse_csv(&csv).unwrap();
    assert_eq!(parsed.layout(), LogLayout::Single);
    assert_eq!(parsed.entries(), machine.log().entries());
    // Exporting does not consume or alter the live log.
    assert_eq!(machine.log().len(), 4);
}

#[test]
fn cross_csv_round_trip() {
    let mut machine = TrialStateMachine::new(SessionConfig::cross(), clock()).unwrap();
    machine.set_angle(Orientation::Vertical, 0.5).unwrap();
    machine.set_angle(Orientation::Horizontal, 1.0).unwrap();
    machine.confirm().unwrap();
    machine.set_angle(Orientation::Horizontal, 0.2).unwrap();
    machine.confirm().unwrap();

    let csv = to_csv(machine.log());
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("Timestamp,Vertical Dash Spacing,Vertical Score,Horizontal Dash Spacing,Horizontal Score")
    );
    assert_eq!(lines.next(), Some("2025-06-02 14:00:00,0.5,75.0,1.0,50.0"));
    assert_eq!(lines.next(), Some("2025-06-02 14:00:00,0.5,75.0,0.2,90.0"));

    let parsed = parse_csv(&csv).unwrap();
    assert_eq!(parsed.layout(), LogLayout::Paired);
    assert_eq!(parsed.entries(), machine.log().entries());
}

#[test]
fn json_round_trip() {
    let mut machine = TrialStateMachine::new(SessionConfig::cross(), clock()).unwrap();
    machine.set_angle(Orientation::Vertical, 1.25).unwrap();
    machine.confirm().unwrap();

    let json = to_json(machine.log()).unwrap();
    let entries = parse_json(&json).unwrap();
    assert_eq!(entries, machine.log().snapshot());
}

#[test]
fn scripted_events_from_json() {
    let script = r#"[
        { "event": "set_angle", "orientation": "Horizontal", "angle": 0.4 },
        { "event": "confirm" },
        { "event": "confirm_angle", "angle": 0.9 }
    ]"#;
    let events: Vec<SessionEvent> = serde_json::from_str(script).unwrap();
    let mut machine = TrialStateMachine::new(SessionConfig::default(), clock()).unwrap();
    for event in events {
        machine.handle_event(event).unwrap();
    }
    assert_eq!(machine.trial_count(), 2);
    assert_eq!(machine.awaiting(), Some(Orientation::Horizontal));
}
