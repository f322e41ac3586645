use super::trial_log::{LogLayout, TrialLog};
use chrono::NaiveDateTime;
use mchart_core::{
    MChartError, Measurement, Orientation, Result, TIMESTAMP_FORMAT, TrialEntry,
    TrialMeasurements, VisualAngle,
};

pub const SINGLE_HEADER: [&str; 4] = ["Timestamp", "Direction", "Dash Spacing", "Score"];

pub const PAIRED_HEADER: [&str; 5] = [
    "Timestamp",
    "Vertical Dash Spacing",
    "Vertical Score",
    "Horizontal Dash Spacing",
    "Horizontal Score",
];

pub fn header(layout: LogLayout) -> &'static [&'static str] {
    match layout {
        LogLayout::Single => &SINGLE_HEADER,
        LogLayout::Paired => &PAIRED_HEADER,
    }
}

/// Renders the log as comma separated rows under a header line.
pub fn to_csv(log: &TrialLog) -> String {
    let mut out = header(log.layout()).join(",");
    out.push('\n');
    for entry in log {
        out.push_str(&csv_row(entry));
        out.push('\n');
    }
    out
}

fn csv_row(entry: &TrialEntry) -> String {
    let timestamp = entry.formatted_timestamp();
    // `{:?}` keeps the trailing ".0" and prints the shortest round-trip form.
    match &entry.measurements {
        TrialMeasurements::Single(m) => format!(
            "{timestamp},{},{:?},{:?}",
            m.orientation,
            m.angle.degrees(),
            m.score
        ),
        TrialMeasurements::Paired {
            vertical,
            horizontal,
        } => format!(
            "{timestamp},{:?},{:?},{:?},{:?}",
            vertical.angle.degrees(),
            vertical.score,
            horizontal.angle.degrees(),
            horizontal.score
        ),
    }
}

/// Reads back a log written by [`to_csv`]. The header selects the layout.
pub fn parse_csv(text: &str) -> Result<TrialLog> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((line_no, header_line)) = lines.next() else {
        return Err(MChartError::Export {
            line: 1,
            reason: "missing header".to_string(),
        });
    };
    let columns: Vec<&str> = header_line.split(',').map(str::trim).collect();
    let layout = if columns == SINGLE_HEADER {
        LogLayout::Single
    } else if columns == PAIRED_HEADER {
        LogLayout::Paired
    } else {
        return Err(MChartError::Export {
            line: line_no,
            reason: format!("unrecognised header {header_line:?}"),
        });
    };

    let mut log = TrialLog::new(layout);
    for (line_no, line) in lines {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let expected = header(layout).len();
        if fields.len() != expected {
            return Err(MChartError::Export {
                line: line_no,
                reason: format!("expected {expected} fields, found {}", fields.len()),
            });
        }

        let timestamp = parse_timestamp(fields[0], line_no)?;
        let measurements = match layout {
            LogLayout::Single => {
                let orientation = fields[1].parse::<Orientation>().map_err(|e| {
                    MChartError::Export {
                        line: line_no,
                        reason: e.to_string(),
                    }
                })?;
                TrialMeasurements::Single(parse_measurement(
                    orientation,
                    fields[2],
                    fields[3],
                    line_no,
                )?)
            }
            LogLayout::Paired => TrialMeasurements::Paired {
                vertical: parse_measurement(Orientation::Vertical, fields[1], fields[2], line_no)?,
                horizontal: parse_measurement(
                    Orientation::Horizontal,
                    fields[3],
                    fields[4],
                    line_no,
                )?,
            },
        };
        log.append(TrialEntry {
            timestamp,
            measurements,
        });
    }
    Ok(log)
}

fn parse_timestamp(field: &str, line: usize) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(field, TIMESTAMP_FORMAT).map_err(|e| MChartError::Export {
        line,
        reason: format!("bad timestamp {field:?}: {e}"),
    })
}

fn parse_measurement(
    orientation: Orientation,
    angle: &str,
    score: &str,
    line: usize,
) -> Result<Measurement> {
    let number = |field: &str| {
        field.parse::<f64>().map_err(|e| MChartError::Export {
            line,
            reason: format!("bad number {field:?}: {e}"),
        })
    };
    let angle = VisualAngle::new(number(angle)?).map_err(|e| MChartError::Export {
        line,
        reason: e.to_string(),
    })?;
    let score = number(score)?;
    if !(score.is_finite() && score >= 0.0) {
        return Err(MChartError::Export {
            line,
            reason: format!("score must be a finite, non-negative number, got {score}"),
        });
    }
    Ok(Measurement {
        orientation,
        angle,
        score,
    })
}

/// Pretty JSON array of the log entries.
pub fn to_json(log: &TrialLog) -> Result<String> {
    serde_json::to_string_pretty(log.entries()).map_err(|e| MChartError::Export {
        line: e.line(),
        reason: e.to_string(),
    })
}

pub fn parse_json(text: &str) -> Result<Vec<TrialEntry>> {
    serde_json::from_str(text).map_err(|e| MChartError::Export {
        line: e.line(),
        reason: e.to_string(),
    })
}
