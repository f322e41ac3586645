use crate::angle::VisualAngle;
use crate::orientation::Orientation;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp layout used in logs and exports.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One orientation's reading within a confirmed trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub orientation: Orientation,
    pub angle: VisualAngle,
    pub score: f64,
}

/// Readings captured by a single confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrialMeasurements {
    Single(Measurement),
    Paired {
        vertical: Measurement,
        horizontal: Measurement,
    },
}

impl TrialMeasurements {
    pub fn iter(&self) -> impl Iterator<Item = &Measurement> {
        let (first, second) = match self {
            TrialMeasurements::Single(m) => (m, None),
            TrialMeasurements::Paired {
                vertical,
                horizontal,
            } => (vertical, Some(horizontal)),
        };
        std::iter::once(first).chain(second)
    }

    pub fn is_paired(&self) -> bool {
        matches!(self, TrialMeasurements::Paired { .. })
    }
}

/// Recorded result per confirmed trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialEntry {
    pub timestamp: NaiveDateTime,
    pub measurements: TrialMeasurements,
}

impl TrialEntry {
    pub fn measurement(&self, orientation: Orientation) -> Option<&Measurement> {
        self.measurements
            .iter()
            .find(|m| m.orientation == orientation)
    }

    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}
