use crate::error::MChartError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction in which the chart lines run.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub const ALL: [Orientation; 2] = [Orientation::Horizontal, Orientation::Vertical];

    /// The orientation tested after this one in alternating mode.
    pub fn next(&self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Horizontal => "Horizontal",
            Orientation::Vertical => "Vertical",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = MChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Horizontal" | "horizontal" | "h" => Ok(Orientation::Horizontal),
            "Vertical" | "vertical" | "v" => Ok(Orientation::Vertical),
            other => Err(MChartError::InvalidInput(format!(
                "unknown orientation {other:?}"
            ))),
        }
    }
}
