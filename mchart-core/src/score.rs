use crate::angle::VisualAngle;
use crate::error::{MChartError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_ANGLE: f64 = 2.0;

/// Score points lost per degree of gap.
pub const SCORE_POINTS_PER_DEGREE: f64 = 50.0;

/// Linear acuity scale: `round((max_angle - angle) * points_per_degree, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreScale {
    pub max_angle: f64,
    pub points_per_degree: f64,
}

impl Default for ScoreScale {
    fn default() -> Self {
        Self {
            max_angle: DEFAULT_MAX_ANGLE,
            points_per_degree: SCORE_POINTS_PER_DEGREE,
        }
    }
}

impl ScoreScale {
    pub fn new(max_angle: f64) -> Result<Self> {
        let scale = Self {
            max_angle,
            ..Self::default()
        };
        scale.validate()?;
        Ok(scale)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.max_angle.is_finite() && self.max_angle > 0.0) {
            return Err(MChartError::Configuration(format!(
                "maximum angle must be positive, got {}",
                self.max_angle
            )));
        }
        if !(self.points_per_degree.is_finite() && self.points_per_degree > 0.0) {
            return Err(MChartError::Configuration(format!(
                "score points per degree must be positive, got {}",
                self.points_per_degree
            )));
        }
        Ok(())
    }

    /// Checks that `degrees` lies in `[0, max_angle]`.
    pub fn check(&self, degrees: f64) -> Result<VisualAngle> {
        let angle = VisualAngle::new(degrees)?;
        if angle.degrees() > self.max_angle {
            return Err(MChartError::InvalidInput(format!(
                "visual angle {degrees}° exceeds the maximum of {}°",
                self.max_angle
            )));
        }
        Ok(angle)
    }

    pub fn score(&self, degrees: f64) -> Result<f64> {
        let angle = self.check(degrees)?;
        Ok(self.score_angle(angle))
    }

    /// Score of an angle already known to be in range.
    pub fn score_angle(&self, angle: VisualAngle) -> f64 {
        let raw = (self.max_angle - angle.degrees()) * self.points_per_degree;
        // Never report -0.0 at the top of the range.
        round_to_tenth(raw).max(0.0)
    }

    pub fn max_score(&self) -> f64 {
        round_to_tenth(self.max_angle * self.points_per_degree)
    }
}

/// Rounds to one decimal place, ties away from zero.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
