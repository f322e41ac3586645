use crate::angle::{AngleScale, MAX_PHYSICAL_ANGLE, VisualAngle};
use crate::error::{MChartError, Result};
use serde::{Deserialize, Serialize};

/// Stroke pattern for one chart line, in render-surface units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DashPattern {
    Solid,
    Dashed { on: f64, off: f64 },
}

impl DashPattern {
    pub fn is_solid(&self) -> bool {
        matches!(self, DashPattern::Solid)
    }

    /// `[on, off]` intervals, or `None` for a solid stroke.
    pub fn intervals(&self) -> Option<[f64; 2]> {
        match *self {
            DashPattern::Solid => None,
            DashPattern::Dashed { on, off } => Some([on, off]),
        }
    }
}

/// Breakpoints of the three-branch dash policy.
///
/// Angles in `(0, fine_threshold]` get a short fixed "on" dash so that gaps
/// close to the perceptual threshold stay visibly broken.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashThresholds {
    /// `None` disables the fine branch (solid or uniform dashes only).
    pub fine_threshold: Option<f64>,
    pub fine_on_length: f64,
}

impl Default for DashThresholds {
    fn default() -> Self {
        Self {
            fine_threshold: Some(0.2),
            fine_on_length: 0.5,
        }
    }
}

impl DashThresholds {
    pub fn validate(&self) -> Result<()> {
        if let Some(threshold) = self.fine_threshold {
            if !(threshold.is_finite() && threshold >= 0.0) {
                return Err(MChartError::Configuration(format!(
                    "fine dash threshold must be a non-negative number, got {threshold}"
                )));
            }
        }
        if !(self.fine_on_length.is_finite() && self.fine_on_length > 0.0) {
            return Err(MChartError::Configuration(format!(
                "fine dash length must be positive, got {}",
                self.fine_on_length
            )));
        }
        Ok(())
    }
}

/// Maps a visual angle to the stroke pattern used to draw it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DashPatternResolver {
    scale: AngleScale,
    thresholds: DashThresholds,
}

impl DashPatternResolver {
    pub fn new(scale: AngleScale, thresholds: DashThresholds) -> Result<Self> {
        scale.validate()?;
        thresholds.validate()?;
        Ok(Self { scale, thresholds })
    }

    pub fn scale(&self) -> &AngleScale {
        &self.scale
    }

    pub fn thresholds(&self) -> &DashThresholds {
        &self.thresholds
    }

    /// Resolves the pattern for a raw angle in degrees.
    ///
    /// Negative or non-finite input is rejected instead of clamped.
    pub fn resolve(&self, degrees: f64) -> Result<DashPattern> {
        let angle = VisualAngle::new(degrees)?;
        self.resolve_angle(angle)
    }

    /// Fails with `InvalidInput` when the angle has no finite, positive gap
    /// on this scale (90° or more on a physical scale, overflow otherwise).
    pub fn resolve_angle(&self, angle: VisualAngle) -> Result<DashPattern> {
        // Exact comparison: only a slider sitting at zero draws a solid line.
        if angle.degrees() == 0.0 {
            return Ok(DashPattern::Solid);
        }
        if self.scale.is_physical() && angle.degrees() >= MAX_PHYSICAL_ANGLE {
            return Err(MChartError::InvalidInput(format!(
                "visual angle {}° must stay below {MAX_PHYSICAL_ANGLE}° on a physical scale",
                angle.degrees()
            )));
        }

        let gap = self.scale.to_linear_measure(angle);
        if !(gap.is_finite() && gap > 0.0) {
            return Err(MChartError::InvalidInput(format!(
                "visual angle {}° gives an unusable dash gap of {gap}",
                angle.degrees()
            )));
        }

        Ok(match self.thresholds.fine_threshold {
            Some(threshold) if angle.degrees() <= threshold => DashPattern::Dashed {
                on: self.thresholds.fine_on_length,
                off: gap,
            },
            _ => DashPattern::Dashed { on: gap, off: gap },
        })
    }
}
