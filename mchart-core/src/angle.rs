use crate::error::{MChartError, Result};
use serde::{Deserialize, Serialize};

/// Chart units per degree of visual angle on the abstract chart scale.
pub const DASH_UNITS_PER_DEGREE: f64 = 5.0;

/// Raw physical-mode slider readings are hundredths of a degree.
pub const SLIDER_UNITS_PER_DEGREE: f64 = 100.0;

/// Exclusive upper bound for angles on the physical scale; `tan` diverges here.
pub const MAX_PHYSICAL_ANGLE: f64 = 90.0;

/// A validated, non-negative visual angle in degrees.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct VisualAngle(f64);

impl VisualAngle {
    pub const ZERO: VisualAngle = VisualAngle(0.0);

    pub fn new(degrees: f64) -> Result<Self> {
        if !degrees.is_finite() {
            return Err(MChartError::InvalidInput(format!(
                "visual angle must be finite, got {degrees}"
            )));
        }
        if degrees < 0.0 {
            return Err(MChartError::InvalidInput(format!(
                "visual angle must be non-negative, got {degrees}°"
            )));
        }
        // -0.0 passes the check above; store it as +0.0 so equality with zero is exact.
        Ok(VisualAngle(degrees + 0.0))
    }

    /// Converts a raw slider reading in hundredths of a degree.
    pub fn from_slider_units(raw: f64) -> Result<Self> {
        Self::new(raw / SLIDER_UNITS_PER_DEGREE)
    }

    pub fn degrees(self) -> f64 {
        self.0
    }

    pub fn radians(self) -> f64 {
        self.0.to_radians()
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl TryFrom<f64> for VisualAngle {
    type Error = MChartError;

    fn try_from(value: f64) -> Result<Self> {
        VisualAngle::new(value)
    }
}

impl From<VisualAngle> for f64 {
    fn from(angle: VisualAngle) -> f64 {
        angle.0
    }
}

/// Physical display parameters for one session.
///
/// `pixels_per_unit` and `viewing_distance` share the same physical length
/// unit (e.g. pixels per centimetre and centimetres).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenGeometry {
    pixels_per_unit: f64,
    viewing_distance: f64,
}

impl ScreenGeometry {
    pub fn new(pixels_per_unit: f64, viewing_distance: f64) -> Result<Self> {
        let geometry = Self {
            pixels_per_unit,
            viewing_distance,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.pixels_per_unit.is_finite() && self.pixels_per_unit > 0.0) {
            return Err(MChartError::Configuration(format!(
                "pixel density must be positive, got {}",
                self.pixels_per_unit
            )));
        }
        if !(self.viewing_distance.is_finite() && self.viewing_distance > 0.0) {
            return Err(MChartError::Configuration(format!(
                "viewing distance must be positive, got {}",
                self.viewing_distance
            )));
        }
        Ok(())
    }

    pub fn pixels_per_unit(&self) -> f64 {
        self.pixels_per_unit
    }

    pub fn viewing_distance(&self) -> f64 {
        self.viewing_distance
    }
}

/// How a visual angle maps onto a length on the render surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AngleScale {
    /// Fixed chart units per degree, no physical geometry involved.
    Abstract { units_per_degree: f64 },
    /// Gap subtended at the eye, measured in device pixels.
    Physical(ScreenGeometry),
}

impl Default for AngleScale {
    fn default() -> Self {
        AngleScale::Abstract {
            units_per_degree: DASH_UNITS_PER_DEGREE,
        }
    }
}

impl AngleScale {
    pub fn validate(&self) -> Result<()> {
        match self {
            AngleScale::Abstract { units_per_degree } => {
                if units_per_degree.is_finite() && *units_per_degree > 0.0 {
                    Ok(())
                } else {
                    Err(MChartError::Configuration(format!(
                        "chart units per degree must be positive, got {units_per_degree}"
                    )))
                }
            }
            AngleScale::Physical(geometry) => geometry.validate(),
        }
    }

    /// Checks that every angle up to `max_angle` maps to a finite length.
    pub fn check_max_angle(&self, max_angle: f64) -> Result<()> {
        if self.is_physical() && max_angle >= MAX_PHYSICAL_ANGLE {
            return Err(MChartError::Configuration(format!(
                "maximum angle {max_angle}° must stay below {MAX_PHYSICAL_ANGLE}° on a physical scale"
            )));
        }
        let longest = self.to_linear_measure(VisualAngle::new(max_angle)?);
        if !longest.is_finite() {
            return Err(MChartError::Configuration(format!(
                "maximum angle {max_angle}° overflows the chart scale"
            )));
        }
        Ok(())
    }

    /// Linear length of `angle` on the render surface.
    pub fn to_linear_measure(&self, angle: VisualAngle) -> f64 {
        match self {
            AngleScale::Abstract { units_per_degree } => angle.degrees() * units_per_degree,
            AngleScale::Physical(geometry) => {
                if angle.is_zero() {
                    return 0.0;
                }
                angle.radians().tan() * geometry.viewing_distance * geometry.pixels_per_unit
            }
        }
    }

    pub fn is_physical(&self) -> bool {
        matches!(self, AngleScale::Physical(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_negative_and_non_finite_angles() {
        assert!(VisualAngle::new(-0.1).unwrap_err().is_invalid_input());
        assert!(VisualAngle::new(f64::NAN).unwrap_err().is_invalid_input());
        assert!(VisualAngle::new(f64::INFINITY).unwrap_err().is_invalid_input());
        assert!(VisualAngle::new(-0.0).unwrap().is_zero());
    }

    #[test]
    fn abstract_scale_multiplies_by_five() {
        let scale = AngleScale::default();
        assert_eq!(scale.to_linear_measure(VisualAngle::ZERO), 0.0);
        assert_relative_eq!(scale.to_linear_measure(VisualAngle::new(0.3).unwrap()), 1.5);
        assert_relative_eq!(scale.to_linear_measure(VisualAngle::new(2.0).unwrap()), 10.0);
    }

    #[test]
    fn physical_zero_is_exact() {
        for (ppu, dist) in [(37.8, 60.0), (1.0, 1.0), (450.0, 0.25)] {
            let scale = AngleScale::Physical(ScreenGeometry::new(ppu, dist).unwrap());
            assert_eq!(scale.to_linear_measure(VisualAngle::ZERO), 0.0);
        }
    }

    #[test]
    fn physical_scale_uses_tangent_of_radians() {
        let geometry = ScreenGeometry::new(40.0, 50.0).unwrap();
        let scale = AngleScale::Physical(geometry);
        let one_degree = VisualAngle::new(1.0).unwrap();
        let expected = 1.0_f64.to_radians().tan() * 50.0 * 40.0;
        assert_relative_eq!(scale.to_linear_measure(one_degree), expected);
        // 45° subtends exactly the viewing distance.
        let forty_five = VisualAngle::new(45.0).unwrap();
        assert_relative_eq!(scale.to_linear_measure(forty_five), 2000.0, epsilon = 1e-9);
    }

    #[test]
    fn slider_units_are_hundredths_of_a_degree() {
        let angle = VisualAngle::from_slider_units(25.0).unwrap();
        assert_relative_eq!(angle.degrees(), 0.25);
        assert!(VisualAngle::from_slider_units(-1.0).is_err());
    }

    #[test]
    fn geometry_must_be_positive() {
        assert!(ScreenGeometry::new(0.0, 60.0).unwrap_err().is_configuration());
        assert!(ScreenGeometry::new(37.8, -1.0).unwrap_err().is_configuration());
        assert!(ScreenGeometry::new(f64::NAN, 60.0).is_err());
        let scale = AngleScale::Abstract {
            units_per_degree: 0.0,
        };
        assert!(scale.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn max_angle_must_map_to_finite_length() {
        let physical = AngleScale::Physical(ScreenGeometry::new(40.0, 50.0).unwrap());
        physical.check_max_angle(2.0).unwrap();
        physical.check_max_angle(89.9).unwrap();
        assert!(physical.check_max_angle(90.0).unwrap_err().is_configuration());
        assert!(physical.check_max_angle(180.0).unwrap_err().is_configuration());

        let abstract_scale = AngleScale::default();
        abstract_scale.check_max_angle(180.0).unwrap();
        assert!(abstract_scale.check_max_angle(1e308).unwrap_err().is_configuration());
    }
}
