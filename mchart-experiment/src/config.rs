use mchart_core::{
    AngleScale, DashPatternResolver, DashThresholds, MChartError, Orientation, Result, ScoreScale,
};
use serde::{Deserialize, Serialize};

/// Which of the two simulator front-ends the session behaves like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimulatorMode {
    /// One orientation at a time, switching after every confirmation.
    Alternating { initial: Orientation },
    /// Vertical and horizontal lines adjusted and confirmed together.
    Cross,
}

impl Default for SimulatorMode {
    fn default() -> Self {
        SimulatorMode::Alternating {
            initial: Orientation::Horizontal,
        }
    }
}

impl SimulatorMode {
    pub fn name(&self) -> &'static str {
        match self {
            SimulatorMode::Alternating { .. } => "alternating",
            SimulatorMode::Cross => "cross",
        }
    }

    pub fn is_cross(&self) -> bool {
        matches!(self, SimulatorMode::Cross)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub mode: SimulatorMode,
    pub score: ScoreScale,
    /// Slider resolution in degrees.
    pub step: f64,
    pub scale: AngleScale,
    pub dash: DashThresholds,
    /// Cross mode only: zero both sliders after each confirmation.
    pub reset_after_confirm: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: SimulatorMode::default(),
            score: ScoreScale::default(),
            step: 0.1,
            scale: AngleScale::default(),
            dash: DashThresholds::default(),
            reset_after_confirm: false,
        }
    }
}

impl SessionConfig {
    pub fn alternating(initial: Orientation) -> Self {
        Self {
            mode: SimulatorMode::Alternating { initial },
            ..Self::default()
        }
    }

    pub fn cross() -> Self {
        Self {
            mode: SimulatorMode::Cross,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.score.validate()?;
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(MChartError::Configuration(format!(
                "slider step must be positive, got {}",
                self.step
            )));
        }
        if self.step > self.score.max_angle {
            return Err(MChartError::Configuration(format!(
                "slider step {} is larger than the maximum angle {}",
                self.step, self.score.max_angle
            )));
        }
        self.scale.validate()?;
        self.scale.check_max_angle(self.score.max_angle)?;
        self.dash.validate()
    }

    pub fn max_angle(&self) -> f64 {
        self.score.max_angle
    }

    pub fn dash_resolver(&self) -> Result<DashPatternResolver> {
        DashPatternResolver::new(self.scale, self.dash)
    }

    /// Quantizes a continuous slider reading to the configured step,
    /// clamped to `[0, max_angle]`.
    pub fn snap_to_step(&self, degrees: f64) -> Result<f64> {
        if !degrees.is_finite() {
            return Err(MChartError::InvalidInput(format!(
                "slider value must be finite, got {degrees}"
            )));
        }
        let clamped = degrees.clamp(0.0, self.max_angle());
        let snapped = (clamped / self.step).round() * self.step;
        // Strip the binary noise that n * step leaves behind (0.30000000000000004).
        let cleaned = (snapped * 1e9).round() / 1e9;
        Ok(cleaned.min(self.max_angle()))
    }

    /// Default file name for the CSV export of this mode.
    pub fn export_file_name(&self) -> &'static str {
        match self.mode {
            SimulatorMode::Alternating { .. } => "mchart_interaction_logs.csv",
            SimulatorMode::Cross => "mchart_cross_logs.csv",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_matches_alternating_simulator() {
        let config = SessionConfig::default();
        assert_eq!(
            config.mode,
            SimulatorMode::Alternating {
                initial: Orientation::Horizontal
            }
        );
        assert_eq!(config.max_angle(), 2.0);
        assert!(!config.reset_after_confirm);
        config.validate().unwrap();
    }

    #[test]
    fn rejects_bad_step_and_range() {
        let mut config = SessionConfig::default();
        config.step = 0.0;
        assert!(config.validate().unwrap_err().is_configuration());

        config.step = 3.0;
        assert!(config.validate().unwrap_err().is_configuration());

        let mut config = SessionConfig::default();
        config.score.max_angle = 0.0;
        assert!(config.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn snaps_to_step() {
        let config = SessionConfig::default();
        assert_relative_eq!(config.snap_to_step(0.27).unwrap(), 0.3);
        assert_eq!(config.snap_to_step(0.3).unwrap(), 0.3);
        assert_eq!(config.snap_to_step(-1.0).unwrap(), 0.0);
        assert_eq!(config.snap_to_step(7.5).unwrap(), 2.0);
        assert!(config.snap_to_step(f64::NAN).is_err());

        let fine = SessionConfig {
            step: 0.01,
            ..SessionConfig::default()
        };
        assert_eq!(fine.snap_to_step(0.123).unwrap(), 0.12);
    }

    #[test]
    fn loads_partial_json() {
        let config: SessionConfig =
            serde_json::from_str(r#"{ "mode": { "kind": "cross" }, "reset_after_confirm": true }"#)
                .unwrap();
        assert!(config.mode.is_cross());
        assert!(config.reset_after_confirm);
        assert_eq!(config.step, 0.1);
        assert_eq!(config.export_file_name(), "mchart_cross_logs.csv");
    }

    #[test]
    fn loads_physical_scale() {
        let config: SessionConfig = serde_json::from_str(
            r#"{ "scale": { "kind": "physical", "pixels_per_unit": 37.8, "viewing_distance": 60.0 } }"#,
        )
        .unwrap();
        assert!(config.scale.is_physical());
        config.validate().unwrap();
    }

    #[test]
    fn physical_range_must_stay_below_right_angle() {
        let mut config: SessionConfig = serde_json::from_str(
            r#"{ "scale": { "kind": "physical", "pixels_per_unit": 40.0, "viewing_distance": 50.0 } }"#,
        )
        .unwrap();
        config.score.max_angle = 180.0;
        assert!(config.validate().unwrap_err().is_configuration());
        config.score.max_angle = 90.0;
        assert!(config.validate().unwrap_err().is_configuration());
        config.score.max_angle = 45.0;
        config.validate().unwrap();
    }
}
