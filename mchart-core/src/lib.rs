pub mod angle;
pub mod dash;
pub mod error;
pub mod orientation;
pub mod score;
pub mod stimulus;
pub mod trial;

pub use angle::{
    AngleScale, DASH_UNITS_PER_DEGREE, MAX_PHYSICAL_ANGLE, SLIDER_UNITS_PER_DEGREE,
    ScreenGeometry, VisualAngle,
};
pub use dash::{DashPattern, DashPatternResolver, DashThresholds};
pub use error::{MChartError, Result};
pub use orientation::Orientation;
pub use score::{DEFAULT_MAX_ANGLE, SCORE_POINTS_PER_DEGREE, ScoreScale, round_to_tenth};
pub use stimulus::ChartFrame;
pub use trial::{Measurement, TIMESTAMP_FORMAT, TrialEntry, TrialMeasurements};
