pub mod config;
pub mod export;
pub mod state;
pub mod trial_log;
pub use config::{SessionConfig, SimulatorMode};
pub use state::{SessionEvent, TrialStateMachine};
pub use trial_log::{LogLayout, TrialLog};
