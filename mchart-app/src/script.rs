use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mchart_experiment::{SessionConfig, SessionEvent};
use serde::Deserialize;

/// A recorded or hand-written sequence of slider moves and confirmations.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SessionScript {
    /// Config file, relative to the script's directory.
    #[serde(default)]
    pub config: Option<PathBuf>,
    /// Manual clock start, same format as the exported timestamps.
    #[serde(default)]
    pub start: Option<String>,
    pub events: Vec<SessionEvent>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScriptFile {
    Events(Vec<SessionEvent>),
    Script(SessionScript),
}

impl SessionScript {
    pub fn parse(text: &str) -> Result<Self> {
        let file: ScriptFile = serde_json::from_str(text)
            .context("Session script is neither an event list nor a script object")?;
        Ok(match file {
            ScriptFile::Events(events) => Self {
                events,
                ..Self::default()
            },
            ScriptFile::Script(script) => script,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session script {}", path.display()))?;
        let mut script =
            Self::parse(&text).with_context(|| format!("In session script {}", path.display()))?;

        if let (Some(config), Some(dir)) = (&script.config, path.parent()) {
            if config.is_relative() {
                script.config = Some(dir.join(config));
            }
        }
        Ok(script)
    }
}

pub fn load_config(path: &Path) -> Result<SessionConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read session config {}", path.display()))?;
    let config: SessionConfig = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse session config {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mchart_core::Orientation;

    #[test]
    fn bare_event_list() {
        let script = SessionScript::parse(
            r#"[
                {"event": "set_angle", "orientation": "Horizontal", "angle": 0.4},
                {"event": "confirm"}
            ]"#,
        )
        .unwrap();
        assert_eq!(script.config, None);
        assert_eq!(
            script.events,
            vec![
                SessionEvent::SetAngle {
                    orientation: Orientation::Horizontal,
                    angle: 0.4
                },
                SessionEvent::Confirm
            ]
        );
    }

    #[test]
    fn script_object_with_config_and_start() {
        let script = SessionScript::parse(
            r#"{
                "config": "cross.json",
                "start": "2025-06-02 14:00:00",
                "events": [{"event": "confirm_angle", "angle": 1.0}]
            }"#,
        )
        .unwrap();
        assert_eq!(script.config, Some(PathBuf::from("cross.json")));
        assert_eq!(script.start.as_deref(), Some("2025-06-02 14:00:00"));
        assert_eq!(script.events.len(), 1);
    }

    #[test]
    fn relative_config_resolves_against_script_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"config": "cfg.json", "events": []}"#).unwrap();

        let script = SessionScript::load(&path).unwrap();
        assert_eq!(script.config, Some(dir.path().join("cfg.json")));
    }

    #[test]
    fn unknown_event_is_an_error() {
        assert!(SessionScript::parse(r#"[{"event": "undo"}]"#).is_err());
        assert!(SessionScript::parse("not json").is_err());
    }
}
