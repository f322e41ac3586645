use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDateTime, TimeDelta};
use clap::ValueEnum;
use log::{debug, info, warn};
use mchart_core::{MChartError, Orientation, TIMESTAMP_FORMAT, TrialEntry};
use mchart_experiment::{
    SessionConfig, SessionEvent, SimulatorMode, TrialLog, TrialStateMachine, export,
};
use mchart_render::{ChartLayout, SkiaChartPainter};
use mchart_timing::{Clock, ManualClock, SystemClock};

use crate::script::{SessionScript, load_config};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Alternating,
    Cross,
}

impl ModeArg {
    /// Keeps the configured starting orientation when staying alternating.
    fn apply(self, current: SimulatorMode) -> SimulatorMode {
        match (self, current) {
            (ModeArg::Alternating, SimulatorMode::Alternating { .. }) => current,
            (ModeArg::Alternating, SimulatorMode::Cross) => SimulatorMode::Alternating {
                initial: Orientation::default(),
            },
            (ModeArg::Cross, _) => SimulatorMode::Cross,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppOptions {
    pub script: PathBuf,
    pub config: Option<PathBuf>,
    pub mode: Option<ModeArg>,
    pub csv: Option<PathBuf>,
    pub json: Option<PathBuf>,
    pub frames: Option<PathBuf>,
    pub frame_size: (u32, u32),
    pub start: Option<String>,
    pub tick_seconds: i64,
    pub snap: bool,
    pub strict: bool,
}

/// Headless session runner: replays a script through the state machine
/// and writes the exports.
pub struct App {
    options: AppOptions,
    config: SessionConfig,
    script: SessionScript,
    start: Option<NaiveDateTime>,
    tick: TimeDelta,
    layout: ChartLayout,
    painter: SkiaChartPainter,
}

impl App {
    pub fn new(options: AppOptions) -> Result<Self> {
        let script = SessionScript::load(&options.script)?;

        let mut config = match options.config.as_ref().or(script.config.as_ref()) {
            Some(path) => load_config(path)?,
            None => SessionConfig::default(),
        };
        if let Some(mode) = options.mode {
            config.mode = mode.apply(config.mode);
        }
        config.validate().context("Invalid session config")?;

        let start = options
            .start
            .as_deref()
            .or(script.start.as_deref())
            .map(parse_start)
            .transpose()?;
        let tick = TimeDelta::try_seconds(options.tick_seconds).with_context(|| {
            format!("Clock tick of {} seconds is out of range", options.tick_seconds)
        })?;

        let painter = SkiaChartPainter::for_scale(&config.scale);

        Ok(Self {
            options,
            config,
            script,
            start,
            tick,
            layout: ChartLayout::default(),
            painter,
        })
    }

    pub fn run(self) -> Result<()> {
        info!(
            "Replaying {} events in {} mode",
            self.script.events.len(),
            self.config.mode.name()
        );

        let log = match self.start {
            Some(start) => self.replay(ManualClock::with_tick(start, self.tick))?,
            None => self.replay(SystemClock)?,
        };

        let csv_path = self
            .options
            .csv
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.config.export_file_name()));
        fs::write(&csv_path, export::to_csv(&log))
            .with_context(|| format!("Failed to write {}", csv_path.display()))?;
        info!("Wrote {} trials to {}", log.len(), csv_path.display());

        if let Some(json_path) = &self.options.json {
            let json = export::to_json(&log)?;
            fs::write(json_path, json)
                .with_context(|| format!("Failed to write {}", json_path.display()))?;
            info!("Wrote JSON log to {}", json_path.display());
        }

        Ok(())
    }

    /// Feeds every scripted event to a fresh session and returns its log.
    pub fn replay<C: Clock>(&self, clock: C) -> Result<TrialLog> {
        let mut session = TrialStateMachine::new(self.config.clone(), clock)?;

        if let Some(dir) = &self.options.frames {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create frame directory {}", dir.display()))?;
            self.write_frame(&session, dir, 0)?;
        }

        for (index, event) in self.script.events.iter().enumerate() {
            let number = index + 1;
            let event = self.prepare(*event)?;
            let outcome = session.handle_event(event).map(|entry| entry.cloned());

            match outcome {
                Ok(Some(entry)) => report_entry(number, &entry),
                Ok(None) => report_live(&session, event),
                Err(e) if !self.options.strict && is_rejection(&e) => {
                    warn!("Event {number} ({event:?}) rejected: {e}");
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("Event {number} ({event:?}) failed"));
                }
            }

            if let Some(dir) = &self.options.frames {
                self.write_frame(&session, dir, number)?;
            }
        }

        Ok(session.log().clone())
    }

    fn prepare(&self, event: SessionEvent) -> Result<SessionEvent> {
        if !self.options.snap {
            return Ok(event);
        }
        Ok(match event {
            SessionEvent::SetAngle { orientation, angle } => SessionEvent::SetAngle {
                orientation,
                angle: self.config.snap_to_step(angle)?,
            },
            SessionEvent::ConfirmAngle { angle } => SessionEvent::ConfirmAngle {
                angle: self.config.snap_to_step(angle)?,
            },
            SessionEvent::Confirm => SessionEvent::Confirm,
        })
    }

    fn write_frame<C: Clock>(
        &self,
        session: &TrialStateMachine<C>,
        dir: &Path,
        number: usize,
    ) -> Result<()> {
        let (width, height) = self.options.frame_size;
        let description = self.layout.describe(&session.frame(), session.resolver())?;
        let png = self.painter.encode_png(width, height, &description)?;
        let path = dir.join(format!("frame_{number:04}.png"));
        fs::write(&path, png).with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("Frame {number} written to {}", path.display());
        Ok(())
    }
}

fn parse_start(text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .map_err(|e| anyhow!("Bad start time {text:?}, expected {TIMESTAMP_FORMAT}: {e}"))
}

/// Errors a live GUI would simply ignore.
fn is_rejection(error: &MChartError) -> bool {
    matches!(
        error,
        MChartError::InvalidInput(_) | MChartError::ModeMismatch { .. }
    )
}

fn report_entry(number: usize, entry: &TrialEntry) {
    debug!("Event {number} logged at {}", entry.formatted_timestamp());
}

fn report_live<C: Clock>(session: &TrialStateMachine<C>, event: SessionEvent) {
    if let SessionEvent::SetAngle { orientation, .. } = event {
        if let (Some(angle), Some(score)) = (
            session.angle(orientation),
            session.current_score(orientation),
        ) {
            info!(
                "{orientation}: dash spacing {:.2}°, score {score:.1}",
                angle.degrees()
            );
        }
    }
}
