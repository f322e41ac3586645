use super::config::{SessionConfig, SimulatorMode};
use super::trial_log::{LogLayout, TrialLog};
use chrono::{NaiveDateTime, Timelike};
use log::{debug, info, warn};
use mchart_core::{
    ChartFrame, DashPatternResolver, MChartError, Measurement, Orientation, Result, TrialEntry,
    TrialMeasurements, VisualAngle,
};
use mchart_timing::Clock;
use serde::{Deserialize, Serialize};

/// Interactions the surrounding GUI forwards to the session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A slider moved.
    SetAngle {
        orientation: Orientation,
        angle: f64,
    },
    /// The confirm button, committing the current slider values.
    Confirm,
    /// Alternating mode: confirm the awaited orientation at `angle`.
    ConfirmAngle { angle: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SliderState {
    Alternating {
        awaiting: Orientation,
        pending: VisualAngle,
    },
    Cross {
        vertical: VisualAngle,
        horizontal: VisualAngle,
    },
}

/// Owns the current orientation or slider pair and the trial log.
pub struct TrialStateMachine<C: Clock> {
    config: SessionConfig,
    clock: C,
    resolver: DashPatternResolver,
    sliders: SliderState,
    log: TrialLog,
}

impl<C: Clock> TrialStateMachine<C> {
    pub fn new(config: SessionConfig, clock: C) -> Result<Self> {
        config.validate()?;
        let resolver = config.dash_resolver()?;
        let (sliders, layout) = match config.mode {
            SimulatorMode::Alternating { initial } => (
                SliderState::Alternating {
                    awaiting: initial,
                    pending: VisualAngle::ZERO,
                },
                LogLayout::Single,
            ),
            SimulatorMode::Cross => (
                SliderState::Cross {
                    vertical: VisualAngle::ZERO,
                    horizontal: VisualAngle::ZERO,
                },
                LogLayout::Paired,
            ),
        };

        Ok(Self {
            config,
            clock,
            resolver,
            sliders,
            log: TrialLog::new(layout),
        })
    }

    /// Applies one GUI interaction. Returns the appended entry for confirmations.
    pub fn handle_event(&mut self, event: SessionEvent) -> Result<Option<&TrialEntry>> {
        match event {
            SessionEvent::SetAngle { orientation, angle } => {
                self.set_angle(orientation, angle)?;
                Ok(None)
            }
            SessionEvent::Confirm => self.confirm().map(Some),
            SessionEvent::ConfirmAngle { angle } => self.confirm_angle(angle).map(Some),
        }
    }

    /// Moves the slider for `orientation`.
    ///
    /// In alternating mode only the awaited orientation has a live slider.
    pub fn set_angle(&mut self, orientation: Orientation, degrees: f64) -> Result<()> {
        let angle = self.config.score.check(degrees)?;
        match &mut self.sliders {
            SliderState::Alternating { awaiting, pending } => {
                if *awaiting != orientation {
                    return Err(MChartError::ModeMismatch {
                        operation: "adjusting the inactive orientation",
                        mode: "alternating",
                    });
                }
                *pending = angle;
            }
            SliderState::Cross {
                vertical,
                horizontal,
            } => match orientation {
                Orientation::Vertical => *vertical = angle,
                Orientation::Horizontal => *horizontal = angle,
            },
        }
        debug!("{orientation} slider at {:.2}°", angle.degrees());
        Ok(())
    }

    /// Commits the current slider value(s) as one trial.
    pub fn confirm(&mut self) -> Result<&TrialEntry> {
        match self.sliders {
            SliderState::Alternating { awaiting, pending } => {
                Ok(self.commit_single(awaiting, pending))
            }
            SliderState::Cross {
                vertical,
                horizontal,
            } => Ok(self.commit_pair(vertical, horizontal)),
        }
    }

    /// Alternating mode: records `degrees` for the awaited orientation and
    /// switches to the other one. Nothing changes if `degrees` is out of range.
    pub fn confirm_angle(&mut self, degrees: f64) -> Result<&TrialEntry> {
        let SliderState::Alternating { awaiting, .. } = self.sliders else {
            return Err(MChartError::ModeMismatch {
                operation: "confirming a single angle",
                mode: self.config.mode.name(),
            });
        };
        let angle = self.config.score.check(degrees)?;
        Ok(self.commit_single(awaiting, angle))
    }

    fn commit_single(&mut self, orientation: Orientation, angle: VisualAngle) -> &TrialEntry {
        let measurement = self.measure(orientation, angle);
        let entry = TrialEntry {
            timestamp: self.stamp(),
            measurements: TrialMeasurements::Single(measurement),
        };

        // The next orientation's slider starts over at zero.
        self.sliders = SliderState::Alternating {
            awaiting: orientation.next(),
            pending: VisualAngle::ZERO,
        };

        info!(
            "Trial {} confirmed: {orientation} at {:.2}°, score {:.1}",
            self.log.len() + 1,
            angle.degrees(),
            measurement.score
        );
        self.log.append(entry)
    }

    fn commit_pair(&mut self, vertical: VisualAngle, horizontal: VisualAngle) -> &TrialEntry {
        let v = self.measure(Orientation::Vertical, vertical);
        let h = self.measure(Orientation::Horizontal, horizontal);
        let entry = TrialEntry {
            timestamp: self.stamp(),
            measurements: TrialMeasurements::Paired {
                vertical: v,
                horizontal: h,
            },
        };

        if self.config.reset_after_confirm {
            self.sliders = SliderState::Cross {
                vertical: VisualAngle::ZERO,
                horizontal: VisualAngle::ZERO,
            };
        }

        info!(
            "Trial {} confirmed: vertical {:.2}° (score {:.1}), horizontal {:.2}° (score {:.1})",
            self.log.len() + 1,
            vertical.degrees(),
            v.score,
            horizontal.degrees(),
            h.score
        );
        self.log.append(entry)
    }

    fn measure(&self, orientation: Orientation, angle: VisualAngle) -> Measurement {
        Measurement {
            orientation,
            angle,
            score: self.config.score.score_angle(angle),
        }
    }

    /// Whole-second timestamp that never runs behind the previous entry.
    fn stamp(&self) -> NaiveDateTime {
        let now = self.clock.now();
        let now = now.with_nanosecond(0).unwrap_or(now);
        match self.log.last() {
            Some(last) if now < last.timestamp => {
                warn!(
                    "Clock went backwards ({now} < {}), reusing previous timestamp",
                    last.timestamp
                );
                last.timestamp
            }
            _ => now,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn mode(&self) -> SimulatorMode {
        self.config.mode
    }

    pub fn resolver(&self) -> &DashPatternResolver {
        &self.resolver
    }

    /// The orientation waiting for confirmation (alternating mode only).
    pub fn awaiting(&self) -> Option<Orientation> {
        match self.sliders {
            SliderState::Alternating { awaiting, .. } => Some(awaiting),
            SliderState::Cross { .. } => None,
        }
    }

    /// Current slider value for `orientation`, if that slider is live.
    pub fn angle(&self, orientation: Orientation) -> Option<VisualAngle> {
        self.frame().angle_for(orientation)
    }

    /// Live score for the slider of `orientation`.
    pub fn current_score(&self, orientation: Orientation) -> Option<f64> {
        self.angle(orientation)
            .map(|angle| self.config.score.score_angle(angle))
    }

    /// What the chart should show right now.
    pub fn frame(&self) -> ChartFrame {
        match self.sliders {
            SliderState::Alternating { awaiting, pending } => ChartFrame::Grid {
                orientation: awaiting,
                angle: pending,
            },
            SliderState::Cross {
                vertical,
                horizontal,
            } => ChartFrame::Cross {
                vertical,
                horizontal,
            },
        }
    }

    pub fn log(&self) -> &TrialLog {
        &self.log
    }

    pub fn trial_count(&self) -> usize {
        self.log.len()
    }
}
