//! Maps command tokens to fade and blackout operations.
//!
//! `dispatch` never waits for an animation: fades are spawned and their
//! handles returned, so a new token can be accepted mid-fade. Color commands
//! and `blackout` cancel whatever is running before they start.

use std::fmt;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;

use crate::command::Command;
use crate::fade::{FadeEngine, FadeError, FadeHandle};
use crate::fixture::FixtureLayout;

/// Retained status, replaced on every dispatched token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Active(Command),
    Error(String),
}

impl fmt::Display for Status {
    /// The retained value published for subscribers: the token name of the
    /// active command, `idle`, or `error`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => f.write_str("idle"),
            Status::Active(command) => f.write_str(command.as_str()),
            Status::Error(_) => f.write_str("error"),
        }
    }
}

#[derive(Debug)]
pub enum DispatchOutcome {
    Accepted {
        command: Command,
        /// Running animation, if the command started one.
        fade: Option<FadeHandle>,
    },
    Unrecognized(String),
    Failed {
        command: Command,
        error: FadeError,
    },
}

impl DispatchOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, DispatchOutcome::Accepted { .. })
    }

    pub fn into_fade(self) -> Option<FadeHandle> {
        match self {
            DispatchOutcome::Accepted { fade, .. } => fade,
            _ => None,
        }
    }
}

pub struct CommandDispatcher {
    engine: FadeEngine,
    layout: FixtureLayout,
    step_delay: Duration,
    rng: Mutex<StdRng>,
    status: watch::Sender<Status>,
}

impl CommandDispatcher {
    pub fn new(engine: FadeEngine, layout: FixtureLayout, step_delay: Duration) -> Self {
        let (status, _) = watch::channel(Status::Idle);
        Self {
            engine,
            layout,
            step_delay,
            rng: Mutex::new(StdRng::from_os_rng()),
            status,
        }
    }

    /// Replace the random source used by `random`.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    pub fn engine(&self) -> &FadeEngine {
        &self.engine
    }

    pub fn layout(&self) -> &FixtureLayout {
        &self.layout
    }

    /// Watch the retained status value.
    pub fn subscribe(&self) -> watch::Receiver<Status> {
        self.status.subscribe()
    }

    /// Parse and run one token. Unknown tokens change nothing.
    pub fn dispatch(&self, token: &str) -> DispatchOutcome {
        let command = match token.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                tracing::warn!(%err, "ignoring command");
                self.status.send_replace(Status::Error(token.to_string()));
                return DispatchOutcome::Unrecognized(token.to_string());
            }
        };

        match self.execute(command) {
            Ok(fade) => {
                tracing::info!(%command, "command accepted");
                self.status.send_replace(Status::Active(command));
                DispatchOutcome::Accepted { command, fade }
            }
            Err(error) => {
                tracing::error!(%command, %error, "command failed");
                self.status.send_replace(Status::Error(command.to_string()));
                DispatchOutcome::Failed { command, error }
            }
        }
    }

    pub fn execute(&self, command: Command) -> Result<Option<FadeHandle>, FadeError> {
        match command {
            Command::Blackout => {
                self.engine.blackout();
                Ok(None)
            }
            Command::Fadeout => {
                let targets = self
                    .layout
                    .all_color_channels()
                    .into_iter()
                    .map(|channel| (channel, 0))
                    .collect::<Vec<_>>();
                self.engine.fade_all_to(&targets, self.step_delay).map(Some)
            }
            Command::Random => self.random_fade(),
            Command::Red | Command::Green | Command::Blue | Command::Yellow | Command::Purple => {
                self.engine.blackout();
                let targets = command
                    .colors()
                    .iter()
                    .flat_map(|&color| self.layout.color_channels(color))
                    .map(|channel| (channel, u8::MAX))
                    .collect::<Vec<_>>();
                self.engine.fade_all_to(&targets, self.step_delay).map(Some)
            }
        }
    }

    fn random_fade(&self) -> Result<Option<FadeHandle>, FadeError> {
        let channels = self.layout.all_color_channels();
        let (channel, target) = {
            let mut rng = self.rng.lock();
            let Some(&channel) = channels.choose(&mut *rng) else {
                tracing::warn!("no fixtures configured for random");
                return Ok(None);
            };
            (channel, rng.random_range(0..=u8::MAX))
        };
        let current = self.engine.get(channel)?;
        tracing::debug!(channel, current, target, "random fade");
        self.engine.fade(channel, target, self.step_delay).map(Some)
    }
}
