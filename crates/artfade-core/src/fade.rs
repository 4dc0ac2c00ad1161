//! Fade engine: ramps channels one unit at a time, sending a full-universe
//! frame after every step.
//!
//! Each fade runs as its own tokio task. The universe and a per-channel
//! generation counter share one lock; starting a fade or cancelling bumps
//! the generation of the affected channels, and a running task compares its
//! recorded generation under the same lock before each step. A cancelled
//! task therefore never writes again once `cancel` or `blackout` returns.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::protocols::artnet::{ArtDmxPacket, PortAddress, encode_universe};
use crate::transport::PacketSink;
use crate::universe::{DmxSnapshot, UNIVERSE_SIZE, Universe, UniverseError, slot_index};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FadeError {
    #[error(transparent)]
    Universe(#[from] UniverseError),
}

/// How a fade task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeOutcome {
    /// Every channel reached its target.
    Completed,
    /// At least one channel was taken over by a newer fade, a cancel or a
    /// blackout.
    Cancelled,
}

/// Handle to a running fade task.
#[derive(Debug)]
pub struct FadeHandle {
    channels: Vec<u16>,
    join: JoinHandle<FadeOutcome>,
}

impl FadeHandle {
    pub fn channels(&self) -> &[u16] {
        &self.channels
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the task to stop. A task that panicked or was aborted is
    /// logged and reported as cancelled.
    pub async fn wait(self) -> FadeOutcome {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(channels = ?self.channels, error = %err, "fade task failed");
                FadeOutcome::Cancelled
            }
        }
    }
}

struct FadeState {
    universe: Universe,
    generations: Vec<u64>,
}

struct Shared {
    state: Mutex<FadeState>,
    sink: Arc<dyn PacketSink>,
    port_address: PortAddress,
}

#[derive(Debug, Clone, Copy)]
struct Ramp {
    idx: usize,
    target: u8,
    generation: u64,
}

/// Shared handle to the universe and its output.
///
/// Cloning is cheap; all clones drive the same universe.
#[derive(Clone)]
pub struct FadeEngine {
    shared: Arc<Shared>,
}

impl FadeEngine {
    pub fn new(universe: Universe, sink: Arc<dyn PacketSink>, port_address: PortAddress) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(FadeState {
                    universe,
                    generations: vec![0; UNIVERSE_SIZE],
                }),
                sink,
                port_address,
            }),
        }
    }

    pub fn port_address(&self) -> PortAddress {
        self.shared.port_address
    }

    pub fn get(&self, channel: u16) -> Result<u8, UniverseError> {
        self.shared.state.lock().universe.get(channel)
    }

    pub fn snapshot(&self) -> DmxSnapshot {
        self.shared.state.lock().universe.snapshot()
    }

    /// Ramp one channel to `target`. Must be called inside a tokio runtime.
    ///
    /// Any fade already running on `channel` stops before its next step.
    pub fn fade(
        &self,
        channel: u16,
        target: u8,
        step_delay: Duration,
    ) -> Result<FadeHandle, FadeError> {
        self.fade_all_to(&[(channel, target)], step_delay)
    }

    /// Ramp several channels together, one unit per channel per step.
    ///
    /// Channels finish independently as each reaches its target; one frame is
    /// sent per step covering every channel that moved. A later entry for the
    /// same channel replaces an earlier one.
    pub fn fade_all_to(
        &self,
        targets: &[(u16, u8)],
        step_delay: Duration,
    ) -> Result<FadeHandle, FadeError> {
        let mut indices = Vec::with_capacity(targets.len());
        for &(channel, target) in targets {
            let idx = slot_index(channel)?;
            match indices.iter_mut().find(|(i, _)| *i == idx) {
                Some(entry) => entry.1 = target,
                None => indices.push((idx, target)),
            }
        }

        let ramps = {
            let mut state = self.shared.state.lock();
            indices
                .iter()
                .map(|&(idx, target)| {
                    state.generations[idx] += 1;
                    Ramp {
                        idx,
                        target,
                        generation: state.generations[idx],
                    }
                })
                .collect::<Vec<_>>()
        };

        let channels = ramps.iter().map(|r| r.idx as u16 + 1).collect::<Vec<_>>();
        tracing::debug!(?channels, ?step_delay, "fade started");
        let shared = Arc::clone(&self.shared);
        let join = tokio::spawn(run_ramps(shared, ramps, step_delay));
        Ok(FadeHandle { channels, join })
    }

    /// Stop any fade touching `channels` before its next step.
    pub fn cancel(&self, channels: &[u16]) -> Result<(), FadeError> {
        let indices = channels
            .iter()
            .map(|&c| slot_index(c))
            .collect::<Result<Vec<_>, _>>()?;
        let mut state = self.shared.state.lock();
        for idx in indices {
            state.generations[idx] += 1;
        }
        Ok(())
    }

    /// Stop every running fade.
    pub fn cancel_all(&self) {
        let mut state = self.shared.state.lock();
        cancel_all_locked(&mut state);
    }

    /// Cancel all fades, reset the universe and send the blackout frame.
    pub fn blackout(&self) {
        let mut state = self.shared.state.lock();
        cancel_all_locked(&mut state);
        state.universe.reset();
        tracing::debug!("blackout");
        send_locked(&self.shared, &state);
    }

    /// Send the current universe without changing it.
    pub fn send_frame(&self) {
        let state = self.shared.state.lock();
        send_locked(&self.shared, &state);
    }
}

fn cancel_all_locked(state: &mut FadeState) {
    for generation in state.generations.iter_mut() {
        *generation += 1;
    }
}

async fn run_ramps(shared: Arc<Shared>, mut ramps: Vec<Ramp>, step_delay: Duration) -> FadeOutcome {
    let mut cancelled = false;
    loop {
        {
            let mut guard = shared.state.lock();
            let state = &mut *guard;
            let mut stepped = false;
            ramps.retain(|ramp| {
                if state.generations[ramp.idx] != ramp.generation {
                    cancelled = true;
                    return false;
                }
                let channel = ramp.idx as u16 + 1;
                let Ok(current) = state.universe.get(channel) else {
                    return false;
                };
                let next = match current.cmp(&ramp.target) {
                    std::cmp::Ordering::Equal => return false,
                    std::cmp::Ordering::Less => current + 1,
                    std::cmp::Ordering::Greater => current - 1,
                };
                let moved = state.universe.set(channel, next).is_ok();
                stepped |= moved;
                moved
            });
            if !stepped {
                break;
            }
            send_locked(&shared, state);
        }

        if step_delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(step_delay).await;
        }
    }

    let outcome = if cancelled {
        FadeOutcome::Cancelled
    } else {
        FadeOutcome::Completed
    };
    tracing::debug!(?outcome, "fade finished");
    outcome
}

/// Encode and send while the caller still holds the state lock, so frames
/// leave in the order the universe changed.
fn send_locked(shared: &Shared, state: &FadeState) {
    let packet = encode_universe(&state.universe.snapshot(), shared.port_address);
    send_logged(shared.sink.as_ref(), &packet);
}

fn send_logged(sink: &dyn PacketSink, packet: &ArtDmxPacket) {
    if let Err(err) = sink.send(packet) {
        tracing::warn!(error = %err, "dropping frame");
    }
}
