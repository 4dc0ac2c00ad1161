//! artfade core library: drives an Art-Net lighting node from named
//! commands.
//!
//! Commands are parsed into a closed vocabulary and dispatched to the fade
//! engine, which ramps universe channels one unit at a time on independent
//! tokio tasks and sends a full ArtDMX frame after every step. Encoding is
//! byte-oriented and side-effect free; the socket is isolated in
//! `transport`.
//!
//! Invariants:
//! - The universe always holds exactly 512 slots.
//! - Fades move by exactly one unit per step and never overshoot.
//! - A cancelled fade performs no further writes.
//!
//! Version française (résumé):
//! Cette crate pilote un nœud Art-Net : commandes -> moteur de fondus ->
//! univers DMX -> encodeur ArtDMX -> transport UDP. Chaque fondu tourne dans
//! sa propre tâche et peut être annulé par une commande plus récente.
//!
//! # Examples
//! ```no_run
//! use artfade_core::{Config, open_controller};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let dispatcher = open_controller(&Config::default())?;
//! if let Some(fade) = dispatcher.dispatch("purple").into_fade() {
//!     fade.wait().await;
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use thiserror::Error;

mod command;
mod config;
mod dispatch;
mod fade;
mod fixture;
pub mod protocols;
mod transport;
mod universe;

pub use command::{Command, UnknownCommand};
pub use config::{
    Config, ConfigError, DEFAULT_BRIGHTNESS, DEFAULT_FIXTURES, DEFAULT_STEP_DELAY_MS,
};
pub use dispatch::{CommandDispatcher, DispatchOutcome, Status};
pub use fade::{FadeEngine, FadeError, FadeHandle, FadeOutcome};
pub use fixture::{ColorChannel, FIXTURE_FOOTPRINT, Fixture, FixtureLayout};
pub use protocols::artnet::{
    ArtDmx, ArtDmxPacket, PortAddress, encode_artdmx, encode_channels, encode_universe,
    parse_artdmx,
};
pub use transport::{PacketSink, TransportError, UdpTransport};
pub use universe::{DmxSnapshot, FIRST_CHANNEL, LAST_CHANNEL, UNIVERSE_SIZE, Universe, UniverseError};

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Open the UDP transport for `config` and build a dispatcher on it.
///
/// # Errors
/// Fails when the config is invalid or no socket can be opened.
pub fn open_controller(config: &Config) -> Result<CommandDispatcher, ControllerError> {
    let transport = UdpTransport::open(config.destination())?;
    Ok(controller_with_sink(config, Arc::new(transport))?)
}

/// Build a dispatcher in the blackout state on any packet sink and send the
/// initial frame.
pub fn controller_with_sink(
    config: &Config,
    sink: Arc<dyn PacketSink>,
) -> Result<CommandDispatcher, ConfigError> {
    let layout = config.validate()?;
    let universe = Universe::new(&layout, config.default_brightness);
    let engine = FadeEngine::new(universe, sink, config.port_address);
    engine.send_frame();
    Ok(CommandDispatcher::new(engine, layout, config.step_delay()))
}
