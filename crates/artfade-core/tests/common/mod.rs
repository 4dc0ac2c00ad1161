#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use artfade_core::{
    ArtDmx, ArtDmxPacket, Config, FadeEngine, FixtureLayout, PacketSink, PortAddress,
    TransportError, Universe, parse_artdmx,
};
use parking_lot::Mutex;

/// Sink that decodes and keeps every frame it is given.
#[derive(Default)]
pub struct RecordingSink {
    frames: Mutex<Vec<ArtDmx>>,
}

impl RecordingSink {
    pub fn frames(&self) -> Vec<ArtDmx> {
        self.frames.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.frames.lock().len()
    }

    pub fn last(&self) -> Option<ArtDmx> {
        self.frames.lock().last().cloned()
    }

    /// Value of `channel` in every recorded frame, in send order.
    pub fn values(&self, channel: u16) -> Vec<u8> {
        self.frames
            .lock()
            .iter()
            .map(|frame| frame.channel(channel).expect("channel in range"))
            .collect()
    }
}

impl PacketSink for RecordingSink {
    fn send(&self, packet: &ArtDmxPacket) -> Result<usize, TransportError> {
        let frame = parse_artdmx(packet.as_bytes())
            .expect("valid ArtDMX")
            .expect("ArtDMX opcode");
        self.frames.lock().push(frame);
        Ok(packet.len())
    }
}

/// Recording sink whose first send stalls the calling thread, as if the
/// sender were descheduled right before reaching the socket.
pub struct SlowFirstSink {
    pub inner: RecordingSink,
    stall: Duration,
    stalled: AtomicBool,
}

impl SlowFirstSink {
    pub fn new(stall: Duration) -> Self {
        Self {
            inner: RecordingSink::default(),
            stall,
            stalled: AtomicBool::new(false),
        }
    }
}

impl PacketSink for SlowFirstSink {
    fn send(&self, packet: &ArtDmxPacket) -> Result<usize, TransportError> {
        if !self.stalled.swap(true, Ordering::SeqCst) {
            std::thread::sleep(self.stall);
        }
        self.inner.send(packet)
    }
}

/// Sink whose every send fails.
pub struct FailingSink;

impl PacketSink for FailingSink {
    fn send(&self, _packet: &ArtDmxPacket) -> Result<usize, TransportError> {
        Err(TransportError::Send {
            destination: "127.0.0.1:6454".parse().unwrap(),
            source: std::io::Error::new(std::io::ErrorKind::NetworkUnreachable, "unreachable"),
        })
    }
}

pub fn engine_with(sink: Arc<dyn PacketSink>) -> FadeEngine {
    let layout = FixtureLayout::new(&[10, 20]).unwrap();
    FadeEngine::new(Universe::new(&layout, 40), sink, PortAddress::default())
}

pub fn config(step_delay_ms: u64) -> Config {
    Config {
        step_delay_ms,
        ..Config::default()
    }
}

/// Collapse repeated neighbours, leaving the distinct values a channel passed
/// through.
pub fn distinct_steps(values: &[u8]) -> Vec<u8> {
    let mut steps: Vec<u8> = Vec::new();
    for &value in values {
        if steps.last() != Some(&value) {
            steps.push(value);
        }
    }
    steps
}
