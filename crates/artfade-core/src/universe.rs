//! DMX universe state: 512 one-indexed channel slots.
//!
//! The table is plain data. Synchronization lives in the fade engine, which
//! owns the only shared handle to a `Universe`.

use thiserror::Error;

use crate::fixture::FixtureLayout;

/// Number of channel slots in one DMX universe.
pub const UNIVERSE_SIZE: usize = 512;
/// Lowest addressable channel.
pub const FIRST_CHANNEL: u16 = 1;
/// Highest addressable channel.
pub const LAST_CHANNEL: u16 = UNIVERSE_SIZE as u16;

/// Errors returned by channel addressing.
///
/// # Examples
/// ```
/// use artfade_core::UniverseError;
///
/// let err = UniverseError::ChannelOutOfRange { channel: 0 };
/// assert!(err.to_string().contains("out of range"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UniverseError {
    #[error("channel {channel} out of range 1..=512")]
    ChannelOutOfRange { channel: u16 },
}

/// Validate a one-indexed channel and return its slot index.
pub fn slot_index(channel: u16) -> Result<usize, UniverseError> {
    if (FIRST_CHANNEL..=LAST_CHANNEL).contains(&channel) {
        Ok(usize::from(channel - 1))
    } else {
        Err(UniverseError::ChannelOutOfRange { channel })
    }
}

/// Immutable copy of all 512 slot values, channel 1 first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DmxSnapshot([u8; UNIVERSE_SIZE]);

impl DmxSnapshot {
    /// All-zero snapshot.
    pub fn zeroed() -> Self {
        Self([0; UNIVERSE_SIZE])
    }

    pub fn from_slots(slots: [u8; UNIVERSE_SIZE]) -> Self {
        Self(slots)
    }

    pub fn get(&self, channel: u16) -> Result<u8, UniverseError> {
        slot_index(channel).map(|idx| self.0[idx])
    }

    pub fn slots(&self) -> &[u8; UNIVERSE_SIZE] {
        &self.0
    }
}

impl Default for DmxSnapshot {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Channel value table plus the fixture defaults applied on reset.
///
/// # Examples
/// ```
/// use artfade_core::{FixtureLayout, Universe};
///
/// let layout = FixtureLayout::new(&[10, 20])?;
/// let mut universe = Universe::new(&layout, 40);
/// assert_eq!(universe.get(10)?, 40);
///
/// universe.set(11, 255)?;
/// assert_eq!(universe.get(11)?, 255);
///
/// universe.reset();
/// assert_eq!(universe.get(11)?, 0);
/// # Ok::<(), artfade_core::UniverseError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Universe {
    slots: [u8; UNIVERSE_SIZE],
    dimmers: Vec<u16>,
    default_brightness: u8,
}

impl Universe {
    /// Build the blackout state for `layout`.
    pub fn new(layout: &FixtureLayout, default_brightness: u8) -> Self {
        let mut universe = Self {
            slots: [0; UNIVERSE_SIZE],
            dimmers: layout.dimmer_channels(),
            default_brightness,
        };
        universe.reset();
        universe
    }

    pub fn get(&self, channel: u16) -> Result<u8, UniverseError> {
        slot_index(channel).map(|idx| self.slots[idx])
    }

    pub fn set(&mut self, channel: u16, value: u8) -> Result<(), UniverseError> {
        let idx = slot_index(channel)?;
        self.slots[idx] = value;
        Ok(())
    }

    /// Zero every slot, then restore the default brightness on each fixture
    /// base channel.
    pub fn reset(&mut self) {
        self.slots = [0; UNIVERSE_SIZE];
        for &channel in &self.dimmers {
            // Dimmer channels come from a validated layout.
            if let Ok(idx) = slot_index(channel) {
                self.slots[idx] = self.default_brightness;
            }
        }
    }

    pub fn default_brightness(&self) -> u8 {
        self.default_brightness
    }

    pub fn snapshot(&self) -> DmxSnapshot {
        DmxSnapshot(self.slots)
    }
}
