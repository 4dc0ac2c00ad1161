//! Fixture addressing: a dimmer on the base channel followed by red, green
//! and blue.

use crate::universe::{UniverseError, slot_index};

/// Channels occupied by one fixture, starting at its base.
pub const FIXTURE_FOOTPRINT: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorChannel {
    Red,
    Green,
    Blue,
}

impl ColorChannel {
    pub const ALL: [ColorChannel; 3] = [ColorChannel::Red, ColorChannel::Green, ColorChannel::Blue];

    /// Offset from the fixture base channel.
    pub fn offset(self) -> u16 {
        match self {
            ColorChannel::Red => 1,
            ColorChannel::Green => 2,
            ColorChannel::Blue => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixture {
    base: u16,
}

impl Fixture {
    /// Create a fixture whose whole footprint fits inside the universe.
    pub fn new(base: u16) -> Result<Self, UniverseError> {
        slot_index(base)?;
        let last = base
            .checked_add(FIXTURE_FOOTPRINT - 1)
            .ok_or(UniverseError::ChannelOutOfRange { channel: base })?;
        slot_index(last)?;
        Ok(Self { base })
    }

    pub fn base(&self) -> u16 {
        self.base
    }

    /// Dimmer channel, set to the default brightness on reset.
    pub fn dimmer(&self) -> u16 {
        self.base
    }

    pub fn channel(&self, color: ColorChannel) -> u16 {
        self.base + color.offset()
    }
}

/// The configured, ordered list of fixtures.
///
/// # Examples
/// ```
/// use artfade_core::{ColorChannel, FixtureLayout};
///
/// let layout = FixtureLayout::new(&[10, 20])?;
/// assert_eq!(layout.color_channels(ColorChannel::Blue), vec![13, 23]);
/// # Ok::<(), artfade_core::UniverseError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureLayout {
    fixtures: Vec<Fixture>,
}

impl FixtureLayout {
    pub fn new(bases: &[u16]) -> Result<Self, UniverseError> {
        let fixtures = bases
            .iter()
            .map(|&base| Fixture::new(base))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { fixtures })
    }

    pub fn from_fixtures(fixtures: Vec<Fixture>) -> Self {
        Self { fixtures }
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    pub fn dimmer_channels(&self) -> Vec<u16> {
        self.fixtures.iter().map(Fixture::dimmer).collect()
    }

    pub fn color_channels(&self, color: ColorChannel) -> Vec<u16> {
        self.fixtures.iter().map(|f| f.channel(color)).collect()
    }

    /// Red, green and blue of every fixture, in fixture order.
    pub fn all_color_channels(&self) -> Vec<u16> {
        self.fixtures
            .iter()
            .flat_map(|f| ColorChannel::ALL.map(|color| f.channel(color)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_follow_base() {
        let fixture = Fixture::new(10).unwrap();
        assert_eq!(fixture.dimmer(), 10);
        assert_eq!(fixture.channel(ColorChannel::Red), 11);
        assert_eq!(fixture.channel(ColorChannel::Green), 12);
        assert_eq!(fixture.channel(ColorChannel::Blue), 13);
    }

    #[test]
    fn footprint_must_fit() {
        assert!(Fixture::new(509).is_ok());
        assert_eq!(
            Fixture::new(510),
            Err(UniverseError::ChannelOutOfRange { channel: 513 })
        );
        assert!(Fixture::new(0).is_err());
    }

    #[test]
    fn all_color_channels_in_fixture_order() {
        let layout = FixtureLayout::new(&[10, 20]).unwrap();
        assert_eq!(layout.all_color_channels(), vec![11, 12, 13, 21, 22, 23]);
        assert_eq!(layout.dimmer_channels(), vec![10, 20]);
    }
}
