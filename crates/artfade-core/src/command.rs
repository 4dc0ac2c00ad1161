use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::fixture::ColorChannel;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized command: {0:?}")]
pub struct UnknownCommand(pub String);

/// The closed command vocabulary. Tokens match case-sensitively.
///
/// # Examples
/// ```
/// use artfade_core::Command;
///
/// assert_eq!("purple".parse::<Command>(), Ok(Command::Purple));
/// assert!("Purple".parse::<Command>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Blackout,
    Fadeout,
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Random,
}

impl Command {
    pub const ALL: [Command; 8] = [
        Command::Blackout,
        Command::Fadeout,
        Command::Red,
        Command::Green,
        Command::Blue,
        Command::Yellow,
        Command::Purple,
        Command::Random,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Command::Blackout => "blackout",
            Command::Fadeout => "fadeout",
            Command::Red => "red",
            Command::Green => "green",
            Command::Blue => "blue",
            Command::Yellow => "yellow",
            Command::Purple => "purple",
            Command::Random => "random",
        }
    }

    /// Color channels raised to full after the blackout, if this is a color
    /// command.
    pub fn colors(self) -> &'static [ColorChannel] {
        match self {
            Command::Red => &[ColorChannel::Red],
            Command::Green => &[ColorChannel::Green],
            Command::Blue => &[ColorChannel::Blue],
            Command::Yellow => &[ColorChannel::Red, ColorChannel::Green],
            Command::Purple => &[ColorChannel::Red, ColorChannel::Blue],
            Command::Blackout | Command::Fadeout | Command::Random => &[],
        }
    }
}

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|command| command.as_str() == token)
            .ok_or_else(|| UnknownCommand(token.to_string()))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
