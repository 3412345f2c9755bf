use std::fmt;
use std::str::FromStr;

use super::error::RoutingError;

/// Service-independent travel modes. Each backend remaps these into its own
/// vocabulary through a [`ModeMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Walk,
    Bike,
    Drive,
    Transit,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Walk => "walk",
            Self::Bike => "bike",
            Self::Drive => "drive",
            Self::Transit => "transit",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "walk" => Ok(Self::Walk),
            "bike" => Ok(Self::Bike),
            "drive" => Ok(Self::Drive),
            "transit" => Ok(Self::Transit),
            other => {
                log::error!("Invalid mode \"{}\"", other);
                Err(RoutingError::InvalidMode(other.to_string()))
            }
        }
    }
}

/// Fixed remap from canonical modes to one backend's tokens. Set once per
/// backend, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ModeMap {
    walk: &'static str,
    bike: &'static str,
    drive: &'static str,
    transit: &'static str,
}

impl ModeMap {
    pub const fn new(
        walk: &'static str,
        bike: &'static str,
        drive: &'static str,
        transit: &'static str,
    ) -> Self {
        Self {
            walk,
            bike,
            drive,
            transit,
        }
    }

    pub fn translate(&self, mode: Mode) -> &'static str {
        match mode {
            Mode::Walk => self.walk,
            Mode::Bike => self.bike,
            Mode::Drive => self.drive,
            Mode::Transit => self.transit,
        }
    }
}
