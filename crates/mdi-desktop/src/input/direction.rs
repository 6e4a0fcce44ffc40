//! Compass direction of a resize handle

use crate::{DesktopError, DesktopResult};
use std::fmt;
use std::str::FromStr;

/// Which window edges a resize drags
///
/// Parsed from a token made of the letters `n`, `s`, `e`, `w` (any subset,
/// any order), e.g. `"se"` for the bottom-right corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ResizeDirection {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl ResizeDirection {
    pub const N: Self = Self::edges(true, false, false, false);
    pub const S: Self = Self::edges(false, true, false, false);
    pub const E: Self = Self::edges(false, false, true, false);
    pub const W: Self = Self::edges(false, false, false, true);
    pub const NE: Self = Self::edges(true, false, true, false);
    pub const NW: Self = Self::edges(true, false, false, true);
    pub const SE: Self = Self::edges(false, true, true, false);
    pub const SW: Self = Self::edges(false, true, false, true);

    const fn edges(north: bool, south: bool, east: bool, west: bool) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Parse a compass token
    pub fn parse(token: &str) -> DesktopResult<Self> {
        let mut direction = Self::default();
        for c in token.trim().chars() {
            match c.to_ascii_lowercase() {
                'n' => direction.north = true,
                's' => direction.south = true,
                'e' => direction.east = true,
                'w' => direction.west = true,
                _ => return Err(DesktopError::InvalidDirection(token.to_string())),
            }
        }
        if direction.is_empty() {
            return Err(DesktopError::InvalidDirection(token.to_string()));
        }
        Ok(direction)
    }

    /// No edge selected
    pub fn is_empty(&self) -> bool {
        !(self.north || self.south || self.east || self.west)
    }
}

impl FromStr for ResizeDirection {
    type Err = DesktopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ResizeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters = [
            (self.north, 'n'),
            (self.south, 's'),
            (self.east, 'e'),
            (self.west, 'w'),
        ];
        for (set, letter) in letters {
            if set {
                write!(f, "{}", letter)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_corners_and_edges() {
        assert_eq!(ResizeDirection::parse("se").unwrap(), ResizeDirection::SE);
        assert_eq!(ResizeDirection::parse("es").unwrap(), ResizeDirection::SE);
        assert_eq!(ResizeDirection::parse("NW").unwrap(), ResizeDirection::NW);
        assert_eq!(ResizeDirection::parse("n").unwrap(), ResizeDirection::N);
        assert_eq!("w".parse::<ResizeDirection>().unwrap(), ResizeDirection::W);
    }

    #[test]
    fn test_parse_rejects_empty_and_foreign_letters() {
        assert!(matches!(
            ResizeDirection::parse(""),
            Err(DesktopError::InvalidDirection(_))
        ));
        assert!(matches!(
            ResizeDirection::parse("sx"),
            Err(DesktopError::InvalidDirection(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(ResizeDirection::SE.to_string(), "se");
        assert_eq!(ResizeDirection::NW.to_string(), "nw");
    }
}
