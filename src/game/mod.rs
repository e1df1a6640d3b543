//! Game simulation modules

pub mod clock;
pub mod player;
pub mod room;
pub mod tick;

pub use player::Player;
pub use room::{GameRoom, RoomSettings};

use serde::{Deserialize, Serialize};

/// Compass heading a snake's head advances toward each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Decode a client direction token. Tokens are exact and case-sensitive;
    /// anything else is unrecognized and yields `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "west" => Some(Self::West),
            "north" => Some(Self::North),
            "east" => Some(Self::East),
            "south" => Some(Self::South),
            _ => None,
        }
    }

    pub(crate) fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Self::North,
            1 => Self::East,
            2 => Self::South,
            _ => Self::West,
        }
    }

    pub(crate) fn index(self) -> u8 {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }
}

/// One cell on the playfield grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: u16,
    pub y: u16,
}

impl Cell {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// The neighboring cell one step in `direction`. The playfield is a
    /// torus: stepping off an edge wraps to the opposite side.
    pub fn step(self, direction: Direction, width: u16, height: u16) -> Self {
        match direction {
            Direction::North => Self {
                x: self.x,
                y: if self.y == 0 { height - 1 } else { self.y - 1 },
            },
            Direction::South => Self {
                x: self.x,
                y: if self.y + 1 == height { 0 } else { self.y + 1 },
            },
            Direction::East => Self {
                x: if self.x + 1 == width { 0 } else { self.x + 1 },
                y: self.y,
            },
            Direction::West => Self {
                x: if self.x == 0 { width - 1 } else { self.x - 1 },
                y: self.y,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_tokens_decode_exactly() {
        assert_eq!(Direction::from_token("north"), Some(Direction::North));
        assert_eq!(Direction::from_token("south"), Some(Direction::South));
        assert_eq!(Direction::from_token("east"), Some(Direction::East));
        assert_eq!(Direction::from_token("west"), Some(Direction::West));
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        assert_eq!(Direction::from_token("up"), None);
        assert_eq!(Direction::from_token("North"), None);
        assert_eq!(Direction::from_token(""), None);
        assert_eq!(Direction::from_token("north "), None);
    }

    #[test]
    fn step_moves_one_cell() {
        let cell = Cell::new(10, 10);
        assert_eq!(cell.step(Direction::North, 64, 48), Cell::new(10, 9));
        assert_eq!(cell.step(Direction::South, 64, 48), Cell::new(10, 11));
        assert_eq!(cell.step(Direction::East, 64, 48), Cell::new(11, 10));
        assert_eq!(cell.step(Direction::West, 64, 48), Cell::new(9, 10));
    }

    #[test]
    fn step_wraps_at_grid_edges() {
        assert_eq!(Cell::new(0, 5).step(Direction::West, 64, 48), Cell::new(63, 5));
        assert_eq!(Cell::new(63, 5).step(Direction::East, 64, 48), Cell::new(0, 5));
        assert_eq!(Cell::new(5, 0).step(Direction::North, 64, 48), Cell::new(5, 47));
        assert_eq!(Cell::new(5, 47).step(Direction::South, 64, 48), Cell::new(5, 0));
    }
}
