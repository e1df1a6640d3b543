//! Player entity: one snake per connected client

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use parking_lot::Mutex;
use uuid::Uuid;

use super::{Cell, Direction};

/// Mutable per-connection game state.
///
/// The heading and alive flag are atomics so the command router and the tick
/// engine can touch them without taking a lock; a heading write racing a tick
/// resolves to either the old or the new heading, never a torn value. The
/// body is only ever mutated by the tick engine.
pub struct Player {
    id: u32,
    connection_id: Uuid,
    color: String,
    heading: AtomicU8,
    alive: AtomicBool,
    body: Mutex<VecDeque<Cell>>,
}

impl Player {
    /// Create a snake coiled on `head`. The body starts as `length` copies of
    /// the head cell and unspools into a line as the snake advances.
    pub fn new(id: u32, connection_id: Uuid, head: Cell, length: usize) -> Self {
        let body: VecDeque<Cell> = std::iter::repeat(head).take(length.max(1)).collect();
        Self {
            id,
            connection_id,
            color: color_for(id),
            heading: AtomicU8::new(Direction::from_index(id as u8).index()),
            alive: AtomicBool::new(true),
            body: Mutex::new(body),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn connection_id(&self) -> Uuid {
        self.connection_id
    }

    /// Hex display color, stable for the lifetime of the player.
    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn heading(&self) -> Direction {
        Direction::from_index(self.heading.load(Ordering::Relaxed))
    }

    pub fn set_heading(&self, direction: Direction) {
        self.heading.store(direction.index(), Ordering::Relaxed);
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    pub(crate) fn kill(&self) {
        self.alive.store(false, Ordering::Relaxed);
    }

    /// Current body cells, head first.
    pub fn body(&self) -> Vec<Cell> {
        self.body.lock().iter().copied().collect()
    }

    pub fn head(&self) -> Cell {
        // body always holds at least one cell
        *self.body.lock().front().unwrap_or(&Cell::new(0, 0))
    }

    /// Advance the head one cell in the current heading; the tail follows.
    /// Returns the new head cell.
    pub(crate) fn advance(&self, width: u16, height: u16) -> Cell {
        let heading = self.heading();
        let mut body = self.body.lock();
        let head = body.front().copied().unwrap_or(Cell::new(0, 0));
        let next = head.step(heading, width, height);
        body.push_front(next);
        body.pop_back();
        next
    }
}

/// Deterministic display color derived from the player id.
fn color_for(id: u32) -> String {
    format!("#{:06X}", id.wrapping_mul(0x9E37_79B1) & 0x00FF_FFFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: u32, head: Cell) -> Player {
        Player::new(id, Uuid::new_v4(), head, 5)
    }

    #[test]
    fn color_is_deterministic_per_id() {
        let a = player(1, Cell::new(0, 0));
        let b = player(1, Cell::new(9, 9));
        let c = player(2, Cell::new(0, 0));
        assert_eq!(a.color(), b.color());
        assert_ne!(a.color(), c.color());
        assert!(a.color().starts_with('#'));
        assert_eq!(a.color().len(), 7);
    }

    #[test]
    fn default_heading_derives_from_id() {
        assert_eq!(player(4, Cell::new(0, 0)).heading(), Direction::North);
        assert_eq!(player(5, Cell::new(0, 0)).heading(), Direction::East);
        assert_eq!(player(6, Cell::new(0, 0)).heading(), Direction::South);
        assert_eq!(player(7, Cell::new(0, 0)).heading(), Direction::West);
    }

    #[test]
    fn set_heading_round_trips() {
        let p = player(1, Cell::new(0, 0));
        for direction in [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ] {
            p.set_heading(direction);
            assert_eq!(p.heading(), direction);
        }
    }

    #[test]
    fn advance_unspools_the_body() {
        let p = player(1, Cell::new(10, 10));
        p.set_heading(Direction::East);
        assert_eq!(p.advance(64, 48), Cell::new(11, 10));
        assert_eq!(p.advance(64, 48), Cell::new(12, 10));
        let body = p.body();
        assert_eq!(body.len(), 5);
        assert_eq!(body[0], Cell::new(12, 10));
        assert_eq!(body[1], Cell::new(11, 10));
        assert_eq!(body[2], Cell::new(10, 10));
    }

    #[test]
    fn advance_wraps_around_the_grid() {
        let p = player(1, Cell::new(63, 0));
        p.set_heading(Direction::East);
        assert_eq!(p.advance(64, 48), Cell::new(0, 0));
        p.set_heading(Direction::North);
        assert_eq!(p.advance(64, 48), Cell::new(0, 47));
    }
}
