//! Game room: membership registry, clock lifecycle, and command routing

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use parking_lot::Mutex;
use rand::seq::SliceRandom;
use rand::Rng;
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::Config;
use crate::ws::protocol::{RosterEntry, ServerMsg};

use super::clock::ClockHandle;
use super::{tick, Cell, Direction, Player};

/// Tunables for one room.
#[derive(Debug, Clone)]
pub struct RoomSettings {
    pub tick_period: Duration,
    pub grid_width: u16,
    pub grid_height: u16,
    pub snake_length: usize,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_millis(100),
            grid_width: 64,
            grid_height: 48,
            snake_length: 5,
        }
    }
}

impl RoomSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            tick_period: config.tick_period(),
            grid_width: config.grid_width,
            grid_height: config.grid_height,
            snake_length: config.snake_length,
        }
    }
}

/// One game room: the set of connected players plus the clock that advances
/// them. Constructed once by the service and shared behind an `Arc`.
pub struct GameRoom {
    settings: RoomSettings,
    /// id -> player; safe for concurrent lookup while join/leave run
    players: DashMap<u32, Arc<Player>>,
    /// connection-scoped attribute: connection -> player id
    connections: DashMap<Uuid, u32>,
    /// Serializes join/leave so the occupancy transition and the clock
    /// start/stop can never be observed out of step.
    clock: Mutex<Option<ClockHandle>>,
    next_id: AtomicU32,
    events: broadcast::Sender<ServerMsg>,
}

impl GameRoom {
    pub fn new(settings: RoomSettings) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            settings,
            players: DashMap::new(),
            connections: DashMap::new(),
            clock: Mutex::new(None),
            next_id: AtomicU32::new(0),
            events,
        })
    }

    /// Subscribe to room broadcasts (join/leave/update messages).
    pub fn subscribe(&self) -> broadcast::Receiver<ServerMsg> {
        self.events.subscribe()
    }

    /// Register a new player for `connection_id`.
    ///
    /// Allocates the next id, spawns the snake, and starts the simulation
    /// clock if the room was empty. Broadcasts the roster as of the instant
    /// of the join and returns it alongside the new player.
    pub fn join(self: &Arc<Self>, connection_id: Uuid) -> (Arc<Player>, Vec<RosterEntry>) {
        let mut clock = self.clock.lock();

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let head = self.spawn_cell();
        let player = Arc::new(Player::new(
            id,
            connection_id,
            head,
            self.settings.snake_length,
        ));

        if self.players.is_empty() {
            *clock = Some(ClockHandle::start(self.clone(), self.settings.tick_period));
        }
        self.players.insert(id, player.clone());
        self.connections.insert(connection_id, id);

        let roster: Vec<RosterEntry> = self
            .snapshot()
            .iter()
            .map(|p| RosterEntry {
                id: p.id(),
                color: p.color().to_string(),
            })
            .collect();
        let _ = self.events.send(ServerMsg::Join {
            data: roster.clone(),
        });
        drop(clock);

        info!(
            player_id = id,
            connection_id = %connection_id,
            players = self.players.len(),
            "player joined"
        );
        (player, roster)
    }

    /// Remove the player bound to `connection_id`, stopping the clock if the
    /// room empties. A connection with no player is a no-op and returns
    /// `None`; otherwise the departed player's id is returned and a leave
    /// broadcast carrying only that id is emitted.
    pub fn leave(&self, connection_id: Uuid) -> Option<u32> {
        let mut clock = self.clock.lock();

        let (_, id) = self.connections.remove(&connection_id)?;
        self.players.remove(&id);
        if self.players.is_empty() {
            if let Some(handle) = clock.take() {
                handle.cancel();
            }
        }
        let _ = self.events.send(ServerMsg::Leave { id });
        drop(clock);

        info!(player_id = id, players = self.players.len(), "player left");
        Some(id)
    }

    /// Consistent view of all current players, ordered by id.
    pub fn snapshot(&self) -> Vec<Arc<Player>> {
        let mut players: Vec<Arc<Player>> =
            self.players.iter().map(|entry| entry.value().clone()).collect();
        players.sort_by_key(|p| p.id());
        players
    }

    pub fn lookup(&self, id: u32) -> Option<Arc<Player>> {
        self.players.get(&id).map(|entry| entry.value().clone())
    }

    /// Apply a direction command from `connection_id`. Best effort by design:
    /// unknown tokens and connections without a live player are silently
    /// ignored, since a late command for a departed player is an expected
    /// race, not a fault.
    pub fn apply_direction(&self, connection_id: Uuid, token: &str) {
        let Some(direction) = Direction::from_token(token) else {
            return;
        };
        let Some(id) = self.connections.get(&connection_id).map(|entry| *entry.value()) else {
            return;
        };
        if let Some(player) = self.lookup(id) {
            player.set_heading(direction);
            debug!(player_id = id, ?direction, "heading changed");
        }
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn clock_running(&self) -> bool {
        self.clock.lock().is_some()
    }

    /// One simulation tick: advance and collide over a snapshot, then emit a
    /// single batched update broadcast, or nothing if no player moved or died.
    pub(crate) fn tick(&self) {
        let snapshot = self.snapshot();
        let updates = tick::run_tick(
            &snapshot,
            self.settings.grid_width,
            self.settings.grid_height,
        );
        if !updates.is_empty() {
            let _ = self.events.send(ServerMsg::Update { data: updates });
        }
    }

    /// Random spawn cell not covered by any current snake body, so a new
    /// player cannot die on its first tick without moving into anything.
    /// Only a saturated grid falls back to a fully random cell.
    fn spawn_cell(&self) -> Cell {
        let occupied: HashSet<Cell> = self
            .players
            .iter()
            .flat_map(|entry| entry.value().body())
            .collect();

        let mut rng = rand::thread_rng();
        let free: Vec<Cell> = (0..self.settings.grid_height)
            .flat_map(|y| (0..self.settings.grid_width).map(move |x| Cell::new(x, y)))
            .filter(|cell| !occupied.contains(cell))
            .collect();

        match free.choose(&mut rng) {
            Some(&cell) => cell,
            None => Cell::new(
                rng.gen_range(0..self.settings.grid_width),
                rng.gen_range(0..self.settings.grid_height),
            ),
        }
    }
}
