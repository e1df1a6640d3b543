//! Application state shared across routes

use std::sync::Arc;

use crate::config::Config;
use crate::game::{GameRoom, RoomSettings};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// The single game room (one registry + one clock)
    pub room: Arc<GameRoom>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let room = GameRoom::new(RoomSettings::from_config(&config));
        Self { config, room }
    }
}
