//! Rate limiting utilities

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Rate limiter type alias
pub type Limiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Create a rate limiter with the specified requests per second
pub fn create_limiter(requests_per_second: u32) -> Arc<Limiter> {
    let quota = Quota::per_second(NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN));
    Arc::new(RateLimiter::direct(quota))
}

/// Max direction commands per second per connection
pub const COMMAND_RATE_LIMIT: u32 = 30;

/// Per-connection rate limiter state
#[derive(Clone)]
pub struct CommandRateLimiter {
    command_limiter: Arc<Limiter>,
}

impl CommandRateLimiter {
    pub fn new() -> Self {
        Self {
            command_limiter: create_limiter(COMMAND_RATE_LIMIT),
        }
    }

    /// Check if a command message is allowed (returns true if allowed)
    pub fn check_command(&self) -> bool {
        self.command_limiter.check().is_ok()
    }
}

impl Default for CommandRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
