//! Tick engine: advance, collide, and batch update payloads

use std::sync::Arc;

use crate::ws::protocol::PlayerUpdate;

use super::{Cell, Player};

/// Run one simulation tick over a consistent registry snapshot.
///
/// Every alive player's head advances one cell in its heading first; the
/// collision pass then runs over the post-move positions only. The rule is
/// symmetric: a head that lands on any cell of another snake's body, or on a
/// cell of its own body behind the head, kills that snake. Two heads landing
/// on the same cell kill both snakes.
///
/// Returns one payload per player that moved or died this tick, in snapshot
/// order. Players that were already dead contribute nothing, so a snapshot of
/// only dead players yields an empty batch and the caller broadcasts nothing.
pub fn run_tick(snapshot: &[Arc<Player>], width: u16, height: u16) -> Vec<PlayerUpdate> {
    let mut moved: Vec<(usize, Cell)> = Vec::with_capacity(snapshot.len());
    for (index, player) in snapshot.iter().enumerate() {
        if player.is_alive() {
            let head = player.advance(width, height);
            moved.push((index, head));
        }
    }

    // Post-move bodies; dead snakes stay on the field as obstacles.
    let bodies: Vec<Vec<Cell>> = snapshot.iter().map(|p| p.body()).collect();

    let mut died = vec![false; snapshot.len()];
    for &(index, head) in &moved {
        for (other, body) in bodies.iter().enumerate() {
            let hit = if other == index {
                body.iter().skip(1).any(|&cell| cell == head)
            } else {
                body.iter().any(|&cell| cell == head)
            };
            if hit {
                died[index] = true;
                break;
            }
        }
    }

    let mut updates = Vec::with_capacity(moved.len());
    for &(index, _) in &moved {
        let player = &snapshot[index];
        if died[index] {
            player.kill();
        }
        updates.push(PlayerUpdate {
            id: player.id(),
            body: bodies[index].clone(),
            alive: player.is_alive(),
        });
    }
    updates
}
