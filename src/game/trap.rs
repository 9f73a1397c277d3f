//! Spike traps
//!
//! Spikes pop up and retract on a fixed interval whether or not anyone is
//! around. While up, a spike hurts a player standing in its grid cell, at
//! most once per hit cooldown.

use super::entity::{Entity, EntityKind};
use super::world::{cooldown_ready, GameWorld};

/// Flip the spike between up and down once the interval has passed.
/// Runs for retracted spikes too.
pub fn toggle(entity: &mut Entity, now: f64, interval_ms: u32) {
    let EntityKind::Spike(spike) = &mut entity.kind else { return };
    if cooldown_ready(now, spike.last_toggle, interval_ms) {
        entity.active = !entity.active;
        spike.last_toggle = now;
    }
}

pub fn update(world: &mut GameWorld, entity: &mut Entity) {
    let now = world.clock;
    let EntityKind::Spike(spike) = &mut entity.kind else { return };
    if !entity.active || world.grid.tile_of(entity.position) != world.grid.tile_of(world.player_position()) {
        return;
    }
    if cooldown_ready(now, spike.last_hit, world.config.enemies.spike_cooldown_ms) {
        spike.last_hit = now;
        world.hurt_player(world.config.enemies.spike_damage);
    }
}
