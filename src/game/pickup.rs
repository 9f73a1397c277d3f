//! Pickups: keys, bombs, coins and gold bars
//!
//! A pickup waits until the player is inside the pickup radius, then
//! deactivates and applies its effect once.

use super::entity::{Entity, PickupKind};
use super::event::GameEvent;
use super::world::GameWorld;
use crate::audio::{AudioChannels, SoundId};

pub fn update(world: &mut GameWorld, entity: &mut Entity, kind: PickupKind, audio: &mut dyn AudioChannels) {
    if !entity.active || entity.position.distance(world.player_position()) >= world.config.combat.pickup_radius {
        return;
    }

    entity.active = false;
    match kind {
        PickupKind::Key => world.stats.keys += 1,
        PickupKind::Bomb => world.stats.bombs += 1,
        PickupKind::Coin | PickupKind::GoldBar => {
            world.stats.level_money += kind.reward();
            audio.play(SoundId::Pickup);
        }
    }
    world.events.send(GameEvent::PickedUp {
        item: kind,
        position: entity.position,
    });
}
