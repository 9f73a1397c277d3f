//! Entity pass
//!
//! One walk over the entity list per frame, far to near. Each entity first
//! runs its behaviour, then (if still active) is projected against the depth
//! buffer the wall pass just filled. Drawing in that order paints near
//! sprites over far ones. A sprite that reaches the screen within aggro range
//! wakes its hostile.
//!
//! The list is taken out of the world for the duration of the pass, so
//! handlers see the world and the list as separate borrows. Anything spawned
//! during the pass waits in `world.spawns` until the pass is over.

use std::mem;

use super::boss;
use super::enemy;
use super::entity::{Behavior, Entity, EntityKind};
use super::pickup;
use super::projectile;
use super::trap;
use super::world::GameWorld;
use crate::audio::AudioChannels;
use crate::rasterizer::{draw_sprite, DepthBuffer, Framebuffer, TextureTable};

/// What one entity pass did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PassReport {
    /// Health fraction of an engaged, living boss
    pub boss_health: Option<f32>,
    pub sprites_drawn: usize,
    pub spawned: usize,
    pub compacted: usize,
}

fn distance_to(entity: &Entity, world: &GameWorld) -> f32 {
    entity.position.distance(world.player_position())
}

pub fn run_entity_pass(
    world: &mut GameWorld,
    fb: &mut Framebuffer,
    depth: &DepthBuffer,
    textures: &TextureTable,
    dt: f32,
    audio: &mut dyn AudioChannels,
) -> PassReport {
    let mut report = PassReport::default();
    let mut entities = mem::take(&mut world.entities);
    entities.sort_by(|a, b| distance_to(b, world).total_cmp(&distance_to(a, world)));

    let now = world.clock;
    let spike_interval = world.config.enemies.spike_interval_ms;
    let initial_boss_health = world.config.boss.initial_health;

    for i in 0..entities.len() {
        if matches!(entities[i].kind, EntityKind::Spike(_)) {
            trap::toggle(&mut entities[i], now, spike_interval);
        }
        if !entities[i].active {
            continue;
        }

        match entities[i].kind.behavior() {
            Behavior::Bullet => projectile::update_bullet(world, &mut entities, i, dt),
            Behavior::Pickup(kind) => pickup::update(world, &mut entities[i], kind, audio),
            Behavior::EnemyBullet => projectile::update_enemy_bullet(world, &mut entities[i], dt),
            Behavior::Chaser => enemy::update(world, &mut entities[i], dt, audio),
            Behavior::Trap => trap::update(world, &mut entities[i]),
            Behavior::Boss => boss::update(world, &mut entities[i], dt, audio),
        }

        let entity = &mut entities[i];
        if !entity.active {
            continue;
        }
        let draw = draw_sprite(
            fb,
            depth,
            &world.camera,
            &entity.billboard(),
            textures.get(entity.kind.texture_code()),
            &world.config.view,
        );
        if draw.pixels_drawn > 0 {
            report.sprites_drawn += 1;
        }
        if draw.aggro {
            if let Some(hostile) = entity.kind.hostile_mut() {
                if !hostile.engaged {
                    log::debug!("hostile at ({:.0}, {:.0}) engaged", entity.position.x, entity.position.y);
                    hostile.engaged = true;
                }
            }
        }
        if let Some(fraction) = boss::health_fraction(entity, initial_boss_health) {
            report.boss_health = Some(fraction);
        }
    }

    world.entities = entities;
    report.spawned = world.flush_spawns();
    report.compacted = world.compact();
    report
}
