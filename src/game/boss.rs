//! The Swat boss
//!
//! Once seen, the boss circles the player while firing two bullet patterns:
//! a full ring on a long timer and a narrow spread (one of two fixed fans,
//! picked at random) on a shorter one. On a randomized timer it charges
//! straight at the player for a short, fast dash that hits hard on contact.
//! Charging and strafing both move the boss in the same frame; the charge
//! moves first.
//!
//! Health thresholds open locked doors one at a time. The thresholds belong
//! to the session ([`BossPhase`]), not the entity, and each one fires once.

use rand::Rng;

use super::collision::slide;
use super::entity::{Entity, EntityKind};
use super::event::GameEvent;
use super::world::{cooldown_ready, GameWorld};
use crate::audio::{keep_looping, AudioChannels, SoundId};
use crate::rasterizer::Vec2;
use crate::world::tiles;

/// Health fractions (and their percent labels) that each open one door
pub const DOOR_THRESHOLDS: [(f32, u32); 4] = [(0.8, 80), (0.6, 60), (0.4, 40), (0.2, 20)];

const SPREAD_EVEN: [f32; 5] = [0.0, 10.0, -10.0, 20.0, -20.0];
const SPREAD_ODD: [f32; 6] = [5.0, -5.0, 15.0, -15.0, 25.0, -25.0];

/// Latched door thresholds for the current level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BossPhase {
    latched: [bool; 4],
}

impl BossPhase {
    /// Latch every threshold `fraction` is now below. Returns the percents
    /// latched by this call.
    pub fn latch(&mut self, fraction: f32) -> Vec<u32> {
        let mut crossed = Vec::new();
        for (i, (limit, percent)) in DOOR_THRESHOLDS.iter().enumerate() {
            if fraction < *limit && !self.latched[i] {
                self.latched[i] = true;
                crossed.push(*percent);
            }
        }
        crossed
    }

    #[cfg(test)]
    pub fn doors_opened(&self) -> usize {
        self.latched.iter().filter(|l| **l).count()
    }
}

pub fn update(world: &mut GameWorld, entity: &mut Entity, dt: f32, audio: &mut dyn AudioChannels) {
    let config = world.config.boss.clone();
    let now = world.clock;
    let EntityKind::Swat(boss) = &mut entity.kind else { return };

    for percent in world.boss_phase.latch(boss.hostile.health / config.initial_health) {
        world.events.send(GameEvent::BossThreshold { percent });
        if let Some(cell) = world.grid.open_first(tiles::LOCKED_DOOR) {
            world.events.send(GameEvent::DoorOpened {
                code: tiles::LOCKED_DOOR,
                cell,
            });
        }
    }

    if boss.hostile.is_dead() {
        entity.active = false;
        world.stats.level_money += config.reward;
        let opened = world.grid.open_all(tiles::BOSS_DOOR);
        log::info!("boss defeated, {} boss doors opened", opened);
        world.events.send(GameEvent::EnemyKilled {
            reward: config.reward,
            position: entity.position,
        });
        return;
    }
    if !boss.hostile.engaged {
        return;
    }
    keep_looping(audio, &mut boss.hostile.step_channel, SoundId::Step);

    let to_player = world.player_position() - entity.position;
    let distance = to_player.len();
    let toward = to_player.normalize();
    let aim = to_player.angle();

    let mut volley: Vec<f32> = Vec::new();
    if cooldown_ready(now, boss.last_ring, config.ring_interval_ms) {
        boss.last_ring = now;
        boss.last_spread = now;
        volley.push(aim);
        let step = config.ring_step_deg.max(1) as usize;
        volley.extend((0..360u32).step_by(step).map(|i| aim + i as f32));
    }
    if cooldown_ready(now, boss.last_spread, config.spread_cooldown_ms) {
        boss.last_spread = now;
        let fan: &[f32] = if world.rng.gen_bool(0.5) { &SPREAD_EVEN } else { &SPREAD_ODD };
        volley.extend(fan.iter().map(|offset| aim + offset));
    }
    if !volley.is_empty() {
        let combat = &world.config.combat;
        for direction in volley {
            let bullet = Entity::enemy_bullet(
                entity.position,
                direction,
                combat.enemy_bullet_damage,
                config.bullet_scale,
                combat.bullet_z,
            );
            world.spawns.send(bullet);
        }
        audio.play(SoundId::Shoot);
    }

    if cooldown_ready(now, boss.strafe_since, boss.strafe_ms) {
        boss.strafe_left = !boss.strafe_left;
        boss.strafe_since = now;
        boss.strafe_ms = world.random_ms(config.strafe_min_ms, config.strafe_max_ms);
    }
    if cooldown_ready(now, boss.charge_since, boss.charge_ms) {
        boss.charge_started = now;
        boss.charge_since = now;
        boss.charge_ms = world.random_ms(config.charge_min_ms, config.charge_max_ms);
    }

    if (now - boss.charge_started) * 1000.0 < config.charge_duration_ms as f64 {
        if distance < config.charge_range && cooldown_ready(now, boss.hostile.last_melee, config.charge_cooldown_ms) {
            boss.hostile.last_melee = now;
            world.hurt_player(config.charge_damage);
        }
        entity.position = slide(&world.grid, entity.position, toward * (config.charge_speed * dt)).position;
    }

    // Perpendicular to the player direction; `strafe_left` picks (-y, x)
    let side = if boss.strafe_left {
        Vec2::new(-toward.y, toward.x)
    } else {
        Vec2::new(toward.y, -toward.x)
    };
    let strafe = slide(&world.grid, entity.position, side * (config.strafe_speed * dt));
    entity.position = strafe.position;
    if strafe.blocked() && boss.charge_ms > config.blocked_charge_ms {
        boss.charge_ms = config.blocked_charge_ms;
    }
}

/// Remaining health of an engaged, living boss as a fraction of its
/// starting health
pub fn health_fraction(entity: &Entity, initial_health: f32) -> Option<f32> {
    match &entity.kind {
        EntityKind::Swat(boss) if entity.active && boss.hostile.engaged && !boss.hostile.is_dead() => {
            Some(boss.hostile.health / initial_health)
        }
        _ => None,
    }
}
