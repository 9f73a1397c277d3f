//! Chasing enemies: grunt, shooter, hammer and drone
//!
//! A chaser does nothing until it has been seen. From then on it walks
//! straight at the player (sliding along walls), hits on contact and, for
//! the shooter, fires at the player on a cooldown. Death is checked every
//! frame, seen or not.

use super::collision::slide;
use super::entity::{Contact, Entity, EntityKind};
use super::event::GameEvent;
use super::world::{cooldown_ready, GameWorld};
use crate::audio::{keep_looping, AudioChannels, SoundId};

pub fn update(world: &mut GameWorld, entity: &mut Entity, dt: f32, audio: &mut dyn AudioChannels) {
    let Some(profile) = entity.kind.chaser_profile(&world.config) else { return };
    let now = world.clock;
    let player = world.player_position();
    let Some(hostile) = entity.kind.hostile_mut() else { return };

    if hostile.is_dead() {
        entity.active = false;
        world.stats.level_money += profile.reward;
        world.events.send(GameEvent::EnemyKilled {
            reward: profile.reward,
            position: entity.position,
        });
        return;
    }
    if !hostile.engaged {
        return;
    }
    keep_looping(audio, &mut hostile.step_channel, SoundId::Step);

    let to_player = player - entity.position;
    let distance = to_player.len();
    if distance < world.config.combat.melee_range {
        match profile.contact {
            Contact::Kamikaze { damage } => {
                entity.active = false;
                world.hurt_player(damage);
                return;
            }
            Contact::Melee { cooldown_ms, damage } => {
                if cooldown_ready(now, hostile.last_melee, cooldown_ms) {
                    hostile.last_melee = now;
                    world.hurt_player(damage);
                }
            }
        }
    }

    if distance > 0.0 {
        let step = to_player.normalize() * (profile.speed * dt);
        entity.position = slide(&world.grid, entity.position, step).position;
    }

    if let EntityKind::Shooter(shooter) = &mut entity.kind {
        if cooldown_ready(now, shooter.last_shot, world.config.enemies.shooter_cooldown_ms) {
            shooter.last_shot = now;
            let combat = &world.config.combat;
            let aim = (player - entity.position).angle();
            let bullet = Entity::enemy_bullet(
                entity.position,
                aim,
                combat.enemy_bullet_damage,
                combat.enemy_bullet_scale,
                combat.bullet_z,
            );
            world.spawns.send(bullet);
            audio.play(SoundId::Shoot);
        }
    }
}
