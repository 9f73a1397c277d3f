//! Bullets
//!
//! Both bullet kinds fly straight at a fixed speed. A player bullet stops in
//! the first live hostile within the hit radius; an enemy bullet stops in
//! the player. Either one stops at a wall or at the edge of the map.

use super::collision::hits_wall;
use super::entity::{Entity, EntityKind};
use super::world::GameWorld;
use crate::rasterizer::Vec2;

fn advance(entity: &mut Entity, direction: f32, speed: f32, dt: f32) -> Vec2 {
    entity.position += Vec2::from_angle(direction) * (speed * dt);
    entity.position
}

/// Move the player bullet at `index` and resolve its hits
pub fn update_bullet(world: &mut GameWorld, entities: &mut [Entity], index: usize, dt: f32) {
    let EntityKind::Bullet(shot) = entities[index].kind else { return };
    let pos = advance(&mut entities[index], shot.direction, world.config.combat.bullet_speed, dt);

    let radius = world.config.combat.hit_radius;
    let target = entities
        .iter()
        .enumerate()
        .find(|(j, e)| *j != index && e.is_live_hostile() && e.position.distance(pos) < radius)
        .map(|(j, _)| j);
    if let Some(j) = target {
        entities[index].active = false;
        if let Some(hostile) = entities[j].kind.hostile_mut() {
            hostile.health -= shot.damage as f32;
        }
    }

    if hits_wall(&world.grid, pos) {
        entities[index].active = false;
    }
}

pub fn update_enemy_bullet(world: &mut GameWorld, entity: &mut Entity, dt: f32) {
    let EntityKind::EnemyBullet(shot) = entity.kind else { return };
    let pos = advance(entity, shot.direction, world.config.combat.bullet_speed, dt);

    if pos.distance(world.player_position()) < world.config.combat.hit_radius {
        world.hurt_player(shot.damage);
        entity.active = false;
    }
    if hits_wall(&world.grid, pos) {
        entity.active = false;
    }
}
