//! Player control
//!
//! Turns one frame of input into camera movement, weapon fire and tile
//! interaction. Movement goes through the same per-axis collision as
//! every other mover. Floor triggers are read from the tile under the
//! player after moving.

use super::collision::slide;
use super::entity::Entity;
use super::event::GameEvent;
use super::weapon::WeaponKind;
use super::world::GameWorld;
use crate::audio::{keep_looping, AudioChannels, SoundId};
use crate::input::{Action, InputSnapshot};
use crate::world::tiles;

const MOVE_ACTIONS: [Action; 4] = [
    Action::MoveForward,
    Action::MoveBackward,
    Action::StrafeLeft,
    Action::StrafeRight,
];

pub fn handle_input(world: &mut GameWorld, input: &InputSnapshot, dt: f32, audio: &mut dyn AudioChannels) {
    fire(world, input, audio);

    if MOVE_ACTIONS.iter().any(|a| input.down(*a)) {
        keep_looping(audio, &mut world.stats.step_channel, SoundId::Step);
    }

    let player = &world.config.player;
    let turn_speed = if input.down(Action::SlowTurn) {
        player.turn_speed_slow
    } else {
        player.turn_speed_fast
    };
    if input.down(Action::TurnLeft) {
        world.camera.rotate(-turn_speed * dt);
    }
    if input.down(Action::TurnRight) {
        world.camera.rotate(turn_speed * dt);
    }

    let step = player.move_speed * dt;
    let strafe = step / player.strafe_divisor;
    let forward = world.camera.forward();
    let left = world.camera.left();
    let mut moves = Vec::new();
    if input.down(Action::MoveForward) {
        moves.push(forward * step);
    }
    if input.down(Action::MoveBackward) {
        moves.push(forward * -step);
    }
    if input.down(Action::StrafeLeft) {
        moves.push(left * strafe);
    }
    if input.down(Action::StrafeRight) {
        moves.push(left * -strafe);
    }
    for delta in moves {
        world.camera.position = slide(&world.grid, world.camera.position, delta).position;
    }

    for (action, weapon) in [
        (Action::SelectPistol, WeaponKind::Pistol),
        (Action::SelectShotgun, WeaponKind::Shotgun),
        (Action::SelectMinigun, WeaponKind::Minigun),
    ] {
        if input.pressed(action) && !world.armory.select(weapon, &world.progress) {
            log::debug!("{} is locked", weapon.label());
        }
    }

    if input.pressed(Action::Interact) {
        interact(world, audio);
    }
    if world.level_complete {
        return;
    }

    let (x, y) = world.grid.tile_of(world.player_position());
    if world.grid.floor_at(x, y) == tiles::TELEPORT_FLOOR {
        world.teleport();
    }
}

fn fire(world: &mut GameWorld, input: &InputSnapshot, audio: &mut dyn AudioChannels) {
    let volley = world.armory.fire(
        input.down(Action::Fire),
        world.clock,
        world.camera.angle,
        &world.progress,
        &world.config.weapons,
        &mut world.rng,
    );
    let Some(volley) = volley else { return };

    let origin = world.player_position();
    let z = world.config.combat.bullet_z;
    for direction in &volley.directions {
        world
            .entities
            .push(Entity::bullet(origin, *direction, volley.damage, volley.scale, z));
    }
    world.events.send(GameEvent::ShotFired {
        weapon: volley.weapon,
        pellets: volley.directions.len(),
    });
    audio.play(SoundId::Shoot);
}

/// Use whatever wall is `interact_reach` units ahead
fn interact(world: &mut GameWorld, audio: &mut dyn AudioChannels) {
    let probe = world.player_position() + world.camera.forward() * world.config.player.interact_reach;
    let (x, y) = world.grid.tile_of(probe);
    let code = world.grid.wall_at(x, y);

    let opened = match code {
        tiles::BREAKABLE => true,
        c if tiles::is_cracked(c) && world.stats.bombs > 0 => {
            world.stats.bombs -= 1;
            audio.play(SoundId::Explosion);
            true
        }
        tiles::LOCKED_DOOR if world.stats.keys > 0 => {
            world.stats.keys -= 1;
            true
        }
        tiles::EXIT => {
            world.complete_level();
            false
        }
        _ => false,
    };
    if opened {
        world.grid.set_wall(x, y, tiles::NONE);
        world.events.send(GameEvent::DoorOpened { code, cell: (x, y) });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::RecordingAudio;
    use crate::audio::SilentAudio;
    use crate::config::GameConfig;
    use crate::game::entity::EntityKind;
    use crate::progress::PlayerProgress;
    use crate::rasterizer::Vec2;
    use crate::world::Grid;

    /// 5x5 room, player at the centre of (1,1) facing +x toward (2,1)
    fn room(wall: i32) -> GameWorld {
        let mut w = GameWorld::with_seed(GameConfig::default(), PlayerProgress::default(), 5);
        let edge = [1, 1, 1, 1, 1];
        w.grid = Grid::from_wall_rows(
            &[&edge, &[1, 0, wall, 0, 1], &[1, 0, 0, 0, 1], &[1, 0, 0, 0, 1], &edge],
            64.0,
        )
        .unwrap();
        w.camera.position = Vec2::new(96.0, 96.0);
        w.camera.angle = 0.0;
        w
    }

    fn bullets(w: &GameWorld) -> usize {
        w.entities.iter().filter(|e| matches!(e.kind, EntityKind::Bullet(_))).count()
    }

    #[test]
    fn test_forward_and_turn() {
        let mut w = room(0);
        handle_input(&mut w, &InputSnapshot::holding(&[Action::MoveForward]), 0.1, &mut SilentAudio);
        assert!((w.camera.position.x - 106.0).abs() < 1e-3);

        handle_input(&mut w, &InputSnapshot::holding(&[Action::TurnRight]), 0.5, &mut SilentAudio);
        assert!((w.camera.angle - 90.0).abs() < 1e-3);
        handle_input(
            &mut w,
            &InputSnapshot::holding(&[Action::TurnLeft, Action::SlowTurn]),
            1.0,
            &mut SilentAudio,
        );
        assert!((w.camera.angle - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_strafe_is_slower_and_blocked_by_walls() {
        let mut w = room(0);
        handle_input(&mut w, &InputSnapshot::holding(&[Action::StrafeLeft]), 0.3, &mut SilentAudio);
        // Heading 0: left is -y
        assert!((w.camera.position.y - 76.0).abs() < 1e-3);
        assert!((w.camera.position.x - 96.0).abs() < 1e-3);

        handle_input(&mut w, &InputSnapshot::holding(&[Action::StrafeLeft]), 0.3, &mut SilentAudio);
        assert!((w.camera.position.y - 76.0).abs() < 1e-3);
    }

    #[test]
    fn test_footsteps_loop_while_moving() {
        let mut w = room(0);
        let mut audio = RecordingAudio::default();
        handle_input(&mut w, &InputSnapshot::holding(&[Action::MoveBackward]), 0.01, &mut audio);
        handle_input(&mut w, &InputSnapshot::holding(&[Action::MoveBackward]), 0.01, &mut audio);
        assert_eq!(audio.count(SoundId::Step), 1);
        handle_input(&mut w, &InputSnapshot::default(), 0.01, &mut audio);
        assert_eq!(audio.count(SoundId::Step), 1);
    }

    #[test]
    fn test_pistol_fires_once_per_cooldown() {
        let mut w = room(0);
        let mut audio = RecordingAudio::default();
        let fire = InputSnapshot::holding(&[Action::Fire]);
        let idle = InputSnapshot::default();

        w.clock = 1.0;
        handle_input(&mut w, &fire, 0.016, &mut audio);
        assert_eq!(bullets(&w), 1);
        w.clock = 1.1;
        handle_input(&mut w, &idle, 0.016, &mut audio);
        w.clock = 1.3;
        handle_input(&mut w, &fire, 0.016, &mut audio);
        assert_eq!(bullets(&w), 1);
        w.clock = 1.6;
        handle_input(&mut w, &fire, 0.016, &mut audio);
        assert_eq!(bullets(&w), 2);
        assert_eq!(audio.count(SoundId::Shoot), 2);

        let bullet = &w.entities[0];
        assert_eq!(bullet.position, Vec2::new(96.0, 96.0));
        assert_eq!(bullet.z, w.config.combat.bullet_z);
    }

    #[test]
    fn test_locked_weapon_is_not_selected() {
        let mut w = room(0);
        handle_input(&mut w, &InputSnapshot::pressing(&[Action::SelectShotgun]), 0.0, &mut SilentAudio);
        assert_eq!(w.armory.selected, WeaponKind::Pistol);

        w.progress.shotgun_unlocked = true;
        handle_input(&mut w, &InputSnapshot::pressing(&[Action::SelectShotgun]), 0.0, &mut SilentAudio);
        assert_eq!(w.armory.selected, WeaponKind::Shotgun);

        w.clock = 3.0;
        handle_input(&mut w, &InputSnapshot::holding(&[Action::Fire]), 0.0, &mut SilentAudio);
        assert_eq!(bullets(&w), 3);
    }

    #[test]
    fn test_interact_opens_breakable_wall() {
        let mut w = room(tiles::BREAKABLE);
        handle_input(&mut w, &InputSnapshot::pressing(&[Action::Interact]), 0.0, &mut SilentAudio);
        assert_eq!(w.grid.wall_at(2, 1), tiles::NONE);
    }

    #[test]
    fn test_interact_requires_held_press_edge() {
        let mut w = room(tiles::BREAKABLE);
        handle_input(&mut w, &InputSnapshot::holding(&[Action::Interact]), 0.0, &mut SilentAudio);
        assert_eq!(w.grid.wall_at(2, 1), tiles::BREAKABLE);
    }

    #[test]
    fn test_cracked_wall_needs_bomb() {
        let mut w = room(tiles::CRACKED_WALL);
        let mut audio = RecordingAudio::default();
        let press = InputSnapshot::pressing(&[Action::Interact]);
        handle_input(&mut w, &press, 0.0, &mut audio);
        assert_eq!(w.grid.wall_at(2, 1), tiles::CRACKED_WALL);

        w.stats.bombs = 2;
        handle_input(&mut w, &press, 0.0, &mut audio);
        assert_eq!(w.grid.wall_at(2, 1), tiles::NONE);
        assert_eq!(w.stats.bombs, 1);
        assert_eq!(audio.count(SoundId::Explosion), 1);
    }

    #[test]
    fn test_locked_door_uses_key() {
        let mut w = room(tiles::LOCKED_DOOR);
        let press = InputSnapshot::pressing(&[Action::Interact]);
        handle_input(&mut w, &press, 0.0, &mut SilentAudio);
        assert_eq!(w.grid.wall_at(2, 1), tiles::LOCKED_DOOR);

        w.stats.keys = 1;
        handle_input(&mut w, &press, 0.0, &mut SilentAudio);
        assert_eq!(w.grid.wall_at(2, 1), tiles::NONE);
        assert_eq!(w.stats.keys, 0);
    }

    #[test]
    fn test_exit_completes_level_and_banks_money() {
        let mut w = room(tiles::EXIT);
        w.level = 3;
        w.stats.level_money = 40;
        w.progress.money = 10;
        handle_input(&mut w, &InputSnapshot::pressing(&[Action::Interact]), 0.0, &mut SilentAudio);
        assert!(w.level_complete);
        assert_eq!(w.progress.money, 50);
        assert_eq!(w.progress.highest_level_beaten, 3);
        assert_eq!(w.grid.wall_at(2, 1), tiles::EXIT);
    }
}
