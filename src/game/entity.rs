//! Entity model
//!
//! An entity is a billboard in the world plus a kind-specific payload. Each
//! payload carries exactly the state its kind uses, so there are no optional
//! fields to forget to initialise. The simulation never matches on the full
//! kind list; it asks for a [`Behavior`] and for capabilities such as
//! [`EntityKind::hostile`].
//!
//! Entities are never removed mid-frame. Dying, collecting or hitting a wall
//! only clears `active`; the world compacts the list between frames.

use crate::audio::ChannelId;
use crate::config::GameConfig;
use crate::rasterizer::{Billboard, Vec2};
use crate::world::EntityRecord;

use super::weapon::WeaponKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickupKind {
    Key,
    Bomb,
    Coin,
    GoldBar,
}

impl PickupKind {
    /// Level money awarded on collection
    pub fn reward(self) -> i32 {
        match self {
            PickupKind::Coin => 5,
            PickupKind::GoldBar => 100,
            PickupKind::Key | PickupKind::Bomb => 0,
        }
    }
}

/// Straight-line shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    /// Heading in degrees
    pub direction: f32,
    pub damage: i32,
}

/// Anything that has health and waits to be seen before acting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hostile {
    pub health: f32,
    /// Set the first time the player has an unoccluded view of it
    pub engaged: bool,
    pub last_melee: f64,
    pub step_channel: Option<ChannelId>,
}

impl Hostile {
    pub fn new(health: f32, now: f64) -> Self {
        Self {
            health,
            engaged: false,
            last_melee: now,
            step_channel: None,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shooter {
    pub hostile: Hostile,
    pub last_shot: f64,
}

/// Floor trap; visibility toggles through the entity's `active` flag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spike {
    pub last_toggle: f64,
    pub last_hit: f64,
}

/// Movement and attack timers of the boss. Door unlocks are per session and
/// live in [`super::boss::BossPhase`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boss {
    pub hostile: Hostile,
    pub last_spread: f64,
    pub last_ring: f64,
    /// Strafing direction; flips when `strafe_ms` runs out
    pub strafe_left: bool,
    pub strafe_since: f64,
    pub strafe_ms: u32,
    /// Time between charges
    pub charge_since: f64,
    pub charge_ms: u32,
    /// Start of the current (or last) charge dash
    pub charge_started: f64,
}

impl Boss {
    /// Fresh timers; `strafe_ms` / `charge_ms` are the first randomized
    /// intervals
    pub fn new(health: f32, now: f64, strafe_ms: u32, charge_ms: u32) -> Self {
        Self {
            hostile: Hostile::new(health, now),
            last_spread: now,
            last_ring: now,
            strafe_left: true,
            strafe_since: now,
            strafe_ms,
            charge_since: now,
            charge_ms,
            charge_started: f64::NEG_INFINITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityKind {
    Pickup(PickupKind),
    Bullet(Projectile),
    EnemyBullet(Projectile),
    Enemy(Hostile),
    Shooter(Shooter),
    Hammer(Hostile),
    Drone(Hostile),
    Spike(Spike),
    Swat(Boss),
}

/// Which handler advances an entity each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Pickup(PickupKind),
    Bullet,
    EnemyBullet,
    Chaser,
    Trap,
    Boss,
}

/// What a chaser does on contact with the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// Hit every `cooldown_ms`
    Melee { cooldown_ms: u32, damage: i32 },
    /// Hit once and die
    Kamikaze { damage: i32 },
}

/// Per-kind numbers for the chase behaviour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaserProfile {
    pub speed: f32,
    pub contact: Contact,
    pub reward: i32,
}

impl EntityKind {
    pub fn behavior(&self) -> Behavior {
        match self {
            EntityKind::Pickup(kind) => Behavior::Pickup(*kind),
            EntityKind::Bullet(_) => Behavior::Bullet,
            EntityKind::EnemyBullet(_) => Behavior::EnemyBullet,
            EntityKind::Enemy(_) | EntityKind::Shooter(_) | EntityKind::Hammer(_) | EntityKind::Drone(_) => {
                Behavior::Chaser
            }
            EntityKind::Spike(_) => Behavior::Trap,
            EntityKind::Swat(_) => Behavior::Boss,
        }
    }

    pub fn hostile(&self) -> Option<&Hostile> {
        match self {
            EntityKind::Enemy(h) | EntityKind::Hammer(h) | EntityKind::Drone(h) => Some(h),
            EntityKind::Shooter(s) => Some(&s.hostile),
            EntityKind::Swat(b) => Some(&b.hostile),
            _ => None,
        }
    }

    pub fn hostile_mut(&mut self) -> Option<&mut Hostile> {
        match self {
            EntityKind::Enemy(h) | EntityKind::Hammer(h) | EntityKind::Drone(h) => Some(h),
            EntityKind::Shooter(s) => Some(&mut s.hostile),
            EntityKind::Swat(b) => Some(&mut b.hostile),
            _ => None,
        }
    }

    pub fn chaser_profile(&self, config: &GameConfig) -> Option<ChaserProfile> {
        let e = &config.enemies;
        let melee = Contact::Melee {
            cooldown_ms: e.melee_cooldown_ms,
            damage: e.melee_damage,
        };
        match self {
            EntityKind::Enemy(_) => Some(ChaserProfile {
                speed: e.enemy_speed,
                contact: melee,
                reward: 1,
            }),
            EntityKind::Shooter(_) => Some(ChaserProfile {
                speed: e.enemy_speed,
                contact: melee,
                reward: 2,
            }),
            EntityKind::Hammer(_) => Some(ChaserProfile {
                speed: e.hammer_speed,
                contact: Contact::Melee {
                    cooldown_ms: e.hammer_cooldown_ms,
                    damage: e.hammer_damage,
                },
                reward: 2,
            }),
            EntityKind::Drone(_) => Some(ChaserProfile {
                speed: e.drone_speed,
                contact: Contact::Kamikaze { damage: e.drone_damage },
                reward: 1,
            }),
            _ => None,
        }
    }

    /// 1-based texture table code for the sprite
    pub fn texture_code(&self) -> i32 {
        match self {
            EntityKind::Enemy(_) | EntityKind::Shooter(_) => 21,
            EntityKind::Pickup(PickupKind::Bomb) => 22,
            EntityKind::Bullet(_) | EntityKind::EnemyBullet(_) => 23,
            EntityKind::Pickup(PickupKind::Key) => 24,
            EntityKind::Pickup(PickupKind::Coin) => 25,
            EntityKind::Hammer(_) => 26,
            EntityKind::Spike(_) => 27,
            EntityKind::Drone(_) => 28,
            EntityKind::Pickup(PickupKind::GoldBar) => 29,
            EntityKind::Swat(_) => 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub position: Vec2,
    pub z: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub active: bool,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(kind: EntityKind, position: Vec2) -> Self {
        Self {
            position,
            z: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            active: true,
            kind,
        }
    }

    pub fn bullet(position: Vec2, direction: f32, damage: i32, scale: f32, z: f32) -> Self {
        Self {
            z,
            scale_x: scale,
            scale_y: scale,
            ..Self::new(EntityKind::Bullet(Projectile { direction, damage }), position)
        }
    }

    pub fn enemy_bullet(position: Vec2, direction: f32, damage: i32, scale: f32, z: f32) -> Self {
        Self {
            z,
            scale_x: scale,
            scale_y: scale,
            ..Self::new(EntityKind::EnemyBullet(Projectile { direction, damage }), position)
        }
    }

    pub fn spike(position: Vec2, now: f64) -> Self {
        Self {
            z: SPIKE_Z,
            ..Self::new(
                EntityKind::Spike(Spike {
                    last_toggle: now,
                    last_hit: now,
                }),
                position,
            )
        }
    }

    /// Build an entity from a level file record. `None` for unknown kind
    /// codes. Each kind fills in its own defaults and load-time overrides.
    pub fn from_record(record: &EntityRecord, config: &GameConfig, now: f64, boss_timers: (u32, u32)) -> Option<Self> {
        let health = |default: f32| record.health.unwrap_or(default);
        let direction = record.direction.unwrap_or(0.0);
        let kind = match record.kind_code {
            1 => EntityKind::Pickup(PickupKind::Key),
            2 => EntityKind::Pickup(PickupKind::Bomb),
            3 => EntityKind::Enemy(Hostile::new(health(20.0), now)),
            4 => EntityKind::Shooter(Shooter {
                hostile: Hostile::new(health(5.0), now),
                last_shot: now,
            }),
            5 => EntityKind::Bullet(Projectile {
                direction,
                damage: WeaponKind::Pistol.damage(false),
            }),
            6 => EntityKind::EnemyBullet(Projectile {
                direction,
                damage: config.combat.enemy_bullet_damage,
            }),
            7 => EntityKind::Pickup(PickupKind::Coin),
            8 => EntityKind::Hammer(Hostile::new(health(50.0), now)),
            9 => EntityKind::Spike(Spike {
                last_toggle: now,
                last_hit: now,
            }),
            10 => EntityKind::Drone(Hostile::new(health(1.0), now)),
            11 => EntityKind::Pickup(PickupKind::GoldBar),
            12 => {
                let (strafe_ms, charge_ms) = boss_timers;
                EntityKind::Swat(Boss::new(health(config.boss.initial_health), now, strafe_ms, charge_ms))
            }
            _ => return None,
        };

        let mut entity = Self {
            position: record.position,
            z: record.z,
            scale_x: record.scale_x,
            scale_y: record.scale_y,
            active: record.active,
            kind,
        };
        match entity.kind {
            EntityKind::Enemy(_) | EntityKind::Shooter(_) => entity.z = ENEMY_Z,
            EntityKind::Hammer(_) => {
                entity.z = ENEMY_Z;
                entity.scale_x = HAMMER_SCALE;
                entity.scale_y = HAMMER_SCALE;
            }
            EntityKind::Spike(_) => entity.z = SPIKE_Z,
            _ => {}
        }
        Some(entity)
    }

    pub fn billboard(&self) -> Billboard {
        Billboard {
            position: self.position,
            z: self.z,
            scale_x: self.scale_x,
            scale_y: self.scale_y,
        }
    }

    /// Active and still has health
    pub fn is_live_hostile(&self) -> bool {
        self.active && self.kind.hostile().map_or(false, |h| !h.is_dead())
    }
}

/// Screen offset shared by the walking enemies
const ENEMY_Z: f32 = 20.0;
const SPIKE_Z: f32 = 19.0;
const HAMMER_SCALE: f32 = 1.2;
