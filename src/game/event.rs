//! Event System
//!
//! Gameplay code reports what happened through queues instead of calling
//! into audio, logging or the HUD directly. Two queues matter:
//! - [`GameEvent`]s, drained and logged by the runtime once per frame
//! - spawn requests, appended to the entity list after the entity pass

use super::entity::PickupKind;
use super::weapon::WeaponKind;
use crate::rasterizer::Vec2;

/// Things produced mid-frame and consumed later in the same frame (or the
/// next one, for spawns)
#[derive(Debug, Clone)]
pub struct EventQueue<T> {
    pending: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { pending: Vec::new() }
    }

    pub fn send(&mut self, item: T) {
        self.pending.push(item);
    }

    /// Take everything queued, oldest first
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.pending.drain(..)
    }

    /// Move everything queued onto the end of `out`; returns how many moved
    pub fn drain_into(&mut self, out: &mut Vec<T>) -> usize {
        let moved = self.pending.len();
        out.append(&mut self.pending);
        moved
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Forget queued items (level restart)
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.pending.iter()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Player collected a pickup
    PickedUp { item: PickupKind, position: Vec2 },
    /// A hostile reached zero health; `reward` went to level money
    EnemyKilled { reward: i32, position: Vec2 },
    PlayerHurt { damage: i32, health: i32 },
    /// A wall tile was cleared (door, breakable or cracked wall)
    DoorOpened { code: i32, cell: (i32, i32) },
    ShotFired { weapon: WeaponKind, pellets: usize },
    /// Boss health fell below `percent` of its starting value
    BossThreshold { percent: u32 },
    LevelCompleted { level: u32, money: i32 },
    Teleported { level: u32 },
}
