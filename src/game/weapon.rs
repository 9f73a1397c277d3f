//! Player weapons
//!
//! All weapons share one cooldown clock. Pistol and shotgun are
//! semi-automatic: after a shot the trigger has to be released before the
//! next one. The minigun fires for as long as the trigger is held.

use rand::Rng;

use super::world::cooldown_ready;
use crate::config::WeaponConfig;
use crate::progress::PlayerProgress;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WeaponKind {
    #[default]
    Pistol,
    Shotgun,
    Minigun,
}

impl WeaponKind {
    pub fn label(self) -> &'static str {
        match self {
            WeaponKind::Pistol => "Pistol",
            WeaponKind::Shotgun => "Shotgun",
            WeaponKind::Minigun => "Minigun",
        }
    }

    pub fn damage(self, upgraded: bool) -> i32 {
        match self {
            WeaponKind::Pistol | WeaponKind::Shotgun => 5,
            WeaponKind::Minigun => 1 + upgraded as i32,
        }
    }

    pub fn cooldown_ms(self, upgraded: bool, config: &WeaponConfig) -> u32 {
        let (base, bonus) = match self {
            WeaponKind::Pistol => (config.pistol_cooldown_ms, config.pistol_upgrade_bonus_ms),
            WeaponKind::Shotgun => (config.shotgun_cooldown_ms, 0),
            WeaponKind::Minigun => (config.minigun_cooldown_ms, config.minigun_upgrade_bonus_ms),
        };
        if upgraded {
            base.saturating_sub(bonus)
        } else {
            base
        }
    }

    pub fn automatic(self) -> bool {
        self == WeaponKind::Minigun
    }

    pub fn bullet_scale(self) -> f32 {
        match self {
            WeaponKind::Pistol | WeaponKind::Shotgun => 0.5,
            WeaponKind::Minigun => 0.25,
        }
    }

    pub fn unlocked(self, progress: &PlayerProgress) -> bool {
        match self {
            WeaponKind::Pistol => true,
            WeaponKind::Shotgun => progress.shotgun_unlocked,
            WeaponKind::Minigun => progress.minigun_unlocked,
        }
    }

    pub fn upgraded(self, progress: &PlayerProgress) -> bool {
        match self {
            WeaponKind::Pistol => progress.pistol_upgraded,
            WeaponKind::Shotgun => progress.shotgun_upgraded,
            WeaponKind::Minigun => progress.minigun_upgraded,
        }
    }
}

/// A successful trigger pull
#[derive(Debug, Clone, PartialEq)]
pub struct Volley {
    pub weapon: WeaponKind,
    /// One heading (degrees) per pellet
    pub directions: Vec<f32>,
    pub damage: i32,
    pub scale: f32,
}

#[derive(Debug, Clone)]
pub struct Armory {
    pub selected: WeaponKind,
    pub last_shot: f64,
    /// A semi-automatic shot went off and the trigger is still held
    trigger_latched: bool,
}

impl Default for Armory {
    fn default() -> Self {
        Self {
            selected: WeaponKind::Pistol,
            last_shot: f64::NEG_INFINITY,
            trigger_latched: false,
        }
    }
}

impl Armory {
    /// Switch weapons if the player owns `kind`
    pub fn select(&mut self, kind: WeaponKind, progress: &PlayerProgress) -> bool {
        if !kind.unlocked(progress) {
            return false;
        }
        self.selected = kind;
        true
    }

    /// Pull (or keep holding) the trigger at `now`. `None` when nothing fires.
    pub fn fire<R: Rng>(
        &mut self,
        trigger_down: bool,
        now: f64,
        heading: f32,
        progress: &PlayerProgress,
        config: &WeaponConfig,
        rng: &mut R,
    ) -> Option<Volley> {
        if !trigger_down {
            self.trigger_latched = false;
            return None;
        }
        let weapon = self.selected;
        if !weapon.automatic() && self.trigger_latched {
            return None;
        }
        let upgraded = weapon.upgraded(progress);
        if !cooldown_ready(now, self.last_shot, weapon.cooldown_ms(upgraded, config)) {
            return None;
        }

        self.last_shot = now;
        self.trigger_latched = !weapon.automatic();
        let directions = match weapon {
            WeaponKind::Pistol => vec![heading],
            WeaponKind::Shotgun if upgraded => vec![heading, heading + 10.0, heading - 10.0, heading + 5.0, heading - 5.0],
            WeaponKind::Shotgun => vec![heading, heading + 10.0, heading - 10.0],
            WeaponKind::Minigun => {
                let spread = config.minigun_spread;
                let offset = if spread > 0.0 { rng.gen_range(-spread..spread) } else { 0.0 };
                vec![heading + offset]
            }
        };
        Some(Volley {
            weapon,
            directions,
            damage: weapon.damage(upgraded),
            scale: weapon.bullet_scale(),
        })
    }
}
