//! Player progression
//!
//! Banked money, weapon unlocks/upgrades and the highest level beaten. The
//! record is saved as a small little-endian binary file whose leading
//! version tag decides which fields follow:
//!
//! ```text
//! u32 version
//! i32 money
//! u8  pistol_upgraded, shotgun_unlocked, shotgun_upgraded,
//!     minigun_unlocked, minigun_upgraded
//! i32 highest_level_beaten        (version >= 2)
//! ```
//!
//! Reading accepts versions 1 and 2; writing always produces the latest.

use std::fs;
use std::path::Path;

/// Version written by [`save_progress`]
pub const SAVE_VERSION: u32 = 2;

/// Levels that count towards "Beat All Levels"
const ALL_LEVELS: i32 = 10;

/// Error type for save file operations
#[derive(Debug)]
pub enum SaveError {
    IoError(std::io::Error),
    /// File ended before the named field
    TruncatedError(&'static str),
    UnsupportedVersion(u32),
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::IoError(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::IoError(e) => write!(f, "IO error: {}", e),
            SaveError::TruncatedError(what) => write!(f, "save file truncated before {}", what),
            SaveError::UnsupportedVersion(v) => write!(f, "unsupported save version {}", v),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerProgress {
    pub money: i32,
    pub pistol_upgraded: bool,
    pub shotgun_unlocked: bool,
    pub shotgun_upgraded: bool,
    pub minigun_unlocked: bool,
    pub minigun_upgraded: bool,
    pub highest_level_beaten: i32,
}

// =============================================================================
// Save format
// =============================================================================

impl PlayerProgress {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + 4 + 5 + 4);
        out.extend_from_slice(&SAVE_VERSION.to_le_bytes());
        out.extend_from_slice(&self.money.to_le_bytes());
        for flag in self.flags() {
            out.push(flag as u8);
        }
        out.extend_from_slice(&self.highest_level_beaten.to_le_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SaveError> {
        let mut rest = bytes;
        let version = u32::from_le_bytes(take(&mut rest, "version")?);
        if !(1..=SAVE_VERSION).contains(&version) {
            return Err(SaveError::UnsupportedVersion(version));
        }
        let money = i32::from_le_bytes(take(&mut rest, "money")?);
        let [a, b, c, d, e]: [u8; 5] = take(&mut rest, "weapon flags")?;
        let highest_level_beaten = if version >= 2 {
            i32::from_le_bytes(take(&mut rest, "highest level")?)
        } else {
            0
        };
        Ok(Self {
            money,
            pistol_upgraded: a != 0,
            shotgun_unlocked: b != 0,
            shotgun_upgraded: c != 0,
            minigun_unlocked: d != 0,
            minigun_upgraded: e != 0,
            highest_level_beaten,
        })
    }

    fn flags(&self) -> [bool; 5] {
        [
            self.pistol_upgraded,
            self.shotgun_unlocked,
            self.shotgun_upgraded,
            self.minigun_unlocked,
            self.minigun_upgraded,
        ]
    }
}

fn take<const N: usize>(rest: &mut &[u8], what: &'static str) -> Result<[u8; N], SaveError> {
    if rest.len() < N {
        return Err(SaveError::TruncatedError(what));
    }
    let (head, tail) = rest.split_at(N);
    *rest = tail;
    let mut out = [0u8; N];
    out.copy_from_slice(head);
    Ok(out)
}

pub fn load_progress<P: AsRef<Path>>(path: P) -> Result<PlayerProgress, SaveError> {
    let bytes = fs::read(path)?;
    PlayerProgress::from_bytes(&bytes)
}

pub fn save_progress<P: AsRef<Path>>(path: P, progress: &PlayerProgress) -> Result<(), SaveError> {
    fs::write(path, progress.to_bytes())?;
    Ok(())
}

/// Load the save file, starting fresh if it is missing or unreadable
pub fn load_or_default<P: AsRef<Path>>(path: P) -> PlayerProgress {
    let path = path.as_ref();
    if !path.exists() {
        log::info!("no save file at {}, starting fresh", path.display());
        return PlayerProgress::default();
    }
    match load_progress(path) {
        Ok(progress) => progress,
        Err(e) => {
            log::warn!("could not read save {}: {}", path.display(), e);
            PlayerProgress::default()
        }
    }
}

// =============================================================================
// Shop
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShopItem {
    PistolUpgrade,
    ShotgunUnlock,
    ShotgunUpgrade,
    MinigunUnlock,
    MinigunUpgrade,
}

impl ShopItem {
    pub fn price(self) -> i32 {
        match self {
            ShopItem::PistolUpgrade => 100,
            ShopItem::ShotgunUnlock => 250,
            ShopItem::ShotgunUpgrade => 500,
            ShopItem::MinigunUnlock => 500,
            ShopItem::MinigunUpgrade => 1000,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShopItem::PistolUpgrade => "Upgrade Pistol",
            ShopItem::ShotgunUnlock => "Buy Shotgun",
            ShopItem::ShotgunUpgrade => "Upgrade Shotgun",
            ShopItem::MinigunUnlock => "Buy Minigun",
            ShopItem::MinigunUpgrade => "Upgrade Minigun",
        }
    }
}

/// One shop button per weapon; it sells whatever that weapon needs next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopSlot {
    Pistol,
    Shotgun,
    Minigun,
}

impl ShopSlot {
    pub const ALL: [ShopSlot; 3] = [ShopSlot::Pistol, ShopSlot::Shotgun, ShopSlot::Minigun];

    /// Next item for sale in this slot, `None` once maxed out
    pub fn offer(self, progress: &PlayerProgress) -> Option<ShopItem> {
        match self {
            ShopSlot::Pistol => (!progress.pistol_upgraded).then_some(ShopItem::PistolUpgrade),
            ShopSlot::Shotgun if !progress.shotgun_unlocked => Some(ShopItem::ShotgunUnlock),
            ShopSlot::Shotgun => (!progress.shotgun_upgraded).then_some(ShopItem::ShotgunUpgrade),
            ShopSlot::Minigun if !progress.minigun_unlocked => Some(ShopItem::MinigunUnlock),
            ShopSlot::Minigun => (!progress.minigun_upgraded).then_some(ShopItem::MinigunUpgrade),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purchase {
    Bought,
    AlreadyOwned,
    /// Upgrade attempted before the weapon was bought
    Locked,
    NotEnoughMoney,
}

impl PlayerProgress {
    fn owns(&self, item: ShopItem) -> bool {
        match item {
            ShopItem::PistolUpgrade => self.pistol_upgraded,
            ShopItem::ShotgunUnlock => self.shotgun_unlocked,
            ShopItem::ShotgunUpgrade => self.shotgun_upgraded,
            ShopItem::MinigunUnlock => self.minigun_unlocked,
            ShopItem::MinigunUpgrade => self.minigun_upgraded,
        }
    }

    /// Buy `item`. Anything but [`Purchase::Bought`] leaves the record untouched.
    pub fn purchase(&mut self, item: ShopItem) -> Purchase {
        if self.owns(item) {
            return Purchase::AlreadyOwned;
        }
        let unlocked = match item {
            ShopItem::ShotgunUpgrade => self.shotgun_unlocked,
            ShopItem::MinigunUpgrade => self.minigun_unlocked,
            _ => true,
        };
        if !unlocked {
            return Purchase::Locked;
        }
        if self.money < item.price() {
            return Purchase::NotEnoughMoney;
        }

        self.money -= item.price();
        match item {
            ShopItem::PistolUpgrade => self.pistol_upgraded = true,
            ShopItem::ShotgunUnlock => self.shotgun_unlocked = true,
            ShopItem::ShotgunUpgrade => self.shotgun_upgraded = true,
            ShopItem::MinigunUnlock => self.minigun_unlocked = true,
            ShopItem::MinigunUpgrade => self.minigun_upgraded = true,
        }
        Purchase::Bought
    }

    /// Bank a finished level's money and remember the level as beaten
    pub fn record_level(&mut self, level: u32, level_money: i32) {
        self.money += level_money;
        self.highest_level_beaten = self.highest_level_beaten.max(level as i32);
    }
}

// =============================================================================
// Achievements
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Achievement {
    BeatAllLevels,
    UpgradeAllWeapons,
    EarnAllAchievements,
}

impl Achievement {
    pub const ALL: [Achievement; 3] = [
        Achievement::BeatAllLevels,
        Achievement::UpgradeAllWeapons,
        Achievement::EarnAllAchievements,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Achievement::BeatAllLevels => "Beat All Levels",
            Achievement::UpgradeAllWeapons => "Upgrade All Weapons",
            Achievement::EarnAllAchievements => "Earn All Achievements",
        }
    }

    pub fn earned(self, progress: &PlayerProgress) -> bool {
        match self {
            Achievement::BeatAllLevels => progress.highest_level_beaten >= ALL_LEVELS,
            Achievement::UpgradeAllWeapons => {
                progress.pistol_upgraded && progress.shotgun_upgraded && progress.minigun_upgraded
            }
            Achievement::EarnAllAchievements => {
                Achievement::BeatAllLevels.earned(progress) && Achievement::UpgradeAllWeapons.earned(progress)
            }
        }
    }
}
