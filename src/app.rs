//! Application state and screen management
//!
//! The game moves between four screens: the main menu (level select plus
//! the shop and achievements entries), the shop, the achievements list and
//! a running level. Progress is owned here and handed to each new level;
//! a completed level hands it back with the level's money banked.

use std::path::PathBuf;

use crate::audio::{keep_looping, AudioChannels, ChannelId, SoundId};
use crate::config::GameConfig;
use crate::game::renderer::{self, MenuLine};
use crate::game::{FrameOutcome, GameRuntime, GameWorld};
use crate::input::{Action, InputSnapshot};
use crate::progress::{save_progress, Achievement, PlayerProgress, Purchase, ShopSlot};
use crate::rasterizer::TextureTable;
use crate::world::MENU_LEVELS;

/// Main menu entries, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Level(u32),
    Shop,
    Achievements,
}

impl MenuEntry {
    pub fn all() -> Vec<MenuEntry> {
        let mut entries: Vec<MenuEntry> = (1..=MENU_LEVELS).map(MenuEntry::Level).collect();
        entries.push(MenuEntry::Shop);
        entries.push(MenuEntry::Achievements);
        entries
    }

    fn label(self, progress: &PlayerProgress) -> String {
        match self {
            MenuEntry::Level(n) if progress.highest_level_beaten >= n as i32 => format!("Level {} (beaten)", n),
            MenuEntry::Level(n) => format!("Level {}", n),
            MenuEntry::Shop => "Shop".to_string(),
            MenuEntry::Achievements => "Achievements".to_string(),
        }
    }
}

pub enum Screen {
    MainMenu,
    Shop,
    Achievements,
    Playing(Box<GameRuntime>),
}

/// Main application state
pub struct AppState {
    pub screen: Screen,
    pub config: GameConfig,
    pub progress: PlayerProgress,
    save_path: PathBuf,
    cursor: usize,
    /// Last shop result, shown under the shop list
    shop_message: Option<String>,
    music: Option<ChannelId>,
}

impl AppState {
    pub fn new(config: GameConfig, progress: PlayerProgress) -> Self {
        let save_path = PathBuf::from(&config.save_path);
        Self {
            screen: Screen::MainMenu,
            config,
            progress,
            save_path,
            cursor: 0,
            shop_message: None,
            music: None,
        }
    }

    /// Advance whichever screen is showing by one frame
    pub fn update(
        &mut self,
        input: &InputSnapshot,
        dt: f32,
        now: f64,
        textures: &TextureTable,
        audio: &mut dyn AudioChannels,
    ) {
        keep_looping(audio, &mut self.music, SoundId::Song);

        match &mut self.screen {
            Screen::MainMenu => {
                let entries = MenuEntry::all();
                if let Some(i) = self.pick(input, entries.len()) {
                    match entries[i] {
                        MenuEntry::Level(n) => self.start_level(n, now),
                        MenuEntry::Shop => self.open(Screen::Shop),
                        MenuEntry::Achievements => self.open(Screen::Achievements),
                    }
                }
            }
            Screen::Shop => {
                if input.pressed(Action::Back) {
                    self.open(Screen::MainMenu);
                    return;
                }
                if let Some(i) = self.pick(input, ShopSlot::ALL.len() + 1) {
                    match ShopSlot::ALL.get(i) {
                        Some(slot) => self.buy(*slot),
                        None => self.open(Screen::MainMenu),
                    }
                }
            }
            Screen::Achievements => {
                if input.pressed(Action::Back) || input.pressed(Action::MenuConfirm) || input.clicked {
                    self.open(Screen::MainMenu);
                }
            }
            Screen::Playing(runtime) => {
                if input.pressed(Action::Back) {
                    log::info!("left level {} without banking", runtime.world.level);
                    self.open(Screen::MainMenu);
                    return;
                }
                match runtime.frame(input, dt, now, textures, audio) {
                    FrameOutcome::Continue => {}
                    FrameOutcome::LevelCompleted => {
                        self.progress = runtime.world.progress;
                        self.save();
                        self.open(Screen::MainMenu);
                    }
                    FrameOutcome::PlayerDied => self.open(Screen::MainMenu),
                }
            }
        }
    }

    pub fn draw(&self) {
        match &self.screen {
            Screen::MainMenu => {
                let lines: Vec<MenuLine> = MenuEntry::all()
                    .into_iter()
                    .map(|e| MenuLine {
                        text: e.label(&self.progress),
                        dimmed: false,
                    })
                    .collect();
                renderer::draw_menu("BANK ROBBERY", &lines, self.cursor, "Up/Down: Select | Enter: Confirm");
            }
            Screen::Shop => {
                let mut lines: Vec<MenuLine> = ShopSlot::ALL
                    .iter()
                    .map(|slot| match slot.offer(&self.progress) {
                        Some(item) => MenuLine {
                            text: format!("{} ({})", item.label(), item.price()),
                            dimmed: self.progress.money < item.price(),
                        },
                        None => MenuLine {
                            text: format!("{:?} maxed out", slot),
                            dimmed: true,
                        },
                    })
                    .collect();
                lines.push(MenuLine {
                    text: "Back".to_string(),
                    dimmed: false,
                });
                let footer = match &self.shop_message {
                    Some(message) => format!("Money: {} | {}", self.progress.money, message),
                    None => format!("Money: {}", self.progress.money),
                };
                renderer::draw_menu("SHOP", &lines, self.cursor, &footer);
            }
            Screen::Achievements => {
                let lines: Vec<MenuLine> = Achievement::ALL
                    .iter()
                    .map(|a| {
                        let earned = a.earned(&self.progress);
                        MenuLine {
                            text: format!("[{}] {}", if earned { "x" } else { " " }, a.title()),
                            dimmed: !earned,
                        }
                    })
                    .collect();
                renderer::draw_menu("ACHIEVEMENTS", &lines, usize::MAX, "Escape: Back");
            }
            Screen::Playing(runtime) => {
                let view = renderer::present(&runtime.fb);
                renderer::draw_hud(runtime, view);
            }
        }
    }

    /// FPS cap for the current screen; menus never need more than 60
    pub fn frame_time(&self) -> Option<f64> {
        match self.screen {
            Screen::Playing(_) => self.config.fps_limit.frame_time(),
            _ => Some(1.0 / 60.0),
        }
    }

    /// Menu navigation shared by the list screens. Returns the confirmed line.
    fn pick(&mut self, input: &InputSnapshot, count: usize) -> Option<usize> {
        if count == 0 {
            return None;
        }
        if input.pressed(Action::MenuDown) {
            self.cursor = (self.cursor + 1) % count;
        }
        if input.pressed(Action::MenuUp) {
            self.cursor = (self.cursor + count - 1) % count;
        }
        if input.clicked {
            if let Some(line) = renderer::menu_line_at(input.pointer.y, count) {
                self.cursor = line;
                return Some(line);
            }
        }
        input.pressed(Action::MenuConfirm).then_some(self.cursor.min(count - 1))
    }

    fn open(&mut self, screen: Screen) {
        self.screen = screen;
        self.cursor = 0;
        self.shop_message = None;
    }

    fn start_level(&mut self, level: u32, now: f64) {
        let mut world = GameWorld::new(self.config.clone(), self.progress);
        world.clock = now;
        world.start_level(level);
        self.open(Screen::Playing(Box::new(GameRuntime::new(world))));
    }

    fn buy(&mut self, slot: ShopSlot) {
        let Some(item) = slot.offer(&self.progress) else {
            self.shop_message = Some("Nothing left to buy".to_string());
            return;
        };
        let result = self.progress.purchase(item);
        self.shop_message = Some(match result {
            Purchase::Bought => format!("Bought: {}", item.label()),
            Purchase::NotEnoughMoney => format!("Need {} money", item.price()),
            Purchase::AlreadyOwned => "Already owned".to_string(),
            Purchase::Locked => "Buy the weapon first".to_string(),
        });
        if result == Purchase::Bought {
            log::info!("bought {} for {}", item.label(), item.price());
            self.save();
        }
    }

    fn save(&self) {
        match save_progress(&self.save_path, &self.progress) {
            Ok(()) => log::info!("progress saved to {}", self.save_path.display()),
            Err(e) => log::warn!("progress not saved to {}: {}", self.save_path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::RecordingAudio;
    use crate::audio::SilentAudio;
    use crate::progress::load_progress;
    use crate::rasterizer::Vec2;
    use crate::world::Grid;
    use tempfile::TempDir;

    fn app(dir: &TempDir) -> AppState {
        let config = GameConfig {
            level_dir: dir.path().to_string_lossy().into_owned(),
            save_path: dir.path().join("save.dat").to_string_lossy().into_owned(),
            ..GameConfig::default()
        };
        AppState::new(config, PlayerProgress::default())
    }

    fn step(app: &mut AppState, input: InputSnapshot) {
        app.update(&input, 0.016, 1.0, &TextureTable::new(), &mut SilentAudio);
    }

    fn press(action: Action) -> InputSnapshot {
        InputSnapshot::pressing(&[action])
    }

    #[test]
    fn test_menu_lists_levels_then_shop_and_achievements() {
        let entries = MenuEntry::all();
        assert_eq!(entries.len(), MENU_LEVELS as usize + 2);
        assert_eq!(entries[0], MenuEntry::Level(1));
        assert_eq!(entries[entries.len() - 1], MenuEntry::Achievements);
    }

    #[test]
    fn test_menu_cursor_wraps_and_starts_level() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        step(&mut app, press(Action::MenuUp));
        assert_eq!(app.cursor, MenuEntry::all().len() - 1);
        step(&mut app, press(Action::MenuDown));
        step(&mut app, press(Action::MenuDown));
        step(&mut app, press(Action::MenuConfirm));

        let Screen::Playing(runtime) = &app.screen else { panic!("level not started") };
        assert_eq!(runtime.world.level, 2);
        assert_eq!(runtime.world.clock, 1.0);
        // No level files in the temp dir: an empty grid is played
        assert_eq!(runtime.world.grid.width(), 0);
    }

    #[test]
    fn test_music_keeps_looping() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        let mut audio = RecordingAudio::default();
        for _ in 0..3 {
            app.update(&InputSnapshot::default(), 0.016, 1.0, &TextureTable::new(), &mut audio);
        }
        assert_eq!(audio.count(SoundId::Song), 1);
        audio.finished = true;
        app.update(&InputSnapshot::default(), 0.016, 1.0, &TextureTable::new(), &mut audio);
        assert_eq!(audio.count(SoundId::Song), 2);
    }

    #[test]
    fn test_shop_purchase_saves() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.progress.money = 300;
        app.open(Screen::Shop);

        // Pistol upgrade
        step(&mut app, press(Action::MenuConfirm));
        assert!(app.progress.pistol_upgraded);
        assert_eq!(app.progress.money, 200);
        assert_eq!(load_progress(dir.path().join("save.dat")).unwrap(), app.progress);

        // Shotgun costs 250: refused, nothing saved
        step(&mut app, press(Action::MenuDown));
        step(&mut app, press(Action::MenuConfirm));
        assert!(!app.progress.shotgun_unlocked);
        assert_eq!(app.shop_message.as_deref(), Some("Need 250 money"));

        step(&mut app, press(Action::Back));
        assert!(matches!(app.screen, Screen::MainMenu));
    }

    #[test]
    fn test_completed_level_banks_and_saves() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.progress.money = 7;
        app.start_level(4, 1.0);
        if let Screen::Playing(runtime) = &mut app.screen {
            let edge = [1, 1, 1, 1];
            let grid = Grid::from_wall_rows(&[&edge, &[1, 0, 17, 1], &edge], 64.0).unwrap();
            runtime.world.install_level(4, grid, &[]);
            runtime.world.camera.position = Vec2::new(110.0, 96.0);
            runtime.world.stats.level_money = 30;
        }

        step(&mut app, press(Action::Interact));
        assert!(matches!(app.screen, Screen::MainMenu));
        assert_eq!(app.progress.money, 37);
        assert_eq!(app.progress.highest_level_beaten, 4);
        assert_eq!(load_progress(dir.path().join("save.dat")).unwrap(), app.progress);
    }

    #[test]
    fn test_leaving_a_level_does_not_bank() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.start_level(1, 0.0);
        if let Screen::Playing(runtime) = &mut app.screen {
            runtime.world.stats.level_money = 50;
        }
        step(&mut app, press(Action::Back));
        assert!(matches!(app.screen, Screen::MainMenu));
        assert_eq!(app.progress.money, 0);
        assert!(!dir.path().join("save.dat").exists());
    }

    #[test]
    fn test_click_picks_menu_line() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        let mut input = InputSnapshot::default();
        input.clicked = true;
        input.pointer = Vec2::new(100.0, renderer::MENU_TOP + 11.0 * renderer::MENU_SPACING);
        step(&mut app, input);
        assert!(matches!(app.screen, Screen::Achievements));
    }
}
