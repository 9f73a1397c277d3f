//! kira audio backend
//!
//! Every `play` gets its own kira handle, and a channel counts as playing
//! until kira reports the handle stopped.

use std::collections::HashMap;
use std::path::Path;

use kira::{
    manager::{backend::DefaultBackend, AudioManager, AudioManagerSettings},
    sound::{
        static_sound::{StaticSoundData, StaticSoundHandle},
        PlaybackState,
    },
};

use super::{AudioChannels, ChannelId, SoundId};

pub struct KiraAudio {
    /// `None` when there is no output device; every play is then a no-op
    manager: Option<AudioManager>,
    sounds: HashMap<SoundId, StaticSoundData>,
    handles: HashMap<u32, StaticSoundHandle>,
    next_channel: u32,
}

impl KiraAudio {
    /// Open the default output and load every sound from `dir`
    pub fn load(dir: &Path) -> Self {
        let manager = match AudioManager::<DefaultBackend>::new(AudioManagerSettings::default()) {
            Ok(m) => Some(m),
            Err(e) => {
                log::warn!("audio output unavailable, running silent: {}", e);
                None
            }
        };
        let sounds = load_sounds(dir);
        log::info!("loaded {}/{} sounds", sounds.len(), SoundId::ALL.len());
        Self {
            manager,
            sounds,
            handles: HashMap::new(),
            next_channel: 1,
        }
    }
}

/// Decode the sounds found in `dir`. Missing or undecodable files are logged
/// and left out.
pub fn load_sounds(dir: &Path) -> HashMap<SoundId, StaticSoundData> {
    let mut sounds = HashMap::new();
    for id in SoundId::ALL {
        let path = dir.join(id.file_name());
        match StaticSoundData::from_file(&path) {
            Ok(data) => {
                sounds.insert(id, data);
            }
            Err(e) => log::warn!("sound {} not loaded: {}", path.display(), e),
        }
    }
    sounds
}

impl AudioChannels for KiraAudio {
    fn play(&mut self, sound: SoundId) -> Option<ChannelId> {
        let manager = self.manager.as_mut()?;
        let data = self.sounds.get(&sound)?;
        let handle = match manager.play(data.clone()) {
            Ok(handle) => handle,
            Err(e) => {
                log::warn!("could not play {:?}: {:?}", sound, e);
                return None;
            }
        };

        self.handles.retain(|_, h| !is_stopped(h));
        let id = self.next_channel;
        self.next_channel = self.next_channel.wrapping_add(1).max(1);
        self.handles.insert(id, handle);
        Some(ChannelId(id))
    }

    fn is_playing(&self, channel: ChannelId) -> bool {
        self.handles
            .get(&channel.0)
            .map_or(false, |h| !is_stopped(h))
    }
}

fn is_stopped(handle: &StaticSoundHandle) -> bool {
    matches!(handle.state(), PlaybackState::Stopped)
}
