//! Audio channels
//!
//! The game only needs two things from an audio backend: start a one-shot
//! sound on some channel, and ask whether that channel is still playing.
//! Looping sounds (music, footsteps, enemy steps) hold on to their channel
//! and restart the sound whenever it has finished.

mod mixer;

pub use mixer::KiraAudio;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundId {
    Pickup,
    Shoot,
    Explosion,
    Step,
    Song,
}

impl SoundId {
    pub const ALL: [SoundId; 5] = [
        SoundId::Pickup,
        SoundId::Shoot,
        SoundId::Explosion,
        SoundId::Step,
        SoundId::Song,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            SoundId::Pickup => "pickupCoin.wav",
            SoundId::Shoot => "shoot.wav",
            SoundId::Explosion => "explosion.wav",
            SoundId::Step => "step.wav",
            SoundId::Song => "song.wav",
        }
    }
}

/// Opaque handle to a playing sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(pub u32);

pub trait AudioChannels {
    /// Start `sound`; `None` when nothing could be played
    fn play(&mut self, sound: SoundId) -> Option<ChannelId>;
    fn is_playing(&self, channel: ChannelId) -> bool;
}

/// Restart `sound` on `channel` unless it is still going
pub fn keep_looping(audio: &mut dyn AudioChannels, channel: &mut Option<ChannelId>, sound: SoundId) {
    let playing = channel.map_or(false, |c| audio.is_playing(c));
    if !playing {
        *channel = audio.play(sound);
    }
}

/// Backend that plays nothing
#[cfg(test)]
#[derive(Debug, Default)]
pub struct SilentAudio;

#[cfg(test)]
impl AudioChannels for SilentAudio {
    fn play(&mut self, _sound: SoundId) -> Option<ChannelId> {
        None
    }

    fn is_playing(&self, _channel: ChannelId) -> bool {
        false
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingAudio;
    use super::*;

    #[test]
    fn test_keep_looping_restarts_only_when_finished() {
        let mut audio = RecordingAudio::default();
        let mut channel = None;

        keep_looping(&mut audio, &mut channel, SoundId::Song);
        keep_looping(&mut audio, &mut channel, SoundId::Song);
        assert_eq!(audio.count(SoundId::Song), 1);

        audio.finished = true;
        keep_looping(&mut audio, &mut channel, SoundId::Song);
        assert_eq!(audio.count(SoundId::Song), 2);
        assert_eq!(channel, Some(ChannelId(2)));
    }

    #[test]
    fn test_silent_backend_never_holds_a_channel() {
        let mut audio = SilentAudio;
        let mut channel = None;
        keep_looping(&mut audio, &mut channel, SoundId::Step);
        assert_eq!(channel, None);
    }
}
