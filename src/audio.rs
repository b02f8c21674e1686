/// Sound output.  The driver only ever asks for fire-and-forget effects and
/// a background loop; what actually makes noise is up to the backend.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sound {
    Jump,
}

pub trait Audio {
    fn play(&mut self, sound: Sound);
    /// Start the looping background track.  Called once at startup.
    fn start_music(&mut self);
}

impl<A: Audio + ?Sized> Audio for Box<A> {
    fn play(&mut self, sound: Sound) {
        (**self).play(sound);
    }

    fn start_music(&mut self) {
        (**self).start_music();
    }
}

/// Silent backend for tests, `--mute`, and builds without the `audio` feature.
#[derive(Debug, Default)]
pub struct Muted {
    pub played: Vec<Sound>,
}

impl Audio for Muted {
    fn play(&mut self, sound: Sound) {
        tracing::trace!(?sound, "muted sound");
        self.played.push(sound);
    }

    fn start_music(&mut self) {
        tracing::trace!("muted music");
    }
}

#[cfg(feature = "audio")]
pub use synth::Synth;

#[cfg(feature = "audio")]
mod synth {
    use std::f32::consts::TAU;

    use rodio::buffer::SamplesBuffer;
    use rodio::{OutputStream, OutputStreamHandle, Sink, Source};

    use super::{Audio, Sound};
    use crate::error::{GameError, Result};

    const SAMPLE_RATE: u32 = 44_100;

    /// (frequency Hz, duration ms); 0 Hz is a rest.
    const TUNE: &[(f32, u32)] = &[
        (392.0, 180), (523.3, 180), (659.3, 180), (523.3, 180),
        (587.3, 180), (493.9, 180), (392.0, 360), (0.0, 180),
        (349.2, 180), (440.0, 180), (523.3, 180), (440.0, 180),
        (493.9, 180), (392.0, 180), (329.6, 360), (0.0, 180),
    ];

    /// Tones synthesised in memory and played through the default output.
    pub struct Synth {
        // Dropping the stream silences everything.
        _stream: OutputStream,
        handle: OutputStreamHandle,
        music: Sink,
        jump_volume: f32,
    }

    impl Synth {
        pub fn open(jump_volume: f32, music_volume: f32) -> Result<Self> {
            let (stream, handle) =
                OutputStream::try_default().map_err(|err| GameError::Audio(err.to_string()))?;
            let music = Sink::try_new(&handle).map_err(|err| GameError::Audio(err.to_string()))?;
            music.set_volume(music_volume);
            tracing::info!(jump_volume, music_volume, "audio output opened");
            Ok(Synth {
                _stream: stream,
                handle,
                music,
                jump_volume,
            })
        }
    }

    impl Audio for Synth {
        fn play(&mut self, sound: Sound) {
            let clip = match sound {
                Sound::Jump => chirp(300.0, 900.0, 150),
            };
            if let Err(err) = self.handle.play_raw(clip.amplify(self.jump_volume)) {
                tracing::warn!(%err, ?sound, "failed to play sound");
            }
        }

        fn start_music(&mut self) {
            let samples: Vec<f32> = TUNE
                .iter()
                .flat_map(|&(freq, ms)| tone(freq, ms))
                .collect();
            self.music
                .append(SamplesBuffer::new(1, SAMPLE_RATE, samples).repeat_infinite());
        }
    }

    fn sample_count(ms: u32) -> usize {
        (SAMPLE_RATE as usize * ms as usize) / 1000
    }

    fn tone(freq: f32, ms: u32) -> Vec<f32> {
        let n = sample_count(ms);
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                // Short linear fade-out keeps notes from clicking.
                let envelope = 1.0 - i as f32 / n as f32;
                (TAU * freq * t).sin() * envelope * 0.4
            })
            .collect()
    }

    fn chirp(from: f32, to: f32, ms: u32) -> SamplesBuffer<f32> {
        let n = sample_count(ms);
        let mut phase = 0.0f32;
        let samples: Vec<f32> = (0..n)
            .map(|i| {
                let progress = i as f32 / n as f32;
                let freq = from + (to - from) * progress;
                phase += TAU * freq / SAMPLE_RATE as f32;
                phase.sin() * (1.0 - progress)
            })
            .collect();
        SamplesBuffer::new(1, SAMPLE_RATE, samples)
    }
}
