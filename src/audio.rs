//! Sound effects. Each cue is a small fundsp graph rendered to a sample
//! buffer and played on a detached sink, so the game loop never blocks.

use fundsp::prelude32::*;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};

// fundsp renders at 44.1kHz by default.
const SAMPLE_RATE: u32 = 44100;

/// Handle to the default output device. Absent on headless machines, in
/// which case the game simply runs silent.
pub struct AudioOutput {
    // Dropping the stream stops playback, so it rides along unused.
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl AudioOutput {
    pub fn open() -> Option<AudioOutput> {
        match OutputStream::try_default() {
            Ok((stream, handle)) => Some(AudioOutput {
                _stream: stream,
                handle,
            }),
            Err(e) => {
                eprintln!("flapjack: audio unavailable: {e}");
                None
            }
        }
    }

    pub fn flap(&self) {
        self.play(flap_chirp());
    }

    pub fn score(&self) {
        self.play(score_chime());
    }

    pub fn death(&self) {
        self.play(death_slide());
    }

    fn play(&self, samples: Vec<f32>) {
        let Ok(sink) = Sink::try_new(&self.handle) else {
            return;
        };
        sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples));
        sink.detach();
    }
}

/// Short upward sine chirp for a wing beat.
fn flap_chirp() -> Vec<f32> {
    let freq = lfo(|t: f32| lerp(300.0, 600.0, (t / 0.08).min(1.0)));
    let gain = lfo(|t: f32| lerp(0.2, 0.0, (t / 0.1).min(1.0)));
    render(&mut (freq >> sine() * gain), 0.1)
}

/// Two quick ascending chimes when a pipe is cleared.
fn score_chime() -> Vec<f32> {
    let freq = lfo(|t: f32| if t < 0.09 { 660.0 } else { 880.0 });
    let gain = lfo(|t: f32| lerp(0.18, 0.0, (t / 0.18).min(1.0)));
    render(&mut (freq >> sine() * gain), 0.18)
}

/// Sawtooth ramp from 400Hz down to 80Hz over 0.4s, fading out over 0.5s.
fn death_slide() -> Vec<f32> {
    let freq = lfo(|t: f32| lerp(400.0, 80.0, (t / 0.4).min(1.0)));
    let gain = lfo(|t: f32| lerp(0.15, 0.0, (t / 0.5).min(1.0)));
    render(&mut (freq >> saw() * gain), 0.5)
}

fn render(unit: &mut dyn AudioUnit, seconds: f32) -> Vec<f32> {
    let n = (seconds * SAMPLE_RATE as f32) as usize;
    (0..n).map(|_| unit.get_mono()).collect()
}
