//! Microphone capture with ambient-noise calibration
//!
//! Opens the default input device for the duration of one phrase, samples
//! the room to pick an energy threshold, then gates on that threshold to
//! cut a single phrase of at most the configured window.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use tracing::{debug, warn};

use super::error::SpeechError;

/// Length of one analysis frame
const FRAME: Duration = Duration::from_millis(30);
/// Trailing silence that ends a phrase
const PAUSE: Duration = Duration::from_millis(800);
/// How often the capture buffer is drained
const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Slack on top of the phrase window before a silent stream counts as stalled
const STALL_GRACE: Duration = Duration::from_millis(500);
/// Ambient energy multiplier for the speech threshold
const DYNAMIC_RATIO: f32 = 1.5;
/// Lowest threshold allowed, so a dead-silent room still needs real speech
const MIN_ENERGY: f32 = 0.01;

/// One captured phrase, mono f32 samples
#[derive(Debug, Clone)]
pub struct Capture {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Records a single spoken phrase
pub trait Recorder: Send {
    /// Block until one phrase has been captured.
    ///
    /// Returns `SpeechError::NoSpeech` when nothing crossed the threshold.
    fn record_phrase(&mut self) -> Result<Capture, SpeechError>;
}

/// Root-mean-square energy of a block of samples
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

/// Speech threshold derived from a sample of ambient noise
pub fn calibrate(ambient: &[f32]) -> f32 {
    (rms(ambient) * DYNAMIC_RATIO).max(MIN_ENERGY)
}

/// Where the gate is after consuming a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// No frame has crossed the threshold yet
    Waiting,
    /// Inside a phrase
    Recording,
    /// Phrase ended by a pause or by the window filling up
    Complete,
}

/// Energy gate that cuts one phrase out of a stream of frames
#[derive(Debug)]
pub struct PhraseGate {
    threshold: f32,
    frame_len: usize,
    max_samples: usize,
    pause_frames: usize,
    silent_frames: usize,
    started: bool,
    samples: Vec<f32>,
}

impl PhraseGate {
    pub fn new(threshold: f32, sample_rate: u32, phrase_limit: Duration) -> Self {
        let frame_len = ((sample_rate as u128 * FRAME.as_millis()) / 1000).max(1) as usize;
        let max_samples = ((sample_rate as u128 * phrase_limit.as_millis()) / 1000) as usize;
        let pause_frames = (PAUSE.as_millis() / FRAME.as_millis()) as usize;

        Self {
            threshold,
            frame_len,
            max_samples,
            pause_frames,
            silent_frames: 0,
            started: false,
            samples: Vec::with_capacity(max_samples),
        }
    }

    /// Number of samples the gate expects per frame
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Whether a phrase onset has been seen
    pub fn has_started(&self) -> bool {
        self.started
    }

    /// Feed one frame and report the resulting state
    pub fn push_frame(&mut self, frame: &[f32]) -> GateState {
        let loud = rms(frame) > self.threshold;

        if !self.started {
            if !loud {
                return GateState::Waiting;
            }
            self.started = true;
        }

        self.samples.extend_from_slice(frame);
        if loud {
            self.silent_frames = 0;
        } else {
            self.silent_frames += 1;
        }

        if self.samples.len() >= self.max_samples {
            self.samples.truncate(self.max_samples);
            GateState::Complete
        } else if self.silent_frames >= self.pause_frames {
            GateState::Complete
        } else {
            GateState::Recording
        }
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

/// Whether a started phrase has outlived its window by wall clock.
///
/// Covers a stream that stops delivering samples mid-phrase, where the
/// gate never sees the frames that would complete it.
pub fn phrase_overdue(since_onset: Duration, phrase_limit: Duration) -> bool {
    since_onset >= phrase_limit + PAUSE + STALL_GRACE
}

/// Phrase recorder backed by the default cpal input device
#[derive(Debug, Clone)]
pub struct CpalRecorder {
    calibration: Duration,
    phrase_limit: Duration,
    onset_timeout: Duration,
}

impl CpalRecorder {
    pub fn new(calibration: Duration, phrase_limit: Duration, onset_timeout: Duration) -> Self {
        Self {
            calibration,
            phrase_limit,
            onset_timeout,
        }
    }

    fn open_device() -> Result<Device, SpeechError> {
        cpal::default_host()
            .default_input_device()
            .ok_or_else(|| SpeechError::AudioDevice("no input device available".to_string()))
    }
}

impl Recorder for CpalRecorder {
    fn record_phrase(&mut self) -> Result<Capture, SpeechError> {
        let device = Self::open_device()?;
        let supported = device.default_input_config()?;
        let sample_rate = supported.sample_rate().0;
        let config = supported.config();
        let buffer = Arc::new(Mutex::new(Vec::new()));

        let stream = match supported.sample_format() {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, Arc::clone(&buffer))?,
            SampleFormat::I16 => build_stream::<i16>(&device, &config, Arc::clone(&buffer))?,
            SampleFormat::U16 => build_stream::<u16>(&device, &config, Arc::clone(&buffer))?,
            other => {
                return Err(SpeechError::AudioDevice(format!(
                    "unsupported sample format {other:?}"
                )))
            }
        };
        stream.play()?;

        thread::sleep(self.calibration);
        let threshold = calibrate(&drain(&buffer));
        debug!(threshold, sample_rate, "ambient noise calibrated");

        let mut gate = PhraseGate::new(threshold, sample_rate, self.phrase_limit);
        let frame_len = gate.frame_len();
        let mut pending: Vec<f32> = Vec::new();
        let waiting_since = Instant::now();
        let mut onset_at: Option<Instant> = None;

        'capture: loop {
            thread::sleep(POLL_INTERVAL);
            pending.extend(drain(&buffer));

            while pending.len() >= frame_len {
                let frame: Vec<f32> = pending.drain(..frame_len).collect();
                let state = gate.push_frame(&frame);
                if gate.has_started() && onset_at.is_none() {
                    onset_at = Some(Instant::now());
                }
                if state == GateState::Complete {
                    break 'capture;
                }
            }

            match onset_at {
                None if waiting_since.elapsed() >= self.onset_timeout => {
                    return Err(SpeechError::NoSpeech);
                }
                Some(onset) if phrase_overdue(onset.elapsed(), self.phrase_limit) => {
                    warn!("input stream stalled mid-phrase, keeping partial capture");
                    break 'capture;
                }
                _ => {}
            }
        }

        drop(stream);

        let samples = gate.into_samples();
        if samples.is_empty() {
            return Err(SpeechError::NoSpeech);
        }

        Ok(Capture {
            samples,
            sample_rate,
        })
    }
}

/// Build an input stream that down-mixes every frame to mono f32
fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    buffer: Arc<Mutex<Vec<f32>>>,
) -> Result<Stream, SpeechError>
where
    T: SizedSample,
    f32: cpal::FromSample<T>,
{
    let channels = config.channels.max(1) as usize;

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            if let Ok(mut buffer) = buffer.lock() {
                for frame in data.chunks(channels) {
                    let sum: f32 = frame.iter().map(|s| s.to_sample::<f32>()).sum();
                    buffer.push(sum / frame.len() as f32);
                }
            }
        },
        |err| warn!(%err, "input stream error"),
        None,
    )?;

    Ok(stream)
}

fn drain(buffer: &Arc<Mutex<Vec<f32>>>) -> Vec<f32> {
    buffer
        .lock()
        .map(|mut samples| std::mem::take(&mut *samples))
        .unwrap_or_default()
}
