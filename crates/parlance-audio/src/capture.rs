//! Microphone input via `cpal`.
//!
//! Captures from the default input device and resamples to 16 kHz mono,
//! the rate the evaluation service converts to anyway.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig, SupportedStreamConfig};
use rubato::{FftFixedIn, Resampler as _};

use crate::error::AudioError;

/// Sample rate of encoded takes.
pub const CAPTURE_SAMPLE_RATE: u32 = 16_000;

/// An opened input device.
///
/// Opening resolves the device and its configuration; no samples flow
/// until [`AudioCapture::start_recording`].
pub struct AudioCapture {
    device: Device,
    config: SupportedStreamConfig,

    /// The active cpal input stream (None when not recording).
    stream: Option<Stream>,

    /// Raw interleaved samples at the device rate.
    buffer: Arc<Mutex<Vec<f32>>>,

    is_recording: Arc<AtomicBool>,
}

impl AudioCapture {
    /// Open the default input device.
    pub fn open() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(AudioError::NoInputDevice)?;

        let config = device.default_input_config().map_err(|e| match e {
            cpal::DefaultStreamConfigError::DeviceNotAvailable => AudioError::NoInputDevice,
            other => AudioError::InputStreamError(other.to_string()),
        })?;

        tracing::info!(
            device = %device.name().unwrap_or_default(),
            sample_rate = config.sample_rate().0,
            channels = config.channels(),
            "Microphone opened"
        );

        Ok(Self {
            device,
            config,
            stream: None,
            buffer: Arc::new(Mutex::new(Vec::new())),
            is_recording: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Start recording into a fresh buffer.
    pub fn start_recording(&mut self) -> Result<(), AudioError> {
        if self.is_recording.load(Ordering::SeqCst) {
            return Ok(());
        }

        if let Ok(mut buf) = self.buffer.lock() {
            buf.clear();
        }

        let stream = self.build_input_stream()?;
        stream.play().map_err(|e| match e {
            cpal::PlayStreamError::DeviceNotAvailable => AudioError::MicrophonePermissionDenied,
            other => AudioError::InputStreamError(other.to_string()),
        })?;

        self.stream = Some(stream);
        self.is_recording.store(true, Ordering::SeqCst);
        tracing::debug!("Audio recording started");
        Ok(())
    }

    /// Stop recording and return the take as 16 kHz mono f32 PCM.
    pub fn stop_recording(&mut self) -> Result<Vec<f32>, AudioError> {
        self.is_recording.store(false, Ordering::SeqCst);
        self.stream = None;

        let raw_samples = {
            let mut buf = self
                .buffer
                .lock()
                .map_err(|e| AudioError::InputStreamError(e.to_string()))?;
            std::mem::take(&mut *buf)
        };

        let device_rate = self.config.sample_rate().0;
        let channels = self.config.channels();
        tracing::debug!(
            raw_samples = raw_samples.len(),
            device_rate,
            "Audio recording stopped"
        );

        let mono = if channels > 1 {
            downmix(&raw_samples, channels)
        } else {
            raw_samples
        };

        if device_rate == CAPTURE_SAMPLE_RATE {
            Ok(mono)
        } else {
            resample(&mono, device_rate, CAPTURE_SAMPLE_RATE)
        }
    }

    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.is_recording.load(Ordering::SeqCst)
    }

    /// Build a cpal input stream that writes samples into the shared buffer.
    fn build_input_stream(&self) -> Result<Stream, AudioError> {
        let buffer = Arc::clone(&self.buffer);
        let is_recording = Arc::clone(&self.is_recording);

        let stream_config: StreamConfig = self.config.clone().into();
        let sample_format = self.config.sample_format();

        let err_fn = |err: cpal::StreamError| {
            tracing::error!(%err, "Audio input stream error");
        };

        let stream = match sample_format {
            SampleFormat::F32 => self.device.build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if !is_recording.load(Ordering::Relaxed) {
                        return;
                    }
                    if let Ok(mut buf) = buffer.lock() {
                        buf.extend_from_slice(data);
                    }
                },
                err_fn,
                None,
            ),
            SampleFormat::I16 => self.device.build_input_stream(
                &stream_config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    if !is_recording.load(Ordering::Relaxed) {
                        return;
                    }
                    if let Ok(mut buf) = buffer.lock() {
                        buf.extend(data.iter().map(|&s| f32::from(s) / 32768.0));
                    }
                },
                err_fn,
                None,
            ),
            SampleFormat::I32 => self.device.build_input_stream(
                &stream_config,
                move |data: &[i32], _: &cpal::InputCallbackInfo| {
                    if !is_recording.load(Ordering::Relaxed) {
                        return;
                    }
                    #[allow(clippy::cast_precision_loss)]
                    let float_data: Vec<f32> =
                        data.iter().map(|&s| s as f32 / 2_147_483_648.0).collect();
                    if let Ok(mut buf) = buffer.lock() {
                        buf.extend_from_slice(&float_data);
                    }
                },
                err_fn,
                None,
            ),
            _ => {
                return Err(AudioError::InputStreamError(format!(
                    "Unsupported sample format: {sample_format:?}"
                )));
            }
        };

        stream.map_err(|e| match e {
            cpal::BuildStreamError::DeviceNotAvailable => AudioError::MicrophonePermissionDenied,
            other => AudioError::InputStreamError(other.to_string()),
        })
    }
}

/// Average interleaved frames down to one channel.
fn downmix(samples: &[f32], channels: u16) -> Vec<f32> {
    let channels = usize::from(channels);
    #[allow(clippy::cast_precision_loss)]
    let scale = channels as f32;
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / scale)
        .collect()
}

/// Resample mono audio with an FFT resampler, zero-padding the tail chunk.
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, AudioError> {
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let chunk_size = 1024;
    let mut resampler = FftFixedIn::<f32>::new(
        from_rate as usize,
        to_rate as usize,
        chunk_size,
        2,
        1,
    )
    .map_err(|e| AudioError::ResampleError(e.to_string()))?;

    let mut output = Vec::with_capacity(samples.len() * to_rate as usize / from_rate as usize + 1);

    let mut chunks = samples.chunks_exact(chunk_size);
    for chunk in chunks.by_ref() {
        let result = resampler
            .process(&[chunk], None)
            .map_err(|e| AudioError::ResampleError(e.to_string()))?;
        if let Some(channel) = result.first() {
            output.extend_from_slice(channel);
        }
    }

    let remaining = chunks.remainder();
    if !remaining.is_empty() {
        let mut padded = vec![0.0f32; chunk_size];
        padded[..remaining.len()].copy_from_slice(remaining);

        let result = resampler
            .process(&[&padded], None)
            .map_err(|e| AudioError::ResampleError(e.to_string()))?;
        if let Some(channel) = result.first() {
            #[allow(
                clippy::cast_precision_loss,
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss
            )]
            let wanted = (remaining.len() as f64 * f64::from(to_rate) / f64::from(from_rate))
                .ceil() as usize;
            output.extend_from_slice(&channel[..wanted.min(channel.len())]);
        }
    }

    Ok(output)
}
