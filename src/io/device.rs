//! cpal output binding.
//!
//! The device pulls samples from an [`AudioLab`] moved into the callback. The
//! lab renders mono blocks of at most `MAX_BLOCK_SIZE` frames, which are
//! copied to every device channel.

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    Device, Stream, SupportedStreamConfig,
};
use log::{error, info};

use crate::{engine::AudioLab, error::LabError, MAX_BLOCK_SIZE};

/// The default output device with its preferred stream config.
///
/// Opened before the engine is built so the engine can run at the device's
/// sample rate.
pub struct OutputDevice {
    device: Device,
    config: SupportedStreamConfig,
}

/// A running output stream. Dropping it stops playback.
pub struct AudioPlayer {
    _stream: Stream,
    sample_rate: u32,
    channels: u16,
}

impl OutputDevice {
    pub fn default_output() -> Result<Self, LabError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(LabError::DeviceUnavailable)?;
        let config = device.default_output_config()?;

        info!(
            "output device {:?}: {} Hz, {} channels",
            device.name().unwrap_or_else(|_| "<unnamed>".into()),
            config.sample_rate().0,
            config.channels()
        );

        Ok(Self { device, config })
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate().0
    }

    pub fn channels(&self) -> u16 {
        self.config.channels()
    }

    /// Move `lab` onto the audio thread and start pulling samples.
    pub fn start(self, mut lab: AudioLab) -> Result<AudioPlayer, LabError> {
        let sample_rate = self.sample_rate();
        let channels = self.channels();
        let frame_width = channels as usize;
        let mut block = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = self.device.build_output_stream(
            &self.config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / frame_width;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let block = &mut block[..frames];
                    lab.render_block(block);

                    // Copy to output (mono to all channels)
                    let out = &mut data[frames_written * frame_width..];
                    for (frame, &sample) in out.chunks_exact_mut(frame_width).zip(block.iter()) {
                        frame.fill(sample);
                    }

                    frames_written += frames;
                }
            },
            |err| error!("audio stream error: {err}"),
            None,
        )?;
        stream.play()?;

        Ok(AudioPlayer {
            _stream: stream,
            sample_rate,
            channels,
        })
    }
}

impl AudioPlayer {
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}
