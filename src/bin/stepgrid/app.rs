//! Audio stream setup and the state shared with the audio thread

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{error, info};
use rtrb::RingBuffer;
use std::sync::{Arc, Mutex};

use stepgrid::{
    config::SessionConfig,
    engine::AudioContext,
    io::{OutputDevice, Resume},
    sequencing::Session,
    SequencerError, MAX_BLOCK_SIZE,
};

use super::ui::UiApp;

/// Samples kept for the output scope between UI frames
const SCOPE_CAPACITY: usize = 8192;

/// Everything the audio callback touches. The UI locks it for edits.
pub struct Engine {
    pub session: Session,
    pub context: AudioContext,
}

/// The cpal stream as the session's output device.
pub struct CpalDevice {
    stream: cpal::Stream,
}

impl OutputDevice for CpalDevice {
    fn resume(&mut self) -> Resume {
        let result = self
            .stream
            .play()
            .map_err(|e| SequencerError::DeviceUnavailable(e.to_string()));
        Resume::ready(result)
    }
}

pub struct App {
    config: SessionConfig,
}

impl App {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Open the default output, then hand the terminal to the UI until it quits.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        info!(
            "output {} Hz, {} channels, {} patterns of {}x{}",
            sample_rate,
            channels,
            self.config.patterns,
            self.config.tracks,
            self.config.steps
        );

        let engine = Arc::new(Mutex::new(Engine {
            session: self.config.session(),
            context: AudioContext::with_seed(sample_rate, self.config.seed),
        }));

        let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_CAPACITY);

        let shared = Arc::clone(&engine);
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    let Ok(mut guard) = shared.lock() else {
                        data.fill(0.0);
                        return;
                    };
                    let Engine { session, context } = &mut *guard;

                    let total_frames = data.len() / channels;
                    let mut frames_written = 0;

                    while frames_written < total_frames {
                        let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                        let block = &mut render_buf[..frames_to_render];

                        session.process_block(context, block);

                        // Mono to every channel
                        let out_off = frames_written * channels;
                        for (i, &s) in block.iter().enumerate() {
                            for ch in 0..channels {
                                data[out_off + i * channels + ch] = s;
                            }
                            // A full scope just drops samples
                            let _ = scope_tx.push(s);
                        }

                        frames_written += frames_to_render;
                    }
                },
                |err| error!("audio stream error: {err}"),
                None,
            )
            .wrap_err("failed to build output stream")?;

        let device = CpalDevice { stream };

        let mut terminal = ratatui::init();
        let result = UiApp::new(engine, device, scope_rx).run(&mut terminal);
        ratatui::restore();
        result
    }
}
