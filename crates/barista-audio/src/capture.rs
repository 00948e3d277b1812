use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream, StreamConfig};

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::gate::SpeakingGate;
use super::ring_buffer::AudioProducer;
use super::watchdog::StallTracker;
use crate::AudioConfig;
use barista_foundation::AudioError;

/// Negotiated input stream parameters, reported back to the wiring code so
/// the recognizer runs at the device's native rate.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    pub sample_rate: u32,
    pub channels: u16,
}

#[derive(Debug, Default)]
pub struct CaptureStats {
    /// Blocks enqueued for recognition.
    pub blocks_captured: AtomicU64,
    /// Blocks dropped because the kiosk was speaking.
    pub blocks_gated: AtomicU64,
    /// Blocks dropped because the frame queue was full.
    pub blocks_dropped: AtomicU64,
}

/// Route one delivered block through the half-duplex gate into the frame
/// queue. This is the entire hot path of the capture callback: a flag read
/// and a non-blocking queue write.
pub fn ingest_block(
    gate: &SpeakingGate,
    producer: &mut AudioProducer,
    stats: &CaptureStats,
    samples: &[i16],
) {
    if gate.is_speaking() {
        stats.blocks_gated.fetch_add(1, Ordering::Relaxed);
        return;
    }
    if producer.push_block(samples) {
        stats.blocks_captured.fetch_add(1, Ordering::Relaxed);
    } else {
        stats.blocks_dropped.fetch_add(1, Ordering::Relaxed);
    }
}

/// Handle to the dedicated capture thread.
pub struct CaptureThread {
    handle: JoinHandle<()>,
    shutdown: Arc<AtomicBool>,
}

impl CaptureThread {
    pub fn spawn(
        config: AudioConfig,
        producer: AudioProducer,
        gate: Arc<SpeakingGate>,
        stats: Arc<CaptureStats>,
    ) -> Result<(Self, DeviceConfig), AudioError> {
        let running = Arc::new(AtomicBool::new(true));
        let shutdown = running.clone();
        let reported = Arc::new(RwLock::new(None::<Result<DeviceConfig, String>>));
        let reported_in_thread = reported.clone();

        let handle = thread::Builder::new()
            .name("audio-capture".to_string())
            .spawn(move || {
                let mut worker = CaptureWorker::new(config, producer, gate, stats, running);
                match worker.open_stream() {
                    Ok(cfg) => {
                        tracing::info!(
                            "Audio stream started: {} Hz, {} ch",
                            cfg.sample_rate,
                            cfg.channels
                        );
                        *reported_in_thread.write() = Some(Ok(cfg));
                    }
                    Err(e) => {
                        tracing::error!("Failed to open audio stream: {}", e);
                        *reported_in_thread.write() = Some(Err(e.to_string()));
                        return;
                    }
                }
                worker.supervise();
            })
            .map_err(|e| AudioError::Fatal(format!("Failed to spawn audio thread: {}", e)))?;

        // The cpal stream is not Send, so it lives entirely on the capture
        // thread; poll for the negotiated config before returning.
        let start = Instant::now();
        let cfg = loop {
            if let Some(result) = reported.read().clone() {
                break result;
            }
            if start.elapsed() > Duration::from_secs(3) {
                shutdown.store(false, Ordering::SeqCst);
                return Err(AudioError::Fatal(
                    "Timed out waiting for device configuration".to_string(),
                ));
            }
            thread::sleep(Duration::from_millis(20));
        };

        match cfg {
            Ok(cfg) => Ok((Self { handle, shutdown }, cfg)),
            Err(msg) => Err(AudioError::Fatal(msg)),
        }
    }

    pub fn stop(self) {
        self.shutdown.store(false, Ordering::SeqCst);
        let _ = self.handle.join();
    }
}

struct CaptureWorker {
    config: AudioConfig,
    producer: Arc<Mutex<AudioProducer>>,
    gate: Arc<SpeakingGate>,
    stats: Arc<CaptureStats>,
    running: Arc<AtomicBool>,
    restart_needed: Arc<AtomicBool>,
    watchdog: Arc<StallTracker>,
    stream: Option<Stream>,
}

impl CaptureWorker {
    fn new(
        config: AudioConfig,
        producer: AudioProducer,
        gate: Arc<SpeakingGate>,
        stats: Arc<CaptureStats>,
        running: Arc<AtomicBool>,
    ) -> Self {
        let watchdog_timeout = Duration::from_secs(config.watchdog_timeout_secs);
        Self {
            config,
            producer: Arc::new(Mutex::new(producer)),
            gate,
            stats,
            running,
            restart_needed: Arc::new(AtomicBool::new(false)),
            watchdog: Arc::new(StallTracker::new(watchdog_timeout)),
            stream: None,
        }
    }

    fn open_stream(&mut self) -> Result<DeviceConfig, AudioError> {
        let host = cpal::default_host();
        let device = match self.config.device.as_deref() {
            Some(name) => host
                .input_devices()
                .map_err(|e| AudioError::Fatal(format!("Failed to list devices: {}", e)))?
                .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                .ok_or_else(|| AudioError::DeviceNotFound {
                    name: Some(name.to_string()),
                })?,
            None => host
                .default_input_device()
                .ok_or(AudioError::DeviceNotFound { name: None })?,
        };

        if let Ok(name) = device.name() {
            tracing::info!("Selected input device: {}", name);
        }

        let (stream_config, sample_format) = negotiate_config(&device)?;
        let device_config = DeviceConfig {
            sample_rate: stream_config.sample_rate.0,
            channels: stream_config.channels,
        };

        let stream = self.build_stream(&device, stream_config, sample_format)?;
        stream.play()?;
        self.stream = Some(stream);
        self.watchdog.arm();
        Ok(device_config)
    }

    fn build_stream(
        &mut self,
        device: &cpal::Device,
        config: StreamConfig,
        sample_format: SampleFormat,
    ) -> Result<Stream, AudioError> {
        let producer = Arc::clone(&self.producer);
        let gate = Arc::clone(&self.gate);
        let stats = Arc::clone(&self.stats);
        let watchdog = Arc::clone(&self.watchdog);
        let restart_needed = Arc::clone(&self.restart_needed);
        let running = Arc::clone(&self.running);
        let channels = config.channels;

        let err_fn = move |err: cpal::StreamError| {
            tracing::error!("Audio stream error: {}", err);
            restart_needed.store(true, Ordering::SeqCst);
        };

        // Shared path once a block has been converted to i16.
        let handle_i16 = move |data: &[i16]| {
            if !running.load(Ordering::SeqCst) {
                return;
            }
            watchdog.feed();
            CONVERT_BUFFER.with(|buf| {
                let mut mono = buf.borrow_mut();
                downmix_to_mono(data, channels, &mut mono);
                ingest_block(&gate, &mut producer.lock(), &stats, &mono);
            });
        };

        let stream = match sample_format {
            SampleFormat::I16 => device.build_input_stream(
                &config,
                move |data: &[i16], _: &_| {
                    handle_i16(data);
                },
                err_fn,
                None,
            )?,
            SampleFormat::F32 => device.build_input_stream(
                &config,
                move |data: &[f32], _: &_| {
                    RAW_BUFFER.with(|buf| {
                        let mut converted = buf.borrow_mut();
                        converted.clear();
                        converted.reserve(data.len());
                        for &s in data {
                            let clamped = s.clamp(-1.0, 1.0);
                            converted.push((clamped * 32767.0).round() as i16);
                        }
                        handle_i16(&converted);
                    });
                },
                err_fn,
                None,
            )?,
            SampleFormat::U16 => device.build_input_stream(
                &config,
                move |data: &[u16], _: &_| {
                    RAW_BUFFER.with(|buf| {
                        let mut converted = buf.borrow_mut();
                        converted.clear();
                        converted.reserve(data.len());
                        for &s in data {
                            converted.push((s as i32 - 32768) as i16);
                        }
                        handle_i16(&converted);
                    });
                },
                err_fn,
                None,
            )?,
            other => {
                return Err(AudioError::FormatNotSupported {
                    format: format!("{:?}", other),
                });
            }
        };

        Ok(stream)
    }

    /// Keep the stream alive until shutdown, reopening after stream errors
    /// or watchdog stalls. Reopen failures are logged and retried on the
    /// next tick rather than killing the kiosk.
    fn supervise(&mut self) {
        while self.running.load(Ordering::SeqCst) {
            if self.restart_needed.swap(false, Ordering::SeqCst) || self.watchdog.check() {
                tracing::warn!("Reopening audio stream after error or stall");
                self.close_stream();
                match self.open_stream() {
                    Ok(cfg) => {
                        tracing::info!("Audio stream reopened: {} Hz", cfg.sample_rate);
                    }
                    Err(e) => {
                        tracing::error!("Failed to reopen audio stream: {}", e);
                        // Keep retrying; the stall latch only fires once.
                        self.restart_needed.store(true, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(500));
                    }
                }
            }
            thread::sleep(Duration::from_millis(100));
        }

        tracing::info!("Audio capture thread shutting down");
        self.close_stream();
    }

    fn close_stream(&mut self) {
        if let Some(stream) = self.stream.take() {
            drop(stream);
        }
    }
}

fn negotiate_config(device: &cpal::Device) -> Result<(StreamConfig, SampleFormat), AudioError> {
    if let Ok(default_config) = device.default_input_config() {
        return Ok((
            StreamConfig {
                channels: default_config.channels(),
                sample_rate: default_config.sample_rate(),
                buffer_size: cpal::BufferSize::Default,
            },
            default_config.sample_format(),
        ));
    }

    if let Ok(configs) = device.supported_input_configs() {
        if let Some(config) = configs.into_iter().next() {
            return Ok((config.with_max_sample_rate().into(), config.sample_format()));
        }
    }

    Err(AudioError::FormatNotSupported {
        format: "No supported audio formats".to_string(),
    })
}

fn downmix_to_mono(samples: &[i16], channels: u16, out: &mut Vec<i16>) {
    out.clear();
    if channels <= 1 {
        out.extend_from_slice(samples);
        return;
    }
    let channels = channels as usize;
    out.reserve(samples.len() / channels);
    for chunk in samples.chunks_exact(channels) {
        let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
        out.push((sum / channels as i32) as i16);
    }
}

// Thread-local scratch to keep the audio callback allocation-free after the
// first block.
thread_local! {
    static RAW_BUFFER: std::cell::RefCell<Vec<i16>> = const { std::cell::RefCell::new(Vec::new()) };
    static CONVERT_BUFFER: std::cell::RefCell<Vec<i16>> = const { std::cell::RefCell::new(Vec::new()) };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring_buffer::AudioRingBuffer;
    use barista_foundation::clock::test_clock;

    #[test]
    fn stereo_blocks_average_to_mono() {
        let mut out = Vec::new();
        downmix_to_mono(&[1000, -1000, 900, -900, 800, -800], 2, &mut out);
        assert_eq!(out, vec![0, 0, 0]);
    }

    #[test]
    fn mono_blocks_pass_through() {
        let mut out = Vec::new();
        downmix_to_mono(&[5, 6, 7], 1, &mut out);
        assert_eq!(out, vec![5, 6, 7]);
    }

    #[test]
    fn gated_blocks_never_reach_the_queue() {
        let gate = SpeakingGate::with_clock(Duration::from_millis(300), test_clock());
        let stats = CaptureStats::default();
        let rb = AudioRingBuffer::new(1024);
        let (mut producer, consumer) = rb.split();

        gate.while_speaking(|| {
            ingest_block(&gate, &mut producer, &stats, &[1i16; 160]);
            ingest_block(&gate, &mut producer, &stats, &[2i16; 160]);
        });

        assert_eq!(consumer.queued(), 0);
        assert_eq!(stats.blocks_gated.load(Ordering::Relaxed), 2);
        assert_eq!(stats.blocks_captured.load(Ordering::Relaxed), 0);

        // Settle elapsed (virtual clock): capture resumes.
        ingest_block(&gate, &mut producer, &stats, &[3i16; 160]);
        assert_eq!(consumer.queued(), 160);
        assert_eq!(stats.blocks_captured.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn overflow_counts_as_dropped() {
        let gate = SpeakingGate::with_clock(Duration::from_millis(0), test_clock());
        let stats = CaptureStats::default();
        let rb = AudioRingBuffer::new(8);
        let (mut producer, _consumer) = rb.split();

        ingest_block(&gate, &mut producer, &stats, &[1i16; 16]);
        assert_eq!(stats.blocks_dropped.load(Ordering::Relaxed), 1);
    }
}
