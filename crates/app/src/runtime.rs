use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::Receiver;
use tracing::{debug, info, warn};

use barista_audio::{
    AudioRingBuffer, CaptureStats, CaptureThread, FrameReader, SpeakingGate,
};
use barista_dialog::catalog::{CatalogProvider, JsonFileCatalog, StaticCatalog};
use barista_dialog::{ChannelNotifier, DialogMachine};
use barista_foundation::AppError;
use barista_stt::plugins::NoopRecognizer;
use barista_stt::{SpeechRecognizer, TranscriptionEvent};
use barista_tts::{synthesizer_from_config, SpeechSynthesizer};

use crate::settings::KioskConfig;

/// Handle to the running kiosk pipeline: the capture thread feeding the
/// frame queue and the single processing thread that runs recognition and
/// the dialogue machine.
pub struct Runtime {
    capture: CaptureThread,
    processing: JoinHandle<()>,
    shutdown: Arc<AtomicBool>,
    orders: Option<Receiver<String>>,
    pub stats: Arc<CaptureStats>,
}

impl Runtime {
    pub fn start(cfg: KioskConfig) -> Result<Self, AppError> {
        // --- Catalogs ---
        let catalog = match &cfg.catalog.path {
            Some(path) => JsonFileCatalog::new(path).load(),
            None => StaticCatalog::demo().load(),
        }
        .map_err(|e| AppError::Config(format!("Failed to load drink catalog: {}", e)))?;
        if catalog.is_empty() {
            warn!("Drink catalog is empty; nothing will be orderable");
        }
        info!("Loaded {} drinks", catalog.len());
        let catalog = Arc::new(catalog);

        // --- Capture flow ---
        let gate = Arc::new(SpeakingGate::new(Duration::from_millis(
            cfg.audio.settle_delay_ms,
        )));
        let stats = Arc::new(CaptureStats::default());
        let ring = AudioRingBuffer::new(cfg.audio.queue_capacity);
        let (producer, consumer) = ring.split();
        let (capture, device_cfg) =
            CaptureThread::spawn(cfg.audio.clone(), producer, gate.clone(), stats.clone())?;
        let reader = FrameReader::new(consumer, device_cfg.sample_rate);

        // --- Processing flow ---
        let (notifier, orders) = ChannelNotifier::bounded(64);
        let speaker = synthesizer_from_config(&cfg.tts);
        info!("Synthesizer: {}", speaker.name());
        let machine = DialogMachine::new(cfg.dialog.clone(), catalog, gate, speaker, notifier);
        let recognizer = build_recognizer(&cfg.stt.engine);

        let shutdown = Arc::new(AtomicBool::new(false));
        let processing = {
            let shutdown = shutdown.clone();
            thread::Builder::new()
                .name("dialogue".to_string())
                .spawn(move || processing_loop(reader, recognizer, machine, shutdown))
                .map_err(|e| AppError::Fatal(format!("Failed to spawn processing thread: {}", e)))?
        };

        Ok(Self {
            capture,
            processing,
            shutdown,
            orders: Some(orders),
            stats,
        })
    }

    /// Envelope stream for whatever transport publishes orders downstream.
    pub fn take_orders(&mut self) -> Option<Receiver<String>> {
        self.orders.take()
    }

    pub fn shutdown(self) {
        info!("Shutting down AutoBarista runtime...");
        self.shutdown.store(true, Ordering::SeqCst);
        self.capture.stop();
        let _ = self.processing.join();
        info!("Runtime shutdown complete");
    }
}

fn build_recognizer(engine: &str) -> Box<dyn SpeechRecognizer> {
    match engine {
        "noop" => Box::new(NoopRecognizer::new()),
        other => {
            warn!("Unknown recognizer {:?}; falling back to noop", other);
            Box::new(NoopRecognizer::new())
        }
    }
}

/// The single consumer: dequeue frames, feed the recognizer, and run each
/// finalized utterance through the dialogue machine synchronously, blocking
/// TTS included. Errors are logged and never escape the loop.
fn processing_loop(
    mut reader: FrameReader,
    mut recognizer: Box<dyn SpeechRecognizer>,
    mut machine: DialogMachine<Box<dyn SpeechSynthesizer>, ChannelNotifier>,
    shutdown: Arc<AtomicBool>,
) {
    info!("Processing loop started");
    while !shutdown.load(Ordering::SeqCst) {
        match reader.read_frame(4096) {
            Some(frame) => match recognizer.accept_pcm16(&frame.samples) {
                Ok(Some(TranscriptionEvent::Final { utterance_id, text })) => {
                    debug!(target: "stt", "Final utterance {}: {:?}", utterance_id, text);
                    machine.on_transcript(&text);
                }
                Ok(Some(TranscriptionEvent::Partial { .. })) => {
                    // Only finalized utterances drive the dialogue.
                }
                Ok(Some(TranscriptionEvent::Error { code, message })) => {
                    warn!(target: "stt", "Recognizer error {}: {}", code, message);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(target: "stt", "Recognizer rejected a frame: {}", e);
                }
            },
            // 4096 samples cover a quarter second at 16 kHz; polling at
            // 40 Hz keeps latency low without spinning.
            None => thread::sleep(Duration::from_millis(25)),
        }
    }
    info!("Processing loop stopped");
}
