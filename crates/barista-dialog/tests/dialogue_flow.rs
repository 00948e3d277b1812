//! Full dialogue flows driven through `DialogMachine::on_transcript` with
//! recording fakes in place of the synthesizer and the notifier.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use barista_audio::SpeakingGate;
use barista_foundation::clock::test_clock;
use barista_tts::{SpeechSynthesizer, TtsResult};

use barista_dialog::{
    catalog::{CatalogProvider, StaticCatalog},
    Category, DialogConfig, DialogMachine, KeywordCatalog, NotifyError, OrderNotifier, Pending,
    Phase, SessionEvent,
};

#[derive(Clone, Default)]
struct RecordingSpeaker {
    lines: Arc<Mutex<Vec<String>>>,
}

impl SpeechSynthesizer for RecordingSpeaker {
    fn name(&self) -> &str {
        "recording"
    }

    fn speak(&mut self, text: &str) -> TtsResult<()> {
        self.lines.lock().push(text.to_string());
        Ok(())
    }
}

#[derive(Clone, Default)]
struct RecordingNotifier {
    events: Arc<Mutex<Vec<String>>>,
}

impl OrderNotifier for RecordingNotifier {
    fn notify(&mut self, event: &SessionEvent) -> Result<(), NotifyError> {
        self.events.lock().push(serde_json::to_string(event)?);
        Ok(())
    }
}

struct FailingNotifier;

impl OrderNotifier for FailingNotifier {
    fn notify(&mut self, _event: &SessionEvent) -> Result<(), NotifyError> {
        Err(NotifyError::ChannelClosed)
    }
}

struct Kiosk {
    machine: DialogMachine<RecordingSpeaker, RecordingNotifier>,
    lines: Arc<Mutex<Vec<String>>>,
    events: Arc<Mutex<Vec<String>>>,
}

impl Kiosk {
    fn with_config(config: DialogConfig) -> Self {
        let catalog = Arc::new(StaticCatalog::demo().load().unwrap());
        let gate = Arc::new(SpeakingGate::with_clock(
            Duration::from_millis(300),
            test_clock(),
        ));
        let speaker = RecordingSpeaker::default();
        let notifier = RecordingNotifier::default();
        let lines = speaker.lines.clone();
        let events = notifier.events.clone();
        Self {
            machine: DialogMachine::new(config, catalog, gate, speaker, notifier),
            lines,
            events,
        }
    }

    fn new() -> Self {
        Self::with_config(DialogConfig::default())
    }

    fn hear(&mut self, texts: &[&str]) {
        for text in texts {
            self.machine.on_transcript(text);
        }
    }

    fn prompt_count(&self) -> usize {
        self.lines.lock().len()
    }

    fn last_event(&self) -> serde_json::Value {
        let events = self.events.lock();
        serde_json::from_str(events.last().expect("an event")).unwrap()
    }
}

#[test]
fn happy_path_whole_drink_order() {
    let mut kiosk = Kiosk::new();

    kiosk.hear(&["autobarista"]);
    assert_eq!(*kiosk.machine.phase(), Phase::AskDrink);
    assert_eq!(kiosk.last_event(), serde_json::json!({"type": "start"}));

    kiosk.hear(&["i want coffee"]);
    assert_eq!(
        *kiosk.machine.phase(),
        Phase::Confirming(Pending::Drink("coffee".into()))
    );

    // Coffee has components, so confirming the drink asks about customizing.
    kiosk.hear(&["yes"]);
    assert_eq!(
        *kiosk.machine.phase(),
        Phase::Confirming(Pending::CustomizeChoice)
    );

    kiosk.hear(&["no"]);
    assert_eq!(*kiosk.machine.phase(), Phase::AskSize);

    kiosk.hear(&["size m"]);
    assert_eq!(
        *kiosk.machine.phase(),
        Phase::Confirming(Pending::Size("M".into()))
    );

    kiosk.hear(&["yes"]);
    assert!(matches!(
        kiosk.machine.phase(),
        Phase::Confirming(Pending::Order(_))
    ));

    kiosk.hear(&["yes"]);
    assert_eq!(*kiosk.machine.phase(), Phase::WaitingTrigger);
    assert_eq!(
        kiosk.last_event(),
        serde_json::json!({
            "type": "voiceOrderResult",
            "data": {"selected_drink": "coffee", "selected_size": "M", "price": 20000}
        })
    );
    // Session state is fully reset.
    assert_eq!(kiosk.machine.state().selected_drink, None);
    assert!(kiosk.machine.state().component_sizes.is_empty());
}

#[test]
fn non_trigger_speech_is_ignored_while_idle() {
    let mut kiosk = Kiosk::new();
    kiosk.hear(&["i want coffee", "hello there"]);
    assert_eq!(*kiosk.machine.phase(), Phase::WaitingTrigger);
    assert_eq!(kiosk.prompt_count(), 0);
    assert!(kiosk.events.lock().is_empty());
}

#[test]
fn rejection_loop_reprompts_once_and_stays_put() {
    let mut kiosk = Kiosk::new();
    kiosk.hear(&["autobarista"]);
    let prompts_before = kiosk.prompt_count();
    let state_before = kiosk.machine.state().clone();

    // Passes the validity filter (contains a size letter) but matches no
    // drink above threshold.
    kiosk.hear(&["blah blah"]);

    assert_eq!(*kiosk.machine.phase(), Phase::AskDrink);
    assert_eq!(kiosk.prompt_count(), prompts_before + 1);
    assert_eq!(kiosk.machine.state().selected_drink, state_before.selected_drink);
    assert_eq!(
        kiosk.machine.state().component_sizes,
        state_before.component_sizes
    );
}

#[test]
fn pure_noise_produces_no_prompt_at_all() {
    let mut kiosk = Kiosk::new();
    kiosk.hear(&["autobarista"]);
    let prompts_before = kiosk.prompt_count();

    kiosk.hear(&["the weather today"]);

    assert_eq!(*kiosk.machine.phase(), Phase::AskDrink);
    assert_eq!(kiosk.prompt_count(), prompts_before);
}

#[test]
fn ambiguous_confirmation_reprompts_in_place() {
    let mut kiosk = Kiosk::new();
    kiosk.hear(&["autobarista", "i want coffee"]);
    let phase_before = kiosk.machine.phase().clone();

    kiosk.hear(&["milk tea"]);

    assert_eq!(*kiosk.machine.phase(), phase_before);
    assert_eq!(
        kiosk.lines.lock().last().unwrap(),
        "Please say yes or no."
    );
}

#[test]
fn declined_drink_is_discarded_and_reasked() {
    let mut kiosk = Kiosk::new();
    kiosk.hear(&["autobarista", "i want coffee", "no"]);
    assert_eq!(*kiosk.machine.phase(), Phase::AskDrink);
    assert_eq!(kiosk.machine.state().selected_drink, None);
}

#[test]
fn customization_sizes_every_component_in_catalog_order() {
    let mut kiosk = Kiosk::new();
    // coffee has two components: coffee, sugar.
    kiosk.hear(&["autobarista", "i want coffee", "yes", "yes"]);
    assert_eq!(*kiosk.machine.phase(), Phase::AskComponentSize);

    kiosk.hear(&["size s", "yes"]);
    assert_eq!(*kiosk.machine.phase(), Phase::AskComponentSize);
    assert_eq!(kiosk.machine.state().component_sizes.len(), 1);

    kiosk.hear(&["size l", "yes"]);
    // Both components confirmed before the final read-back.
    assert!(matches!(
        kiosk.machine.phase(),
        Phase::Confirming(Pending::Order(_))
    ));
    assert_eq!(kiosk.machine.state().component_sizes.len(), 2);

    kiosk.hear(&["yes"]);
    assert_eq!(
        kiosk.last_event(),
        serde_json::json!({
            "type": "voiceOrderResult",
            "data": {
                "selected_drink": "coffee",
                "customized_sizes": {"coffee": "S", "sugar": "L"},
                "price": 20000
            }
        })
    );
    assert_eq!(*kiosk.machine.phase(), Phase::WaitingTrigger);
}

#[test]
fn final_no_clears_partial_component_sizes() {
    let mut kiosk = Kiosk::new();
    kiosk.hear(&[
        "autobarista",
        "i want coffee",
        "yes",
        "yes",
        "size s",
        "yes",
        "size l",
        "yes",
    ]);
    assert!(matches!(
        kiosk.machine.phase(),
        Phase::Confirming(Pending::Order(_))
    ));

    // Reject the read-back: partial sizing must not leak into the retry.
    kiosk.hear(&["no"]);
    assert_eq!(*kiosk.machine.phase(), Phase::AskComponentSize);
    assert!(kiosk.machine.state().component_sizes.is_empty());

    kiosk.hear(&["size m", "yes", "size m", "yes", "yes"]);
    assert_eq!(
        kiosk.last_event(),
        serde_json::json!({
            "type": "voiceOrderResult",
            "data": {
                "selected_drink": "coffee",
                "customized_sizes": {"coffee": "M", "sugar": "M"},
                "price": 20000
            }
        })
    );
}

#[test]
fn declined_component_size_is_asked_again() {
    let mut kiosk = Kiosk::new();
    kiosk.hear(&["autobarista", "i want coffee", "yes", "yes", "size s", "no"]);
    assert_eq!(*kiosk.machine.phase(), Phase::AskComponentSize);
    assert!(kiosk.machine.state().component_sizes.is_empty());
    assert_eq!(
        kiosk.lines.lock().last().unwrap(),
        "Please say size again for coffee."
    );
}

#[test]
fn reprompt_cap_abandons_the_session() {
    let mut kiosk = Kiosk::with_config(DialogConfig {
        max_reprompts: Some(2),
        ..DialogConfig::default()
    });
    kiosk.hear(&["autobarista"]);

    // "continue" passes the filter but never matches a drink.
    kiosk.hear(&["continue", "continue"]);
    assert_eq!(*kiosk.machine.phase(), Phase::AskDrink);

    kiosk.hear(&["continue"]);
    assert_eq!(*kiosk.machine.phase(), Phase::WaitingTrigger);
    assert_eq!(kiosk.machine.state().reprompts, 0);
}

#[test]
fn infinite_patience_is_the_default() {
    let mut kiosk = Kiosk::new();
    kiosk.hear(&["autobarista"]);
    for _ in 0..25 {
        kiosk.hear(&["continue"]);
    }
    assert_eq!(*kiosk.machine.phase(), Phase::AskDrink);
}

#[test]
fn vanished_drink_falls_back_to_a_fresh_ask() {
    let catalog = Arc::new(StaticCatalog::demo().load().unwrap());
    let mut keywords = KeywordCatalog::standard();
    keywords.set_drinks(&catalog);
    // A keyword the catalog no longer backs, as after a store refresh.
    keywords
        .insert(Category::Drink, "phantom tea", &["phantom tea"])
        .unwrap();

    let gate = Arc::new(SpeakingGate::with_clock(
        Duration::from_millis(300),
        test_clock(),
    ));
    let speaker = RecordingSpeaker::default();
    let notifier = RecordingNotifier::default();
    let lines = speaker.lines.clone();
    let mut machine = DialogMachine::with_keywords(
        DialogConfig::default(),
        catalog,
        keywords,
        gate,
        speaker,
        notifier,
    );

    machine.on_transcript("autobarista");
    machine.on_transcript("phantom tea");
    assert_eq!(
        *machine.phase(),
        Phase::Confirming(Pending::Drink("phantom tea".into()))
    );

    machine.on_transcript("yes");
    assert_eq!(*machine.phase(), Phase::AskDrink);
    assert_eq!(machine.state().selected_drink, None);
    assert!(lines
        .lock()
        .last()
        .unwrap()
        .contains("phantom tea is not available"));
}

#[test]
fn notifier_failure_never_corrupts_the_dialogue() {
    let catalog = Arc::new(StaticCatalog::demo().load().unwrap());
    let gate = Arc::new(SpeakingGate::with_clock(
        Duration::from_millis(300),
        test_clock(),
    ));
    let mut machine = DialogMachine::new(
        DialogConfig::default(),
        catalog,
        gate,
        RecordingSpeaker::default(),
        FailingNotifier,
    );

    machine.on_transcript("autobarista");
    machine.on_transcript("i want coffee");
    machine.on_transcript("yes");
    machine.on_transcript("no");
    machine.on_transcript("size m");
    machine.on_transcript("yes");
    machine.on_transcript("yes");

    // Both emits failed, the order flow completed and reset anyway.
    assert_eq!(*machine.phase(), Phase::WaitingTrigger);
}

#[test]
fn drink_without_components_skips_the_customize_question() {
    // Demo drinks all have components; use a custom lineup.
    let catalog = Arc::new(
        StaticCatalog::new(vec![barista_dialog::DrinkRow {
            name: "espresso".into(),
            price: Some(15_000),
            components: vec![],
        }])
        .load()
        .unwrap(),
    );
    let gate = Arc::new(SpeakingGate::with_clock(
        Duration::from_millis(300),
        test_clock(),
    ));
    let speaker = RecordingSpeaker::default();
    let notifier = RecordingNotifier::default();
    let mut machine = DialogMachine::new(
        DialogConfig::default(),
        catalog,
        gate,
        speaker,
        notifier,
    );

    machine.on_transcript("autobarista");
    machine.on_transcript("espresso");
    machine.on_transcript("yes");
    assert_eq!(*machine.phase(), Phase::AskSize);
}
