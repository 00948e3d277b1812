use std::sync::Arc;

use tracing::{debug, info, warn};

use barista_audio::SpeakingGate;
use barista_foundation::DialogError;
use barista_tts::SpeechSynthesizer;

use crate::catalog::DrinkCatalog;
use crate::config::DialogConfig;
use crate::filter::SpeechFilter;
use crate::keywords::{Category, KeywordCatalog};
use crate::matcher::IntentMatcher;
use crate::normalize::normalize;
use crate::notifier::OrderNotifier;
use crate::order::{Order, SessionEvent, Sizing};
use crate::prompts;
use crate::session::{Pending, Phase, SessionState};

/// The dialogue state machine: one per kiosk, owned by the processing flow.
///
/// Every prompt goes out through the half-duplex gate so the recognizer
/// never hears the kiosk's own voice, and every outcome is survivable: a
/// transcript that matches nothing re-prompts, a vanished catalog entry
/// falls back to a fresh ask, a failed delivery is logged and forgotten.
pub struct DialogMachine<S: SpeechSynthesizer, N: OrderNotifier> {
    config: DialogConfig,
    catalog: Arc<DrinkCatalog>,
    matcher: IntentMatcher,
    filter: SpeechFilter,
    gate: Arc<SpeakingGate>,
    speaker: S,
    notifier: N,
    state: SessionState,
}

impl<S: SpeechSynthesizer, N: OrderNotifier> DialogMachine<S, N> {
    pub fn new(
        config: DialogConfig,
        catalog: Arc<DrinkCatalog>,
        gate: Arc<SpeakingGate>,
        speaker: S,
        notifier: N,
    ) -> Self {
        let mut keywords = KeywordCatalog::standard();
        keywords.set_drinks(&catalog);
        keywords.set_trigger_phrases(&config.trigger_phrases);
        Self::with_keywords(config, catalog, keywords, gate, speaker, notifier)
    }

    /// Construct with an explicit keyword catalog. Lets tests (and any
    /// future hot-reload path) decouple the phrase tables from the drink
    /// lineup.
    pub fn with_keywords(
        config: DialogConfig,
        catalog: Arc<DrinkCatalog>,
        keywords: KeywordCatalog,
        gate: Arc<SpeakingGate>,
        speaker: S,
        notifier: N,
    ) -> Self {
        let keywords = Arc::new(keywords);
        let matcher =
            IntentMatcher::new(Arc::clone(&keywords)).with_threshold(config.match_threshold);
        let filter = SpeechFilter::new(keywords, normalize(&config.wake_word));
        Self {
            config,
            catalog,
            matcher,
            filter,
            gate,
            speaker,
            notifier,
            state: SessionState::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> &Phase {
        &self.state.phase
    }

    /// Process one finalized utterance: normalize, filter, dispatch.
    pub fn on_transcript(&mut self, raw: &str) {
        let text = normalize(raw);
        if !self.filter.is_valid(&text, self.state.is_waiting_trigger()) {
            debug!(target: "dialog", "Ignored noise: {:?}", text);
            return;
        }
        debug!(target: "dialog", "Transcript: {:?}", text);

        match self.state.phase.clone() {
            Phase::WaitingTrigger => self.start_session(),
            Phase::AskDrink => self.handle_ask_drink(&text),
            Phase::AskSize => self.handle_ask_size(&text),
            Phase::AskComponentSize => self.handle_ask_component_size(&text),
            Phase::Confirming(pending) => self.handle_confirmation(&text, pending),
        }
    }

    fn start_session(&mut self) {
        info!(target: "dialog", "Session started");
        self.emit(&SessionEvent::Start);
        self.say(prompts::greeting());
        self.state.phase = Phase::AskDrink;
        self.state.reprompts = 0;
    }

    fn handle_ask_drink(&mut self, text: &str) {
        match self
            .matcher
            .best_match(text, Category::Drink)
            .map(str::to_string)
        {
            Some(drink) => {
                self.state.reprompts = 0;
                self.say(&prompts::confirm_drink(&drink));
                self.state.phase = Phase::Confirming(Pending::Drink(drink));
            }
            None => self.reprompt(
                DialogError::RecognitionNoise {
                    category: Category::Drink.as_str().to_string(),
                },
                prompts::drink_not_recognized(),
            ),
        }
    }

    fn handle_ask_size(&mut self, text: &str) {
        match self
            .matcher
            .best_match(text, Category::Size)
            .map(str::to_string)
        {
            Some(size) => {
                let price = self
                    .state
                    .selected_drink
                    .as_deref()
                    .and_then(|d| self.catalog.price(d));
                self.state.reprompts = 0;
                self.say(&prompts::confirm_size(&size, price));
                self.state.phase = Phase::Confirming(Pending::Size(size));
            }
            None => self.reprompt(
                DialogError::RecognitionNoise {
                    category: Category::Size.as_str().to_string(),
                },
                prompts::size_not_recognized(),
            ),
        }
    }

    fn handle_ask_component_size(&mut self, text: &str) {
        let component = match self.current_component() {
            Some(c) => c,
            None => {
                self.fail_unavailable();
                return;
            }
        };
        match self
            .matcher
            .best_match(text, Category::Size)
            .map(str::to_string)
        {
            Some(size) => {
                self.state.reprompts = 0;
                self.say(&prompts::confirm_component_size(&size, &component));
                self.state.phase = Phase::Confirming(Pending::ComponentSize(size));
            }
            None => self.reprompt(
                DialogError::RecognitionNoise {
                    category: Category::Size.as_str().to_string(),
                },
                prompts::size_not_recognized(),
            ),
        }
    }

    fn handle_confirmation(&mut self, text: &str, pending: Pending) {
        match self
            .matcher
            .best_match(text, Category::YesNo)
            .map(str::to_string)
            .as_deref()
        {
            Some("Yes") => self.confirm(pending),
            Some("No") => self.decline(pending),
            _ => {
                // Phase stays Confirming(pending).
                self.reprompt(DialogError::AmbiguousConfirmation, prompts::yes_or_no());
            }
        }
    }

    fn confirm(&mut self, pending: Pending) {
        match pending {
            Pending::Drink(drink) => match self.catalog.get(&drink).cloned() {
                Some(entry) => {
                    self.state.selected_drink = Some(entry.id.clone());
                    self.state.reprompts = 0;
                    if entry.components.is_empty() {
                        self.say(prompts::ask_size());
                        self.state.phase = Phase::AskSize;
                    } else {
                        self.say(&prompts::customize_prompt(&entry.id));
                        self.state.phase = Phase::Confirming(Pending::CustomizeChoice);
                    }
                }
                None => {
                    self.state.selected_drink = Some(drink);
                    self.fail_unavailable();
                }
            },
            Pending::CustomizeChoice => match self.components_of_selected() {
                Some(components) if !components.is_empty() => {
                    self.state.customizing = true;
                    self.state.component_index = 0;
                    self.state.component_sizes.clear();
                    self.state.reprompts = 0;
                    self.say(&prompts::ask_component_size(&components[0]));
                    self.state.phase = Phase::AskComponentSize;
                }
                _ => self.fail_unavailable(),
            },
            Pending::Size(size) => {
                let entry = self
                    .state
                    .selected_drink
                    .as_deref()
                    .and_then(|d| self.catalog.get(d))
                    .cloned();
                match entry {
                    Some(entry) => {
                        let order = Order {
                            drink: entry.id,
                            price: entry.price,
                            sizing: Sizing::Whole(size),
                        };
                        self.state.reprompts = 0;
                        self.say(&prompts::confirm_order(&order));
                        self.state.phase = Phase::Confirming(Pending::Order(order));
                    }
                    None => self.fail_unavailable(),
                }
            }
            Pending::ComponentSize(size) => {
                let components = match self.components_of_selected() {
                    Some(c) if !c.is_empty() => c,
                    _ => {
                        self.fail_unavailable();
                        return;
                    }
                };
                let component = match components.get(self.state.component_index) {
                    Some(c) => c.clone(),
                    None => {
                        self.fail_unavailable();
                        return;
                    }
                };
                self.state.component_sizes.push((component, size));
                self.state.component_index += 1;
                self.state.reprompts = 0;

                if let Some(next) = components.get(self.state.component_index) {
                    self.say(&prompts::ask_component_size(next));
                    self.state.phase = Phase::AskComponentSize;
                } else {
                    let entry = self
                        .state
                        .selected_drink
                        .as_deref()
                        .and_then(|d| self.catalog.get(d))
                        .cloned();
                    match entry {
                        Some(entry) => {
                            let order = Order {
                                drink: entry.id,
                                price: entry.price,
                                sizing: Sizing::PerComponent(self.state.component_sizes.clone()),
                            };
                            self.say(&prompts::confirm_order(&order));
                            self.state.phase = Phase::Confirming(Pending::Order(order));
                        }
                        None => self.fail_unavailable(),
                    }
                }
            }
            Pending::Order(order) => {
                self.emit(&SessionEvent::VoiceOrderResult { data: order });
                self.say(prompts::order_done());
                info!(target: "dialog", "Order completed; back to trigger listening");
                self.state.reset();
            }
        }
    }

    fn decline(&mut self, pending: Pending) {
        self.state.reprompts = 0;
        match pending {
            Pending::Drink(_) => {
                self.say(prompts::reask_drink());
                self.state.phase = Phase::AskDrink;
            }
            Pending::CustomizeChoice => {
                self.state.customizing = false;
                self.say(prompts::ask_size());
                self.state.phase = Phase::AskSize;
            }
            Pending::Size(_) => {
                self.say(prompts::reask_size());
                self.state.phase = Phase::AskSize;
            }
            Pending::ComponentSize(_) => match self.current_component() {
                Some(component) => {
                    self.say(&prompts::reask_component_size(&component));
                    self.state.phase = Phase::AskComponentSize;
                }
                None => self.fail_unavailable(),
            },
            Pending::Order(_) => {
                // The read-back was wrong: drop the partial sizing and ask
                // again from the sizing step that produced it.
                if self.state.customizing {
                    self.state.component_sizes.clear();
                    self.state.component_index = 0;
                    match self.components_of_selected() {
                        Some(components) if !components.is_empty() => {
                            self.say(&prompts::ask_component_size(&components[0]));
                            self.state.phase = Phase::AskComponentSize;
                        }
                        _ => self.fail_unavailable(),
                    }
                } else {
                    self.say(prompts::reask_size());
                    self.state.phase = Phase::AskSize;
                }
            }
        }
    }

    /// No-match and ambiguous-confirmation outcomes: log, count, and either
    /// re-prompt in place or abandon the session once the configured cap is
    /// exceeded.
    fn reprompt(&mut self, error: DialogError, line: &str) {
        warn!(target: "dialog", "{}", error);
        self.state.reprompts += 1;
        if let Some(max) = self.config.max_reprompts {
            if self.state.reprompts > max {
                warn!(target: "dialog", "Re-prompt limit {} exceeded; abandoning session", max);
                self.say(prompts::aborted());
                self.state.reset();
                return;
            }
        }
        self.say(line);
    }

    /// The confirmed drink disappeared from the catalog between turns.
    /// Announce it and fall back to a fresh drink ask; never crash.
    fn fail_unavailable(&mut self) {
        let name = self
            .state
            .selected_drink
            .take()
            .unwrap_or_else(|| "that drink".to_string());
        warn!(
            target: "dialog",
            "{}",
            DialogError::UnknownCatalogEntry { name: name.clone() }
        );
        self.say(&prompts::unavailable(&name));
        self.state.customizing = false;
        self.state.component_index = 0;
        self.state.component_sizes.clear();
        self.state.reprompts = 0;
        self.state.phase = Phase::AskDrink;
    }

    fn current_component(&self) -> Option<String> {
        let drink = self.state.selected_drink.as_deref()?;
        self.catalog
            .components(drink)?
            .get(self.state.component_index)
            .cloned()
    }

    fn components_of_selected(&self) -> Option<Vec<String>> {
        let drink = self.state.selected_drink.as_deref()?;
        self.catalog.components(drink).map(|c| c.to_vec())
    }

    /// Speak one prompt with the gate closed. The synthesizer call blocks
    /// until playback finishes; failures are logged and the dialogue moves
    /// on.
    fn say(&mut self, line: &str) {
        let gate = Arc::clone(&self.gate);
        let result = gate.while_speaking(|| self.speaker.speak(line));
        if let Err(e) = result {
            warn!(target: "dialog", "Prompt playback failed: {}", e);
        }
    }

    /// Fire-and-forget event delivery.
    fn emit(&mut self, event: &SessionEvent) {
        if let Err(e) = self.notifier.notify(event) {
            warn!(
                target: "dialog",
                "{}",
                DialogError::NotifierDelivery(e.to_string())
            );
        }
    }
}
