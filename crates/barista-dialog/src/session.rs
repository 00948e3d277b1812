use crate::order::Order;

/// What the kiosk is waiting to have confirmed. The candidate value rides
/// inside the variant, so "waiting for confirmation without a subject" and
/// "pending value without waiting" cannot be expressed.
#[derive(Debug, Clone, PartialEq)]
pub enum Pending {
    /// A drink candidate heard at AskDrink.
    Drink(String),
    /// Whether to size each ingredient separately.
    CustomizeChoice,
    /// A whole-drink size candidate.
    Size(String),
    /// A size candidate for the current component.
    ComponentSize(String),
    /// The assembled order, read back once before emission.
    Order(Order),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Idle; only trigger phrases get through the filter.
    WaitingTrigger,
    AskDrink,
    AskSize,
    AskComponentSize,
    Confirming(Pending),
}

/// Mutable dialogue state, owned exclusively by the machine and reset whole
/// the instant an order completes or the dialogue aborts.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub phase: Phase,
    /// Normalized id of the confirmed drink.
    pub selected_drink: Option<String>,
    /// Whether this order sizes components individually.
    pub customizing: bool,
    /// Index of the component currently being sized.
    pub component_index: usize,
    /// Confirmed component sizes, in catalog serving order.
    pub component_sizes: Vec<(String, String)>,
    /// Consecutive re-prompts in the current phase, for the retry cap.
    pub reprompts: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            phase: Phase::WaitingTrigger,
            selected_drink: None,
            customizing: false,
            component_index: 0,
            component_sizes: Vec::new(),
            reprompts: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn is_waiting_trigger(&self) -> bool {
        matches!(self.phase, Phase::WaitingTrigger)
    }
}
