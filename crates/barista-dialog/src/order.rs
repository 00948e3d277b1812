use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// How the drink is sized: one size for the whole drink, or one per
/// component in catalog serving order.
#[derive(Debug, Clone, PartialEq)]
pub enum Sizing {
    Whole(String),
    PerComponent(Vec<(String, String)>),
}

/// A finalized order. Built at the terminal transition, handed to the
/// notifier, never mutated afterward.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub drink: String,
    pub price: Option<u32>,
    pub sizing: Sizing,
}

impl Order {
    /// Spoken read-back used for the final confirmation prompt.
    pub fn describe(&self) -> String {
        match &self.sizing {
            Sizing::Whole(size) => format!("{} - size {}", self.drink, size),
            Sizing::PerComponent(sizes) => {
                let parts: Vec<String> = sizes
                    .iter()
                    .map(|(component, size)| format!("{} size {}", component, size))
                    .collect();
                format!("{} with {}", self.drink, parts.join(", "))
            }
        }
    }
}

// Wire shapes:
//   {"selected_drink": "...", "selected_size": "M", "price": 25000}
//   {"selected_drink": "...", "customized_sizes": {"milk": "S", ...}, "price": 25000}
// `customized_sizes` must keep catalog component order, hence the manual
// map serialization.
impl Serialize for Order {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 2 + usize::from(self.price.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("selected_drink", &self.drink)?;
        match &self.sizing {
            Sizing::Whole(size) => map.serialize_entry("selected_size", size)?,
            Sizing::PerComponent(sizes) => {
                map.serialize_entry("customized_sizes", &ComponentSizes(sizes))?
            }
        }
        if let Some(price) = self.price {
            map.serialize_entry("price", &price)?;
        }
        map.end()
    }
}

struct ComponentSizes<'a>(&'a [(String, String)]);

impl Serialize for ComponentSizes<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (component, size) in self.0 {
            map.serialize_entry(component, size)?;
        }
        map.end()
    }
}

/// Envelope broadcast to observers.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionEvent {
    /// A trigger phrase was recognized and a dialogue began.
    Start,
    /// An order was confirmed and emitted.
    VoiceOrderResult { data: Order },
}
