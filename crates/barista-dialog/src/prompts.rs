//! Everything the kiosk says, in one place.

use crate::order::Order;

pub fn greeting() -> &'static str {
    "Yes, I'm here. What would you like to drink?"
}

pub fn confirm_drink(drink: &str) -> String {
    format!("Did you mean drink {}? Please say yes or no.", drink)
}

pub fn drink_not_recognized() -> &'static str {
    "Sorry I did not recognize the drink. Please try again."
}

pub fn reask_drink() -> &'static str {
    "Please say again. What would you like to drink?"
}

pub fn customize_prompt(drink: &str) -> String {
    format!(
        "You chose drink: {}. Would you like to customize your drink ingredients?",
        drink
    )
}

pub fn ask_size() -> &'static str {
    "What size do you want?"
}

pub fn confirm_size(size: &str, price: Option<u32>) -> String {
    match price {
        Some(price) => format!(
            "Did you mean size {}? The price is {} vnd. Please say yes or no.",
            size, price
        ),
        None => format!("Did you mean size {}? Please say yes or no.", size),
    }
}

pub fn size_not_recognized() -> &'static str {
    "Sorry I did not recognize the size. Please try again."
}

pub fn reask_size() -> &'static str {
    "Please say size again."
}

pub fn ask_component_size(component: &str) -> String {
    format!("What size for {}?", component)
}

pub fn confirm_component_size(size: &str, component: &str) -> String {
    format!(
        "Did you mean size {} for {}? Please say yes or no.",
        size, component
    )
}

pub fn reask_component_size(component: &str) -> String {
    format!("Please say size again for {}.", component)
}

pub fn confirm_order(order: &Order) -> String {
    match order.price {
        Some(price) => format!(
            "Confirm: {}. The price is {} vnd. Is that right?",
            order.describe(),
            price
        ),
        None => format!("Confirm: {}. Is that right?", order.describe()),
    }
}

pub fn order_done() -> &'static str {
    "Order successful! If you want to order again, just say Autobarista."
}

pub fn yes_or_no() -> &'static str {
    "Please say yes or no."
}

pub fn unavailable(drink: &str) -> String {
    format!(
        "Sorry, {} is not available right now. What would you like to drink?",
        drink
    )
}

pub fn aborted() -> &'static str {
    "Sorry, let's start over. Say Autobarista when you are ready."
}
