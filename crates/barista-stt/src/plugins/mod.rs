pub mod mock;
pub mod noop;

pub use mock::ScriptedRecognizer;
pub use noop::NoopRecognizer;
