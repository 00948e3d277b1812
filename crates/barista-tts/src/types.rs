use serde::{Deserialize, Serialize};

/// Synthesis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    /// Disable to route all prompts to the log only.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// External synthesis command; receives the prompt text as its final
    /// argument (e.g. `espeak`).
    #[serde(default)]
    pub command: Option<String>,
    /// Extra arguments passed before the text.
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: None,
            args: Vec::new(),
        }
    }
}
