use std::path::PathBuf;

use serde::Deserialize;

use barista_audio::AudioConfig;
use barista_dialog::DialogConfig;
use barista_stt::RecognizerConfig;
use barista_tts::TtsConfig;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CatalogConfig {
    /// JSON file of `{name, price, components}` rows. The built-in demo
    /// lineup is used when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct KioskConfig {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub dialog: DialogConfig,
    #[serde(default)]
    pub stt: RecognizerConfig,
    #[serde(default)]
    pub tts: TtsConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Load configuration from the TOML file named by `AUTOBARISTA_CONFIG`
/// (default `autobarista.toml`; a missing file just means defaults) with an
/// `AUTOBARISTA_`-prefixed environment overlay on top.
pub fn load() -> Result<KioskConfig, config::ConfigError> {
    let path =
        std::env::var("AUTOBARISTA_CONFIG").unwrap_or_else(|_| "autobarista.toml".to_string());
    config::Config::builder()
        .add_source(config::File::with_name(&path).required(false))
        .add_source(config::Environment::with_prefix("AUTOBARISTA").separator("__"))
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_section() {
        let cfg = KioskConfig::default();
        assert_eq!(cfg.dialog.wake_word, "autobarista");
        assert_eq!(cfg.audio.settle_delay_ms, 300);
        assert_eq!(cfg.stt.engine, "noop");
        assert!(cfg.tts.enabled);
        assert!(cfg.catalog.path.is_none());
    }
}
