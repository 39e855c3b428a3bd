use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::{PhonemizeError, Result};

/// Punctuation marks the engine keeps verbatim around phonemized words.
pub const DEFAULT_PRESERVED_PUNCTUATION: &str = ";:,.!?¡¿—…\"«»“”(){}[]";

/// Punctuation that may directly follow a trailing `z` once the stray space
/// before it is removed.
pub const DEFAULT_TRAILING_Z_PUNCTUATION: &str = ";:,.!?¡¿—…\"«»“”";

/// Phonemizer configuration.
///
/// Every field has a default, so a config file only needs to list the
/// values it overrides:
///
/// ```json
/// { "executable": "/opt/espeak/bin/espeak", "data_path": "/opt/espeak/share" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[serde(default)]
#[builder(default, setter(into))]
pub struct PhonemizerConfig {
    /// Preferred engine executable, as a name looked up on PATH or a path.
    pub executable: String,
    /// Executable used when the preferred one cannot be found.
    pub fallback_executable: String,
    /// Engine data directory. `None` uses the engine's built-in location.
    pub data_path: Option<PathBuf>,
    pub preserved_punctuation: String,
    pub trailing_z_punctuation: String,
}

impl Default for PhonemizerConfig {
    fn default() -> Self {
        Self {
            executable: "espeak".to_string(),
            fallback_executable: "espeak-ng".to_string(),
            data_path: None,
            preserved_punctuation: DEFAULT_PRESERVED_PUNCTUATION.to_string(),
            trailing_z_punctuation: DEFAULT_TRAILING_Z_PUNCTUATION.to_string(),
        }
    }
}

impl PhonemizerConfig {
    pub fn builder() -> PhonemizerConfigBuilder {
        PhonemizerConfigBuilder::default()
    }

    /// Load a config from a JSON file. Missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)
            .map_err(|e| PhonemizeError::Config(format!("Failed to parse JSON: {e}")))?;
        log::info!("Loaded phonemizer config from {}", path.display());
        Ok(config)
    }
}
