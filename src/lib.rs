//! # tts-phonemizer
//!
//! Converts normalized English text into a canonical phoneme string for
//! speech synthesis.
//!
//! ## Features
//!
//! - **espeak backend**: Grapheme-to-phoneme conversion via the `espeak` (or
//!   `espeak-ng`) command, with stress marks and punctuation kept in place
//! - **Rule pipeline**: Fixed, ordered corrections for known engine errors and
//!   dialect differences
//! - **Backend registry**: One backend per language, created on first use
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! tts-phonemizer = "2026.2"
//! ```
//!
//! ```no_run
//! let ps = tts_phonemizer::phonemize("Two hundred and ninety dogs.", "a")?;
//! println!("{ps}");
//! # Ok::<(), tts_phonemizer::PhonemizeError>(())
//! ```
//!
//! Language codes: `a` (American English), `b` (British English), `z`
//! (neutral, engine default voice).

pub mod config;
pub mod engines;
pub mod error;
pub mod language;
pub mod pipeline;
pub mod registry;

pub use config::{PhonemizerConfig, PhonemizerConfigBuilder};
pub use error::{PhonemizeError, Result};
pub use language::Language;
pub use pipeline::{RewriteRule, RulePipeline};
pub use registry::BackendRegistry;

/// Common interface for phonemizer backends.
///
/// A backend produces a raw transcription for one language; the provided
/// [`phonemize`](PhonemizerBackend::phonemize) runs it through the backend's
/// [`RulePipeline`]. Backends are shared across threads by the registry and
/// must be safe to call concurrently.
pub trait PhonemizerBackend: Send + Sync {
    /// The language this backend was constructed for.
    fn language(&self) -> Language;

    /// Rules applied to every raw transcription.
    fn pipeline(&self) -> &RulePipeline;

    /// Unprocessed engine output for `text`.
    ///
    /// Empty input yields an empty string, not an error.
    fn raw_phonemize(&self, text: &str) -> Result<String>;

    /// Human-readable name of this backend.
    fn name(&self) -> &'static str;

    /// Canonical transcription of `text`, with no surrounding whitespace.
    fn phonemize(&self, text: &str) -> Result<String> {
        let raw = self.raw_phonemize(text)?;
        Ok(self.pipeline().apply(&raw, self.language()))
    }
}

#[cfg(feature = "espeak")]
static GLOBAL_REGISTRY: once_cell::sync::OnceCell<BackendRegistry> =
    once_cell::sync::OnceCell::new();

/// The process-wide registry used by [`phonemize`].
///
/// Built from [`PhonemizerConfig::default`] on first access unless another
/// registry was installed with [`install_global_registry`].
#[cfg(feature = "espeak")]
pub fn global_registry() -> &'static BackendRegistry {
    GLOBAL_REGISTRY.get_or_init(|| BackendRegistry::new(PhonemizerConfig::default()))
}

/// Install the process-wide registry.
///
/// Must be called before the first [`phonemize`] call; returns the registry
/// back if one is already in place.
#[cfg(feature = "espeak")]
pub fn install_global_registry(
    registry: BackendRegistry,
) -> std::result::Result<(), BackendRegistry> {
    GLOBAL_REGISTRY.set(registry)
}

/// Convert text to a canonical phoneme string.
///
/// # Arguments
/// - `text`: Normalized input text
/// - `language`: Language code (`"a"` US English, `"b"` British English, `"z"` neutral)
#[cfg(feature = "espeak")]
pub fn phonemize(text: &str, language: &str) -> Result<String> {
    global_registry().phonemize(text, language)
}

#[cfg(all(test, feature = "espeak"))]
mod tests {
    use super::{global_registry, install_global_registry, phonemize};
    use crate::config::PhonemizerConfig;
    use crate::error::PhonemizeError;
    use crate::registry::BackendRegistry;

    #[test]
    fn unsupported_language_fails_fast() {
        let err = phonemize("hello", "x").unwrap_err();
        assert!(matches!(err, PhonemizeError::UnsupportedLanguage(ref code) if code == "x"));
    }

    #[test]
    fn global_phonemize_trims_output() {
        if which::which("espeak").is_err() && which::which("espeak-ng").is_err() {
            return;
        }
        for code in ["a", "b", "z"] {
            assert_eq!(phonemize("", code).unwrap(), "");
            let ps = phonemize("  Two hundred dogs.  ", code).unwrap();
            assert_eq!(ps, ps.trim());
            assert!(ps.ends_with('.'), "{ps}");
        }
    }

    #[test]
    fn global_registry_is_fixed_after_first_use() {
        let first = global_registry();
        let rejected = install_global_registry(BackendRegistry::new(PhonemizerConfig::default()));
        assert!(rejected.is_err());
        assert!(std::ptr::eq(first, global_registry()));
    }
}
