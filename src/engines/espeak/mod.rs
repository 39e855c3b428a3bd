//! espeak phonemizer backend.
//!
//! Runs the `espeak` command (or `espeak-ng` when classic espeak is not
//! installed) with IPA output and stress marks, keeping punctuation from the
//! source text in place.
//!
//! # System Requirements
//!
//! One of the engines must be on PATH:
//! - **Linux**: `sudo apt-get install espeak` or `sudo apt-get install espeak-ng`
//! - **macOS**: `brew install espeak-ng`
//! - **Windows**: Download installer from <https://espeak-ng.org/download>
//!
//! # Example
//!
//! ```rust,no_run
//! use tts_phonemizer::{
//!     engines::espeak::EspeakBackend, Language, PhonemizerBackend, PhonemizerConfig,
//! };
//!
//! let backend = EspeakBackend::new(Language::BritishEnglish, &PhonemizerConfig::default())?;
//! println!("{}", backend.phonemize("Nine hundred and ninety nine.")?);
//! # Ok::<(), tts_phonemizer::PhonemizeError>(())
//! ```

pub mod backend;
mod segment;

pub use backend::EspeakBackend;
