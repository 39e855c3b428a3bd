//! Phonemizer engines.
//!
//! This module contains implementations of [`PhonemizerBackend`](crate::PhonemizerBackend).
//!
//! # Available Engines
//!
//! Enable engines via Cargo features:
//! - `espeak` - espeak / espeak-ng external process (enabled by default)

#[cfg(feature = "espeak")]
pub mod espeak;
