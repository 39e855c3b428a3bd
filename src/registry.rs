//! Language → backend cache.
//!
//! Constructing a backend is expensive (the engine is located and probed), so
//! each language gets at most one backend per registry, created on first use
//! and kept until the registry is dropped.

use once_cell::sync::OnceCell;

use crate::error::Result;
use crate::language::Language;
use crate::PhonemizerBackend;

type BackendFactory = dyn Fn(Language) -> Result<Box<dyn PhonemizerBackend>> + Send + Sync;

/// Lazily populated, append-only map from language to backend.
///
/// Concurrent first calls for the same language block until one of them has
/// built the backend; the factory runs at most once per language on success.
/// A failed construction is not cached and the next call tries again.
pub struct BackendRegistry {
    slots: [OnceCell<Box<dyn PhonemizerBackend>>; 3],
    factory: Box<BackendFactory>,
}

impl BackendRegistry {
    /// Registry that builds espeak backends from `config`.
    #[cfg(feature = "espeak")]
    pub fn new(config: crate::PhonemizerConfig) -> Self {
        Self::with_factory(move |language| {
            let backend = crate::engines::espeak::EspeakBackend::new(language, &config)?;
            Ok(Box::new(backend) as Box<dyn PhonemizerBackend>)
        })
    }

    /// Registry that builds backends with a caller-supplied factory.
    pub fn with_factory<F>(factory: F) -> Self
    where
        F: Fn(Language) -> Result<Box<dyn PhonemizerBackend>> + Send + Sync + 'static,
    {
        Self {
            slots: Default::default(),
            factory: Box::new(factory),
        }
    }

    /// Backend for a language code, constructing it on first use.
    pub fn resolve(&self, code: &str) -> Result<&dyn PhonemizerBackend> {
        let language = Language::from_code(code)?;
        self.resolve_language(language)
    }

    /// Backend for an already parsed language, constructing it on first use.
    pub fn resolve_language(&self, language: Language) -> Result<&dyn PhonemizerBackend> {
        let backend = self.slots[language.index()].get_or_try_init(|| {
            log::info!("Creating {} phonemizer backend", language.locale());
            (self.factory)(language)
        })?;
        Ok(&**backend)
    }

    /// Whether the backend for `language` has been constructed.
    pub fn is_initialized(&self, language: Language) -> bool {
        self.slots[language.index()].get().is_some()
    }

    /// Phonemize `text` in the language named by `code`.
    ///
    /// Input and output are both trimmed of surrounding whitespace.
    pub fn phonemize(&self, text: &str, code: &str) -> Result<String> {
        let text = text.trim();
        let backend = self.resolve(code)?;
        let ps = backend.phonemize(text)?;
        Ok(ps.trim().to_string())
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let initialized: Vec<&str> = Language::ALL
            .iter()
            .filter(|language| self.is_initialized(**language))
            .map(|language| language.code())
            .collect();
        f.debug_struct("BackendRegistry")
            .field("initialized", &initialized)
            .finish()
    }
}
