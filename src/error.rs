/// Errors produced while resolving a backend or phonemizing text.
#[derive(thiserror::Error, Debug)]
pub enum PhonemizeError {
    #[error("Unsupported language code: {0:?}. Expected one of \"a\", \"b\", \"z\".")]
    UnsupportedLanguage(String),
    #[error("No phonemizer engine available for locale '{locale}': {reason}")]
    BackendUnavailable { locale: String, reason: String },
    #[error("Phonemization failed: {0}")]
    EngineFailure(String),
    #[error("Invalid phonemizer config: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PhonemizeError>;
