use std::path::PathBuf;
use std::time::Instant;

use tts_phonemizer::{install_global_registry, phonemize, BackendRegistry, PhonemizerConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let language = args.next().unwrap_or_else(|| "a".to_string());
    let text: Vec<String> = args.collect();
    let text = if text.is_empty() {
        "Kokoro reads two hundred and ninety nine words, and his dogs listen.".to_string()
    } else {
        text.join(" ")
    };

    let config = match std::env::var_os("PHONEMIZER_CONFIG") {
        Some(path) => PhonemizerConfig::from_json_file(&PathBuf::from(path))?,
        None => PhonemizerConfig::default(),
    };
    if install_global_registry(BackendRegistry::new(config)).is_err() {
        log::warn!("Global phonemizer registry already installed, keeping it");
    }

    let start = Instant::now();
    let ps = phonemize(&text, &language)?;
    println!("First call (includes backend setup) took {:.2?}", start.elapsed());

    let start = Instant::now();
    phonemize(&text, &language)?;
    println!("Cached call took {:.2?}", start.elapsed());

    println!("{text}");
    println!("{ps}");
    Ok(())
}
