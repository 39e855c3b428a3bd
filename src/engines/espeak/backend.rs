use std::borrow::Cow;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::PhonemizerConfig;
use crate::error::{PhonemizeError, Result};
use crate::language::Language;
use crate::pipeline::RulePipeline;
use crate::PhonemizerBackend;

use super::segment::{join_segments, split_segments, Segment};

/// espeak phonemizer bound to one language.
///
/// Every call spawns its own engine process, so a single backend can be
/// shared across threads without extra locking.
#[derive(Debug)]
pub struct EspeakBackend {
    language: Language,
    executable: PathBuf,
    data_path: Option<PathBuf>,
    preserved_punctuation: String,
    pipeline: RulePipeline,
}

impl EspeakBackend {
    /// Locate the engine and verify it runs.
    ///
    /// The preferred executable is tried first; if it is not on PATH the
    /// fallback executable is used instead. Fails with
    /// [`PhonemizeError::BackendUnavailable`] when neither can be found or the
    /// located binary does not start.
    pub fn new(language: Language, config: &PhonemizerConfig) -> Result<Self> {
        let executable = locate_executable(language, config)?;
        let backend = Self {
            language,
            executable,
            data_path: config.data_path.clone(),
            preserved_punctuation: config.preserved_punctuation.clone(),
            pipeline: RulePipeline::new(config)?,
        };
        let version = backend.probe()?;
        log::info!(
            "espeak backend ready for {} ({})",
            language.locale(),
            version.trim()
        );
        Ok(backend)
    }

    /// Engine binary selected at construction.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.executable);
        if let Some(data_path) = &self.data_path {
            command.env("ESPEAK_DATA_PATH", data_path);
        }
        command
    }

    fn probe(&self) -> Result<String> {
        let unavailable = |reason: String| PhonemizeError::BackendUnavailable {
            locale: self.language.locale().to_string(),
            reason,
        };

        let output = self
            .command()
            .arg("--version")
            .output()
            .map_err(|e| unavailable(format!("failed to run {}: {e}", self.executable.display())))?;

        if !output.status.success() {
            return Err(unavailable(format!(
                "{} --version exited with code {:?}",
                self.executable.display(),
                output.status.code()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn phonemize_segments_batch(&self, segments: &[&str]) -> Result<Vec<String>> {
        let batched_input = segments.join("\n");
        let output = self.run_espeak(&batched_input)?;
        let lines: Vec<&str> = output.lines().collect();

        // The engine should emit one line per input line in stdin mode.
        // If it does not, phonemize each segment on its own.
        if lines.len() != segments.len() {
            log::debug!(
                "espeak returned {} lines for {} segments, retrying per segment",
                lines.len(),
                segments.len()
            );
            return segments
                .iter()
                .map(|segment| {
                    let output = self.run_espeak(segment)?;
                    Ok(clean_ipa(&output))
                })
                .collect();
        }

        Ok(lines.iter().map(|line| clean_ipa(line)).collect())
    }

    fn run_espeak(&self, input: &str) -> Result<String> {
        let mut command = self.command();
        command.args(["--ipa", "--stdin", "-q"]);
        if let Some(voice) = self.language.espeak_voice() {
            command.args(["-v", voice]);
        }

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                PhonemizeError::EngineFailure(format!(
                    "failed to start {}: {e}",
                    self.executable.display()
                ))
            })?;

        // The engine reads stdin line by line; an unterminated final line
        // can lose its last token.
        let stdin_payload = canonicalize_espeak_stdin_payload(input);
        let stdin = child.stdin.take();

        // The engine answers as it reads, so stdin is fed from its own thread
        // while this one drains stdout. Writing everything first can fill the
        // stdout pipe and block both sides.
        let (output, written) = std::thread::scope(|scope| {
            let writer = stdin.map(|mut stdin| {
                let payload = stdin_payload.as_bytes();
                scope.spawn(move || stdin.write_all(payload))
            });
            let output = child.wait_with_output();
            let written = match writer {
                Some(handle) => handle
                    .join()
                    .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked"))),
                None => Ok(()),
            };
            (output, written)
        });

        let output = output
            .map_err(|e| PhonemizeError::EngineFailure(format!("failed to read output: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PhonemizeError::EngineFailure(format!(
                "{} exited with code {:?}: {stderr}",
                self.executable.display(),
                output.status.code()
            )));
        }

        written
            .map_err(|e| PhonemizeError::EngineFailure(format!("failed to write input: {e}")))?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl PhonemizerBackend for EspeakBackend {
    fn language(&self) -> Language {
        self.language
    }

    fn pipeline(&self) -> &RulePipeline {
        &self.pipeline
    }

    fn raw_phonemize(&self, text: &str) -> Result<String> {
        let pieces = split_segments(text, &self.preserved_punctuation);
        let words: Vec<&str> = pieces
            .iter()
            .filter_map(|piece| match &piece.segment {
                Segment::Words(words) => Some(words.as_str()),
                Segment::Punct(_) => None,
            })
            .collect();

        if words.is_empty() {
            return Ok(join_segments(&pieces, &[]));
        }

        let phonemes = self.phonemize_segments_batch(&words)?;
        Ok(join_segments(&pieces, &phonemes))
    }

    fn name(&self) -> &'static str {
        "espeak"
    }
}

fn locate_executable(language: Language, config: &PhonemizerConfig) -> Result<PathBuf> {
    match which::which(&config.executable) {
        Ok(path) => {
            log::info!("Using espeak executable: {}", path.display());
            return Ok(path);
        }
        Err(e) => log::warn!(
            "{} not found ({e}), falling back to {}",
            config.executable,
            config.fallback_executable
        ),
    }

    match which::which(&config.fallback_executable) {
        Ok(path) => {
            log::info!("Using fallback executable: {}", path.display());
            Ok(path)
        }
        Err(e) => Err(PhonemizeError::BackendUnavailable {
            locale: language.locale().to_string(),
            reason: format!(
                "neither {} nor {} could be located: {e}",
                config.executable, config.fallback_executable
            ),
        }),
    }
}

fn canonicalize_espeak_stdin_payload(input: &str) -> Cow<'_, str> {
    if input.ends_with('\n') {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(format!("{input}\n"))
    }
}

/// Flatten engine output to one line and drop `_` word joiners.
fn clean_ipa(ipa: &str) -> String {
    ipa.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .replace('_', "")
}
