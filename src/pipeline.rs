//! Ordered rewrite rules applied to raw engine output.
//!
//! Each rule repairs one systematic error or dialect variant of the engine.
//! Rules run in a fixed order and later rules are written against the output
//! of earlier ones: in particular everything after the rhotic remap sees `ɹ`,
//! never `r`.

use regex::Regex;

use crate::config::PhonemizerConfig;
use crate::error::{PhonemizeError, Result};
use crate::language::Language;

/// Transcription of "hundred" as the engine emits it.
const HUNDRED: &str = "hˈʌndɹɪd";

/// Transcription of "nine" as the engine emits it for en-us.
const NINE: &str = "nˈaɪn";

const LENGTH_MARK: char = 'ː';

#[derive(Debug, Clone)]
enum Rewrite {
    /// Replace every occurrence of `from` with `to`.
    Literal { from: &'static str, to: &'static str },
    /// Insert a space before `word` wherever the preceding character
    /// satisfies `after`. The preceding character is not consumed.
    SpaceBefore {
        word: &'static str,
        after: fn(char) -> bool,
    },
    /// `z ` followed by punctuation or end of input becomes `z`.
    TrailingZ { pattern: Regex },
    /// Replace `from` with `to` where it directly follows `anchor`, unless
    /// `blocked_by` comes right after it.
    ReplaceAfter {
        anchor: &'static str,
        from: &'static str,
        to: &'static str,
        blocked_by: char,
    },
}

/// A single named rewrite, optionally restricted to one language.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    name: &'static str,
    only_for: Option<Language>,
    rewrite: Rewrite,
}

impl RewriteRule {
    /// Stable identifier used in logs and diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this rule runs for `language`.
    pub fn applies_to(&self, language: Language) -> bool {
        self.only_for.map_or(true, |gate| gate == language)
    }

    fn apply(&self, input: &str) -> String {
        match &self.rewrite {
            Rewrite::Literal { from, to } => input.replace(from, to),
            Rewrite::SpaceBefore { word, after } => insert_space_before(input, word, *after),
            Rewrite::TrailingZ { pattern } => pattern.replace_all(input, "z$next").into_owned(),
            Rewrite::ReplaceAfter {
                anchor,
                from,
                to,
                blocked_by,
            } => replace_after(input, anchor, from, to, *blocked_by),
        }
    }
}

/// The post-processing pipeline turning a raw transcription into the
/// canonical one.
///
/// The pipeline is immutable once built; `apply` is a pure function of its
/// input and language.
#[derive(Debug, Clone)]
pub struct RulePipeline {
    rules: Vec<RewriteRule>,
}

impl RulePipeline {
    pub fn new(config: &PhonemizerConfig) -> Result<Self> {
        let literal = |name, from, to| RewriteRule {
            name,
            only_for: None,
            rewrite: Rewrite::Literal { from, to },
        };

        let rules = vec![
            // Known mis-transcriptions of "Kokoro".
            literal("kokoro-us", "kəkˈoːɹoʊ", "kˈoʊkəɹoʊ"),
            literal("kokoro-gb", "kəkˈɔːɹəʊ", "kˈəʊkəɹəʊ"),
            literal("palatalization", "ʲ", "j"),
            literal("rhotic", "r", "ɹ"),
            literal("velar-fricative", "x", "k"),
            literal("lateral-fricative", "ɬ", "l"),
            RewriteRule {
                name: "hundred-boundary",
                only_for: None,
                rewrite: Rewrite::SpaceBefore {
                    word: HUNDRED,
                    after: |c| c.is_ascii_lowercase() || c == 'ɹ' || c == LENGTH_MARK,
                },
            },
            RewriteRule {
                name: "trailing-z",
                only_for: None,
                rewrite: Rewrite::TrailingZ {
                    pattern: trailing_z_pattern(&config.trailing_z_punctuation)?,
                },
            },
            RewriteRule {
                name: "ninety-flap",
                only_for: Some(Language::AmericanEnglish),
                rewrite: Rewrite::ReplaceAfter {
                    anchor: NINE,
                    from: "ti",
                    to: "di",
                    blocked_by: LENGTH_MARK,
                },
            },
        ];

        Ok(Self { rules })
    }

    /// Apply every rule enabled for `language`, in order, then trim.
    pub fn apply(&self, raw: &str, language: Language) -> String {
        let mut ps = raw.to_string();
        for rule in self.rules.iter().filter(|r| r.applies_to(language)) {
            ps = rule.apply(&ps);
        }
        ps.trim().to_string()
    }

    /// Rules in execution order.
    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    /// Rule names in execution order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(RewriteRule::name).collect()
    }
}

fn trailing_z_pattern(punctuation: &str) -> Result<Regex> {
    let class: String = punctuation
        .chars()
        .map(|c| regex::escape(c.encode_utf8(&mut [0; 4])))
        .collect();
    let pattern = if class.is_empty() {
        "z (?P<next>$)".to_string()
    } else {
        format!("z (?P<next>[{class}]|$)")
    };
    Regex::new(&pattern)
        .map_err(|e| PhonemizeError::Config(format!("Invalid trailing-z punctuation: {e}")))
}

fn insert_space_before(input: &str, word: &str, after: fn(char) -> bool) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut last = 0;
    for (idx, _) in input.match_indices(word) {
        if input[..idx].chars().next_back().is_some_and(after) {
            out.push_str(&input[last..idx]);
            out.push(' ');
            last = idx;
        }
    }
    out.push_str(&input[last..]);
    out
}

fn replace_after(input: &str, anchor: &str, from: &str, to: &str, blocked_by: char) -> String {
    let needle = format!("{anchor}{from}");
    let mut out = String::with_capacity(input.len());
    let mut last = 0;
    for (idx, _) in input.match_indices(needle.as_str()) {
        let start = idx + anchor.len();
        let end = start + from.len();
        if input[end..].starts_with(blocked_by) {
            continue;
        }
        out.push_str(&input[last..start]);
        out.push_str(to);
        last = end;
    }
    out.push_str(&input[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::RulePipeline;
    use crate::config::PhonemizerConfig;
    use crate::language::Language;

    fn pipeline() -> RulePipeline {
        RulePipeline::new(&PhonemizerConfig::default()).unwrap()
    }

    fn us(raw: &str) -> String {
        pipeline().apply(raw, Language::AmericanEnglish)
    }

    #[test]
    fn rules_run_in_fixed_order() {
        assert_eq!(
            pipeline().rule_names(),
            vec![
                "kokoro-us",
                "kokoro-gb",
                "palatalization",
                "rhotic",
                "velar-fricative",
                "lateral-fricative",
                "hundred-boundary",
                "trailing-z",
                "ninety-flap",
            ]
        );
    }

    #[test]
    fn corrects_known_words_in_both_dialects() {
        assert_eq!(us("kəkˈoːɹoʊ"), "kˈoʊkəɹoʊ");
        assert_eq!(
            pipeline().apply("ðə kəkˈɔːɹəʊ mˈɒdəl", Language::BritishEnglish),
            "ðə kˈəʊkəɹəʊ mˈɒdəl"
        );
    }

    #[test]
    fn remaps_engine_symbols() {
        assert_eq!(us("mʲuː"), "mjuː");
        assert_eq!(us("rˈɛd"), "ɹˈɛd");
        assert_eq!(us("lˈɒx"), "lˈɒk");
        assert_eq!(us("ɬˈan"), "lˈan");
    }

    #[test]
    fn output_never_contains_default_rhotic() {
        for language in Language::ALL {
            let out = pipeline().apply("rˈʌn fˈɔːr mˈɔːr", language);
            assert!(!out.contains('r'), "{out}");
        }
    }

    #[test]
    fn splits_number_fused_onto_hundred() {
        assert_eq!(us("tˈuːhˈʌndɹɪd"), "tˈuː hˈʌndɹɪd");
        assert_eq!(us("fˈaɪvhˈʌndɹɪd"), "fˈaɪv hˈʌndɹɪd");
    }

    #[test]
    fn hundred_boundary_sees_remapped_rhotic() {
        assert_eq!(us("fˈɔːrhˈʌndɹɪd"), "fˈɔːɹ hˈʌndɹɪd");
    }

    #[test]
    fn hundred_boundary_leaves_separated_words_alone() {
        assert_eq!(us("tˈuː hˈʌndɹɪd"), "tˈuː hˈʌndɹɪd");
        assert_eq!(us("hˈʌndɹɪd"), "hˈʌndɹɪd");
        assert_eq!(us("ˈuːhˈʌndɹɪd"), "ˈuː hˈʌndɹɪd");
        assert_eq!(us(",hˈʌndɹɪd"), ",hˈʌndɹɪd");
    }

    #[test]
    fn hundred_boundary_does_not_consume_context() {
        assert_eq!(us("hˈʌndɹɪdhˈʌndɹɪd"), "hˈʌndɹɪd hˈʌndɹɪd");
    }

    #[test]
    fn collapses_space_before_trailing_punctuation() {
        assert_eq!(us("dˈɒɡz ."), "dˈɒɡz.");
        assert_eq!(us("hɪz , ænd"), "hɪz, ænd");
        assert_eq!(us("ɪts hɪz “"), "ɪts hɪz“");
        assert_eq!(us("dˈɒɡz "), "dˈɒɡz");
    }

    #[test]
    fn trailing_z_untouched_without_punctuation() {
        assert_eq!(us("dˈɒɡz"), "dˈɒɡz");
        assert_eq!(us("hɪz wˈɜːd"), "hɪz wˈɜːd");
        assert_eq!(us("hɪs ."), "hɪs .");
    }

    #[test]
    fn trailing_z_punctuation_is_configurable() {
        let config = PhonemizerConfig::builder()
            .trailing_z_punctuation(".")
            .build()
            .unwrap();
        let pipeline = RulePipeline::new(&config).unwrap();
        assert_eq!(pipeline.apply("hɪz .", Language::Neutral), "hɪz.");
        assert_eq!(pipeline.apply("hɪz , ænd", Language::Neutral), "hɪz , ænd");
    }

    #[test]
    fn empty_trailing_z_set_only_matches_end() {
        let config = PhonemizerConfig::builder()
            .trailing_z_punctuation("")
            .build()
            .unwrap();
        let pipeline = RulePipeline::new(&config).unwrap();
        assert_eq!(pipeline.apply("hɪz .", Language::Neutral), "hɪz .");
    }

    #[test]
    fn flaps_ninety_for_american_english_only() {
        let raw = "nˈaɪnti";
        assert_eq!(us(raw), "nˈaɪndi");
        assert_eq!(pipeline().apply(raw, Language::BritishEnglish), raw);
        assert_eq!(pipeline().apply(raw, Language::Neutral), raw);
    }

    #[test]
    fn ninety_flap_skips_long_vowel() {
        assert_eq!(us("nˈaɪntiːn"), "nˈaɪntiːn");
        assert_eq!(us("nˈaɪnti nˈaɪntiːn"), "nˈaɪndi nˈaɪntiːn");
    }

    #[test]
    fn ninety_flap_gate_is_reported() {
        let rules = pipeline();
        let flap = rules
            .rules()
            .iter()
            .find(|r| r.name() == "ninety-flap")
            .unwrap();
        assert!(flap.applies_to(Language::AmericanEnglish));
        assert!(!flap.applies_to(Language::BritishEnglish));
        assert!(!flap.applies_to(Language::Neutral));
    }

    #[test]
    fn apply_is_deterministic() {
        let raw = "  tˈuːhˈʌndɹɪd ænd nˈaɪnti dˈɒɡz . ";
        let first = us(raw);
        assert_eq!(first, "tˈuː hˈʌndɹɪd ænd nˈaɪndi dˈɒɡz.");
        assert_eq!(us(raw), first);
    }

    #[test]
    fn output_is_trimmed() {
        for language in Language::ALL {
            assert_eq!(pipeline().apply("", language), "");
            assert_eq!(pipeline().apply("  həlˈoʊ \n", language), "həlˈoʊ");
        }
    }
}
