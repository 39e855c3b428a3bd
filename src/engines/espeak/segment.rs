/// A run of words to phonemize, or a punctuation mark kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Words(String),
    Punct(char),
}

/// A segment plus whether whitespace preceded it in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Piece {
    pub segment: Segment,
    pub spaced: bool,
}

impl Piece {
    fn words(text: &str, spaced: bool) -> Self {
        Self {
            segment: Segment::Words(text.to_string()),
            spaced,
        }
    }

    fn punct(ch: char, spaced: bool) -> Self {
        Self {
            segment: Segment::Punct(ch),
            spaced,
        }
    }
}

/// Split text into word runs and punctuation marks.
///
/// Whitespace inside a word run collapses to a single space. A `.` or `,`
/// between two digits stays inside the word run.
pub(crate) fn split_segments(text: &str, punctuation: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_spaced = false;
    let mut pending_space = false;

    for (idx, ch) in text.char_indices() {
        if punctuation.contains(ch) && !is_numeric_connector_between_digits(text, idx, ch) {
            flush_words(&mut pieces, &mut current, current_spaced);
            pieces.push(Piece::punct(ch, pending_space));
            pending_space = false;
            continue;
        }

        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }

        if current.is_empty() {
            current_spaced = pending_space;
        } else if pending_space {
            current.push(' ');
        }
        pending_space = false;
        current.push(ch);
    }

    flush_words(&mut pieces, &mut current, current_spaced);
    pieces
}

fn flush_words(pieces: &mut Vec<Piece>, current: &mut String, spaced: bool) {
    if !current.is_empty() {
        pieces.push(Piece::words(current, spaced));
        current.clear();
    }
}

fn is_numeric_connector_between_digits(text: &str, idx: usize, ch: char) -> bool {
    if !matches!(ch, '.' | ',') {
        return false;
    }

    let prev = text[..idx].chars().next_back();
    let next = text[idx + ch.len_utf8()..].chars().next();

    matches!(
        (prev, next),
        (Some(left), Some(right)) if left.is_ascii_digit() && right.is_ascii_digit()
    )
}

/// Reassemble phonemized word runs and punctuation, restoring source spacing.
///
/// `phonemes` holds one entry per `Segment::Words`, in order.
pub(crate) fn join_segments(pieces: &[Piece], phonemes: &[String]) -> String {
    let mut out = String::new();
    let mut words = phonemes.iter();

    for piece in pieces {
        let rendered = match &piece.segment {
            Segment::Words(_) => match words.next() {
                Some(ps) if !ps.is_empty() => ps.clone(),
                _ => continue,
            },
            Segment::Punct(ch) => ch.to_string(),
        };
        if piece.spaced && !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&rendered);
    }

    out
}
