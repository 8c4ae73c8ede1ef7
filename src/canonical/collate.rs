//! Natural ("human") ordering of names.
//!
//! A [`NaturalKey`] splits a string into digit runs and text runs. Digit runs compare
//! by numeric magnitude, whatever their length; text runs compare case-insensitively.
//! Strings that are equal under those rules fall back to a plain comparison of the
//! original text, so the order is strict.

use std::cmp::Ordering;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    /// Digits with leading zeros stripped.
    Number(String),
    /// Lowercased text.
    Text(String),
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Segment::Number(a), Segment::Number(b)) => {
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            (Segment::Number(_), Segment::Text(_)) => Ordering::Less,
            (Segment::Text(_), Segment::Number(_)) => Ordering::Greater,
            (Segment::Text(a), Segment::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Order key comparing embedded numbers by value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NaturalKey {
    segments: Vec<Segment>,
    raw: String,
}

impl NaturalKey {
    pub fn new(s: &str) -> NaturalKey {
        let mut segments: Vec<Segment> = Vec::new();
        let mut chars = s.chars().peekable();

        while let Some(&first) = chars.peek() {
            let digits: bool = first.is_ascii_digit();
            let mut run = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_ascii_digit() != digits {
                    break;
                }
                run.push(c);
                chars.next();
            }

            segments.push(if digits {
                let trimmed: &str = run.trim_start_matches('0');
                Segment::Number(trimmed.to_string())
            } else {
                Segment::Text(run.to_lowercase())
            });
        }

        NaturalKey {
            segments,
            raw: s.to_string(),
        }
    }
}

impl Ord for NaturalKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments
            .cmp(&other.segments)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for NaturalKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compares two strings in natural order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    NaturalKey::new(a).cmp(&NaturalKey::new(b))
}
