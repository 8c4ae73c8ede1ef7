use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when a token is not a decimal literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid decimal literal '{0}'")]
pub struct ParseDecimalError(pub String);

/// Decomposed form of a decimal literal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DecimalKind {
    /// A finite value, kept exactly as its digits were authored.
    Finite {
        negative: bool,
        /// Digits before the decimal point (may be empty, e.g. `.5`).
        integer: String,
        /// Digits after the decimal point. `Some("")` for a trailing point (`5.`).
        fraction: Option<String>,
        /// Exponent, when the literal used scientific notation.
        exponent: Option<i32>,
    },
    NaN,
    Infinity { negative: bool },
}

/// Decimal literal as it appears in a DBC file (signal scaling, ranges, attribute values).
///
/// The authored digits are never re-rounded: `1.0E-3` keeps its mantissa `1.0` and its
/// exponent `-3`. `Display` writes the literal back as it was read; the canonical
/// spelling is produced by [`crate::canonical::numeric::normalize`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decimal {
    raw: String,
    kind: DecimalKind,
}

impl Decimal {
    /// The literal text as it was authored (trimmed).
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Decomposed value.
    pub fn kind(&self) -> &DecimalKind {
        &self.kind
    }

    /// `false` for NaN and infinities, which DBC cannot represent.
    pub fn is_finite(&self) -> bool {
        matches!(self.kind, DecimalKind::Finite { .. })
    }

    /// Builds a decimal from a float using its shortest round-trip representation.
    ///
    /// Non-finite inputs are accepted here and rejected later by normalization.
    pub fn from_f64(value: f64) -> Decimal {
        if value.is_nan() {
            return Decimal {
                raw: "NaN".to_string(),
                kind: DecimalKind::NaN,
            };
        }
        if value.is_infinite() {
            let negative = value < 0.0;
            return Decimal {
                raw: if negative { "-Infinity" } else { "Infinity" }.to_string(),
                kind: DecimalKind::Infinity { negative },
            };
        }
        let text: String = format!("{:?}", value);
        // `{:?}` always yields a valid literal for finite floats
        text.parse()
            .unwrap_or_else(|_| Decimal::from(value.trunc() as i64))
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal {
            raw: value.to_string(),
            kind: DecimalKind::Finite {
                negative: value < 0,
                integer: value.unsigned_abs().to_string(),
                fraction: None,
                exponent: None,
            },
        }
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: &str = s.trim();
        let err = || ParseDecimalError(raw.to_string());

        let (negative, body) = match raw.as_bytes().first() {
            Some(b'-') => (true, &raw[1..]),
            Some(b'+') => (false, &raw[1..]),
            _ => (false, raw),
        };

        let lower: String = body.to_ascii_lowercase();
        match lower.as_str() {
            "nan" => {
                return Ok(Decimal {
                    raw: raw.to_string(),
                    kind: DecimalKind::NaN,
                });
            }
            "inf" | "infinity" => {
                return Ok(Decimal {
                    raw: raw.to_string(),
                    kind: DecimalKind::Infinity { negative },
                });
            }
            _ => {}
        }

        let (mantissa, exponent) = match lower.split_once('e') {
            Some((m, e)) => {
                let e: i32 = e.parse().map_err(|_| err())?;
                (m, Some(e))
            }
            None => (lower.as_str(), None),
        };

        let (integer, fraction) = match mantissa.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (mantissa, None),
        };

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(integer) || !fraction.is_none_or(all_digits) {
            return Err(err());
        }
        if integer.is_empty() && fraction.is_none_or(str::is_empty) {
            return Err(err());
        }

        Ok(Decimal {
            raw: raw.to_string(),
            kind: DecimalKind::Finite {
                negative,
                integer: integer.to_string(),
                fraction: fraction.map(str::to_string),
                exponent,
            },
        })
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_authored_parts() {
        let d: Decimal = "1.0E-3".parse().unwrap();
        assert_eq!(d.raw(), "1.0E-3");
        assert_eq!(
            d.kind(),
            &DecimalKind::Finite {
                negative: false,
                integer: "1".into(),
                fraction: Some("0".into()),
                exponent: Some(-3),
            }
        );

        let d: Decimal = "-.5".parse().unwrap();
        assert_eq!(
            d.kind(),
            &DecimalKind::Finite {
                negative: true,
                integer: String::new(),
                fraction: Some("5".into()),
                exponent: None,
            }
        );
    }

    #[test]
    fn test_parse_non_finite() {
        assert!(!"nan".parse::<Decimal>().unwrap().is_finite());
        assert_eq!(
            "-Inf".parse::<Decimal>().unwrap().kind(),
            &DecimalKind::Infinity { negative: true }
        );
        assert!(!Decimal::from_f64(f64::INFINITY).is_finite());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "-", ".", "1.2.3", "abc", "1e", "0x10", "1,5"] {
            assert!(bad.parse::<Decimal>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_from_numbers() {
        assert_eq!(Decimal::from(-42).raw(), "-42");
        assert_eq!(Decimal::from_f64(0.25).raw(), "0.25");
        assert!(Decimal::from_f64(1e-7).is_finite());
    }
}
