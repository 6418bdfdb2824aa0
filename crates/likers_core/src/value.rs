use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::Deserialize;

/// A configured count: either a fixed value (`"15"`) or an inclusive range
/// (`"10-20"`) resolved to a random value each time it is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawValueSpec")]
pub enum ValueSpec {
    Fixed(u32),
    Range { low: u32, high: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueSpecError {
    #[error("empty value")]
    Empty,
    #[error("{0:?} is not a non-negative integer")]
    NotANumber(String),
    #[error("range {low}-{high} is inverted")]
    InvertedRange { low: u32, high: u32 },
}

impl ValueSpec {
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        match *self {
            ValueSpec::Fixed(value) => value,
            ValueSpec::Range { low, high } => rng.random_range(low..=high),
        }
    }
}

/// Resolve an optional value, falling back to `default` when it is unset.
pub fn resolve_or<R: Rng + ?Sized>(value: Option<&ValueSpec>, default: u32, rng: &mut R) -> u32 {
    value.map_or(default, |value| value.resolve(rng))
}

impl FromStr for ValueSpec {
    type Err = ValueSpecError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValueSpecError::Empty);
        }
        match raw.split_once('-') {
            Some((low, high)) => {
                let low = parse_count(low)?;
                let high = parse_count(high)?;
                if low > high {
                    return Err(ValueSpecError::InvertedRange { low, high });
                }
                Ok(ValueSpec::Range { low, high })
            }
            None => parse_count(raw).map(ValueSpec::Fixed),
        }
    }
}

fn parse_count(raw: &str) -> Result<u32, ValueSpecError> {
    let raw = raw.trim();
    raw.parse()
        .map_err(|_| ValueSpecError::NotANumber(raw.to_string()))
}

impl fmt::Display for ValueSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSpec::Fixed(value) => write!(f, "{value}"),
            ValueSpec::Range { low, high } => write!(f, "{low}-{high}"),
        }
    }
}

// Config files may spell counts as bare integers or as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawValueSpec {
    Number(u32),
    Text(String),
}

impl TryFrom<RawValueSpec> for ValueSpec {
    type Error = ValueSpecError;

    fn try_from(raw: RawValueSpec) -> Result<Self, Self::Error> {
        match raw {
            RawValueSpec::Number(value) => Ok(ValueSpec::Fixed(value)),
            RawValueSpec::Text(text) => text.parse(),
        }
    }
}
