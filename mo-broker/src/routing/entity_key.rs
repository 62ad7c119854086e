//! Four-slot entity keys and wildcard matching.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wildcard marker accepted in the string slot.
pub const STRING_WILDCARD: &str = "*";
/// Wildcard marker accepted in the numeric slots.
pub const NUMERIC_WILDCARD: i64 = 0;

/// Structured key carried by every published update and every subscription filter.
///
/// Wildcards (`None`, `"*"` for the first slot, `0` for the others) are normalised
/// to `None` on construction, so derived equality, hashing and ordering all agree
/// and a wildcard sorts before every concrete value in its slot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawEntityKey")]
pub struct EntityKey {
    first: Option<String>,
    second: Option<i64>,
    third: Option<i64>,
    fourth: Option<i64>,
}

#[derive(Deserialize)]
struct RawEntityKey {
    #[serde(default)]
    first: Option<String>,
    #[serde(default)]
    second: Option<i64>,
    #[serde(default)]
    third: Option<i64>,
    #[serde(default)]
    fourth: Option<i64>,
}

impl From<RawEntityKey> for EntityKey {
    fn from(raw: RawEntityKey) -> Self {
        Self::new(raw.first, raw.second, raw.third, raw.fourth)
    }
}

#[inline]
fn normalize_numeric(slot: Option<i64>) -> Option<i64> {
    slot.filter(|value| *value != NUMERIC_WILDCARD)
}

#[inline]
fn slot_matches<T: PartialEq>(required: &Option<T>, candidate: &Option<T>) -> bool {
    match required {
        None => true,
        Some(_) => required == candidate,
    }
}

impl EntityKey {
    pub fn new<S: Into<String>>(
        first: Option<S>,
        second: Option<i64>,
        third: Option<i64>,
        fourth: Option<i64>,
    ) -> Self {
        Self {
            first: first
                .map(Into::into)
                .filter(|value| value != STRING_WILDCARD),
            second: normalize_numeric(second),
            third: normalize_numeric(third),
            fourth: normalize_numeric(fourth),
        }
    }

    /// Key whose every slot is a wildcard.
    pub fn wildcard() -> Self {
        Self::default()
    }

    pub fn first(&self) -> Option<&str> {
        self.first.as_deref()
    }

    pub fn second(&self) -> Option<i64> {
        self.second
    }

    pub fn third(&self) -> Option<i64> {
        self.third
    }

    pub fn fourth(&self) -> Option<i64> {
        self.fourth
    }

    /// Returns `true` when no slot constrains a match.
    pub fn is_wildcard(&self) -> bool {
        self.first.is_none()
            && self.second.is_none()
            && self.third.is_none()
            && self.fourth.is_none()
    }

    /// Returns `true` when `self`, read as a required filter key, accepts `candidate`.
    #[inline]
    pub fn matches(&self, candidate: &EntityKey) -> bool {
        matches(self, candidate)
    }
}

/// Slot-by-slot wildcard-aware match of a required key against a candidate key.
#[inline]
pub fn matches(required: &EntityKey, candidate: &EntityKey) -> bool {
    slot_matches(&required.first, &candidate.first)
        && slot_matches(&required.second, &candidate.second)
        && slot_matches(&required.third, &candidate.third)
        && slot_matches(&required.fourth, &candidate.fourth)
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn numeric(slot: Option<i64>) -> String {
            slot.map_or_else(|| STRING_WILDCARD.to_string(), |value| value.to_string())
        }

        write!(
            f,
            "[{}.{}.{}.{}]",
            self.first.as_deref().unwrap_or(STRING_WILDCARD),
            numeric(self.second),
            numeric(self.third),
            numeric(self.fourth)
        )
    }
}
