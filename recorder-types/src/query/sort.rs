use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "Asc"),
            SortDirection::Desc => write!(f, "Desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(ParseSortError(s.to_string())),
        }
    }
}

/// An unrecognised sort key or direction name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognised sort value: {0}")]
pub struct ParseSortError(pub String);

/// Sort request: which key to order by, and in which direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort<K> {
    pub by: K,
    pub direction: SortDirection,
}

impl<K> Sort<K> {
    pub fn new(by: K, direction: SortDirection) -> Self {
        Self { by, direction }
    }

    pub fn asc(by: K) -> Self {
        Self::new(by, SortDirection::Asc)
    }

    pub fn desc(by: K) -> Self {
        Self::new(by, SortDirection::Desc)
    }

    /// Stable-sorts `rows` with `compare`, reversed for `Desc`.
    ///
    /// Rows that compare equal keep their relative order in both directions.
    pub fn apply<T>(&self, rows: &mut [T], compare: impl Fn(&T, &T) -> Ordering) {
        match self.direction {
            SortDirection::Asc => rows.sort_by(|a, b| compare(a, b)),
            SortDirection::Desc => rows.sort_by(|a, b| compare(b, a)),
        }
    }
}

impl<K: fmt::Display> fmt::Display for Sort<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "By={}&Type={}", self.by, self.direction)
    }
}
