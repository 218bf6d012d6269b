#![forbid(unsafe_code)]

//! Drill-down view hierarchy.

use std::fmt;
use std::str::FromStr;

/// One of the four drill-down depths a picker can display.
///
/// The derived ordering follows the hierarchy: `Years > Months > Days > Time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum ViewKind {
    /// Hour/minute editor.
    Time,
    /// 42-cell month grid.
    Days,
    /// Twelve months of one year.
    Months,
    /// A block of `years_per_page` years.
    Years,
}

impl ViewKind {
    /// All views, deepest first.
    pub const ALL: [ViewKind; 4] = [Self::Time, Self::Days, Self::Months, Self::Years];

    /// The view one level up, if any.
    #[must_use]
    pub const fn parent(self) -> Option<Self> {
        match self {
            Self::Time => Some(Self::Days),
            Self::Days => Some(Self::Months),
            Self::Months => Some(Self::Years),
            Self::Years => None,
        }
    }

    /// The view one level down, if any.
    #[must_use]
    pub const fn child(self) -> Option<Self> {
        match self {
            Self::Years => Some(Self::Months),
            Self::Months => Some(Self::Days),
            Self::Days => Some(Self::Time),
            Self::Time => None,
        }
    }

    /// Option-style name (`"years"`, `"months"`, `"days"`, `"time"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Days => "days",
            Self::Months => "months",
            Self::Years => "years",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised view name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown view: {0:?}")]
pub struct ParseViewError(pub String);

impl FromStr for ViewKind {
    type Err = ParseViewError;

    /// Accepts the current names plus the legacy start-view aliases, where
    /// `month`, `year` and `decades` meant the days, months and years views.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "time" => Ok(Self::Time),
            "days" | "day" | "month" => Ok(Self::Days),
            "months" | "year" => Ok(Self::Months),
            "years" | "decades" => Ok(Self::Years),
            _ => Err(ParseViewError(s.to_string())),
        }
    }
}

impl TryFrom<String> for ViewKind {
    type Error = ParseViewError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ViewKind> for String {
    fn from(view: ViewKind) -> Self {
        view.as_str().to_string()
    }
}
