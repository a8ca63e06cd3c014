use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Persisted lifecycle status of a competition.
///
/// The wire values (`draft`, `publish`, `nomination`, `voting`, `judging`,
/// `completed`, `archive`) are stored as-is in the `status` column and must
/// never be renamed. Legacy values written by older clients (`published`,
/// `live`, `archived`) are accepted on read and never written back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum CompetitionStatus {
    /// Being prepared; not publicly visible.
    #[serde(rename = "draft")]
    Draft,
    /// Announced, waiting for the nomination window to open.
    #[serde(rename = "publish", alias = "published")]
    Published,
    /// Contestants are being nominated.
    #[serde(rename = "nomination")]
    Nomination,
    /// Public voting is open.
    #[serde(rename = "voting", alias = "live")]
    Voting,
    /// Voting closed, finals pending.
    #[serde(rename = "judging")]
    Judging,
    /// Finals are over.
    #[serde(rename = "completed")]
    Completed,
    /// Administratively shelved. Can only be revived to `Draft`.
    #[serde(rename = "archive", alias = "archived")]
    Archived,
}

impl CompetitionStatus {
    /// All possible status values.
    pub const ALL: &'static [CompetitionStatus] = &[
        Self::Draft,
        Self::Published,
        Self::Nomination,
        Self::Voting,
        Self::Judging,
        Self::Completed,
        Self::Archived,
    ];

    /// The forward sequence a competition moves through. `Archived` is a side
    /// state and has no position in it.
    pub const SEQUENCE: &'static [CompetitionStatus] = &[
        Self::Draft,
        Self::Published,
        Self::Nomination,
        Self::Voting,
        Self::Judging,
        Self::Completed,
    ];

    /// Statuses the reconciliation loop keeps in sync with the timeline.
    pub const AUTO_TRACKED: &'static [CompetitionStatus] = &[
        Self::Published,
        Self::Nomination,
        Self::Voting,
        Self::Judging,
    ];

    /// Returns the canonical wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "publish",
            Self::Nomination => "nomination",
            Self::Voting => "voting",
            Self::Judging => "judging",
            Self::Completed => "completed",
            Self::Archived => "archive",
        }
    }

    /// Every value that may be found in the `status` column for this status,
    /// legacy spellings included.
    pub fn stored_values(&self) -> &'static [&'static str] {
        match self {
            Self::Draft => &["draft"],
            Self::Published => &["publish", "published"],
            Self::Nomination => &["nomination"],
            Self::Voting => &["voting", "live"],
            Self::Judging => &["judging"],
            Self::Completed => &["completed"],
            Self::Archived => &["archive", "archived"],
        }
    }

    /// Position in [`Self::SEQUENCE`], `None` for `Archived`.
    pub fn sequence_index(&self) -> Option<usize> {
        Self::SEQUENCE.iter().position(|s| s == self)
    }

    /// Returns true for states only an administrator may leave.
    pub fn is_manual_only(&self) -> bool {
        matches!(self, Self::Draft | Self::Archived)
    }

    /// Returns true if the timeline dates drive this status forward.
    pub fn is_auto_tracked(&self) -> bool {
        Self::AUTO_TRACKED.contains(self)
    }

    /// Returns true for the live, publicly visible state.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Voting)
    }
}

impl fmt::Display for CompetitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for CompetitionStatus {
    fn default() -> Self {
        Self::Draft
    }
}

/// Error when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    invalid: String,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid status '{}'. Valid values: {}",
            self.invalid,
            CompetitionStatus::ALL
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for CompetitionStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "publish" | "published" => Ok(Self::Published),
            "nomination" => Ok(Self::Nomination),
            "voting" | "live" => Ok(Self::Voting),
            "judging" => Ok(Self::Judging),
            "completed" => Ok(Self::Completed),
            "archive" | "archived" => Ok(Self::Archived),
            _ => Err(ParseStatusError {
                invalid: s.to_string(),
            }),
        }
    }
}

/// Display phase computed from a record's status and timeline.
///
/// Never persisted. Variants are declared in display order, so the derived
/// `Ord` matches the lifecycle sequence with `Archive` sorting last.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Draft,
    Publish,
    Nomination,
    Voting,
    Judging,
    Completed,
    Archive,
}

impl Phase {
    /// The status a record in this phase should carry.
    pub fn as_status(&self) -> CompetitionStatus {
        match self {
            Self::Draft => CompetitionStatus::Draft,
            Self::Publish => CompetitionStatus::Published,
            Self::Nomination => CompetitionStatus::Nomination,
            Self::Voting => CompetitionStatus::Voting,
            Self::Judging => CompetitionStatus::Judging,
            Self::Completed => CompetitionStatus::Completed,
            Self::Archive => CompetitionStatus::Archived,
        }
    }
}

impl From<CompetitionStatus> for Phase {
    fn from(status: CompetitionStatus) -> Self {
        match status {
            CompetitionStatus::Draft => Self::Draft,
            CompetitionStatus::Published => Self::Publish,
            CompetitionStatus::Nomination => Self::Nomination,
            CompetitionStatus::Voting => Self::Voting,
            CompetitionStatus::Judging => Self::Judging,
            CompetitionStatus::Completed => Self::Completed,
            CompetitionStatus::Archived => Self::Archive,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_status().as_str())
    }
}
