//! Work types (manga, manhwa, novels, art).
//!
//! Works are owned by the content side of the platform. The bookmark
//! subsystem only reads them to render folder contents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{UserId, WorkId};

/// Kind of published work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkKind {
    Manga,
    Manhwa,
    Novel,
    LightNovel,
    Art,
}

impl std::fmt::Display for WorkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manga => write!(f, "manga"),
            Self::Manhwa => write!(f, "manhwa"),
            Self::Novel => write!(f, "novel"),
            Self::LightNovel => write!(f, "light-novel"),
            Self::Art => write!(f, "art"),
        }
    }
}

impl std::str::FromStr for WorkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manga" => Ok(Self::Manga),
            "manhwa" => Ok(Self::Manhwa),
            "novel" => Ok(Self::Novel),
            "light-novel" => Ok(Self::LightNovel),
            "art" => Ok(Self::Art),
            _ => Err(format!("invalid work type: {s}")),
        }
    }
}

/// Publication status of a work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    #[default]
    Ongoing,
    Completed,
}

/// A published work, as stored at `works/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    /// Work ID (the document key).
    pub id: WorkId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: WorkKind,
    #[serde(default)]
    pub cover_url: String,
    pub author_id: UserId,
    pub author_name: String,
    #[serde(default)]
    pub status: WorkStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Artwork image, only set for [`WorkKind::Art`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork_url: Option<String>,
}
