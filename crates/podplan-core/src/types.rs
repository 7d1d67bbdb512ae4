use serde::{de, Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use crate::dates::ScheduledDate;

pub type PodcastId = i64;
pub type EpisodeId = i64;

/// Type assigned to an episode with a guest when the form leaves `type` blank.
pub const GUEST_TYPE: &str = "Convidado";
/// Type assigned to an episode without a guest when the form leaves `type` blank.
pub const SOLO_TYPE: &str = "Solo";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Podcast {
    pub id: PodcastId,
    pub title: String,
    pub host: String,
    pub description: Option<String>,
}

/// Fields submitted when creating or editing a podcast.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PodcastForm {
    pub title: String,
    pub host: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: EpisodeId,
    /// Episodes may be scheduled before they are attached to a podcast.
    pub podcast_id: Option<PodcastId>,
    /// Stored verbatim; see [`ScheduledDate`] for the accepted layouts.
    pub scheduled_date: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub guest: Option<String>,
    pub theme: Option<String>,
    pub description: Option<String>,
    pub announcement: Option<String>,
}

impl Episode {
    pub fn classification(&self) -> Classification {
        Classification::from_type(self.kind.as_deref())
    }

    /// `None` when the stored date string is not in a recognised layout.
    pub fn scheduled(&self) -> Option<ScheduledDate> {
        self.scheduled_date.parse().ok()
    }
}

/// Fields submitted when creating or editing an episode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EpisodeForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub podcast_id: Option<PodcastId>,
    pub title: String,
    pub scheduled_date: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub guest: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub announcement: Option<String>,
}

impl EpisodeForm {
    /// The type to persist: the submitted one, or derived from the guest
    /// field when the form left it blank.
    pub fn resolved_kind(&self) -> String {
        match non_blank(&self.kind) {
            Some(kind) => kind.to_string(),
            None if non_blank(&self.guest).is_some() => GUEST_TYPE.to_string(),
            None => SOLO_TYPE.to_string(),
        }
    }
}

/// Trimmed view of an optional form field; blank counts as absent.
pub fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Display tag derived from an episode's free-form type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Solo,
    Guest,
    #[default]
    None,
}

impl Classification {
    pub fn from_type(kind: Option<&str>) -> Self {
        match kind {
            Some(k) if k.to_lowercase() == "solo" => Classification::Solo,
            Some(k) if !k.is_empty() => Classification::Guest,
            _ => Classification::None,
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Classification::Solo => "solo",
            Classification::Guest => "guest",
            Classification::None => "none",
        };
        write!(f, "{s}")
    }
}

/// HTML forms submit untouched numeric inputs as empty strings.
fn empty_as_none<'de, D, T>(de: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = Option::deserialize(de)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(de::Error::custom),
    }
}
