//! Dream records as consumed by the similarity engine

mod emotion;

pub use emotion::{Emotion, EmotionGroup};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Prefix for generated dream ids
pub const DREAM_ID_PREFIX: &str = "dr-";

/// Generate a new ULID-based dream id: `dr-<ulid>`
pub fn generate_dream_id() -> String {
    format!(
        "{}{}",
        DREAM_ID_PREFIX,
        ulid::Ulid::new().to_string().to_lowercase()
    )
}

/// A dream journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dream {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<Emotion>,
    #[serde(default = "default_public")]
    pub is_public: bool,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub lucid_dream: bool,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_public() -> bool {
    true
}

impl Dream {
    /// Minimal public dream, mostly useful for building fixtures
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Dream {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            tags: Vec::new(),
            emotion: Some(Emotion::Neutral),
            is_public: true,
            user_id: String::new(),
            date: None,
            lucid_dream: false,
            recurring: false,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_emotion(mut self, emotion: Option<Emotion>) -> Self {
        self.emotion = emotion;
        self
    }

    pub fn with_public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Text fed to keyword extraction: title and description joined by a space
    pub fn similarity_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

/// Input for creating a dream; unset fields take their documented defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDream {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub emotion: Option<Emotion>,
    #[serde(default)]
    pub is_public: Option<bool>,
    pub user_id: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub lucid_dream: bool,
    #[serde(default)]
    pub recurring: bool,
}

impl NewDream {
    /// Materialize the record: public by default, neutral emotion, dated today
    pub fn into_dream(self, id: String, now: DateTime<Utc>) -> Dream {
        Dream {
            id,
            title: self.title,
            description: self.description,
            tags: self.tags,
            emotion: Some(self.emotion.unwrap_or_default()),
            is_public: self.is_public.unwrap_or(true),
            user_id: self.user_id,
            date: Some(self.date.unwrap_or_else(|| now.date_naive())),
            lucid_dream: self.lucid_dream,
            recurring: self.recurring,
            created_at: Some(now),
            updated_at: None,
        }
    }
}

/// Partial update of a dream; `None` means "not part of the update"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DreamUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<Emotion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lucid_dream: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<bool>,
}

impl DreamUpdate {
    /// Whether any field that feeds the similarity score is part of the update
    ///
    /// Presence is what counts, not whether the value differs from the stored one.
    pub fn has_significant_changes(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.tags.is_some()
            || self.emotion.is_some()
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        !self.has_significant_changes()
            && self.is_public.is_none()
            && self.date.is_none()
            && self.lucid_dream.is_none()
            && self.recurring.is_none()
    }

    /// Apply the present fields onto `dream`
    pub fn apply_to(&self, dream: &mut Dream, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            dream.title = title.clone();
        }
        if let Some(description) = &self.description {
            dream.description = description.clone();
        }
        if let Some(tags) = &self.tags {
            dream.tags = tags.clone();
        }
        if let Some(emotion) = &self.emotion {
            dream.emotion = Some(emotion.clone());
        }
        if let Some(is_public) = self.is_public {
            dream.is_public = is_public;
        }
        if let Some(date) = self.date {
            dream.date = Some(date);
        }
        if let Some(lucid) = self.lucid_dream {
            dream.lucid_dream = lucid;
        }
        if let Some(recurring) = self.recurring {
            dream.recurring = recurring;
        }
        dream.updated_at = Some(now);
    }
}
