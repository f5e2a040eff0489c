use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Emotion label attached to a dream
///
/// Labels outside the fixed vocabulary are kept verbatim in `Other` so they
/// can still match an identical label on another dream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Emotion {
    Happy,
    Anxious,
    Peaceful,
    Confused,
    Excited,
    Sad,
    Curious,
    Fearful,
    #[default]
    Neutral,
    Other(String),
}

/// Coarse grouping used for partial emotion matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmotionGroup {
    Positive,
    Negative,
    Neutral,
}

impl Emotion {
    /// All labels of the fixed vocabulary
    pub const VOCABULARY: [&'static str; 9] = [
        "happy", "anxious", "peaceful", "confused", "excited", "sad", "curious", "fearful",
        "neutral",
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Anxious => "anxious",
            Emotion::Peaceful => "peaceful",
            Emotion::Confused => "confused",
            Emotion::Excited => "excited",
            Emotion::Sad => "sad",
            Emotion::Curious => "curious",
            Emotion::Fearful => "fearful",
            Emotion::Neutral => "neutral",
            Emotion::Other(label) => label,
        }
    }

    /// Group for a known label, `None` for labels outside the vocabulary
    pub fn group(&self) -> Option<EmotionGroup> {
        match self {
            Emotion::Happy | Emotion::Excited | Emotion::Peaceful | Emotion::Curious => {
                Some(EmotionGroup::Positive)
            }
            Emotion::Anxious | Emotion::Sad | Emotion::Fearful | Emotion::Confused => {
                Some(EmotionGroup::Negative)
            }
            Emotion::Neutral => Some(EmotionGroup::Neutral),
            Emotion::Other(_) => None,
        }
    }

    /// Whether the label belongs to the fixed vocabulary
    pub fn is_known(&self) -> bool {
        !matches!(self, Emotion::Other(_))
    }
}

impl From<&str> for Emotion {
    // Case-sensitive: "Happy" is not the same label as "happy"
    fn from(label: &str) -> Self {
        match label {
            "happy" => Emotion::Happy,
            "anxious" => Emotion::Anxious,
            "peaceful" => Emotion::Peaceful,
            "confused" => Emotion::Confused,
            "excited" => Emotion::Excited,
            "sad" => Emotion::Sad,
            "curious" => Emotion::Curious,
            "fearful" => Emotion::Fearful,
            "neutral" => Emotion::Neutral,
            other => Emotion::Other(other.to_string()),
        }
    }
}

impl From<String> for Emotion {
    fn from(label: String) -> Self {
        Emotion::from(label.as_str())
    }
}

impl From<Emotion> for String {
    fn from(emotion: Emotion) -> Self {
        emotion.as_str().to_string()
    }
}

impl FromStr for Emotion {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Emotion::from(s))
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
