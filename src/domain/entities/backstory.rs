//! Backstory generated for a character draft

use std::fmt;

use serde::{Deserialize, Serialize};

/// Narrative tone requested from the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackstoryTone {
    Heroic,
    Grimdark,
    Whimsical,
    Noir,
    Epic,
    #[default]
    Custom,
}

impl fmt::Display for BackstoryTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Heroic => "heroic",
            Self::Grimdark => "grimdark",
            Self::Whimsical => "whimsical",
            Self::Noir => "noir",
            Self::Epic => "epic",
            Self::Custom => "custom",
        };
        f.write_str(label)
    }
}

/// Requested length of the prose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackstoryLength {
    Short,
    #[default]
    Standard,
    Long,
}

/// Knobs the user sets before asking for a backstory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackstoryOptions {
    pub tone: BackstoryTone,
    pub length: BackstoryLength,
    pub include_hooks: bool,
    pub custom_inspiration: String,
}

impl Default for BackstoryOptions {
    fn default() -> Self {
        Self {
            tone: BackstoryTone::Custom,
            length: BackstoryLength::Standard,
            include_hooks: true,
            custom_inspiration: String::new(),
        }
    }
}

impl BackstoryOptions {
    /// Options used by the quick NPC shortcut
    pub fn quick() -> Self {
        Self {
            tone: BackstoryTone::Heroic,
            length: BackstoryLength::Short,
            include_hooks: true,
            custom_inspiration: String::new(),
        }
    }

    /// Inspiration is only sent for the custom tone, and only when non-blank
    pub fn effective_inspiration(&self) -> Option<String> {
        if self.tone != BackstoryTone::Custom {
            return None;
        }
        let trimmed = self.custom_inspiration.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Generated backstory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackstoryResult {
    pub summary: String,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub ideals: Vec<String>,
    #[serde(default)]
    pub bonds: Vec<String>,
    #[serde(default)]
    pub flaws: Vec<String>,
    #[serde(default)]
    pub hooks: Vec<String>,
    pub prose_markdown: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspiration_only_for_custom_tone() {
        let mut options = BackstoryOptions {
            custom_inspiration: "  raised by wolves ".to_string(),
            ..BackstoryOptions::default()
        };
        assert_eq!(
            options.effective_inspiration().as_deref(),
            Some("raised by wolves")
        );

        options.tone = BackstoryTone::Noir;
        assert_eq!(options.effective_inspiration(), None);

        options.tone = BackstoryTone::Custom;
        options.custom_inspiration = "   ".to_string();
        assert_eq!(options.effective_inspiration(), None);
    }

    #[test]
    fn test_tone_wire_names() {
        assert_eq!(serde_json::to_string(&BackstoryTone::Grimdark).unwrap(), "\"grimdark\"");
        assert_eq!(serde_json::to_string(&BackstoryLength::Short).unwrap(), "\"short\"");
    }
}
