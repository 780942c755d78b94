// The fixed topic vocabulary and its prompt template.
//
// Every score Magpie produces is keyed by one of these twelve topics.
// The set is closed: adding a topic means adding an enum variant here,
// which forces the prompt table and every scoring consumer to see it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One label from the fixed topic vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    Politics,
    Entertainment,
    Art,
    Music,
    Lifestyle,
    Academic,
    Comedy,
    Inspirational,
    News,
    Business,
    Tech,
    Sports,
}

/// Template used to turn a topic label into an embedding anchor.
const PROMPT_TEMPLATE: &str = "A tweet about";

impl Topic {
    /// Every topic, in display order.
    pub const ALL: [Topic; 12] = [
        Topic::Politics,
        Topic::Entertainment,
        Topic::Art,
        Topic::Music,
        Topic::Lifestyle,
        Topic::Academic,
        Topic::Comedy,
        Topic::Inspirational,
        Topic::News,
        Topic::Business,
        Topic::Tech,
        Topic::Sports,
    ];

    /// The human-readable label, as it appears in the prompt.
    pub fn name(&self) -> &'static str {
        match self {
            Topic::Politics => "Politics",
            Topic::Entertainment => "Entertainment",
            Topic::Art => "Art",
            Topic::Music => "Music",
            Topic::Lifestyle => "Lifestyle",
            Topic::Academic => "Academic",
            Topic::Comedy => "Comedy",
            Topic::Inspirational => "Inspirational",
            Topic::News => "News",
            Topic::Business => "Business",
            Topic::Tech => "Tech",
            Topic::Sports => "Sports",
        }
    }

    /// The templated prompt embedded as this topic's comparison anchor.
    pub fn prompt(&self) -> String {
        format!("{} {}", PROMPT_TEMPLATE, self.name())
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
