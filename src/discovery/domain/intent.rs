//! Keyword-based intent resolution.

use crate::capability::{Capability, CapabilityType, types};
use std::collections::HashSet;

struct IntentRule {
    keywords: &'static [&'static str],
    capabilities: &'static [CapabilityType],
}

const RULES: &[IntentRule] = &[
    IntentRule {
        keywords: &["email", "mail", "send", "message"],
        capabilities: &[
            types::EMAIL_SEND,
            types::EMAIL_READ,
            types::EMAIL_SEARCH,
            types::MESSAGE_SEND,
        ],
    },
    IntentRule {
        keywords: &["calendar", "schedule", "meeting", "book"],
        capabilities: &[
            types::CALENDAR_BOOK,
            types::CALENDAR_LIST,
            types::CALENDAR_CANCEL,
        ],
    },
    IntentRule {
        keywords: &["search", "web", "google", "look up", "browse"],
        capabilities: &[types::WEB_SEARCH, types::WEB_FETCH, types::WEB_SCRAPE],
    },
    IntentRule {
        keywords: &["file", "document", "folder"],
        capabilities: &[types::FILE_READ, types::FILE_WRITE, types::FILE_SEARCH],
    },
    IntentRule {
        keywords: &["task", "todo", "remind"],
        capabilities: &[
            types::TASK_CREATE,
            types::TASK_UPDATE,
            types::TASK_LIST,
            types::TASK_COMPLETE,
            types::REMINDER_SET,
        ],
    },
    IntentRule {
        keywords: &["analyze", "analyse", "summarize", "summarise", "summary", "sentiment"],
        capabilities: &[
            types::TEXT_SUMMARIZE,
            types::TEXT_ANALYZE,
            types::SENTIMENT_ANALYZE,
            types::DATA_ANALYZE,
        ],
    },
    IntentRule {
        keywords: &["write", "generate", "draft", "compose"],
        capabilities: &[
            types::TEXT_GENERATE,
            types::CODE_GENERATE,
            types::IMAGE_GENERATE,
        ],
    },
    IntentRule {
        keywords: &["translate", "translation"],
        capabilities: &[types::TEXT_TRANSLATE],
    },
    IntentRule {
        keywords: &["balance", "payment", "budget", "transaction", "bank"],
        capabilities: &[
            types::FINANCE_BALANCE,
            types::FINANCE_TRANSACTIONS,
            types::FINANCE_PAYMENT,
            types::FINANCE_BUDGET,
        ],
    },
    IntentRule {
        keywords: &["light", "thermostat", "temperature", "lock", "scene"],
        capabilities: &[
            types::HOME_LIGHTS,
            types::HOME_THERMOSTAT,
            types::HOME_LOCK,
            types::HOME_SCENE,
        ],
    },
];

const MIN_OVERLAP_WORD_CHARS: usize = 4;

/// Relevance at or below this value is discarded.
pub const RELEVANCE_FLOOR: f64 = 0.1;

/// Lower-cased intent with its keyword-derived candidate capability set.
#[derive(Debug, Clone)]
pub struct Intent {
    text: String,
    candidates: HashSet<CapabilityType>,
}

impl Intent {
    /// Parses free text into an intent.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim().to_lowercase();
        let candidates = RULES
            .iter()
            .filter(|rule| rule.keywords.iter().any(|keyword| text.contains(keyword)))
            .flat_map(|rule| rule.capabilities.iter().cloned())
            .collect();
        Self { text, candidates }
    }

    /// Returns the normalised intent text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether keyword matching selected the capability type.
    #[must_use]
    pub fn is_candidate(&self, capability_type: &CapabilityType) -> bool {
        self.candidates.contains(capability_type)
    }

    /// Relevance of `capability` to this intent in `[0, 1]`.
    ///
    /// Keyword candidates score `1.0`. Anything else scores half the share
    /// of intent words (longer than three characters) that appear in the
    /// capability's name or description.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "word-overlap ratio"
    )]
    pub fn relevance(&self, capability: &Capability) -> f64 {
        if self.is_candidate(capability.capability_type()) {
            return 1.0;
        }
        let words: Vec<&str> = self.text.split_whitespace().collect();
        if words.is_empty() {
            return 0.0;
        }
        let haystack = format!(
            "{} {}",
            capability.name().to_lowercase(),
            capability.description().to_lowercase()
        );
        let found = words
            .iter()
            .filter(|word| word.chars().count() >= MIN_OVERLAP_WORD_CHARS)
            .filter(|word| haystack.contains(*word))
            .count();
        found as f64 / words.len() as f64 * 0.5
    }
}
