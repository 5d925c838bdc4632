//! Built-in capability vocabulary grouped by domain.

use super::CapabilityType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Functional grouping of capability identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityDomain {
    /// Email, messaging and notifications.
    Communication,
    /// Files and structured data.
    Data,
    /// Web search and retrieval.
    Web,
    /// Summarisation and analysis.
    Analysis,
    /// Text, image and code generation.
    Generation,
    /// Tasks, reminders and calendars.
    Task,
    /// Accounts, payments and budgets.
    Finance,
    /// Connected-home devices.
    SmartHome,
    /// Delegation and orchestration of other agents.
    Meta,
}

impl CapabilityDomain {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Communication => "communication",
            Self::Data => "data",
            Self::Web => "web",
            Self::Analysis => "analysis",
            Self::Generation => "generation",
            Self::Task => "task",
            Self::Finance => "finance",
            Self::SmartHome => "smart_home",
            Self::Meta => "meta",
        }
    }
}

impl fmt::Display for CapabilityDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Communication
/// Send an email.
pub const EMAIL_SEND: CapabilityType = CapabilityType::from_static("email.send");
/// Read emails from a mailbox.
pub const EMAIL_READ: CapabilityType = CapabilityType::from_static("email.read");
/// Search a mailbox.
pub const EMAIL_SEARCH: CapabilityType = CapabilityType::from_static("email.search");
/// Send a chat message.
pub const MESSAGE_SEND: CapabilityType = CapabilityType::from_static("message.send");
/// Send an SMS.
pub const SMS_SEND: CapabilityType = CapabilityType::from_static("sms.send");
/// Push a notification.
pub const NOTIFICATION_SEND: CapabilityType = CapabilityType::from_static("notification.send");

// Data
/// Read a file.
pub const FILE_READ: CapabilityType = CapabilityType::from_static("file.read");
/// Write a file.
pub const FILE_WRITE: CapabilityType = CapabilityType::from_static("file.write");
/// Search files.
pub const FILE_SEARCH: CapabilityType = CapabilityType::from_static("file.search");
/// Query a structured data source.
pub const DATA_QUERY: CapabilityType = CapabilityType::from_static("data.query");
/// Transform structured data.
pub const DATA_TRANSFORM: CapabilityType = CapabilityType::from_static("data.transform");

// Web
/// Search the web.
pub const WEB_SEARCH: CapabilityType = CapabilityType::from_static("web.search");
/// Fetch a web page.
pub const WEB_FETCH: CapabilityType = CapabilityType::from_static("web.fetch");
/// Extract structured content from a web page.
pub const WEB_SCRAPE: CapabilityType = CapabilityType::from_static("web.scrape");

// Analysis
/// Summarise text.
pub const TEXT_SUMMARIZE: CapabilityType = CapabilityType::from_static("text.summarize");
/// Analyse text.
pub const TEXT_ANALYZE: CapabilityType = CapabilityType::from_static("text.analyze");
/// Classify sentiment.
pub const SENTIMENT_ANALYZE: CapabilityType = CapabilityType::from_static("sentiment.analyze");
/// Analyse a dataset.
pub const DATA_ANALYZE: CapabilityType = CapabilityType::from_static("data.analyze");

// Generation
/// Generate text.
pub const TEXT_GENERATE: CapabilityType = CapabilityType::from_static("text.generate");
/// Translate text.
pub const TEXT_TRANSLATE: CapabilityType = CapabilityType::from_static("text.translate");
/// Generate an image.
pub const IMAGE_GENERATE: CapabilityType = CapabilityType::from_static("image.generate");
/// Generate source code.
pub const CODE_GENERATE: CapabilityType = CapabilityType::from_static("code.generate");

// Task
/// Create a task.
pub const TASK_CREATE: CapabilityType = CapabilityType::from_static("task.create");
/// Update a task.
pub const TASK_UPDATE: CapabilityType = CapabilityType::from_static("task.update");
/// List tasks.
pub const TASK_LIST: CapabilityType = CapabilityType::from_static("task.list");
/// Complete a task.
pub const TASK_COMPLETE: CapabilityType = CapabilityType::from_static("task.complete");
/// Book a calendar event.
pub const CALENDAR_BOOK: CapabilityType = CapabilityType::from_static("calendar.book");
/// List calendar events.
pub const CALENDAR_LIST: CapabilityType = CapabilityType::from_static("calendar.list");
/// Cancel a calendar event.
pub const CALENDAR_CANCEL: CapabilityType = CapabilityType::from_static("calendar.cancel");
/// Set a reminder.
pub const REMINDER_SET: CapabilityType = CapabilityType::from_static("reminder.set");

// Finance
/// Read an account balance.
pub const FINANCE_BALANCE: CapabilityType = CapabilityType::from_static("finance.balance");
/// List account transactions.
pub const FINANCE_TRANSACTIONS: CapabilityType =
    CapabilityType::from_static("finance.transactions");
/// Make a payment.
pub const FINANCE_PAYMENT: CapabilityType = CapabilityType::from_static("finance.payment");
/// Track a budget.
pub const FINANCE_BUDGET: CapabilityType = CapabilityType::from_static("finance.budget");

// Smart home
/// Control lights.
pub const HOME_LIGHTS: CapabilityType = CapabilityType::from_static("home.lights");
/// Control a thermostat.
pub const HOME_THERMOSTAT: CapabilityType = CapabilityType::from_static("home.thermostat");
/// Control a door lock.
pub const HOME_LOCK: CapabilityType = CapabilityType::from_static("home.lock");
/// Activate a scene.
pub const HOME_SCENE: CapabilityType = CapabilityType::from_static("home.scene");

// Meta
/// Delegate work to another agent.
pub const AGENT_DELEGATE: CapabilityType = CapabilityType::from_static("agent.delegate");
/// Run a multi-step workflow.
pub const WORKFLOW_RUN: CapabilityType = CapabilityType::from_static("workflow.run");
/// Discover capabilities offered by other agents.
pub const CAPABILITY_DISCOVER: CapabilityType =
    CapabilityType::from_static("capability.discover");

/// A vocabulary entry: identifier, domain and human-readable label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyEntry {
    /// Capability identifier.
    pub capability_type: CapabilityType,
    /// Domain the identifier belongs to.
    pub domain: CapabilityDomain,
    /// Short human-readable label.
    pub label: &'static str,
}

const fn entry(
    capability_type: CapabilityType,
    domain: CapabilityDomain,
    label: &'static str,
) -> VocabularyEntry {
    VocabularyEntry {
        capability_type,
        domain,
        label,
    }
}

const VOCABULARY: &[VocabularyEntry] = &[
    entry(EMAIL_SEND, CapabilityDomain::Communication, "Send Email"),
    entry(EMAIL_READ, CapabilityDomain::Communication, "Read Email"),
    entry(EMAIL_SEARCH, CapabilityDomain::Communication, "Search Email"),
    entry(MESSAGE_SEND, CapabilityDomain::Communication, "Send Message"),
    entry(SMS_SEND, CapabilityDomain::Communication, "Send SMS"),
    entry(NOTIFICATION_SEND, CapabilityDomain::Communication, "Send Notification"),
    entry(FILE_READ, CapabilityDomain::Data, "Read File"),
    entry(FILE_WRITE, CapabilityDomain::Data, "Write File"),
    entry(FILE_SEARCH, CapabilityDomain::Data, "Search Files"),
    entry(DATA_QUERY, CapabilityDomain::Data, "Query Data"),
    entry(DATA_TRANSFORM, CapabilityDomain::Data, "Transform Data"),
    entry(WEB_SEARCH, CapabilityDomain::Web, "Web Search"),
    entry(WEB_FETCH, CapabilityDomain::Web, "Fetch Web Page"),
    entry(WEB_SCRAPE, CapabilityDomain::Web, "Scrape Web Page"),
    entry(TEXT_SUMMARIZE, CapabilityDomain::Analysis, "Summarize Text"),
    entry(TEXT_ANALYZE, CapabilityDomain::Analysis, "Analyze Text"),
    entry(SENTIMENT_ANALYZE, CapabilityDomain::Analysis, "Analyze Sentiment"),
    entry(DATA_ANALYZE, CapabilityDomain::Analysis, "Analyze Data"),
    entry(TEXT_GENERATE, CapabilityDomain::Generation, "Generate Text"),
    entry(TEXT_TRANSLATE, CapabilityDomain::Generation, "Translate Text"),
    entry(IMAGE_GENERATE, CapabilityDomain::Generation, "Generate Image"),
    entry(CODE_GENERATE, CapabilityDomain::Generation, "Generate Code"),
    entry(TASK_CREATE, CapabilityDomain::Task, "Create Task"),
    entry(TASK_UPDATE, CapabilityDomain::Task, "Update Task"),
    entry(TASK_LIST, CapabilityDomain::Task, "List Tasks"),
    entry(TASK_COMPLETE, CapabilityDomain::Task, "Complete Task"),
    entry(CALENDAR_BOOK, CapabilityDomain::Task, "Book Calendar Event"),
    entry(CALENDAR_LIST, CapabilityDomain::Task, "List Calendar Events"),
    entry(CALENDAR_CANCEL, CapabilityDomain::Task, "Cancel Calendar Event"),
    entry(REMINDER_SET, CapabilityDomain::Task, "Set Reminder"),
    entry(FINANCE_BALANCE, CapabilityDomain::Finance, "Check Balance"),
    entry(FINANCE_TRANSACTIONS, CapabilityDomain::Finance, "List Transactions"),
    entry(FINANCE_PAYMENT, CapabilityDomain::Finance, "Make Payment"),
    entry(FINANCE_BUDGET, CapabilityDomain::Finance, "Track Budget"),
    entry(HOME_LIGHTS, CapabilityDomain::SmartHome, "Control Lights"),
    entry(HOME_THERMOSTAT, CapabilityDomain::SmartHome, "Control Thermostat"),
    entry(HOME_LOCK, CapabilityDomain::SmartHome, "Control Lock"),
    entry(HOME_SCENE, CapabilityDomain::SmartHome, "Activate Scene"),
    entry(AGENT_DELEGATE, CapabilityDomain::Meta, "Delegate to Agent"),
    entry(WORKFLOW_RUN, CapabilityDomain::Meta, "Run Workflow"),
    entry(CAPABILITY_DISCOVER, CapabilityDomain::Meta, "Discover Capabilities"),
];

/// Returns every identifier in the built-in vocabulary.
#[must_use]
pub fn all() -> &'static [VocabularyEntry] {
    VOCABULARY
}

/// Returns the identifiers belonging to `domain`.
#[must_use]
pub fn in_domain(domain: CapabilityDomain) -> Vec<CapabilityType> {
    VOCABULARY
        .iter()
        .filter(|e| e.domain == domain)
        .map(|e| e.capability_type.clone())
        .collect()
}

/// Looks up the vocabulary entry for `capability_type`.
#[must_use]
pub fn lookup(capability_type: &CapabilityType) -> Option<&'static VocabularyEntry> {
    VOCABULARY
        .iter()
        .find(|e| e.capability_type == *capability_type)
}
