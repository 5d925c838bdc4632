//! First-party agents seeded at startup.

use super::RegisterAgentRequest;
use crate::agent_registry::domain::{AgentKind, BUILTIN_TRUST_SCORE};
use crate::capability::{CapabilityType, catalog, types};

struct BuiltinAgent {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    capabilities: &'static [CapabilityType],
}

const BUILTIN_AGENTS: &[BuiltinAgent] = &[
    BuiltinAgent {
        id: "builtin.email",
        name: "Email",
        description: "Sends, reads and searches email",
        capabilities: &[types::EMAIL_SEND, types::EMAIL_READ, types::EMAIL_SEARCH],
    },
    BuiltinAgent {
        id: "builtin.calendar",
        name: "Calendar",
        description: "Books, lists and cancels calendar events",
        capabilities: &[
            types::CALENDAR_BOOK,
            types::CALENDAR_LIST,
            types::CALENDAR_CANCEL,
        ],
    },
    BuiltinAgent {
        id: "builtin.web",
        name: "Web",
        description: "Searches, fetches and scrapes web content",
        capabilities: &[types::WEB_SEARCH, types::WEB_FETCH, types::WEB_SCRAPE],
    },
    BuiltinAgent {
        id: "builtin.text",
        name: "Text",
        description: "Generates, summarises, translates and analyses text",
        capabilities: &[
            types::TEXT_GENERATE,
            types::TEXT_SUMMARIZE,
            types::TEXT_TRANSLATE,
            types::TEXT_ANALYZE,
        ],
    },
    BuiltinAgent {
        id: "builtin.file",
        name: "Files",
        description: "Reads, writes and searches files",
        capabilities: &[types::FILE_READ, types::FILE_WRITE, types::FILE_SEARCH],
    },
    BuiltinAgent {
        id: "builtin.task",
        name: "Tasks",
        description: "Manages tasks and reminders",
        capabilities: &[
            types::TASK_CREATE,
            types::TASK_UPDATE,
            types::TASK_LIST,
            types::TASK_COMPLETE,
            types::REMINDER_SET,
        ],
    },
];

/// Returns registration requests for every built-in agent.
#[must_use]
pub fn builtin_agents() -> Vec<RegisterAgentRequest> {
    BUILTIN_AGENTS
        .iter()
        .map(|agent| {
            RegisterAgentRequest::new(agent.id, AgentKind::Builtin)
                .with_name(agent.name)
                .with_description(agent.description)
                .with_trust_score(BUILTIN_TRUST_SCORE)
                .with_capabilities(agent.capabilities.iter().filter_map(catalog::resolve))
        })
        .collect()
}
