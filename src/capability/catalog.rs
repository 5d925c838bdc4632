//! Canonical capability definitions.
//!
//! A handful of well-known capabilities carry full parameter and return
//! schemas. Every other vocabulary entry resolves to a schema-less
//! definition built from its label.

use super::{
    Capability, CapabilityType, ParameterKind, ParameterSpec, ReturnSpec,
    types::{self, CALENDAR_BOOK, EMAIL_SEND, TEXT_GENERATE, TEXT_SUMMARIZE, WEB_SEARCH},
};

fn email_send() -> Capability {
    Capability::new(EMAIL_SEND, "Send Email", "Send an email message to one or more recipients")
        .with_parameter(
            ParameterSpec::required("to", ParameterKind::String)
                .with_description("Recipient address"),
        )
        .with_parameter(
            ParameterSpec::required("subject", ParameterKind::String)
                .with_description("Subject line"),
        )
        .with_parameter(
            ParameterSpec::required("body", ParameterKind::String).with_description("Message body"),
        )
        .with_parameter(
            ParameterSpec::optional("cc", ParameterKind::Array)
                .with_description("Carbon-copy recipients"),
        )
        .with_parameter(
            ParameterSpec::optional("priority", ParameterKind::String)
                .with_allowed_values(["low", "normal", "high"])
                .with_default("normal"),
        )
        .with_returns(ReturnSpec::new(
            ParameterKind::Object,
            "Message identifier and delivery status",
        ))
        .with_example("send an email to alex about the quarterly report")
}

fn calendar_book() -> Capability {
    Capability::new(
        CALENDAR_BOOK,
        "Book Calendar Event",
        "Schedule a meeting or event on a calendar",
    )
    .with_parameter(
        ParameterSpec::required("title", ParameterKind::String).with_description("Event title"),
    )
    .with_parameter(
        ParameterSpec::required("start", ParameterKind::String)
            .with_description("Start time in RFC 3339 format"),
    )
    .with_parameter(
        ParameterSpec::optional("duration_minutes", ParameterKind::Integer)
            .with_default(30_i64)
            .with_range(Some(5.0), Some(1440.0)),
    )
    .with_parameter(
        ParameterSpec::optional("attendees", ParameterKind::Array)
            .with_description("Attendee addresses"),
    )
    .with_parameter(ParameterSpec::optional("location", ParameterKind::String))
    .with_returns(ReturnSpec::new(ParameterKind::Object, "Booked event details"))
    .with_example("book a meeting with the design team tomorrow at 10")
}

fn web_search() -> Capability {
    Capability::new(WEB_SEARCH, "Web Search", "Search the web and return ranked results")
        .with_parameter(
            ParameterSpec::required("query", ParameterKind::String).with_description("Search query"),
        )
        .with_parameter(
            ParameterSpec::optional("max_results", ParameterKind::Integer)
                .with_default(10_i64)
                .with_range(Some(1.0), Some(50.0)),
        )
        .with_returns(ReturnSpec::new(ParameterKind::Array, "Search results"))
        .with_example("search the web for rust async runtimes")
}

fn text_summarize() -> Capability {
    Capability::new(
        TEXT_SUMMARIZE,
        "Summarize Text",
        "Produce a concise summary of a longer text",
    )
    .with_parameter(
        ParameterSpec::required("text", ParameterKind::String).with_description("Text to summarise"),
    )
    .with_parameter(
        ParameterSpec::optional("max_length", ParameterKind::Integer)
            .with_default(200_i64)
            .with_range(Some(10.0), Some(5000.0)),
    )
    .with_parameter(
        ParameterSpec::optional("style", ParameterKind::String)
            .with_allowed_values(["brief", "detailed", "bullet"])
            .with_default("brief"),
    )
    .with_returns(ReturnSpec::new(ParameterKind::String, "Summary text"))
}

fn text_generate() -> Capability {
    Capability::new(TEXT_GENERATE, "Generate Text", "Generate text from a prompt")
        .with_parameter(
            ParameterSpec::required("prompt", ParameterKind::String)
                .with_description("Generation prompt"),
        )
        .with_parameter(
            ParameterSpec::optional("max_tokens", ParameterKind::Integer)
                .with_default(512_i64)
                .with_range(Some(1.0), Some(8192.0)),
        )
        .with_parameter(
            ParameterSpec::optional("temperature", ParameterKind::Number)
                .with_default(0.7)
                .with_range(Some(0.0), Some(2.0)),
        )
        .with_returns(ReturnSpec::new(ParameterKind::String, "Generated text"))
}

/// Returns every canonical definition.
#[must_use]
pub fn all_canonical() -> Vec<Capability> {
    vec![
        email_send(),
        calendar_book(),
        web_search(),
        text_summarize(),
        text_generate(),
    ]
}

/// Returns the canonical definition for `capability_type`, if one exists.
#[must_use]
pub fn canonical(capability_type: &CapabilityType) -> Option<Capability> {
    all_canonical()
        .into_iter()
        .find(|capability| capability.capability_type() == capability_type)
}

/// Resolves a definition for any vocabulary identifier.
///
/// Canonical definitions are preferred; other vocabulary entries produce a
/// schema-less definition named after their label. Unknown identifiers
/// return `None`.
#[must_use]
pub fn resolve(capability_type: &CapabilityType) -> Option<Capability> {
    canonical(capability_type).or_else(|| {
        types::lookup(capability_type).map(|entry| {
            Capability::new(
                entry.capability_type.clone(),
                entry.label,
                format!("{} ({} domain)", entry.label, entry.domain),
            )
        })
    })
}

/// Returns a human-readable name for `capability_type`.
///
/// Falls back to the raw identifier for types outside the vocabulary.
#[must_use]
pub fn display_name(capability_type: &CapabilityType) -> String {
    types::lookup(capability_type).map_or_else(
        || capability_type.as_str().to_owned(),
        |entry| entry.label.to_owned(),
    )
}
