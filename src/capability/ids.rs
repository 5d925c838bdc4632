//! Capability type identifier.

use super::{CapabilityDomain, CapabilityError, types};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Stable string identifier for a capability, such as `email.send`.
///
/// Well-known identifiers are available as constants in
/// [`types`](super::types). Custom identifiers are created with
/// [`CapabilityType::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityType(Cow<'static, str>);

impl CapabilityType {
    /// Creates a validated capability type.
    ///
    /// The input is trimmed. Internal whitespace is rejected so identifiers
    /// stay usable as index keys.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::EmptyCapabilityType`] when the value is
    /// blank, or [`CapabilityError::InvalidCapabilityType`] when it contains
    /// whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, CapabilityError> {
        let raw = value.into();
        let normalized = raw.trim();

        if normalized.is_empty() {
            return Err(CapabilityError::EmptyCapabilityType);
        }
        if normalized.chars().any(char::is_whitespace) {
            return Err(CapabilityError::InvalidCapabilityType(raw));
        }

        Ok(Self(Cow::Owned(normalized.to_owned())))
    }

    /// Creates a capability type from a static identifier.
    ///
    /// Used for the built-in vocabulary constants.
    #[must_use]
    pub const fn from_static(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the domain this capability belongs to, when it is part of the
    /// built-in vocabulary.
    #[must_use]
    pub fn domain(&self) -> Option<CapabilityDomain> {
        types::lookup(self).map(|entry| entry.domain)
    }
}

impl AsRef<str> for CapabilityType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CapabilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for CapabilityType {
    type Error = CapabilityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
