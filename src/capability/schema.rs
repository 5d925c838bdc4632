//! Capability definitions and parameter schemas.

use super::{CapabilityType, ParameterError, ParameterValue, Parameters};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared kind of a parameter or return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// UTF-8 string.
    String,
    /// Signed integer.
    Integer,
    /// Any number; integers are accepted.
    Number,
    /// Boolean flag.
    Boolean,
    /// Ordered list.
    Array,
    /// String-keyed map.
    Object,
    /// Any value.
    Any,
}

impl ParameterKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Any => "any",
        }
    }

    /// Returns whether a value of this kind may hold `value`.
    #[must_use]
    pub const fn accepts(self, value: &ParameterValue) -> bool {
        match (self, value) {
            (Self::Any, _)
            | (Self::String, ParameterValue::String(_))
            | (Self::Integer, ParameterValue::Integer(_))
            | (Self::Number, ParameterValue::Integer(_) | ParameterValue::Number(_))
            | (Self::Boolean, ParameterValue::Bool(_))
            | (Self::Array, ParameterValue::Array(_))
            | (Self::Object, ParameterValue::Object(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive numeric bounds for a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ValueRange {
    /// Lower bound, if any.
    pub min: Option<f64>,
    /// Upper bound, if any.
    pub max: Option<f64>,
}

impl ValueRange {
    /// Returns whether `value` lies within the bounds.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Schema entry for a single capability parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    name: String,
    kind: ParameterKind,
    #[serde(default)]
    description: String,
    required: bool,
    #[serde(default)]
    default: Option<ParameterValue>,
    #[serde(default)]
    allowed_values: Vec<ParameterValue>,
    #[serde(default)]
    range: Option<ValueRange>,
}

impl ParameterSpec {
    /// Creates a required parameter spec.
    #[must_use]
    pub fn required(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self::build(name, kind, true)
    }

    /// Creates an optional parameter spec.
    #[must_use]
    pub fn optional(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self::build(name, kind, false)
    }

    fn build(name: impl Into<String>, kind: ParameterKind, required: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            description: String::new(),
            required,
            default: None,
            allowed_values: Vec::new(),
            range: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the value used when the parameter is omitted.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<ParameterValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Restricts the parameter to an enumerated set of values.
    #[must_use]
    pub fn with_allowed_values<V: Into<ParameterValue>>(
        mut self,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.allowed_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Restricts numeric values to an inclusive range.
    #[must_use]
    pub const fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.range = Some(ValueRange { min, max });
        self
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared kind.
    #[must_use]
    pub const fn kind(&self) -> ParameterKind {
        self.kind
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns whether the parameter is required.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the default value, if declared.
    #[must_use]
    pub const fn default_value(&self) -> Option<&ParameterValue> {
        self.default.as_ref()
    }

    /// Returns the enumerated allowed values; empty means unrestricted.
    #[must_use]
    pub fn allowed_values(&self) -> &[ParameterValue] {
        &self.allowed_values
    }

    /// Returns the numeric range, if declared.
    #[must_use]
    pub const fn range(&self) -> Option<ValueRange> {
        self.range
    }

    /// Checks a supplied value against this spec.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::WrongKind`], [`ParameterError::NotAllowed`],
    /// or [`ParameterError::OutOfRange`] when the value violates the spec.
    pub fn check(&self, value: &ParameterValue) -> Result<(), ParameterError> {
        if !self.kind.accepts(value) {
            return Err(ParameterError::WrongKind {
                parameter: self.name.clone(),
                expected: self.kind,
                actual: value.kind(),
            });
        }

        if !self.allowed_values.is_empty() && !self.allowed_values.contains(value) {
            return Err(ParameterError::NotAllowed {
                parameter: self.name.clone(),
                value: value.to_string(),
            });
        }

        if let (Some(range), Some(number)) = (self.range, value.as_f64())
            && !range.contains(number)
        {
            return Err(ParameterError::OutOfRange {
                parameter: self.name.clone(),
                value: number,
            });
        }

        Ok(())
    }
}

/// Schema of a capability's return value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnSpec {
    /// Kind of the returned payload.
    pub kind: ParameterKind,
    /// Description of the returned payload.
    pub description: String,
}

impl ReturnSpec {
    /// Creates a return spec.
    #[must_use]
    pub fn new(kind: ParameterKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
        }
    }
}

/// A named, schema-described unit of functionality an agent can perform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    #[serde(rename = "type")]
    capability_type: CapabilityType,
    name: String,
    #[serde(default)]
    description: String,
    version: String,
    #[serde(default)]
    parameters: Vec<ParameterSpec>,
    #[serde(default)]
    returns: Option<ReturnSpec>,
    #[serde(default)]
    examples: Vec<String>,
    #[serde(default)]
    constraints: Vec<String>,
}

impl Capability {
    /// Creates a capability with version `1.0.0` and no parameters.
    #[must_use]
    pub fn new(
        capability_type: CapabilityType,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            capability_type,
            name: name.into(),
            description: description.into(),
            version: "1.0.0".to_owned(),
            parameters: Vec::new(),
            returns: None,
            examples: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Sets the version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Appends a parameter spec.
    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the return spec.
    #[must_use]
    pub fn with_returns(mut self, returns: ReturnSpec) -> Self {
        self.returns = Some(returns);
        self
    }

    /// Appends a usage example.
    #[must_use]
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }

    /// Appends a free-form constraint.
    #[must_use]
    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraints.push(constraint.into());
        self
    }

    /// Returns the capability type.
    #[must_use]
    pub const fn capability_type(&self) -> &CapabilityType {
        &self.capability_type
    }

    /// Returns the human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the ordered parameter specs.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    /// Returns the return spec, if declared.
    #[must_use]
    pub const fn returns(&self) -> Option<&ReturnSpec> {
        self.returns.as_ref()
    }

    /// Returns the usage examples.
    #[must_use]
    pub fn examples(&self) -> &[String] {
        &self.examples
    }

    /// Returns the constraints.
    #[must_use]
    pub fn constraints(&self) -> &[String] {
        &self.constraints
    }

    /// Validates `parameters` against the declared specs.
    ///
    /// Omitted or null parameters receive their declared default. Parameters
    /// without a spec pass through unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::Missing`] when a required parameter has no
    /// value and no default, or the error from [`ParameterSpec::check`] when
    /// a supplied value violates its spec.
    pub fn validate(&self, parameters: &Parameters) -> Result<Parameters, ParameterError> {
        let mut resolved = parameters.clone();
        for spec in &self.parameters {
            match parameters.get(spec.name()).filter(|value| !value.is_null()) {
                Some(value) => spec.check(value)?,
                None => match spec.default_value() {
                    Some(default) => resolved.insert(spec.name(), default.clone()),
                    None if spec.is_required() => {
                        return Err(ParameterError::Missing {
                            parameter: spec.name().to_owned(),
                        });
                    }
                    None => {}
                },
            }
        }
        Ok(resolved)
    }
}
