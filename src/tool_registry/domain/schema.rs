//! Structural input schemas for tools.
//!
//! An [`InputSchema`] describes a flat JSON object: named properties with a
//! primitive type, optional enum members, numeric bounds and defaults. It
//! renders to JSON-Schema for `tools/list` and validates `tools/call`
//! arguments before any handler runs.

use super::{SchemaViolation, ToolRegistryDomainError};
use serde_json::{Map, Value, json};

/// JSON type accepted by a schema property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    /// JSON string.
    String,
    /// Any JSON number.
    Number,
    /// JSON number without a fractional part.
    Integer,
    /// JSON boolean.
    Boolean,
}

impl SchemaType {
    /// Returns the JSON-Schema type keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        }
    }

    /// Returns `true` when `value` has this JSON type.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
        }
    }
}

/// Declaration of a single schema property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySchema {
    kind: SchemaType,
    description: Option<String>,
    enum_values: Option<Vec<Value>>,
    default: Option<Value>,
    format: Option<String>,
    minimum: Option<i32>,
    maximum: Option<i32>,
}

impl PropertySchema {
    /// Creates a property of the given type with no further constraints.
    #[must_use]
    pub const fn new(kind: SchemaType) -> Self {
        Self {
            kind,
            description: None,
            enum_values: None,
            default: None,
            format: None,
            minimum: None,
            maximum: None,
        }
    }

    /// Creates a string property.
    #[must_use]
    pub const fn string() -> Self {
        Self::new(SchemaType::String)
    }

    /// Creates an integer property.
    #[must_use]
    pub const fn integer() -> Self {
        Self::new(SchemaType::Integer)
    }

    /// Creates a number property.
    #[must_use]
    pub const fn number() -> Self {
        Self::new(SchemaType::Number)
    }

    /// Creates a boolean property.
    #[must_use]
    pub const fn boolean() -> Self {
        Self::new(SchemaType::Boolean)
    }

    /// Sets the human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Restricts the property to a fixed set of string members.
    #[must_use]
    pub fn with_enum<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(
            members
                .into_iter()
                .map(|member| Value::String(member.into()))
                .collect(),
        );
        self
    }

    /// Sets the value applied when the argument is absent.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Sets a JSON-Schema `format` hint such as `date`.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Sets inclusive numeric bounds.
    #[must_use]
    pub const fn with_range(mut self, minimum: Option<i32>, maximum: Option<i32>) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    /// Returns the property type.
    #[must_use]
    pub const fn kind(&self) -> SchemaType {
        self.kind
    }

    /// Returns the declared default, if any.
    #[must_use]
    pub const fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    fn check(&self, property: &str, value: &Value) -> Option<SchemaViolation> {
        if !self.kind.accepts(value) {
            return Some(SchemaViolation::TypeMismatch {
                property: property.to_owned(),
                expected: self.kind.as_str(),
            });
        }

        if let Some(members) = &self.enum_values {
            if !members.contains(value) {
                return Some(SchemaViolation::NotInEnum {
                    property: property.to_owned(),
                    allowed: Value::Array(members.clone()).to_string(),
                });
            }
        }

        if !self.within_range(value) {
            return Some(SchemaViolation::OutOfRange {
                property: property.to_owned(),
                value: value.clone(),
            });
        }

        None
    }

    fn within_range(&self, value: &Value) -> bool {
        if let Some(integer) = value.as_i64() {
            let above = self.minimum.is_none_or(|min| integer >= i64::from(min));
            let below = self.maximum.is_none_or(|max| integer <= i64::from(max));
            return above && below;
        }
        if let Some(float) = value.as_f64() {
            let above = self.minimum.is_none_or(|min| float >= f64::from(min));
            let below = self.maximum.is_none_or(|max| float <= f64::from(max));
            return above && below;
        }
        true
    }

    fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("type".to_owned(), Value::from(self.kind.as_str()));
        if let Some(description) = &self.description {
            object.insert("description".to_owned(), Value::from(description.as_str()));
        }
        if let Some(members) = &self.enum_values {
            object.insert("enum".to_owned(), Value::Array(members.clone()));
        }
        if let Some(default) = &self.default {
            object.insert("default".to_owned(), default.clone());
        }
        if let Some(format) = &self.format {
            object.insert("format".to_owned(), Value::from(format.as_str()));
        }
        if let Some(minimum) = self.minimum {
            object.insert("minimum".to_owned(), Value::from(minimum));
        }
        if let Some(maximum) = self.maximum {
            object.insert("maximum".to_owned(), Value::from(maximum));
        }
        Value::Object(object)
    }
}

/// Object schema describing a tool's arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSchema {
    properties: Vec<(String, PropertySchema)>,
    required: Vec<String>,
}

impl InputSchema {
    /// Creates an empty object schema that accepts `{}`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            properties: Vec::new(),
            required: Vec::new(),
        }
    }

    /// Declares a property that callers must supply.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError`] when the name is empty or already
    /// declared, or when the property constraints are inconsistent.
    pub fn with_required(
        mut self,
        name: impl Into<String>,
        property: PropertySchema,
    ) -> Result<Self, ToolRegistryDomainError> {
        let declared = self.declare(name.into(), property)?;
        self.required.push(declared);
        Ok(self)
    }

    /// Declares a property that callers may omit.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError`] when the name is empty or already
    /// declared, or when the property constraints are inconsistent.
    pub fn with_optional(
        mut self,
        name: impl Into<String>,
        property: PropertySchema,
    ) -> Result<Self, ToolRegistryDomainError> {
        self.declare(name.into(), property)?;
        Ok(self)
    }

    fn declare(
        &mut self,
        name: String,
        property: PropertySchema,
    ) -> Result<String, ToolRegistryDomainError> {
        let trimmed = name.trim().to_owned();
        if trimmed.is_empty() {
            return Err(ToolRegistryDomainError::EmptyPropertyName);
        }
        if self.property(&trimmed).is_some() {
            return Err(ToolRegistryDomainError::DuplicateProperty(trimmed));
        }
        if property.enum_values.as_ref().is_some_and(Vec::is_empty) {
            return Err(ToolRegistryDomainError::EmptyEnum(trimmed));
        }
        if let Some(default) = &property.default {
            if let Some(violation) = property.check(&trimmed, default) {
                return Err(ToolRegistryDomainError::InvalidDefault {
                    property: trimmed,
                    reason: violation.to_string(),
                });
            }
        }
        self.properties.push((trimmed.clone(), property));
        Ok(trimmed)
    }

    /// Looks up a declared property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertySchema> {
        self.properties
            .iter()
            .find(|(declared, _)| declared == name)
            .map(|(_, property)| property)
    }

    /// Returns the names of required properties in declaration order.
    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Renders the schema as a JSON-Schema object.
    ///
    /// Unknown properties are declared forbidden so that clients see the same
    /// contract [`Self::validate`] enforces.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let properties: Map<String, Value> = self
            .properties
            .iter()
            .map(|(name, property)| (name.clone(), property.to_json()))
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": self.required,
            "additionalProperties": false,
        })
    }

    /// Validates call arguments and fills in declared defaults.
    ///
    /// A `null` value counts as absent. Every violation is collected rather
    /// than stopping at the first one.
    ///
    /// # Errors
    ///
    /// Returns every [`SchemaViolation`] found in `arguments`.
    pub fn validate(
        &self,
        arguments: &Map<String, Value>,
    ) -> Result<Map<String, Value>, Vec<SchemaViolation>> {
        let mut violations = Vec::new();
        let mut accepted = Map::new();

        for name in arguments.keys() {
            if self.property(name).is_none() {
                violations.push(SchemaViolation::UnknownProperty(name.clone()));
            }
        }

        for (name, property) in &self.properties {
            match arguments.get(name).filter(|value| !value.is_null()) {
                Some(value) => match property.check(name, value) {
                    Some(violation) => violations.push(violation),
                    None => {
                        accepted.insert(name.clone(), value.clone());
                    }
                },
                None if self.required.contains(name) => {
                    violations.push(SchemaViolation::MissingRequired(name.clone()));
                }
                None => {
                    if let Some(default) = &property.default {
                        accepted.insert(name.clone(), default.clone());
                    }
                }
            }
        }

        if violations.is_empty() {
            Ok(accepted)
        } else {
            Err(violations)
        }
    }
}
