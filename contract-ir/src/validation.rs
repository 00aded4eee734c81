//! Validation rule model.
//!
//! Constraints extracted from schemas travel with the type references they
//! apply to. The bag is flat; each field belongs to one of three partitions
//! (string, number, array) matching the kind of value it constrains.

use serde::{Deserialize, Serialize};

/// Named constraint carried by a [`ValidationRules`] bag.
///
/// Capability declarations and usage analysis are keyed by this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationKind {
    /// Minimum string length
    MinLength,
    /// Maximum string length
    MaxLength,
    /// Email format
    Email,
    /// URL format
    Url,
    /// UUID format
    Uuid,
    /// Regex pattern
    Regex,
    /// Minimum numeric value
    Min,
    /// Maximum numeric value
    Max,
    /// Whole-number constraint
    Int,
    /// Strictly positive
    Positive,
    /// Strictly negative
    Negative,
    /// Minimum item count
    MinItems,
    /// Maximum item count
    MaxItems,
}

impl ValidationKind {
    /// All validation kinds, in declaration order.
    pub const ALL: [ValidationKind; 13] = [
        ValidationKind::MinLength,
        ValidationKind::MaxLength,
        ValidationKind::Email,
        ValidationKind::Url,
        ValidationKind::Uuid,
        ValidationKind::Regex,
        ValidationKind::Min,
        ValidationKind::Max,
        ValidationKind::Int,
        ValidationKind::Positive,
        ValidationKind::Negative,
        ValidationKind::MinItems,
        ValidationKind::MaxItems,
    ];

    /// The camelCase rule name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationKind::MinLength => "minLength",
            ValidationKind::MaxLength => "maxLength",
            ValidationKind::Email => "email",
            ValidationKind::Url => "url",
            ValidationKind::Uuid => "uuid",
            ValidationKind::Regex => "regex",
            ValidationKind::Min => "min",
            ValidationKind::Max => "max",
            ValidationKind::Int => "int",
            ValidationKind::Positive => "positive",
            ValidationKind::Negative => "negative",
            ValidationKind::MinItems => "minItems",
            ValidationKind::MaxItems => "maxItems",
        }
    }

    /// Check if this constraint applies to string values.
    pub fn is_string_validation(&self) -> bool {
        matches!(
            self,
            ValidationKind::MinLength
                | ValidationKind::MaxLength
                | ValidationKind::Email
                | ValidationKind::Url
                | ValidationKind::Uuid
                | ValidationKind::Regex
        )
    }

    /// Check if this constraint applies to numeric values.
    pub fn is_number_validation(&self) -> bool {
        matches!(
            self,
            ValidationKind::Min
                | ValidationKind::Max
                | ValidationKind::Int
                | ValidationKind::Positive
                | ValidationKind::Negative
        )
    }

    /// Check if this constraint applies to arrays.
    pub fn is_array_validation(&self) -> bool {
        matches!(self, ValidationKind::MinItems | ValidationKind::MaxItems)
    }
}

impl std::fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat bag of optional constraints attached to a type reference or property.
///
/// A reference may carry validation at any nesting depth: an array's rules
/// hold item-count bounds while its element type holds the element's own
/// rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    /// Minimum string length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    /// Maximum string length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    /// Email format flag
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub email: bool,

    /// URL format flag
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub url: bool,

    /// UUID format flag
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub uuid: bool,

    /// Regex pattern
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,

    /// Minimum numeric value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    /// Maximum numeric value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Whole-number flag
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub int: bool,

    /// Strictly positive flag
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub positive: bool,

    /// Strictly negative flag
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub negative: bool,

    /// Minimum item count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,

    /// Maximum item count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

impl ValidationRules {
    /// Create an empty rule bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum string length.
    pub fn with_min_length(mut self, value: usize) -> Self {
        self.min_length = Some(value);
        self
    }

    /// Set the maximum string length.
    pub fn with_max_length(mut self, value: usize) -> Self {
        self.max_length = Some(value);
        self
    }

    /// Require email format.
    pub fn with_email(mut self) -> Self {
        self.email = true;
        self
    }

    /// Require URL format.
    pub fn with_url(mut self) -> Self {
        self.url = true;
        self
    }

    /// Require UUID format.
    pub fn with_uuid(mut self) -> Self {
        self.uuid = true;
        self
    }

    /// Require a regex pattern match.
    pub fn with_regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex = Some(pattern.into());
        self
    }

    /// Set the minimum numeric value.
    pub fn with_min(mut self, value: f64) -> Self {
        self.min = Some(value);
        self
    }

    /// Set the maximum numeric value.
    pub fn with_max(mut self, value: f64) -> Self {
        self.max = Some(value);
        self
    }

    /// Require a whole number.
    pub fn with_int(mut self) -> Self {
        self.int = true;
        self
    }

    /// Require a strictly positive number.
    pub fn with_positive(mut self) -> Self {
        self.positive = true;
        self
    }

    /// Require a strictly negative number.
    pub fn with_negative(mut self) -> Self {
        self.negative = true;
        self
    }

    /// Set the minimum item count.
    pub fn with_min_items(mut self, value: usize) -> Self {
        self.min_items = Some(value);
        self
    }

    /// Set the maximum item count.
    pub fn with_max_items(mut self, value: usize) -> Self {
        self.max_items = Some(value);
        self
    }

    /// Check if no constraint is set.
    pub fn is_empty(&self) -> bool {
        self.kinds().is_empty()
    }

    /// The constraints present in this bag, in declaration order.
    pub fn kinds(&self) -> Vec<ValidationKind> {
        let mut kinds = Vec::new();
        if self.min_length.is_some() {
            kinds.push(ValidationKind::MinLength);
        }
        if self.max_length.is_some() {
            kinds.push(ValidationKind::MaxLength);
        }
        if self.email {
            kinds.push(ValidationKind::Email);
        }
        if self.url {
            kinds.push(ValidationKind::Url);
        }
        if self.uuid {
            kinds.push(ValidationKind::Uuid);
        }
        if self.regex.is_some() {
            kinds.push(ValidationKind::Regex);
        }
        if self.min.is_some() {
            kinds.push(ValidationKind::Min);
        }
        if self.max.is_some() {
            kinds.push(ValidationKind::Max);
        }
        if self.int {
            kinds.push(ValidationKind::Int);
        }
        if self.positive {
            kinds.push(ValidationKind::Positive);
        }
        if self.negative {
            kinds.push(ValidationKind::Negative);
        }
        if self.min_items.is_some() {
            kinds.push(ValidationKind::MinItems);
        }
        if self.max_items.is_some() {
            kinds.push(ValidationKind::MaxItems);
        }
        kinds
    }
}
