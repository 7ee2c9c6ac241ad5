//! Field-level validation failures collected by [`Configuration`](super::Configuration).

use std::fmt;

/// Why a configuration attribute was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// Value is not a member of the attribute's enumeration.
    InvalidEnumValue,
    /// Not a Unix timestamp (or, for departures, the literal `now`).
    InvalidTimeValue,
    /// Timeouts must be positive numbers of seconds.
    InvalidTimeout,
    InvalidNumber,
    InvalidBoolean,
    /// Private key is not URL-safe base64.
    InvalidPrivateKey,
    UnknownAttribute,
    /// An origin or destination list is empty.
    MissingPlaces,
    /// Polyline encoding was requested for a place given as an address.
    AddressNotEncodable,
    /// Latitude outside [-90, 90], longitude outside [-180, 180], or not finite.
    InvalidCoordinate,
}

impl ValidationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationErrorKind::InvalidEnumValue => "invalid_enum_value",
            ValidationErrorKind::InvalidTimeValue => "invalid_time_value",
            ValidationErrorKind::InvalidTimeout => "invalid_timeout",
            ValidationErrorKind::InvalidNumber => "invalid_number",
            ValidationErrorKind::InvalidBoolean => "invalid_boolean",
            ValidationErrorKind::InvalidPrivateKey => "invalid_private_key",
            ValidationErrorKind::UnknownAttribute => "unknown_attribute",
            ValidationErrorKind::MissingPlaces => "missing_places",
            ValidationErrorKind::AddressNotEncodable => "address_not_encodable",
            ValidationErrorKind::InvalidCoordinate => "invalid_coordinate",
        }
    }
}

/// A single rejected attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub kind: ValidationErrorKind,
    /// Offending value, rendered as text. `None` for an unset required value.
    pub value: Option<String>,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: ValidationErrorKind, value: Option<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            value,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) => write!(f, "{} ({}: {:?})", self.field, self.kind.as_str(), v),
            None => write!(f, "{} ({}: unset)", self.field, self.kind.as_str()),
        }
    }
}

/// Every failure found by one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Failures recorded for one attribute.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.errors.iter().filter(move |e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        f.write_str(&parts.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
