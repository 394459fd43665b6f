use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::client::{ClientProfile, OBSERVATIONS_MAX_CHARS};

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn email_pattern() -> &'static Regex {
    EMAIL_PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s]+$").expect("email pattern is a valid regex")
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientField {
    Name,
    Email,
    Observations,
}

impl ClientField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Observations => "observations",
        }
    }
}

impl fmt::Display for ClientField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldErrorKind {
    Required,
    InvalidFormat,
    TooLong { max_chars: usize, actual_chars: usize },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: ClientField,
    #[serde(flatten)]
    pub kind: FieldErrorKind,
}

impl FieldError {
    fn new(field: ClientField, kind: FieldErrorKind) -> Self {
        Self { field, kind }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FieldErrorKind::Required => write!(f, "{} is required", self.field),
            FieldErrorKind::InvalidFormat => write!(f, "{} is not a valid address", self.field),
            FieldErrorKind::TooLong { max_chars, actual_chars } => {
                write!(f, "{} is {actual_chars} characters long (max {max_chars})", self.field)
            }
        }
    }
}

impl std::error::Error for FieldError {}

/// Failures in rule order; the first one is what a form should surface.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    failures: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn first(&self) -> Option<&FieldError> {
        self.failures.first()
    }

    pub fn failures(&self) -> &[FieldError] {
        &self.failures
    }

    pub fn fields(&self) -> Vec<ClientField> {
        self.failures.iter().map(|failure| failure.field).collect()
    }

    pub fn into_failures(self) -> Vec<FieldError> {
        self.failures
    }
}

pub fn validate(profile: &ClientProfile) -> ValidationReport {
    let mut failures = Vec::new();
    failures.extend(check_name(profile));
    match check_email_present(profile) {
        Some(missing) => failures.push(missing),
        None => failures.extend(check_email_format(profile)),
    }
    failures.extend(check_observations_length(profile));

    ValidationReport { failures }
}

pub fn check_name(profile: &ClientProfile) -> Option<FieldError> {
    profile
        .name
        .trim()
        .is_empty()
        .then(|| FieldError::new(ClientField::Name, FieldErrorKind::Required))
}

pub fn check_email_present(profile: &ClientProfile) -> Option<FieldError> {
    profile
        .email
        .trim()
        .is_empty()
        .then(|| FieldError::new(ClientField::Email, FieldErrorKind::Required))
}

pub fn check_email_format(profile: &ClientProfile) -> Option<FieldError> {
    (!email_pattern().is_match(profile.email.trim()))
        .then(|| FieldError::new(ClientField::Email, FieldErrorKind::InvalidFormat))
}

pub fn check_observations_length(profile: &ClientProfile) -> Option<FieldError> {
    let actual_chars = profile.observations_len();
    (actual_chars > OBSERVATIONS_MAX_CHARS).then(|| {
        FieldError::new(
            ClientField::Observations,
            FieldErrorKind::TooLong { max_chars: OBSERVATIONS_MAX_CHARS, actual_chars },
        )
    })
}
