use serde::Serialize;
use thiserror::Error;

use crate::domain::quote::QuotationId;
use crate::domain::service::ServiceId;
use crate::store::StorageError;
use crate::validation::FieldError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("catalog source `{origin}` is unreachable: {message}")]
    Unreachable { origin: String, message: String },
    #[error("catalog document is malformed: {0}")]
    Malformed(String),
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("cart amounts exceed the representable range")]
    Overflow,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("the cart is empty")]
    EmptyCart,
    #[error("client profile is invalid: {}", describe_failures(.0))]
    InvalidClient(Vec<FieldError>),
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("could not serialize quotations: {0}")]
    Serialize(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("client validation failed: {}", describe_failures(.0))]
    Validation(Vec<FieldError>),
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    #[error("quotation was kept in memory but not persisted: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("service {0} is not in the catalog")]
    UnknownService(ServiceId),
    #[error("service {0} is not in the cart")]
    NotInCart(ServiceId),
    #[error("quotation {0} was not found")]
    UnknownQuotation(QuotationId),
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error("no quotation id is left after {0}")]
    IdsExhausted(QuotationId),
}

/// Named result handed to whatever presents notifications to the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Success { message: String },
    ValidationFailed { fields: Vec<FieldError> },
    PreconditionFailed { message: String },
    PersistenceFailed { message: String },
    LoadFailed { message: String },
    NotFound { message: String },
}

impl Outcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success { message: message.into() }
    }

    /// Success carries `describe(value)`; an error maps through `From<ApplicationError>`.
    pub fn of<T>(
        result: &Result<T, ApplicationError>,
        describe: impl FnOnce(&T) -> String,
    ) -> Self {
        match result {
            Ok(value) => Self::success(describe(value)),
            Err(error) => Self::from(error.clone()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The specific message behind the outcome, for logs and detailed output.
    pub fn detail(&self) -> String {
        match self {
            Self::ValidationFailed { fields } => describe_failures(fields),
            Self::Success { message }
            | Self::PreconditionFailed { message }
            | Self::PersistenceFailed { message }
            | Self::LoadFailed { message }
            | Self::NotFound { message } => message.clone(),
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Success { .. } => "Done.",
            Self::ValidationFailed { .. } => "Some client details are missing or invalid.",
            Self::PreconditionFailed { .. } => {
                "Add services to the cart and complete the client details first."
            }
            Self::PersistenceFailed { .. } => {
                "The quotation was saved for this session but may not survive a restart."
            }
            Self::LoadFailed { .. } => "The service catalog could not be loaded.",
            Self::NotFound { .. } => "The requested item was not found.",
        }
    }
}

impl From<ApplicationError> for Outcome {
    fn from(value: ApplicationError) -> Self {
        let message = value.to_string();
        match value {
            ApplicationError::Load(_) => Self::LoadFailed { message },
            ApplicationError::Validation(fields)
            | ApplicationError::Precondition(PreconditionError::InvalidClient(fields)) => {
                Self::ValidationFailed { fields }
            }
            ApplicationError::Precondition(
                PreconditionError::EmptyCart | PreconditionError::Pricing(_),
            )
            | ApplicationError::Pricing(_)
            | ApplicationError::IdsExhausted(_) => Self::PreconditionFailed { message },
            ApplicationError::Persistence(_) => Self::PersistenceFailed { message },
            ApplicationError::UnknownService(_)
            | ApplicationError::NotInCart(_)
            | ApplicationError::UnknownQuotation(_) => Self::NotFound { message },
        }
    }
}

fn describe_failures(failures: &[FieldError]) -> String {
    failures.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
