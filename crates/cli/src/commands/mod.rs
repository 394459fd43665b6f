pub mod catalog;
pub mod config;
pub mod export;
pub mod list;
pub mod quote;
pub mod show;

use quotekit_core::config::{AppConfig, LoadOptions};
use quotekit_core::{ApplicationError, Outcome, QuotationStore};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::success_with_data(command, message, Value::Null)
    }

    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: impl Serialize,
    ) -> Self {
        let data = serde_json::to_value(data).ok().filter(|value| !value.is_null());
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Renders a named core outcome. Success carries `data`; failures carry the outcome
    /// itself along with their error class and exit code.
    pub fn reported(command: &str, outcome: Outcome, data: impl Serialize) -> Self {
        let (error_class, exit_code) = match &outcome {
            Outcome::Success { message } => {
                return Self::success_with_data(command, message.clone(), data);
            }
            Outcome::LoadFailed { .. } => ("load_failed", 4),
            Outcome::ValidationFailed { .. } => ("validation_failed", 5),
            Outcome::PreconditionFailed { .. } => ("precondition_failed", 6),
            Outcome::PersistenceFailed { .. } => ("persistence_failed", 7),
            Outcome::NotFound { .. } => ("not_found", 8),
        };
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: format!("{} ({})", outcome.user_message(), outcome.detail()),
            data: serde_json::to_value(&outcome).ok(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn rejected(command: &str, error: ApplicationError) -> Self {
        Self::reported(command, Outcome::from(error), Value::Null)
    }
}

pub(crate) fn load_config(
    command: &str,
    options: &LoadOptions,
) -> Result<AppConfig, CommandResult> {
    AppConfig::load(options.clone()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            2,
        )
    })
}

pub(crate) fn current_thread_runtime(
    command: &str,
) -> Result<tokio::runtime::Runtime, CommandResult> {
    tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
        CommandResult::failure(
            command,
            "runtime_init",
            format!("failed to initialize async runtime: {error}"),
            3,
        )
    })
}

pub(crate) fn open_store(config: &AppConfig) -> QuotationStore {
    QuotationStore::load(quotekit_storage::storage_for(config))
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

#[cfg(test)]
mod tests {
    use quotekit_core::{ApplicationError, Outcome, ServiceId};
    use serde_json::Value;

    use super::CommandResult;

    #[test]
    fn rejected_not_found_uses_dedicated_exit_code() {
        let result =
            CommandResult::rejected("quote", ApplicationError::UnknownService(ServiceId(4)));
        let payload: Value = serde_json::from_str(&result.output).expect("json payload");

        assert_eq!(result.exit_code, 8);
        assert_eq!(payload["error_class"], "not_found");
        assert_eq!(payload["data"]["outcome"], "not_found");
    }

    #[test]
    fn reported_success_carries_message_and_data() {
        let result = CommandResult::reported(
            "show",
            Outcome::success("quotation 5 for Ana"),
            serde_json::json!({"id": 5}),
        );
        let payload: Value = serde_json::from_str(&result.output).expect("json payload");

        assert_eq!(result.exit_code, 0);
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["message"], "quotation 5 for Ana");
        assert_eq!(payload["data"]["id"], 5);
    }

    #[test]
    fn success_without_data_omits_data_field() {
        let result = CommandResult::success("list", "nothing saved yet");
        let payload: Value = serde_json::from_str(&result.output).expect("json payload");

        assert_eq!(result.exit_code, 0);
        assert!(payload.get("data").is_none());
    }
}
