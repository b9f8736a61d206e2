//! Invocation input/output shapes

use serde::{Deserialize, Serialize};

/// HTTP-style status for a handled invocation
const STATUS_OK: u16 = 200;

/// HTTP-style status for a failed invocation
const STATUS_ERROR: u16 = 500;

/// Input to one invocation: `{ "record": "<name>" }`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReconciliationRequest {
    /// Record name to check (and possibly provision)
    #[serde(default)]
    pub record: String,
}

impl ReconciliationRequest {
    /// Create a request for `record`
    pub fn new(record: impl Into<String>) -> Self {
        Self {
            record: record.into(),
        }
    }
}

/// What an invocation found or did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    /// A matching record is already in the zone
    AlreadyExists,
    /// No matching record and the create path is disabled
    NotFound,
    /// No matching record; provisioning failed so nothing was created
    ProvisioningSkipped,
    /// The record was created pointing at `cname`
    Created {
        /// CNAME target assigned by the provisioner
        cname: String,
    },
}

impl ReconcileOutcome {
    /// Short machine-readable status
    pub fn status(&self) -> &'static str {
        match self {
            ReconcileOutcome::AlreadyExists => "already exists",
            ReconcileOutcome::NotFound => "not found, not created",
            ReconcileOutcome::ProvisioningSkipped => "not found, provisioning failed",
            ReconcileOutcome::Created { .. } => "created",
        }
    }

    /// Human-readable line for logs and the response body
    pub fn message(&self, record_name: &str) -> String {
        match self {
            ReconcileOutcome::AlreadyExists => format!("Record {record_name} already exists."),
            ReconcileOutcome::NotFound => format!("Record {record_name} does not exist."),
            ReconcileOutcome::ProvisioningSkipped => format!(
                "Record {record_name} does not exist and could not be provisioned."
            ),
            ReconcileOutcome::Created { cname } => {
                format!("CNAME record created for {record_name} pointing to {cname}")
            }
        }
    }

    /// Whether the record is in the zone after this invocation
    pub fn exists(&self) -> bool {
        matches!(
            self,
            ReconcileOutcome::AlreadyExists | ReconcileOutcome::Created { .. }
        )
    }
}

/// Output of one invocation: `{ "statusCode": 200|500, "body": "<json>" }`
///
/// `body` is itself a JSON document serialized to a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    /// 200 on any outcome, 500 on error
    pub status_code: u16,
    /// JSON-encoded body
    pub body: String,
}

impl InvocationResponse {
    /// Build a 200 response carrying the outcome message as a JSON string
    pub fn from_outcome(outcome: &ReconcileOutcome, record_name: &str) -> Self {
        Self {
            status_code: STATUS_OK,
            body: serde_json::Value::String(outcome.message(record_name)).to_string(),
        }
    }

    /// Build a 500 response with body `{"error": message}`
    pub fn error(message: &str) -> Self {
        Self {
            status_code: STATUS_ERROR,
            body: serde_json::json!({ "error": message }).to_string(),
        }
    }

    /// Whether the invocation succeeded
    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_missing_record_defaults_to_empty() {
        let request: ReconciliationRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.record, "");

        let request: ReconciliationRequest =
            serde_json::from_str(r#"{"record": "foo.example.com"}"#).unwrap();
        assert_eq!(request.record, "foo.example.com");
    }

    #[test]
    fn test_outcome_response_body_is_json_string() {
        let response =
            InvocationResponse::from_outcome(&ReconcileOutcome::AlreadyExists, "foo.example.com");

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, "\"Record foo.example.com already exists.\"");
        assert!(response.is_success());
    }

    #[test]
    fn test_error_response_wraps_message() {
        let response = InvocationResponse::error("An error occurred: boom");
        assert_eq!(response.status_code, 500);

        let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["error"], "An error occurred: boom");
        assert!(!response.is_success());
    }

    #[test]
    fn test_response_uses_camel_case_status_code() {
        let response = InvocationResponse::from_outcome(&ReconcileOutcome::NotFound, "bar.example.com");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["body"], "\"Record bar.example.com does not exist.\"");
    }

    #[test]
    fn test_outcome_status_and_existence() {
        let created = ReconcileOutcome::Created {
            cname: "foo.herokudns.com".to_string(),
        };
        assert_eq!(created.status(), "created");
        assert!(created.exists());
        assert_eq!(
            created.message("foo.example.com"),
            "CNAME record created for foo.example.com pointing to foo.herokudns.com"
        );

        assert_eq!(ReconcileOutcome::NotFound.status(), "not found, not created");
        assert!(!ReconcileOutcome::NotFound.exists());
        assert!(!ReconcileOutcome::ProvisioningSkipped.exists());
    }
}
