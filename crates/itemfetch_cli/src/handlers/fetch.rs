use serde_json::json;

use itemfetch_core::contract::{
    decode_response, encode_request, FetchConfig, GetItemsResponse, RESULT_FAILURE,
};

use crate::adapters::invoke::FunctionInvoker;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Items(Vec<String>),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    Encoding { detail: String },
    Invocation { detail: String },
    Decoding { detail: String },
    RemoteStatus { status_code: i64 },
    RemoteFailure { detail: Option<String> },
}

impl FetchError {
    /// The single stdout line reported for this failure. The three
    /// transport-stage lines carry the configured function name; the two
    /// remote-rejection lines are fixed text.
    pub fn user_message(&self, function_name: &str) -> String {
        match self {
            FetchError::Encoding { .. } => {
                format!("Error marshalling {function_name} request")
            }
            FetchError::Invocation { .. } => format!("Error calling {function_name}"),
            FetchError::Decoding { .. } => {
                format!("Error unmarshalling {function_name} response")
            }
            FetchError::RemoteStatus { status_code } => {
                format!("Error getting items, StatusCode: {status_code}")
            }
            FetchError::RemoteFailure { .. } => "Failed to get items".to_string(),
        }
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Encoding { detail } => write!(f, "request encoding failed: {detail}"),
            FetchError::Invocation { detail } => write!(f, "invocation failed: {detail}"),
            FetchError::Decoding { detail } => write!(f, "response decoding failed: {detail}"),
            FetchError::RemoteStatus { status_code } => {
                write!(f, "remote function returned status {status_code}")
            }
            FetchError::RemoteFailure { detail } => match detail {
                Some(message) => write!(f, "remote function reported failure: {message}"),
                None => write!(f, "remote function reported failure"),
            },
        }
    }
}

impl std::error::Error for FetchError {}

/// Run the whole fetch pipeline: encode the fixed request, invoke the remote
/// function once, decode the envelope, and validate status then result.
/// Every failure is an early return; there are no retries.
pub fn run_fetch(
    config: &FetchConfig,
    invoker: &dyn FunctionInvoker,
) -> Result<FetchOutcome, FetchError> {
    let request = config.request();
    let payload = encode_request(&request).map_err(|error| FetchError::Encoding {
        detail: error.to_string(),
    })?;

    let output = match invoker.invoke(&config.function_name, &payload) {
        Ok(value) => value,
        Err(detail) => {
            log_fetch_event(
                "invocation_failed",
                json!({
                    "function_name": config.function_name,
                    "detail": detail,
                }),
            );
            return Err(FetchError::Invocation { detail });
        }
    };

    // Raw result and payload are logged even on success.
    log_fetch_event(
        "invocation_completed",
        json!({
            "function_name": config.function_name,
            "status_code": output.status_code,
            "function_error": output.function_error,
            "payload": String::from_utf8_lossy(&output.payload),
        }),
    );

    let response: GetItemsResponse =
        decode_response(&output.payload).map_err(|error| FetchError::Decoding {
            detail: error.to_string(),
        })?;

    // Gateway status is checked before the body result.
    if response.status_code != 200 {
        return Err(FetchError::RemoteStatus {
            status_code: response.status_code,
        });
    }

    if response.body.result == RESULT_FAILURE {
        let detail = response
            .body
            .error
            .map(|error| error.message)
            .filter(|message| !message.is_empty());
        if let Some(message) = &detail {
            log_fetch_event("remote_failure", json!({ "message": message }));
        }
        return Err(FetchError::RemoteFailure { detail });
    }

    if response.body.data.is_empty() {
        return Ok(FetchOutcome::Empty);
    }

    Ok(FetchOutcome::Items(
        response
            .body
            .data
            .into_iter()
            .map(|record| record.item)
            .collect(),
    ))
}

/// stdout lines for a successful run, in response order.
pub fn render_outcome(outcome: &FetchOutcome) -> Vec<String> {
    match outcome {
        FetchOutcome::Items(items) => items.clone(),
        FetchOutcome::Empty => vec!["There were no items".to_string()],
    }
}

fn log_fetch_event(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "item_fetcher",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::adapters::invoke::InvocationOutput;

    struct CapturingInvoker {
        payloads: Mutex<Vec<Vec<u8>>>,
        response_payload: Vec<u8>,
    }

    impl CapturingInvoker {
        fn returning(response_payload: &str) -> Self {
            Self {
                payloads: Mutex::new(Vec::new()),
                response_payload: response_payload.as_bytes().to_vec(),
            }
        }

        fn payloads(&self) -> Vec<Vec<u8>> {
            self.payloads.lock().expect("poisoned mutex").clone()
        }
    }

    impl FunctionInvoker for CapturingInvoker {
        fn invoke(
            &self,
            _function_name: &str,
            payload: &[u8],
        ) -> Result<InvocationOutput, String> {
            self.payloads
                .lock()
                .expect("poisoned mutex")
                .push(payload.to_vec());
            Ok(InvocationOutput {
                status_code: 200,
                function_error: None,
                payload: self.response_payload.clone(),
            })
        }
    }

    struct FailingInvoker;

    impl FunctionInvoker for FailingInvoker {
        fn invoke(
            &self,
            _function_name: &str,
            _payload: &[u8],
        ) -> Result<InvocationOutput, String> {
            Err("connection refused".to_string())
        }
    }

    #[test]
    fn sends_exact_wire_payload() {
        let invoker = CapturingInvoker::returning(
            r#"{"statusCode": 200, "body": {"result": "success", "data": []}}"#,
        );

        run_fetch(&FetchConfig::default(), &invoker).expect("fetch should succeed");

        let payloads = invoker.payloads();
        assert_eq!(payloads.len(), 1);
        assert_eq!(
            payloads[0],
            br#"{"SortBy":"time","SortOrder":"descending","ItemsToGet":10}"#
        );
    }

    #[test]
    fn config_overrides_flow_into_wire_payload() {
        let invoker = CapturingInvoker::returning(
            r#"{"statusCode": 200, "body": {"result": "success", "data": []}}"#,
        );
        let config = FetchConfig {
            items_to_get: 25,
            ..FetchConfig::default()
        };

        run_fetch(&config, &invoker).expect("fetch should succeed");

        assert_eq!(
            invoker.payloads()[0],
            br#"{"SortBy":"time","SortOrder":"descending","ItemsToGet":25}"#
        );
    }

    #[test]
    fn returns_items_in_response_order() {
        let invoker = CapturingInvoker::returning(
            r#"{
                "statusCode": 200,
                "headers": {"Content-Type": "application/json"},
                "body": {
                    "result": "success",
                    "data": [{"item": "first"}, {"item": "second"}, {"item": "third"}]
                }
            }"#,
        );

        let outcome =
            run_fetch(&FetchConfig::default(), &invoker).expect("fetch should succeed");

        assert_eq!(
            outcome,
            FetchOutcome::Items(vec![
                "first".to_string(),
                "second".to_string(),
                "third".to_string(),
            ])
        );
        assert_eq!(
            render_outcome(&outcome),
            vec!["first", "second", "third"]
        );
    }

    #[test]
    fn empty_data_reports_no_items() {
        let invoker = CapturingInvoker::returning(
            r#"{"statusCode": 200, "body": {"result": "success", "data": []}}"#,
        );

        let outcome =
            run_fetch(&FetchConfig::default(), &invoker).expect("fetch should succeed");

        assert_eq!(outcome, FetchOutcome::Empty);
        assert_eq!(render_outcome(&outcome), vec!["There were no items"]);
    }

    #[test]
    fn non_200_status_is_rejected() {
        let invoker = CapturingInvoker::returning(
            r#"{"statusCode": 404, "body": {"result": "success", "data": [{"item": "x"}]}}"#,
        );

        let error = run_fetch(&FetchConfig::default(), &invoker)
            .expect_err("non-200 status should fail");

        assert_eq!(error, FetchError::RemoteStatus { status_code: 404 });
        assert_eq!(
            error.user_message("optimize-source"),
            "Error getting items, StatusCode: 404"
        );
    }

    #[test]
    fn status_check_precedes_result_check() {
        let invoker = CapturingInvoker::returning(
            r#"{"statusCode": 502, "body": {"result": "failure", "data": []}}"#,
        );

        let error = run_fetch(&FetchConfig::default(), &invoker)
            .expect_err("non-200 status should fail");

        assert_eq!(error, FetchError::RemoteStatus { status_code: 502 });
    }

    #[test]
    fn failure_result_is_rejected_regardless_of_data() {
        let invoker = CapturingInvoker::returning(
            r#"{
                "statusCode": 200,
                "body": {
                    "result": "failure",
                    "data": [{"item": "ignored"}],
                    "error": {"message": "upstream store unavailable"}
                }
            }"#,
        );

        let error = run_fetch(&FetchConfig::default(), &invoker)
            .expect_err("failure result should fail");

        assert_eq!(
            error,
            FetchError::RemoteFailure {
                detail: Some("upstream store unavailable".to_string()),
            }
        );
        assert_eq!(error.user_message("optimize-source"), "Failed to get items");
    }

    #[test]
    fn failure_result_without_detail_keeps_fixed_message() {
        let invoker = CapturingInvoker::returning(
            r#"{"statusCode": 200, "body": {"result": "failure", "data": []}}"#,
        );

        let error = run_fetch(&FetchConfig::default(), &invoker)
            .expect_err("failure result should fail");

        assert_eq!(error, FetchError::RemoteFailure { detail: None });
        assert_eq!(error.user_message("optimize-source"), "Failed to get items");
    }

    #[test]
    fn malformed_payload_is_a_decoding_error() {
        let invoker = CapturingInvoker::returning("not json at all");

        let error = run_fetch(&FetchConfig::default(), &invoker)
            .expect_err("malformed payload should fail");

        assert!(matches!(error, FetchError::Decoding { .. }));
        assert_eq!(
            error.user_message("optimize-source"),
            "Error unmarshalling optimize-source response"
        );
    }

    #[test]
    fn empty_payload_is_a_decoding_error() {
        let invoker = CapturingInvoker::returning("");

        let error = run_fetch(&FetchConfig::default(), &invoker)
            .expect_err("empty payload should fail");

        assert!(matches!(error, FetchError::Decoding { .. }));
    }

    #[test]
    fn transport_failure_is_an_invocation_error() {
        let error = run_fetch(&FetchConfig::default(), &FailingInvoker)
            .expect_err("transport failure should fail");

        assert_eq!(
            error,
            FetchError::Invocation {
                detail: "connection refused".to_string(),
            }
        );
        assert_eq!(
            error.user_message("optimize-source"),
            "Error calling optimize-source"
        );
    }

    #[test]
    fn function_error_indicator_does_not_change_control_flow() {
        struct FunctionErrorInvoker;

        impl FunctionInvoker for FunctionErrorInvoker {
            fn invoke(
                &self,
                _function_name: &str,
                _payload: &[u8],
            ) -> Result<InvocationOutput, String> {
                Ok(InvocationOutput {
                    status_code: 200,
                    function_error: Some("Unhandled".to_string()),
                    payload: br#"{"statusCode": 200, "body": {"result": "success", "data": [{"item": "kept"}]}}"#
                        .to_vec(),
                })
            }
        }

        let outcome = run_fetch(&FetchConfig::default(), &FunctionErrorInvoker)
            .expect("fetch should succeed");

        assert_eq!(outcome, FetchOutcome::Items(vec!["kept".to_string()]));
    }
}
