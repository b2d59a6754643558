//! Input parameter validation tests.
//!
//! Invalid arguments must come back as an MCP error naming the problem,
//! and must never reach an upstream service.

use rmcp::model::JsonObject;
use serde_json::Value;

/// Wrap a JSON value as tool call arguments.
pub fn arguments(value: Value) -> Option<JsonObject> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server_startup::empty_config;
    use imagegen_mcp_server::{ImageServer, TOOL_NAME};
    use proptest::prelude::*;
    use rmcp::ErrorData as McpError;
    use rmcp::model::ErrorCode;

    fn call(arguments: Option<JsonObject>) -> McpError {
        let server = ImageServer::new(&empty_config()).unwrap();
        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(server.dispatch(TOOL_NAME, arguments))
            .unwrap_err()
    }

    fn kind(err: &McpError) -> &str {
        err.data
            .as_ref()
            .and_then(|d| d["kind"].as_str())
            .unwrap_or_default()
    }

    fn non_string_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            prop::collection::vec(".{0,8}", 0..3).prop_map(Value::from),
            Just(serde_json::json!({ "text": "a cat" })),
        ]
    }

    #[test]
    fn missing_arguments_are_invalid_params() {
        let err = call(None);
        assert_eq!(err.code.0, ErrorCode::INVALID_PARAMS.0);
        assert_eq!(kind(&err), "InvalidParams");
        assert!(err.message.contains("Invalid or missing 'prompt' parameter"));
    }

    #[test]
    fn unknown_resolution_is_invalid_params() {
        let err = call(arguments(serde_json::json!({ "prompt": "a cat", "resolution": "4K" })));
        assert_eq!(kind(&err), "InvalidParams");
        assert!(err.message.contains("4K"));
    }

    #[test]
    fn valid_arguments_pass_validation() {
        // With no credentials configured, a valid call fails on FAL_KEY instead.
        let err = call(arguments(serde_json::json!({ "prompt": "a cat", "resolution": "2K" })));
        assert_eq!(kind(&err), "ConfigurationError");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// A prompt of any non-string type is rejected.
        #[test]
        fn non_string_prompt_is_rejected(prompt in non_string_value()) {
            let err = call(arguments(serde_json::json!({ "prompt": prompt })));
            prop_assert_eq!(kind(&err), "InvalidParams");
            prop_assert!(err.message.contains("'prompt'"));
        }

        /// A prompt made only of whitespace is rejected.
        #[test]
        fn blank_prompt_is_rejected(prompt in "[ \t\n]{0,10}") {
            let err = call(arguments(serde_json::json!({ "prompt": prompt })));
            prop_assert_eq!(kind(&err), "InvalidParams");
        }

        /// A negative prompt of any non-string, non-null type is rejected.
        #[test]
        fn non_string_negative_prompt_is_rejected(n in any::<i64>()) {
            let err = call(arguments(serde_json::json!({ "prompt": "a cat", "negative_prompt": n })));
            prop_assert_eq!(kind(&err), "InvalidParams");
        }
    }
}
