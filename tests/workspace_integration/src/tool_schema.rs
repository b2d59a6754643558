//! Tool schema validity tests.
//!
//! Every registered tool must carry a name, a description, and an object
//! input schema that lists its required parameters with their types.

use serde_json::Value;

/// Validates that a JSON schema has the structure MCP clients expect.
pub fn validate_json_schema(schema: &Value) -> Result<(), String> {
    let obj = schema
        .as_object()
        .ok_or_else(|| "Schema must be an object".to_string())?;

    if obj.get("type").and_then(|t| t.as_str()) != Some("object") {
        return Err(format!("Expected type 'object', got {:?}", obj.get("type")));
    }

    let properties = obj
        .get("properties")
        .and_then(|p| p.as_object())
        .ok_or_else(|| "Properties must be an object".to_string())?;

    if let Some(required) = obj.get("required") {
        let required = required
            .as_array()
            .ok_or_else(|| "Required must be an array".to_string())?;
        for name in required {
            let name = name.as_str().ok_or("Required entries must be strings")?;
            if !properties.contains_key(name) {
                return Err(format!("Required property '{}' is not declared", name));
            }
        }
    }

    if serde_json::to_string(schema)
        .map_err(|e| e.to_string())?
        .contains("$ref")
    {
        return Err("Schema must not contain $ref".to_string());
    }

    Ok(())
}

/// Validates that a tool has required fields.
pub fn validate_tool(tool: &rmcp::model::Tool) -> Result<(), String> {
    if tool.name.is_empty() {
        return Err("Tool name cannot be empty".to_string());
    }

    if tool.description.as_deref().is_none_or(str::is_empty) {
        return Err(format!("Tool '{}' must have a description", tool.name));
    }

    let schema_value = serde_json::to_value(&*tool.input_schema)
        .map_err(|e| format!("Failed to serialize schema: {}", e))?;
    validate_json_schema(&schema_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server_startup::empty_config;
    use imagegen_mcp_common::Resolution;
    use imagegen_mcp_server::server::input_schema;
    use imagegen_mcp_server::{ImageServer, TOOL_NAME};
    use proptest::prelude::*;

    #[test]
    fn registered_tool_is_valid() {
        let server = ImageServer::new(&empty_config()).unwrap();
        let tools = server.tool_descriptors();
        assert_eq!(tools.len(), 1);
        for tool in &tools {
            let result = validate_tool(tool);
            assert!(result.is_ok(), "Tool {} invalid: {:?}", tool.name, result.err());
        }
        assert_eq!(tools[0].name, TOOL_NAME);
    }

    #[test]
    fn schema_declares_expected_parameters() {
        let schema = Value::Object(input_schema());
        assert_eq!(schema["required"], serde_json::json!(["prompt"]));

        let properties = schema["properties"].as_object().unwrap();
        let mut names: Vec<&str> = properties.keys().map(String::as_str).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["negative_prompt", "prompt", "resolution"]);

        let allowed: Vec<&str> = schema["properties"]["resolution"]["enum"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        let expected: Vec<&str> = Resolution::ALL.iter().map(Resolution::as_str).collect();
        assert_eq!(allowed, expected);
    }

    #[test]
    fn validator_rejects_broken_schemas() {
        let missing_property = serde_json::json!({
            "type": "object",
            "properties": {},
            "required": ["prompt"]
        });
        assert!(validate_json_schema(&missing_property).is_err());

        let with_ref = serde_json::json!({
            "type": "object",
            "properties": { "resolution": { "$ref": "#/definitions/Resolution" } }
        });
        assert!(validate_json_schema(&with_ref).is_err());

        assert!(validate_json_schema(&serde_json::json!({ "type": "string" })).is_err());
    }

    proptest! {
        /// Any string prompt, with or without a resolution, deserializes.
        #[test]
        fn schema_accepts_any_string_prompt(
            prompt in ".{1,200}",
            resolution in prop_oneof![Just(None), Just(Some("1K")), Just(Some("2K"))]
        ) {
            let mut args = serde_json::json!({ "prompt": prompt });
            if let Some(resolution) = resolution {
                args["resolution"] = Value::from(resolution);
            }
            let parsed: Result<imagegen_mcp_server::GenerateAndUploadParams, _> =
                serde_json::from_value(args);
            prop_assert!(parsed.is_ok());
        }
    }
}
