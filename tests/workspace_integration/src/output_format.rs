//! Output format tests.
//!
//! A successful call returns exactly one text content item holding the
//! pretty-printed success payload.

use rmcp::model::{CallToolResult, RawContent};
use serde_json::Value;

/// Extract and check the success payload from a tool result.
pub fn validate_tool_result(result: &CallToolResult) -> Result<Value, String> {
    if result.is_error.unwrap_or(false) {
        return Err("Result is flagged as an error".to_string());
    }
    if result.content.len() != 1 {
        return Err(format!("Expected one content item, got {}", result.content.len()));
    }

    let text = match &result.content[0].raw {
        RawContent::Text(text) => &text.text,
        _ => return Err("Content must be text".to_string()),
    };
    let payload: Value =
        serde_json::from_str(text).map_err(|e| format!("Content is not JSON: {}", e))?;

    if payload["success"] != true {
        return Err("Payload must have success: true".to_string());
    }
    for field in ["imagekitUrl", "falImageUrl", "message"] {
        if !payload[field].is_string() {
            return Err(format!("Payload field '{}' must be a string", field));
        }
    }
    if !payload["seed"].is_i64() {
        return Err("Payload field 'seed' must be an integer".to_string());
    }

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagegen_mcp_common::UploadedImage;
    use imagegen_mcp_server::server::success_payload;
    use proptest::prelude::*;
    use rmcp::model::Content;

    fn result_for(image: &UploadedImage) -> CallToolResult {
        CallToolResult::success(vec![Content::text(success_payload(image).unwrap())])
    }

    #[test]
    fn payload_matches_contract() {
        let image = UploadedImage {
            imagekit_url: "https://ik.io/x.png".to_string(),
            fal_image_url: "https://fal.media/y.png".to_string(),
            seed: 42,
        };
        let payload = validate_tool_result(&result_for(&image)).unwrap();
        assert_eq!(payload["seed"], 42);
        assert_eq!(payload["message"], "Image generated and uploaded successfully!");

        let keys: Vec<&String> = payload.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 5);
    }

    #[test]
    fn validator_rejects_non_json_text() {
        let result = CallToolResult::success(vec![Content::text("done!")]);
        assert!(validate_tool_result(&result).is_err());
    }

    #[test]
    fn validator_rejects_error_results() {
        let result = CallToolResult::error(vec![Content::text("{}")]);
        assert!(validate_tool_result(&result).is_err());
    }

    proptest! {
        /// Any seed the generator reports is passed through unchanged.
        #[test]
        fn seed_is_passed_through(seed in any::<i64>(), id in "[a-z0-9]{1,12}") {
            let image = UploadedImage {
                imagekit_url: format!("https://ik.imagekit.io/demo/{}.png", id),
                fal_image_url: format!("https://fal.media/files/{}.png", id),
                seed,
            };
            let payload = validate_tool_result(&result_for(&image)).unwrap();
            prop_assert_eq!(payload["seed"].as_i64(), Some(seed));
            prop_assert_eq!(payload["imagekitUrl"].as_str(), Some(image.imagekit_url.as_str()));
        }
    }
}
