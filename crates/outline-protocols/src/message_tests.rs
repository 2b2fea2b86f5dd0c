use super::*;
use serde_json::json;

#[test]
fn test_request_wire_names() {
    let cases = [
        (AnalyzerRequest::Ping, json!({"action": "ping"})),
        (AnalyzerRequest::AnalyzePage, json!({"action": "analyzePage"})),
        (AnalyzerRequest::GetOutline, json!({"action": "getOutline"})),
    ];
    for (request, expected) in cases {
        assert_eq!(serde_json::to_value(&request).unwrap(), expected);
        assert_eq!(request.action(), expected["action"].as_str().unwrap());
    }
}

#[test]
fn test_scroll_request_uses_item_data() {
    let entry = OutlineEntry::new("details", 2, "Details");
    let json = serde_json::to_value(AnalyzerRequest::scroll_to(&entry)).unwrap();
    assert_eq!(
        json,
        json!({
            "action": "scrollToElement",
            "itemData": {"id": "details", "level": 2, "title": "Details"}
        })
    );
}

#[test]
fn test_scroll_request_accepts_bare_id() {
    let request: AnalyzerRequest =
        serde_json::from_value(json!({"action": "scrollToElement", "itemData": {"id": "x"}}))
            .unwrap();
    assert_eq!(
        request,
        AnalyzerRequest::ScrollToElement {
            item_data: ItemData::new("x")
        }
    );
}

#[test]
fn test_unrecognised_action_decodes_to_unknown() {
    let request: AnalyzerRequest =
        serde_json::from_value(json!({"action": "summarizePage"})).unwrap();
    assert_eq!(request, AnalyzerRequest::Unknown);
}

#[test]
fn test_missing_action_is_an_error() {
    let result = serde_json::from_value::<AnalyzerRequest>(json!({"itemData": {"id": "x"}}));
    assert!(result.is_err());
}

#[test]
fn test_success_response_shape() {
    assert_eq!(
        serde_json::to_value(AnalyzerResponse::ok()).unwrap(),
        json!({"success": true})
    );
    let response = AnalyzerResponse::with_outline(vec![OutlineEntry::new("a", 1, "Alpha")]);
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"success": true, "outline": [{"id": "a", "level": 1, "title": "Alpha"}]})
    );
}

#[test]
fn test_failure_response_shape() {
    let response = AnalyzerResponse::failure(ErrorCode::InProgress, "Analysis already in progress");
    assert!(response.is_in_progress());
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"success": false, "error": "Analysis already in progress", "code": "in_progress"})
    );
}

#[test]
fn test_failure_without_code_decodes() {
    let response: AnalyzerResponse =
        serde_json::from_value(json!({"success": false, "error": "boom"})).unwrap();
    assert!(!response.success);
    assert!(!response.is_in_progress());
    assert_eq!(response.error.as_deref(), Some("boom"));
}

#[test]
fn test_into_outline_defaults_to_empty() {
    assert!(AnalyzerResponse::ok().into_outline().is_empty());
}
