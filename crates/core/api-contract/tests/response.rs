use api_contract::ApiResponse;

#[test]
fn api_response_success_has_no_error() {
    let value = serde_json::to_value(ApiResponse::success(5_u64)).expect("serialize");
    assert_eq!(value["success"], true);
    assert_eq!(value["data"], 5);
    assert!(value["error"].is_null());
}

#[test]
fn api_response_error_carries_code() {
    let response = ApiResponse::<()>::error("ROUTE.NOT_FOUND", "not found");
    assert!(!response.success);
    assert!(response.data.is_none());
    let error = response.error.expect("error body");
    assert_eq!(error.code, "ROUTE.NOT_FOUND");
    assert_eq!(error.message, "not found");
}
