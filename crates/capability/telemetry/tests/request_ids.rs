use t2w_telemetry::new_request_ids;

#[test]
fn request_ids_are_distinct_uuids() {
    let ids = new_request_ids();
    assert_eq!(ids.request_id.len(), 36);
    assert_eq!(ids.trace_id.len(), 36);
    assert_ne!(ids.request_id, ids.trace_id);
}
