use oftee_telemetry::{
    metrics, new_request_ids, record_accept_error, record_link_type_decode_failure,
    record_message_forwarded, record_message_injected, record_session_closed,
    record_session_opened, record_tee_write_failure, record_tee_write_success,
};

// 计数器为进程级，其他测试可能并发累加，只断言下界。
#[test]
fn every_counter_reaches_the_snapshot() {
    let before = metrics().snapshot();

    record_session_opened();
    record_session_closed();
    record_accept_error();
    record_message_forwarded();
    record_message_forwarded();
    record_link_type_decode_failure();
    record_tee_write_success();
    record_tee_write_failure();
    record_message_injected();

    let after = metrics().snapshot();
    assert!(after.sessions_opened > before.sessions_opened);
    assert!(after.sessions_closed > before.sessions_closed);
    assert!(after.accept_errors > before.accept_errors);
    assert!(after.messages_forwarded >= before.messages_forwarded + 2);
    assert!(after.link_type_decode_failures > before.link_type_decode_failures);
    assert!(after.tee_write_success > before.tee_write_success);
    assert!(after.tee_write_failure > before.tee_write_failure);
    assert!(after.messages_injected > before.messages_injected);
}

#[test]
fn request_ids_are_random_uuids() {
    let first = new_request_ids();
    let second = new_request_ids();
    let parsed = uuid::Uuid::parse_str(&first.request_id).expect("uuid");
    assert_eq!(parsed.get_version_num(), 4);
    assert_ne!(first.request_id, second.request_id);
    assert_ne!(first.trace_id, second.trace_id);
}
