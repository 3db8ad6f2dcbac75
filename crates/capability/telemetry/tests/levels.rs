use oftee_telemetry::{metrics, normalize_level, record_packet_in};

#[test]
fn level_names_normalize() {
    assert_eq!(normalize_level("debug").as_deref(), Some("debug"));
    assert_eq!(normalize_level("INFO").as_deref(), Some("info"));
    assert_eq!(normalize_level("warning").as_deref(), Some("warn"));
    assert_eq!(normalize_level("fatal").as_deref(), Some("error"));
    assert_eq!(normalize_level("verbose"), None);
}

#[test]
fn counters_accumulate() {
    let before = metrics().snapshot().packet_ins;
    record_packet_in();
    record_packet_in();
    assert!(metrics().snapshot().packet_ins >= before + 2);
}
