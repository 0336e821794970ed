#![cfg(feature = "serde")]

use tank_tools::{TraceEvent, TraceLog, TraceSink};

#[test]
fn trace_log_roundtrips_via_serde() {
    let mut log = TraceLog::default();
    log.emit(TraceEvent::new(1, "dectree.branch").subject(0).flag(true));
    log.emit(TraceEvent::new(1, "dectree.leaf").subject(2));

    let json = serde_json::to_string(&log).expect("serialize trace log");
    let back: TraceLog = serde_json::from_str(&json).expect("deserialize trace log");

    assert_eq!(log, back);
}

#[test]
fn missing_subject_and_detail_default_to_zero() {
    let event: TraceEvent = serde_json::from_str(r#"{ "tick": 4, "tag": "tree.motion" }"#)
        .expect("deserialize event");

    assert_eq!(event, TraceEvent::new(4, "tree.motion"));
}
