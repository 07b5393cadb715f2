use super::*;

#[test]
fn defaults_match_reference_constants() {
    let c = SimConfig::default();
    assert_eq!((c.width, c.height, c.chunk_size), (480, 360, 8));
    assert_eq!(c.manager, ManagerKind::AlwaysAllocate);
    assert_eq!((c.player_rate, c.monitor_rate), (20, 20));
    assert_eq!((c.player_rate_step, c.monitor_rate_step), (33, 27));
    assert_eq!(c.rate_mode, RateMode::ChunksPerTick);
    c.validate().unwrap();
}

#[test]
fn partial_json_fills_defaults() {
    let c = SimConfig::from_json_str(r#"{"manager":{"kind":"n_buffer","count":3},"player_rate":5}"#)
        .unwrap();
    assert_eq!(c.manager, ManagerKind::NBuffer { count: 3 });
    assert_eq!(c.player_rate, 5);
    assert_eq!(c.width, 480);
}

#[test]
fn rejects_chunk_size_not_dividing_buffer() {
    let err = SimConfig::from_json_str(r#"{"width":100}"#).unwrap_err();
    assert!(err.to_string().starts_with("config error:"));
}

#[test]
fn rejects_empty_ring() {
    let err = SimConfig::from_json_str(r#"{"manager":{"kind":"n_buffer","count":0}}"#)
        .unwrap_err();
    assert!(err.to_string().contains("at least one buffer"));
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = SimConfig::from_json_str("{").unwrap_err();
    assert!(err.to_string().starts_with("serialization error:"));
}
