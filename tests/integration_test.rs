//! Integration tests for the safe-types accessors

use std::sync::Arc;

use safe_types::{
    decode_mapping, format_transport_date, parse_transport_date, parse_uuid, AccessorConfig, DumpPolicy,
    EventId, FieldValue, MappingDump, MemoryLogger, Numeric, SafeAccessor, TraceCapture, UntypedMapping,
};

fn accessor() -> (SafeAccessor, Arc<MemoryLogger>) {
    let logger = Arc::new(MemoryLogger::new());
    (SafeAccessor::new(logger.clone()), logger)
}

#[test]
fn test_uuid_scenario() {
    let (accessor, logger) = accessor();
    let mapping = decode_mapping(r#"{"id": "a1b2c3d4-e5f6-7890-abcd-ef1234567890"}"#).unwrap();

    assert_eq!(
        accessor.uuid(&mapping, "id"),
        parse_uuid("a1b2c3d4-e5f6-7890-abcd-ef1234567890")
    );
    assert!(logger.is_empty());

    assert_eq!(accessor.uuid(&mapping, "missing"), None);
    assert_eq!(logger.len(), 1);
    assert!(logger.messages()[0].starts_with("nil values for missing"));
}

#[test]
fn test_count_scenario() {
    let (accessor, logger) = accessor();
    let mapping = decode_mapping(r#"{"count": 42}"#).unwrap();

    assert_eq!(accessor.number(&mapping, "count"), Some(Numeric::Int(42)));
    assert!(logger.is_empty());

    assert_eq!(accessor.string(&mapping, "count"), None);
    assert_eq!(logger.len(), 1);
    assert!(logger.messages()[0].contains("is not a valid String for key 'count'"));
}

#[test]
fn test_null_tag_scenario() {
    let (accessor, logger) = accessor();
    let mapping = decode_mapping(r#"{"tag": null}"#).unwrap();

    assert_eq!(accessor.optional_string(&mapping, "tag"), None);
    assert!(logger.is_empty());
}

#[test]
fn test_missing_key_logging_per_family() {
    let (accessor, logger) = accessor();
    let mapping = UntypedMapping::new();

    assert!(accessor.optional_string(&mapping, "k").is_none());
    assert!(accessor.optional_number(&mapping, "k").is_none());
    assert!(accessor.optional_array(&mapping, "k").is_none());
    assert!(accessor.optional_data(&mapping, "k").is_none());
    assert!(accessor.optional_dictionary(&mapping, "k").is_none());
    assert!(accessor.optional_uuid(&mapping, "k").is_none());
    assert!(accessor.optional_date(&mapping, "k").is_none());
    assert!(accessor.optional_event(&mapping, "k").is_none());
    assert!(logger.is_empty());

    assert!(accessor.string(&mapping, "k").is_none());
    assert!(accessor.number(&mapping, "k").is_none());
    assert!(accessor.array(&mapping, "k").is_none());
    assert!(accessor.data(&mapping, "k").is_none());
    assert!(accessor.dictionary(&mapping, "k").is_none());
    assert!(accessor.uuid(&mapping, "k").is_none());
    assert!(accessor.date(&mapping, "k").is_none());
    assert!(accessor.event(&mapping, "k").is_none());
    assert_eq!(logger.len(), 8);
}

#[test]
fn test_date_round_trip() {
    let (accessor, logger) = accessor();
    let s = "2021-02-03T04:05:06.789Z";
    let mapping = decode_mapping(&format!(r#"{{"time": "{}"}}"#, s)).unwrap();

    let date = accessor.date(&mapping, "time").unwrap();
    assert_eq!(Some(date), parse_transport_date(s));
    assert_eq!(format_transport_date(&date), s);
    assert!(logger.is_empty());
}

#[test]
fn test_malformed_date_and_event() {
    let (accessor, logger) = accessor();
    let mapping = decode_mapping(r#"{"time": "03/02/2021", "ev": "not-an-event"}"#).unwrap();

    assert_eq!(accessor.optional_date(&mapping, "time"), None);
    assert_eq!(accessor.optional_event(&mapping, "ev"), None);
    assert_eq!(logger.len(), 2);
    assert!(logger.messages()[0].contains("is not a valid Date"));
    assert!(logger.messages()[1].contains("is not a valid EventID"));
}

#[test]
fn test_event_scenario() {
    let (accessor, _logger) = accessor();
    let mapping = decode_mapping(r#"{"event": "5.800112314201e3a8"}"#).unwrap();

    assert_eq!(
        accessor.event(&mapping, "event"),
        Some(EventId::new(5, 0x8001_1231_4201_e3a8))
    );
}

#[test]
fn test_nested_dictionary_reuse() {
    let (accessor, logger) = accessor();
    let mapping = decode_mapping(
        r#"{"conversation": {"id": "a1b2c3d4-e5f6-7890-abcd-ef1234567890", "members": ["x", "y"]}}"#,
    )
    .unwrap();

    let conversation = accessor.dictionary(&mapping, "conversation").unwrap();
    assert!(accessor.uuid(&conversation, "id").is_some());
    assert_eq!(
        accessor.array(&conversation, "members"),
        Some(vec![FieldValue::from("x"), FieldValue::from("y")])
    );
    assert!(logger.is_empty());
}

#[test]
fn test_keys_only_policy_hides_values() {
    let logger = Arc::new(MemoryLogger::new());
    let accessor = SafeAccessor::new(logger.clone())
        .with_trace(TraceCapture::Disabled)
        .with_dump_policy(DumpPolicy::new(MappingDump::KeysOnly));
    let mapping = decode_mapping(r#"{"secret": "hunter2"}"#).unwrap();

    assert_eq!(accessor.string(&mapping, "user"), None);
    assert_eq!(
        logger.messages(),
        vec!["nil values for user in {keys: [secret]}. Callstack:\n <unavailable>".to_string()]
    );
}

#[test]
fn test_accessor_is_shareable_across_threads() {
    let (accessor, logger) = accessor();
    let mapping = Arc::new(decode_mapping(r#"{"count": 1}"#).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let accessor = accessor.clone();
            let mapping = Arc::clone(&mapping);
            std::thread::spawn(move || {
                for _ in 0..25 {
                    assert!(accessor.string(&mapping, "count").is_none());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(logger.len(), 100);
}

#[test]
fn test_from_config_uses_policy() {
    let config = AccessorConfig::from_yaml_str(
        "accessor:\n  trace: disabled\n  mapping_dump: omitted\n",
    )
    .unwrap();
    let accessor = SafeAccessor::from_config(&config);

    assert_eq!(accessor.trace(), &TraceCapture::Disabled);
    assert_eq!(accessor.dump_policy().mode, MappingDump::Omitted);
}

#[test]
fn test_shipped_config_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/accessor.yaml");
    let config = AccessorConfig::load_from_file(path).unwrap();

    assert_eq!(config.trace_capture(), TraceCapture::Caller);
    assert!(config.dump_policy().is_redacted("access_token"));
    assert_eq!(config.dump_policy().max_chars, Some(4096));
}
