//! Export view: fixed key set, unset values, ordering and isolation.

use stream_metadata::{ExportValue, Milestone, StreamMetadata, keys};

/// A record filled the way a stream component would over a request's life.
fn lifecycle_record() -> StreamMetadata {
    let mut record = StreamMetadata::new();
    record.version = "3.1".into();
    record.stream_id = 7;
    record.host_address = "203.0.113.9".into();
    record.host_port = 443;
    record.cellular = true;

    record.time_session_connected = 100.000;
    record.time_stream_created = 100.250;
    record.time_stream_started = 100.251;
    record.add_tx_bytes(512);
    record.time_stream_last_request_data = 100.300;
    record.time_stream_response = 100.480;
    record.time_stream_first_data = 100.482;
    record.add_rx_bytes(16_384);
    record.add_rx_bytes(2_048);
    record.time_stream_closed = 100.900;
    record.latency_ms = 180;
    record.connected_ms = 40;
    record.blocked_ms = 3;
    record
}

#[test]
fn fresh_record_exports_every_key_as_unset() {
    let export = StreamMetadata::new().export();

    assert_eq!(export.len(), keys::ALL.len());
    assert_eq!(export.keys().collect::<Vec<_>>(), keys::ALL.to_vec());

    for milestone in Milestone::ALL {
        assert_eq!(export.get_f64(milestone.key()), Some(0.0), "{milestone}");
    }
    assert_eq!(export.get_u64(keys::TX_BYTES), Some(0));
    assert_eq!(export.get_u64(keys::RX_BYTES), Some(0));
    assert_eq!(export.get_u64(keys::STREAM_ID), Some(0));
    assert_eq!(export.get_i64(keys::LATENCY_MS), Some(0));
    assert_eq!(export.get_str(keys::VERSION), Some(""));
    assert_eq!(export.get_str(keys::HOST_ADDRESS), Some(""));
    assert_eq!(export.get_bool(keys::CELLULAR), Some(false));
    assert_eq!(export.get_bool(keys::VIA_PROXY), Some(false));
}

#[test]
fn export_carries_portable_scalar_types() {
    let export = lifecycle_record().export();

    assert_eq!(export.get(keys::VERSION), Some(&ExportValue::Str("3.1".into())));
    assert_eq!(export.get(keys::STREAM_ID), Some(&ExportValue::U64(7)));
    assert_eq!(export.get(keys::LATENCY_MS), Some(&ExportValue::I64(180)));
    assert_eq!(export.get(keys::RX_BYTES), Some(&ExportValue::U64(18_432)));
    assert_eq!(export.get(keys::HOST_PORT), Some(&ExportValue::U64(443)));
    assert_eq!(export.get(keys::CELLULAR), Some(&ExportValue::Bool(true)));
    assert_eq!(
        export.get(keys::TIME_STREAM_CLOSED),
        Some(&ExportValue::F64(100.900))
    );
}

#[test]
fn realistic_lifecycle_honours_connect_lower_bound() {
    let record = lifecycle_record();
    record.check_ordering().unwrap();

    let connected = record.time_session_connected;
    for milestone in Milestone::ALL {
        let t = record.time(milestone);
        assert!(t == 0.0 || connected <= t, "{milestone} at {t} before connect {connected}");
    }
}

#[test]
fn clock_driven_lifecycle_honours_connect_lower_bound() {
    let mut record = StreamMetadata::new();
    for milestone in Milestone::ALL {
        record.mark(milestone);
    }
    record.check_ordering().unwrap();

    for pair in Milestone::ALL.windows(2) {
        assert!(record.time(pair[0]) <= record.time(pair[1]));
    }
}

#[test]
fn export_preserves_timestamp_order_without_clamping() {
    let mut record = StreamMetadata::new();
    record.time_session_connected = 2.0;
    record.time_stream_created = 2.0;
    record.time_stream_response = 9.75;
    record.time_stream_closed = 3.5;

    let export = record.export();
    let connected = export.get_f64(keys::TIME_SESSION_CONNECTED).unwrap();
    for milestone in Milestone::ALL {
        let exported = export.get_f64(milestone.key()).unwrap();
        assert_eq!(exported, record.time(milestone));
        assert!(exported == 0.0 || connected <= exported);
    }
    assert_eq!(export.get_f64(keys::TIME_STREAM_STARTED), Some(0.0));
}

#[test]
fn export_is_a_snapshot() {
    let mut record = lifecycle_record();
    let before = record.export();

    record.add_rx_bytes(1);
    record.version = "h2".into();
    record.time_stream_closed = 200.0;

    assert_eq!(before.get_u64(keys::RX_BYTES), Some(18_432));
    assert_eq!(before.get_str(keys::VERSION), Some("3.1"));
    assert_eq!(before.get_f64(keys::TIME_STREAM_CLOSED), Some(100.900));
    assert_ne!(before, record.export());
}

#[test]
fn json_round_trip_reads_back_the_same_record() {
    let record = lifecycle_record();
    let line = serde_json::to_string(&record.export()).unwrap();

    let parsed = stream_metadata::ExportMap::from_json_str(&line).unwrap();
    assert_eq!(StreamMetadata::from_export(&parsed).unwrap(), record);
}

#[test]
fn unset_timestamps_survive_json_as_zero() {
    let parsed =
        stream_metadata::ExportMap::from_json(&StreamMetadata::new().export().to_json()).unwrap();
    let record = StreamMetadata::from_export(&parsed).unwrap();

    assert_eq!(record, StreamMetadata::new());
}
