use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock;
use crate::error::MetadataError;
use crate::keys;
use crate::value::{ExportMap, ExportValue};

/// Timing milestone of a stream's lifecycle, in the order they normally occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Milestone {
    SessionConnected,
    StreamCreated,
    StreamStarted,
    StreamLastRequestData,
    StreamResponse,
    StreamFirstData,
    StreamClosed,
}

impl Milestone {
    pub const ALL: [Milestone; 7] = [
        Milestone::SessionConnected,
        Milestone::StreamCreated,
        Milestone::StreamStarted,
        Milestone::StreamLastRequestData,
        Milestone::StreamResponse,
        Milestone::StreamFirstData,
        Milestone::StreamClosed,
    ];

    /// Export key of the timestamp field.
    pub fn key(self) -> &'static str {
        match self {
            Milestone::SessionConnected => keys::TIME_SESSION_CONNECTED,
            Milestone::StreamCreated => keys::TIME_STREAM_CREATED,
            Milestone::StreamStarted => keys::TIME_STREAM_STARTED,
            Milestone::StreamLastRequestData => keys::TIME_STREAM_LAST_REQUEST_DATA,
            Milestone::StreamResponse => keys::TIME_STREAM_RESPONSE,
            Milestone::StreamFirstData => keys::TIME_STREAM_FIRST_DATA,
            Milestone::StreamClosed => keys::TIME_STREAM_CLOSED,
        }
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Telemetry for one protocol stream.
///
/// Created empty by the stream component when the stream begins, then filled
/// in field by field as lifecycle events happen. Nothing is validated on set;
/// use [`StreamMetadata::check_ordering`] to diagnose a finished record.
///
/// Timestamps are monotonic clock readings in seconds (see [`clock::now_secs`]).
/// A value of `0.0` means the milestone was never recorded. When set,
/// `time_session_connected` is expected to be the smallest of them, since the
/// session connects before any of its streams exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamMetadata {
    /// Protocol version tag, e.g. `"3.1"`.
    pub version: String,
    pub stream_id: u32,
    /// Opaque producer-defined latency; not derived from the timestamps.
    pub latency_ms: i64,
    pub tx_bytes: u64,
    pub rx_bytes: u64,
    pub cellular: bool,
    pub connected_ms: u64,
    pub blocked_ms: u64,
    pub host_address: String,
    pub host_port: u16,
    pub via_proxy: bool,

    pub time_session_connected: f64,
    pub time_stream_created: f64,
    pub time_stream_started: f64,
    pub time_stream_last_request_data: f64,
    pub time_stream_response: f64,
    pub time_stream_first_data: f64,
    pub time_stream_closed: f64,
}

impl StreamMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time(&self, milestone: Milestone) -> f64 {
        match milestone {
            Milestone::SessionConnected => self.time_session_connected,
            Milestone::StreamCreated => self.time_stream_created,
            Milestone::StreamStarted => self.time_stream_started,
            Milestone::StreamLastRequestData => self.time_stream_last_request_data,
            Milestone::StreamResponse => self.time_stream_response,
            Milestone::StreamFirstData => self.time_stream_first_data,
            Milestone::StreamClosed => self.time_stream_closed,
        }
    }

    pub fn set_time(&mut self, milestone: Milestone, secs: f64) {
        let slot = match milestone {
            Milestone::SessionConnected => &mut self.time_session_connected,
            Milestone::StreamCreated => &mut self.time_stream_created,
            Milestone::StreamStarted => &mut self.time_stream_started,
            Milestone::StreamLastRequestData => &mut self.time_stream_last_request_data,
            Milestone::StreamResponse => &mut self.time_stream_response,
            Milestone::StreamFirstData => &mut self.time_stream_first_data,
            Milestone::StreamClosed => &mut self.time_stream_closed,
        };
        *slot = secs;
    }

    /// Record `milestone` at the current monotonic time.
    pub fn mark(&mut self, milestone: Milestone) {
        let at = clock::now_secs();
        self.set_time(milestone, at);
        tracing::trace!(stream_id = self.stream_id, %milestone, at, "milestone recorded");
    }

    pub fn is_recorded(&self, milestone: Milestone) -> bool {
        self.time(milestone) != 0.0
    }

    /// Seconds from session connect to `milestone`, if both were recorded.
    pub fn since_connected(&self, milestone: Milestone) -> Option<f64> {
        if !self.is_recorded(Milestone::SessionConnected) || !self.is_recorded(milestone) {
            return None;
        }
        Some(self.time(milestone) - self.time_session_connected)
    }

    pub fn add_tx_bytes(&mut self, n: u64) {
        self.tx_bytes = self.tx_bytes.saturating_add(n);
    }

    pub fn add_rx_bytes(&mut self, n: u64) {
        self.rx_bytes = self.rx_bytes.saturating_add(n);
    }

    /// Verify that no recorded milestone precedes session connect.
    ///
    /// Returns the first offending milestone in lifecycle order. A record
    /// without a session connect time has nothing to check against.
    pub fn check_ordering(&self) -> Result<(), MetadataError> {
        let connected = self.time_session_connected;
        if connected == 0.0 {
            return Ok(());
        }
        for milestone in &Milestone::ALL[1..] {
            let value = self.time(*milestone);
            if value != 0.0 && value < connected {
                return Err(MetadataError::OrderingViolation {
                    milestone: *milestone,
                    value,
                    connected,
                });
            }
        }
        Ok(())
    }

    /// Flat view of every field, unset ones included.
    ///
    /// The result owns its values: mutating the record afterwards does not
    /// change an export that was already taken.
    pub fn export(&self) -> ExportMap {
        let mut map = ExportMap::with_capacity(keys::ALL.len());
        map.set(keys::VERSION, ExportValue::Str(self.version.clone()));
        map.set(keys::STREAM_ID, ExportValue::U64(u64::from(self.stream_id)));
        map.set(keys::LATENCY_MS, ExportValue::I64(self.latency_ms));
        map.set(keys::TX_BYTES, ExportValue::U64(self.tx_bytes));
        map.set(keys::RX_BYTES, ExportValue::U64(self.rx_bytes));
        map.set(keys::CELLULAR, ExportValue::Bool(self.cellular));
        map.set(keys::CONNECTED_MS, ExportValue::U64(self.connected_ms));
        map.set(keys::BLOCKED_MS, ExportValue::U64(self.blocked_ms));
        map.set(keys::HOST_ADDRESS, ExportValue::Str(self.host_address.clone()));
        map.set(keys::HOST_PORT, ExportValue::U64(u64::from(self.host_port)));
        map.set(keys::VIA_PROXY, ExportValue::Bool(self.via_proxy));
        for milestone in Milestone::ALL {
            map.set(milestone.key(), ExportValue::F64(self.time(milestone)));
        }
        map
    }

    /// Rebuild a record from an export. Inverse of [`StreamMetadata::export`].
    ///
    /// Every key must be present. Integers are accepted for timestamps and
    /// non-negative signed integers for unsigned fields, so exports that went
    /// through JSON read back unchanged.
    pub fn from_export(map: &ExportMap) -> Result<Self, MetadataError> {
        let mut record = Self {
            version: read_str(map, keys::VERSION)?,
            stream_id: narrow(read_u64(map, keys::STREAM_ID)?, keys::STREAM_ID)?,
            latency_ms: read_i64(map, keys::LATENCY_MS)?,
            tx_bytes: read_u64(map, keys::TX_BYTES)?,
            rx_bytes: read_u64(map, keys::RX_BYTES)?,
            cellular: read_bool(map, keys::CELLULAR)?,
            connected_ms: read_u64(map, keys::CONNECTED_MS)?,
            blocked_ms: read_u64(map, keys::BLOCKED_MS)?,
            host_address: read_str(map, keys::HOST_ADDRESS)?,
            host_port: narrow(read_u64(map, keys::HOST_PORT)?, keys::HOST_PORT)?,
            via_proxy: read_bool(map, keys::VIA_PROXY)?,
            ..Self::default()
        };
        for milestone in Milestone::ALL {
            record.set_time(milestone, read_f64(map, milestone.key())?);
        }
        Ok(record)
    }
}

fn present<'a>(map: &'a ExportMap, key: &'static str) -> Result<&'a ExportValue, MetadataError> {
    map.get(key).ok_or(MetadataError::MissingKey(key))
}

fn mismatch(key: &'static str, expected: &'static str, found: &ExportValue) -> MetadataError {
    MetadataError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.type_name(),
    }
}

fn read_str(map: &ExportMap, key: &'static str) -> Result<String, MetadataError> {
    let value = present(map, key)?;
    map.get_str(key)
        .map(str::to_owned)
        .ok_or_else(|| mismatch(key, "string", value))
}

fn read_bool(map: &ExportMap, key: &'static str) -> Result<bool, MetadataError> {
    let value = present(map, key)?;
    map.get_bool(key).ok_or_else(|| mismatch(key, "bool", value))
}

fn read_f64(map: &ExportMap, key: &'static str) -> Result<f64, MetadataError> {
    let value = present(map, key)?;
    map.get_f64(key).ok_or_else(|| mismatch(key, "number", value))
}

fn read_u64(map: &ExportMap, key: &'static str) -> Result<u64, MetadataError> {
    match present(map, key)? {
        ExportValue::U64(_) | ExportValue::I64(_) => {
            map.get_u64(key).ok_or(MetadataError::OutOfRange { key })
        }
        other => Err(mismatch(key, "unsigned integer", other)),
    }
}

fn read_i64(map: &ExportMap, key: &'static str) -> Result<i64, MetadataError> {
    match present(map, key)? {
        ExportValue::U64(_) | ExportValue::I64(_) => {
            map.get_i64(key).ok_or(MetadataError::OutOfRange { key })
        }
        other => Err(mismatch(key, "integer", other)),
    }
}

fn narrow<T: TryFrom<u64>>(value: u64, key: &'static str) -> Result<T, MetadataError> {
    T::try_from(value).map_err(|_| MetadataError::OutOfRange { key })
}
