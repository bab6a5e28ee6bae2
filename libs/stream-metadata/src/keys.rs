//! Stable export key names.
//!
//! Consumers (log shippers, analytics, debugging UIs) match on these strings,
//! so they never change once released.

pub const VERSION: &str = "version";
pub const STREAM_ID: &str = "streamId";
pub const LATENCY_MS: &str = "latencyMs";
pub const TX_BYTES: &str = "txBytes";
pub const RX_BYTES: &str = "rxBytes";
pub const CELLULAR: &str = "cellular";
pub const CONNECTED_MS: &str = "connectedMs";
pub const BLOCKED_MS: &str = "blockedMs";
pub const HOST_ADDRESS: &str = "hostAddress";
pub const HOST_PORT: &str = "hostPort";
pub const VIA_PROXY: &str = "viaProxy";

/// Monotonic timestamps, seconds. `0` means not recorded.
pub const TIME_SESSION_CONNECTED: &str = "timeSessionConnected";
pub const TIME_STREAM_CREATED: &str = "timeStreamCreated";
pub const TIME_STREAM_STARTED: &str = "timeStreamStarted";
pub const TIME_STREAM_LAST_REQUEST_DATA: &str = "timeStreamLastRequestData";
pub const TIME_STREAM_RESPONSE: &str = "timeStreamResponse";
pub const TIME_STREAM_FIRST_DATA: &str = "timeStreamFirstData";
pub const TIME_STREAM_CLOSED: &str = "timeStreamClosed";

/// Every export key, in export order.
pub const ALL: [&str; 18] = [
    VERSION,
    STREAM_ID,
    LATENCY_MS,
    TX_BYTES,
    RX_BYTES,
    CELLULAR,
    CONNECTED_MS,
    BLOCKED_MS,
    HOST_ADDRESS,
    HOST_PORT,
    VIA_PROXY,
    TIME_SESSION_CONNECTED,
    TIME_STREAM_CREATED,
    TIME_STREAM_STARTED,
    TIME_STREAM_LAST_REQUEST_DATA,
    TIME_STREAM_RESPONSE,
    TIME_STREAM_FIRST_DATA,
    TIME_STREAM_CLOSED,
];
