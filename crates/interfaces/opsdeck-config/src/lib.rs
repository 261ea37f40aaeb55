//! Central configuration constants for the channel and its consumers.

/// Default dashboard endpoint.
pub const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:35653/ws";

/// First reconnection delay after an unplanned drop (milliseconds).
pub const RECONNECT_INITIAL_DELAY_MS: u64 = 500;

/// Ceiling for the reconnection delay (milliseconds).
pub const RECONNECT_MAX_DELAY_MS: u64 = 30_000;

/// Capacity of the event queues between the channel task and the kernel.
pub const EVENT_QUEUE_SIZE: usize = 100;

/// How long an outbound request waits for its reply (seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Convenience function to clamp a reconnection delay into allowed range.
pub fn clamp_reconnect_delay_ms(v: u64) -> u64 {
    v.clamp(RECONNECT_INITIAL_DELAY_MS, RECONNECT_MAX_DELAY_MS)
}
