use serde_json::Value;

use opsdeck_core::{Command, Group, LogEntry};
use opsdeck_net::channel::ConnectionEpoch;

/// Server-owned state mirrored for the lifetime of a dashboard session.
/// Owned exclusively by the synchronization core; everything else reads
/// snapshots.
#[derive(Debug, Clone, Default)]
pub struct DashState {
    /// Epoch of the connection currently feeding this state. `None`
    /// until the first successful handshake.
    pub epoch: Option<ConnectionEpoch>,
    /// True while the channel recovers from an unplanned drop.
    pub reconnecting: bool,

    pub groups: Vec<Group>,
    pub commands: Vec<Command>,
    /// Newest-first.
    pub logs: Vec<LogEntry>,
    /// Set once the server reports no older log entries remain. Only a
    /// full resync resets it.
    pub reached_log_end: bool,

    // Lazily fetched, opaque to the core.
    pub users: Vec<Value>,
    pub global_variables: Vec<Value>,
}
