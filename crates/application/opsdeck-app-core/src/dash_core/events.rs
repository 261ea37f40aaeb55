use serde_json::Value;

use opsdeck_core::{Command, Group, GroupId, LogEntry, Status};
use opsdeck_net::channel::ConnectionEpoch;
use opsdeck_net::wire::{InstructionStatus, ServerPush};

#[derive(Debug, Clone)]
pub enum DashEvent {
    // Channel lifecycle
    ChannelUp {
        epoch: ConnectionEpoch,
    },
    ChannelDown {
        will_retry: bool,
    },

    /// State mutation produced by the connection identified by `epoch`.
    /// The kernel drops it if the epoch is no longer current.
    Sync {
        epoch: ConnectionEpoch,
        ev: SyncEvent,
    },
}

/// One state-bearing event: a resync response or an incremental push.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    // Resync snapshots; each replaces its whole collection.
    GroupsSnapshot(Vec<Group>),
    CommandsSnapshot(Vec<Command>),
    /// `logs` is oldest-first as received; the reducer reverses it to
    /// the canonical newest-first order.
    LogsSnapshot {
        logs: Vec<LogEntry>,
        reached_the_end: bool,
    },
    /// Older page fetched on demand, appended behind the current tail.
    OlderLogsPage {
        logs: Vec<LogEntry>,
        reached_the_end: bool,
    },
    UsersSnapshot(Vec<Value>),
    GlobalVariablesSnapshot(Vec<Value>),

    // Incremental pushes
    GroupAdded(Group),
    GroupModified(Group),
    GroupRemoved(GroupId),
    InstructionStatus(InstructionStatus),
    GroupStatus {
        group: GroupId,
        status: Status,
    },
    Log(LogEntry),
}

impl From<ServerPush> for SyncEvent {
    fn from(push: ServerPush) -> Self {
        match push {
            ServerPush::AddGroup(group) => SyncEvent::GroupAdded(group),
            ServerPush::ModifyGroup(group) => SyncEvent::GroupModified(group),
            ServerPush::RemoveGroup(id) => SyncEvent::GroupRemoved(id),
            ServerPush::Status(update) => SyncEvent::InstructionStatus(update),
            ServerPush::GroupStatus { group, status } => SyncEvent::GroupStatus { group, status },
            ServerPush::Log(entry) => SyncEvent::Log(entry),
        }
    }
}
