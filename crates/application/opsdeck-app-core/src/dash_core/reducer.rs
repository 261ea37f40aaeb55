use crate::domain::DashState;

use super::events::{DashEvent, SyncEvent};

/// Pure state transition. Epoch filtering happens in the kernel before
/// an event reaches this function; by the time it does, the event is
/// authoritative.
pub fn reduce(mut state: DashState, ev: DashEvent) -> DashState {
    match ev {
        DashEvent::ChannelUp { epoch } => {
            state.epoch = Some(epoch);
            state.reconnecting = false;
        }

        DashEvent::ChannelDown { will_retry } => {
            state.reconnecting = will_retry;
        }

        DashEvent::Sync { epoch: _, ev } => apply_sync(&mut state, ev),
    }
    state
}

fn apply_sync(state: &mut DashState, ev: SyncEvent) {
    match ev {
        SyncEvent::GroupsSnapshot(groups) => state.groups = groups,

        SyncEvent::CommandsSnapshot(commands) => state.commands = commands,

        SyncEvent::LogsSnapshot {
            mut logs,
            reached_the_end,
        } => {
            logs.reverse();
            state.logs = logs;
            state.reached_log_end = reached_the_end;
        }

        SyncEvent::OlderLogsPage {
            mut logs,
            reached_the_end,
        } => {
            logs.reverse();
            state.logs.append(&mut logs);
            if reached_the_end {
                state.reached_log_end = true;
            }
        }

        SyncEvent::UsersSnapshot(users) => state.users = users,

        SyncEvent::GlobalVariablesSnapshot(variables) => state.global_variables = variables,

        SyncEvent::GroupAdded(group) => state.groups.push(group),

        SyncEvent::GroupModified(group) => {
            if let Some(ix) = state.groups.iter().position(|g| g.id == group.id) {
                state.groups[ix] = group;
            }
        }

        SyncEvent::GroupRemoved(id) => state.groups.retain(|g| g.id != id),

        SyncEvent::InstructionStatus(update) => {
            // Instruction ids are globally unique, so at most one hit;
            // the scan still covers every group.
            for group in &mut state.groups {
                for instruction in &mut group.instructions {
                    if instruction.id == update.instruction {
                        instruction.status = update.status;
                        instruction.info = update.info.clone();
                        instruction.detail_type = update.detail_type;
                        instruction.detail = update.detail.clone();
                    }
                }
            }
        }

        SyncEvent::GroupStatus { group, status } => {
            if let Some(g) = state.groups.iter_mut().find(|g| g.id == group) {
                g.status = status;
            }
        }

        SyncEvent::Log(entry) => state.logs.insert(0, entry),
    }
}
