use std::sync::Arc;

use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use opsdeck_net::channel::{ChannelEvent, ConnectionEpoch};
use opsdeck_net::wire::{self, LogsResponse};

use crate::dash_core::{DashCommand, DashEvent, DashStore, SyncEvent};
use crate::ports::ChannelPort;

/// The synchronization core's event pump. Owns the only write path to
/// the store: channel lifecycle events, resync responses, pushes and
/// dispatch side effects all funnel through here one at a time, in
/// arrival order.
pub struct DashKernel<C> {
    pub store: DashStore,
    channel: Arc<C>,

    tx: mpsc::Sender<DashEvent>,
    rx: mpsc::Receiver<DashEvent>,
    lifecycle: mpsc::Receiver<ChannelEvent>,
}

impl<C: ChannelPort> DashKernel<C> {
    pub fn new(store: DashStore, channel: C, lifecycle: mpsc::Receiver<ChannelEvent>) -> Self {
        let (tx, rx) = mpsc::channel(opsdeck_config::EVENT_QUEUE_SIZE);
        Self {
            store,
            channel: Arc::new(channel),
            tx,
            rx,
            lifecycle,
        }
    }

    pub fn dispatch(&mut self, cmd: DashCommand) {
        match cmd {
            DashCommand::ApplyGroup(id) => self.emit(wire::APPLY_GROUP, Value::String(id)),

            DashCommand::ApplyInstruction(id) => {
                self.emit(wire::APPLY_INSTRUCTION, Value::String(id))
            }

            DashCommand::FetchUsers => {
                if let Some(epoch) = self.current_epoch() {
                    self.spawn_fetch(epoch, wire::USERS, None, |data| {
                        Ok(SyncEvent::UsersSnapshot(serde_json::from_value(data)?))
                    });
                }
            }

            DashCommand::FetchGlobalVariables => {
                if let Some(epoch) = self.current_epoch() {
                    self.spawn_fetch(epoch, wire::GLOBAL_VARIABLES, None, |data| {
                        Ok(SyncEvent::GlobalVariablesSnapshot(serde_json::from_value(
                            data,
                        )?))
                    });
                }
            }

            DashCommand::FetchOlderLogs => {
                let state = self.store.state();
                if state.reached_log_end {
                    return;
                }
                if let Some(epoch) = state.epoch {
                    let offset = state.logs.len();
                    self.spawn_fetch(
                        epoch,
                        wire::LOGS,
                        Some(json!({ "offset": offset })),
                        |data| {
                            let response: LogsResponse = serde_json::from_value(data)?;
                            Ok(SyncEvent::OlderLogsPage {
                                logs: response.logs,
                                reached_the_end: response.reached_the_end,
                            })
                        },
                    );
                }
            }
        }
    }

    /// Drain pending events without blocking.
    pub fn tick(&mut self) {
        while let Ok(ev) = self.lifecycle.try_recv() {
            self.on_channel_event(ev);
        }
        while let Ok(ev) = self.rx.try_recv() {
            self.apply(ev);
        }
    }

    /// Drive the kernel until the channel task ends (explicit close or
    /// consumer shutdown).
    pub async fn run(&mut self) {
        loop {
            tokio::select! {
                lifecycle_ev = self.lifecycle.recv() => match lifecycle_ev {
                    Some(ev) => self.on_channel_event(ev),
                    None => break,
                },
                Some(ev) = self.rx.recv() => self.apply(ev),
            }
        }
        // Whatever the resync tasks still had in flight.
        while let Ok(ev) = self.rx.try_recv() {
            self.apply(ev);
        }
    }

    pub fn sender(&self) -> mpsc::Sender<DashEvent> {
        self.tx.clone()
    }

    fn on_channel_event(&mut self, ev: ChannelEvent) {
        match ev {
            ChannelEvent::Connected { epoch } => {
                self.store.apply(DashEvent::ChannelUp { epoch });
                self.resync(epoch);
            }
            ChannelEvent::Disconnected { will_retry } => {
                self.store.apply(DashEvent::ChannelDown { will_retry });
            }
            ChannelEvent::Push { epoch, push } => self.apply(DashEvent::Sync {
                epoch,
                ev: push.into(),
            }),
        }
    }

    /// Apply one event, dropping anything from a superseded connection:
    /// the most recent resync is authoritative.
    fn apply(&mut self, ev: DashEvent) {
        if let DashEvent::Sync { epoch, .. } = &ev {
            let current = self.store.state().epoch;
            if current != Some(*epoch) {
                debug!("dropping event from stale connection {epoch}");
                return;
            }
        }
        self.store.apply(ev);
    }

    /// Three independent snapshot requests; they may complete in any
    /// order and each replaces its whole collection.
    fn resync(&self, epoch: ConnectionEpoch) {
        self.spawn_fetch(epoch, wire::GROUPS, None, |data| {
            Ok(SyncEvent::GroupsSnapshot(serde_json::from_value(data)?))
        });
        self.spawn_fetch(epoch, wire::COMMANDS, None, |data| {
            Ok(SyncEvent::CommandsSnapshot(serde_json::from_value(data)?))
        });
        self.spawn_fetch(epoch, wire::LOGS, None, |data| {
            let response: LogsResponse = serde_json::from_value(data)?;
            Ok(SyncEvent::LogsSnapshot {
                logs: response.logs,
                reached_the_end: response.reached_the_end,
            })
        });
    }

    fn spawn_fetch(
        &self,
        epoch: ConnectionEpoch,
        event: &'static str,
        data: Option<Value>,
        parse: fn(Value) -> anyhow::Result<SyncEvent>,
    ) {
        let channel = self.channel.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            match channel.request(event, data).await.and_then(parse) {
                Ok(ev) => {
                    let _ = tx.send(DashEvent::Sync { epoch, ev }).await;
                }
                // A failed resync is not fatal: either the connection
                // dropped (a reconnect re-issues it) or the reply was
                // unusable (the next push or resync supersedes it).
                Err(e) => warn!("{event} request failed: {e:#}"),
            }
        });
    }

    fn emit(&self, event: &'static str, data: Value) {
        let channel = self.channel.clone();
        tokio::spawn(async move {
            if let Err(e) = channel.emit(event, data).await {
                warn!("{event} dispatch failed: {e:#}");
            }
        });
    }

    fn current_epoch(&self) -> Option<ConnectionEpoch> {
        self.store.state().epoch
    }
}
