pub mod commands;

use anyhow::Context;
use tokio::sync::mpsc;
use url::Url;

use opsdeck_app_core::{DashKernel, DashState, DashStore};
use opsdeck_net::channel::{Channel, ChannelHandle};

/// A live connection: the kernel driving the mirrored state plus the
/// outbound handle. One-shot commands talk through the handle; `watch`
/// runs the kernel loop.
pub struct Session {
    pub kernel: DashKernel<ChannelHandle>,
    pub handle: ChannelHandle,
}

pub fn connect(url: &str) -> anyhow::Result<Session> {
    let url = Url::parse(url).with_context(|| format!("invalid server url {url:?}"))?;
    let (events_tx, events_rx) = mpsc::channel(opsdeck_config::EVENT_QUEUE_SIZE);
    let handle = Channel::spawn(url, events_tx);
    let store = DashStore::new(DashState::default());
    let kernel = DashKernel::new(store, handle.clone(), events_rx);
    Ok(Session { kernel, handle })
}
