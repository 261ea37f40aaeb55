use serde_json::Value;

use opsdeck_net::channel::ChannelHandle;

/// Outbound side of the connection channel, as the kernel sees it.
#[async_trait::async_trait]
pub trait ChannelPort: Send + Sync + 'static {
    /// Request/response exchange; resolves when the server replies.
    async fn request(&self, event: &'static str, data: Option<Value>) -> anyhow::Result<Value>;

    /// Fire-and-forget frame; no acknowledgment is awaited.
    async fn emit(&self, event: &'static str, data: Value) -> anyhow::Result<()>;
}

#[async_trait::async_trait]
impl ChannelPort for ChannelHandle {
    async fn request(&self, event: &'static str, data: Option<Value>) -> anyhow::Result<Value> {
        Ok(ChannelHandle::request(self, event, data).await?)
    }

    async fn emit(&self, event: &'static str, data: Value) -> anyhow::Result<()> {
        Ok(ChannelHandle::emit(self, event, data).await?)
    }
}
