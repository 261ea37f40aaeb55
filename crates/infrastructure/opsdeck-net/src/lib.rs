pub mod channel;
pub mod wire;

pub use channel::{Channel, ChannelError, ChannelEvent, ChannelHandle, ConnectionEpoch};
pub use wire::{ServerPush, WireError};
