pub mod dash_core;
pub mod domain;
pub mod kernel;
pub mod ports;
pub mod projections;

pub use dash_core::*;
pub use domain::DashState;
pub use kernel::DashKernel;
pub use ports::ChannelPort;
pub use projections::Projections;
