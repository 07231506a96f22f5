pub mod dispatch;

pub use dispatch::{DirectOutboundFactory, DispatchDeps, OutboundDispatcher};
