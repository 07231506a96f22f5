pub mod factory;
pub mod outbound_dispatcher;

pub use factory::DirectOutboundFactory;
pub use outbound_dispatcher::{DispatchDeps, OutboundDispatcher};
