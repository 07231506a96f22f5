mod outbound;

pub use outbound::OutboundServices;
