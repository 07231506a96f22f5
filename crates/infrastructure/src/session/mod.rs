pub mod channel;
pub mod io;

pub use channel::{channel_pair, ChannelInbound, ChannelOutbound, InboundSide};
pub use io::{IoInboundReader, IoOutboundWriter};
