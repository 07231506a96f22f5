mod dialer;
mod dispatch_log;
mod name_lookup;
mod session_stream;

pub use dialer::{BoxedConnection, Connection, Dialer};
pub use dispatch_log::DispatchLog;
pub use name_lookup::NameLookup;
pub use session_stream::{
    InboundHandle, InboundReader, OutboundHandle, OutboundWriter, StreamPair,
};
