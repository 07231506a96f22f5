pub mod destination_resolver;
pub mod duplex_relay;
pub mod retrying_dialer;

pub use destination_resolver::DestinationResolver;
pub use duplex_relay::{effective_timeout, DownlinkEnd, DuplexRelay, RelayReport, UplinkEnd};
pub use retrying_dialer::{RetryPolicy, RetryingDialer};
