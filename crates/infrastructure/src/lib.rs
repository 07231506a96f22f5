pub mod logging;
pub mod lookup;
pub mod net;
pub mod session;
