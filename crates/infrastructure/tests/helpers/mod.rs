mod echo_servers;

pub use echo_servers::*;
