mod forward;

pub use forward::run_forwarder;
