pub mod hosts;
pub mod system;

pub use hosts::StaticHostsLookup;
pub use system::SystemNameLookup;
