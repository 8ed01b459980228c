pub mod config;
pub mod count;
pub mod discovery;
pub mod loader;
pub mod paths;
pub mod receipt;
pub mod snapshot;
pub mod status;
pub mod team;
pub mod warn;
