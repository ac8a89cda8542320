pub mod config_io;
pub mod logging;
pub mod persist;
pub mod search_backend;
pub mod store;
