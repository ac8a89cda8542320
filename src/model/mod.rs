pub mod collection;
pub mod config;
pub mod search;
pub mod tag;

pub use collection::*;
pub use config::*;
pub use search::*;
pub use tag::*;
