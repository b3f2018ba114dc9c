pub mod config;
pub mod store;
pub mod todo;

pub use config::*;
pub use store::*;
pub use todo::*;
