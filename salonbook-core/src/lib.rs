pub mod catalog;
pub mod defaults;
pub mod errors;
pub mod filters;
pub mod models;
pub mod repo;

pub use catalog::*;
pub use defaults::*;
pub use errors::*;
pub use filters::*;
pub use models::*;
pub use repo::*;
