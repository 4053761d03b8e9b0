// Configuration
pub mod db_config;
pub mod schema_names;

pub use db_config::*;
pub use schema_names::*;
