// Database module
pub mod connection;
pub mod executor;
pub mod memory;
pub mod mysql;
pub mod provisioning;
pub mod table_specs;

pub use connection::*;
pub use executor::*;
pub use memory::*;
pub use mysql::*;
pub use provisioning::*;
