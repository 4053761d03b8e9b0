// Exchange services
pub mod pair_generator;
pub mod price_cache;

pub use pair_generator::*;
pub use price_cache::*;
