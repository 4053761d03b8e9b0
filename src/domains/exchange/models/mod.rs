// Exchange models
pub mod coin;
pub mod pair;

pub use coin::*;
pub use pair::*;
