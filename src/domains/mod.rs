// Domain modules
pub mod exchange;
