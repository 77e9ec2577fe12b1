pub mod contracts;
pub mod periphery;
pub mod pools;
pub mod providers;
pub mod tokens;
pub mod tx;
