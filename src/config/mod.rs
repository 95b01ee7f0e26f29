pub mod behavior;
pub mod engine;
pub mod robot;
