pub mod behavior;
pub mod behaviors;
pub mod controller;
pub mod engine;
pub mod eval;
pub mod membership;
