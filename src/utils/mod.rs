pub mod math;
pub mod sonar;
