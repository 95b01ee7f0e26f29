//! Нечеткий контроллер движения робота
//!
//! Состояние робота (поза, сонары, двери) переводится в команды линейной и
//! угловой скорости через таблицу нечетких правил активного поведения.
//! Одометрия, карта, планировщик и внешний цикл управления сюда не входят.
#![cfg_attr(not(test), no_std)]

// макросы логирования должны быть объявлены первыми
mod fmt;

pub mod config;
pub mod control;
pub mod data;
pub mod error;
pub mod utils;

pub use control::behavior::Behavior;
pub use control::controller::{ActiveBehavior, Controller};
pub use control::engine::{FuzzyController, InputState, RuleBase, Verbosity};
pub use control::membership::Membership;
pub use data::{BehaviorParam, DoorId, Location, Pose, RobotState, SonarReading, VelocityCommand};
pub use error::{ErrorClass, FuzzyError};
