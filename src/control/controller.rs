//! Контроллер поведений
//!
//! Владеет не более чем одним активным поведением, прогоняет через него
//! цикл управления и хранит последние выходы для внешнего цикла.
//! Поведения создаются по имени через реестр `REGISTRY`.

use crate::config::behavior::ACHIEVEMENT_THRESHOLD;
use crate::config::robot::{MAX_ANGULAR_SPEED_RAD_S, MAX_LINEAR_SPEED_MS};
use crate::control::behavior::Behavior;
use crate::control::behaviors::{CloseDoor, Cross, GoTo, OpenDoor};
use crate::control::engine::{FuzzyController, Verbosity};
use crate::data::{BehaviorParam, RobotState, VelocityCommand};
use crate::error::{snippet, FuzzyError};
use crate::utils::math::constrain;

/// Активное поведение
pub enum ActiveBehavior {
    GoTo(GoTo),
    Cross(Cross),
    Open(OpenDoor),
    Close(CloseDoor),
}

impl ActiveBehavior {
    pub fn name(&self) -> &'static str {
        match self {
            ActiveBehavior::GoTo(_) => GoTo::NAME,
            ActiveBehavior::Cross(_) => Cross::NAME,
            ActiveBehavior::Open(_) => OpenDoor::NAME,
            ActiveBehavior::Close(_) => CloseDoor::NAME,
        }
    }

    pub fn controller(&self) -> &FuzzyController {
        match self {
            ActiveBehavior::GoTo(b) => b.controller(),
            ActiveBehavior::Cross(b) => b.controller(),
            ActiveBehavior::Open(b) => b.controller(),
            ActiveBehavior::Close(b) => b.controller(),
        }
    }

    fn run(&mut self, state: &RobotState, verbosity: Verbosity) -> Result<f32, FuzzyError> {
        match self {
            ActiveBehavior::GoTo(b) => b.run(state, verbosity),
            ActiveBehavior::Cross(b) => b.run(state, verbosity),
            ActiveBehavior::Open(b) => b.run(state, verbosity),
            ActiveBehavior::Close(b) => b.run(state, verbosity),
        }
    }

    fn velocities(&self) -> (f32, f32) {
        match self {
            ActiveBehavior::GoTo(b) => (b.vlin(), b.vrot()),
            ActiveBehavior::Cross(b) => (b.vlin(), b.vrot()),
            ActiveBehavior::Open(b) => (b.vlin(), b.vrot()),
            ActiveBehavior::Close(b) => (b.vlin(), b.vrot()),
        }
    }
}

type Constructor = fn(BehaviorParam) -> Result<ActiveBehavior, FuzzyError>;

fn make_goto(param: BehaviorParam) -> Result<ActiveBehavior, FuzzyError> {
    match param {
        BehaviorParam::Location(target) => GoTo::new(target).map(ActiveBehavior::GoTo),
        _ => Err(FuzzyError::InvalidParameter {
            behavior: GoTo::NAME,
        }),
    }
}

fn make_cross(param: BehaviorParam) -> Result<ActiveBehavior, FuzzyError> {
    match param {
        BehaviorParam::Location(door) => Cross::new(door).map(ActiveBehavior::Cross),
        _ => Err(FuzzyError::InvalidParameter {
            behavior: Cross::NAME,
        }),
    }
}

fn make_open(param: BehaviorParam) -> Result<ActiveBehavior, FuzzyError> {
    match param {
        BehaviorParam::Door(door) => OpenDoor::new(door).map(ActiveBehavior::Open),
        _ => Err(FuzzyError::InvalidParameter {
            behavior: OpenDoor::NAME,
        }),
    }
}

fn make_close(param: BehaviorParam) -> Result<ActiveBehavior, FuzzyError> {
    match param {
        BehaviorParam::Door(door) => CloseDoor::new(door).map(ActiveBehavior::Close),
        _ => Err(FuzzyError::InvalidParameter {
            behavior: CloseDoor::NAME,
        }),
    }
}

/// Реестр поведений: имя -> конструктор
pub const REGISTRY: &[(&str, Constructor)] = &[
    (GoTo::NAME, make_goto),
    (Cross::NAME, make_cross),
    (OpenDoor::NAME, make_open),
    (CloseDoor::NAME, make_close),
];

pub struct Controller {
    active: Option<ActiveBehavior>,
    verbosity: Verbosity,
    achieved: f32,
    vlin: f32,
    vrot: f32,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    pub const fn new() -> Self {
        Self {
            active: None,
            verbosity: Verbosity::QUIET,
            achieved: 0.0,
            vlin: 0.0,
            vrot: 0.0,
        }
    }

    pub fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Замена активного поведения новым экземпляром
    ///
    /// Прежнее поведение отбрасывается до создания нового, поэтому при
    /// ошибке активного поведения не остается.
    pub fn set_behavior(&mut self, name: &str, param: BehaviorParam) -> Result<(), FuzzyError> {
        self.active = None;
        self.achieved = 0.0;
        self.vlin = 0.0;
        self.vrot = 0.0;

        let constructor = REGISTRY
            .iter()
            .find(|(registered, _)| *registered == name)
            .map(|(_, constructor)| *constructor)
            .ok_or_else(|| FuzzyError::UnknownBehavior {
                name: snippet(name),
            })?;

        match constructor(param) {
            Ok(behavior) => {
                info!("Активное поведение: {}", behavior.name());
                self.active = Some(behavior);
                Ok(())
            }
            Err(e) => {
                error!("Поведение {} не создано", name);
                Err(e)
            }
        }
    }

    /// Один цикл активного поведения; возвращает степень достижения
    pub fn run(&mut self, state: &RobotState) -> Result<f32, FuzzyError> {
        let behavior = self.active.as_mut().ok_or(FuzzyError::NoActiveBehavior)?;
        let achieved = behavior.run(state, self.verbosity)?;
        let (vlin, vrot) = behavior.velocities();

        self.achieved = achieved;
        self.vlin = vlin;
        self.vrot = vrot;
        Ok(achieved)
    }

    pub fn behavior(&self) -> Option<&ActiveBehavior> {
        self.active.as_ref()
    }

    pub fn behavior_name(&self) -> Option<&'static str> {
        self.active.as_ref().map(ActiveBehavior::name)
    }

    /// Линейная скорость последнего цикла, м/с
    pub fn vlin(&self) -> f32 {
        self.vlin
    }

    /// Угловая скорость последнего цикла, рад/с
    pub fn vrot(&self) -> f32 {
        self.vrot
    }

    pub fn achieved(&self) -> f32 {
        self.achieved
    }

    pub fn is_achieved(&self) -> bool {
        self.achieved >= ACHIEVEMENT_THRESHOLD
    }

    /// Команда для модуля исполнения с ограничением по скоростям робота
    pub fn command(&self) -> VelocityCommand {
        VelocityCommand {
            vlin: constrain(self.vlin, -MAX_LINEAR_SPEED_MS, MAX_LINEAR_SPEED_MS),
            vrot: constrain(self.vrot, -MAX_ANGULAR_SPEED_RAD_S, MAX_ANGULAR_SPEED_RAD_S),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DoorId, Location, Pose};
    use crate::error::ErrorClass;

    #[test]
    fn test_run_without_behavior() {
        let mut ctl = Controller::new();
        let err = ctl.run(&RobotState::new(Pose::default())).unwrap_err();
        assert_eq!(err, FuzzyError::NoActiveBehavior);
        assert_eq!(err.class(), ErrorClass::Precondition);
    }

    #[test]
    fn test_registry_names() {
        let mut ctl = Controller::new();
        for (name, param) in [
            ("GoTo", BehaviorParam::Location(Location::new(1.0, 0.0, 0.0, 0.0))),
            ("Cross", BehaviorParam::Location(Location::new(1.0, 0.0, 0.0, 0.4))),
            ("Open", BehaviorParam::Door(DoorId(0))),
            ("Close", BehaviorParam::Door(DoorId(0))),
        ] {
            ctl.set_behavior(name, param).unwrap();
            assert_eq!(ctl.behavior_name(), Some(name));
        }
    }

    #[test]
    fn test_unknown_behavior_clears_active() {
        let mut ctl = Controller::new();
        ctl.set_behavior("Open", BehaviorParam::Door(DoorId(0)))
            .unwrap();
        match ctl.set_behavior("Dance", BehaviorParam::Door(DoorId(0))) {
            Err(FuzzyError::UnknownBehavior { name }) => assert_eq!(name.as_str(), "Dance"),
            other => panic!("unexpected result {:?}", other),
        }
        assert_eq!(ctl.behavior_name(), None);
    }

    #[test]
    fn test_wrong_parameter_kind() {
        let mut ctl = Controller::new();
        assert_eq!(
            ctl.set_behavior("GoTo", BehaviorParam::Door(DoorId(2))),
            Err(FuzzyError::InvalidParameter { behavior: "GoTo" })
        );
        assert_eq!(
            ctl.set_behavior(
                "Close",
                BehaviorParam::Location(Location::new(0.0, 0.0, 0.0, 0.0))
            ),
            Err(FuzzyError::InvalidParameter { behavior: "Close" })
        );
    }

    #[test]
    fn test_command_is_clamped() {
        let mut ctl = Controller::new();
        ctl.set_behavior(
            "GoTo",
            BehaviorParam::Location(Location::new(0.0, 5.0, 0.0, 0.0)),
        )
        .unwrap();
        ctl.run(&RobotState::new(Pose::default())).unwrap();
        assert!(!ctl.is_achieved());
        assert!((ctl.command().vrot - 40.0_f32.to_radians()).abs() < 1e-5);

        ctl.vlin = 2.0;
        ctl.vrot = -3.0;
        let cmd = ctl.command();
        assert_eq!(cmd.vlin, MAX_LINEAR_SPEED_MS);
        assert_eq!(cmd.vrot, -MAX_ANGULAR_SPEED_RAD_S);
    }
}
