//! Поведения Open и Close: робот стоит, пока дверь открывают или закрывают
//!
//! Саму дверь приводит в движение внешний модуль исполнения (по имени
//! активного поведения); здесь только ожидание подтверждения.

use crate::config::behavior::{movement, turn, DOOR_UNKNOWN};
use crate::control::behavior::{declare_motion, Behavior};
use crate::control::engine::{FuzzyController, InputState, RuleBase};
use crate::control::membership::Membership;
use crate::data::{DoorId, RobotState};
use crate::error::FuzzyError;

/// Общая таблица правил ожидания двери с заданной целью
fn setup_door(rules: &mut RuleBase, goal: &'static str) -> Result<(), FuzzyError> {
    rules.add_predicate("DoorOpen", Membership::ramp_up(0.0, 1.0)?, "door")?;
    rules.add_predicate("DoorClosed", Membership::ramp_down(0.0, 1.0)?, "door")?;

    declare_motion(rules)?;

    // одна из двух всегда не меньше 0.5
    rules.add_rule("Wait", "DoorOpen OR DoorClosed", movement::NAME, "None")?;
    rules.add_rule("Hold", "DoorOpen OR DoorClosed", turn::NAME, "None")?;

    rules.set_goal(goal);
    Ok(())
}

/// Вход `door`: 1 открыта, 0 закрыта, 0.5 нет сведений
fn door_input(state: &RobotState, door: DoorId, inputs: &mut InputState) -> Result<(), FuzzyError> {
    let value = match state.door_open(door) {
        Some(true) => 1.0,
        Some(false) => 0.0,
        None => DOOR_UNKNOWN,
    };
    inputs.set("door", value)
}

pub struct OpenDoor {
    door: DoorId,
    controller: FuzzyController,
}

impl Behavior for OpenDoor {
    type Param = DoorId;
    const NAME: &'static str = "Open";

    fn setup(_: &DoorId, rules: &mut RuleBase) -> Result<(), FuzzyError> {
        setup_door(rules, "DoorOpen")
    }

    fn assemble(door: DoorId, controller: FuzzyController) -> Self {
        Self { door, controller }
    }

    fn param(&self) -> &DoorId {
        &self.door
    }

    fn controller(&self) -> &FuzzyController {
        &self.controller
    }

    fn controller_mut(&mut self) -> &mut FuzzyController {
        &mut self.controller
    }

    fn update_state(&self, state: &RobotState, inputs: &mut InputState) -> Result<(), FuzzyError> {
        door_input(state, self.door, inputs)
    }
}

pub struct CloseDoor {
    door: DoorId,
    controller: FuzzyController,
}

impl Behavior for CloseDoor {
    type Param = DoorId;
    const NAME: &'static str = "Close";

    fn setup(_: &DoorId, rules: &mut RuleBase) -> Result<(), FuzzyError> {
        setup_door(rules, "DoorClosed")
    }

    fn assemble(door: DoorId, controller: FuzzyController) -> Self {
        Self { door, controller }
    }

    fn param(&self) -> &DoorId {
        &self.door
    }

    fn controller(&self) -> &FuzzyController {
        &self.controller
    }

    fn controller_mut(&mut self) -> &mut FuzzyController {
        &mut self.controller
    }

    fn update_state(&self, state: &RobotState, inputs: &mut InputState) -> Result<(), FuzzyError> {
        door_input(state, self.door, inputs)
    }
}
