//! Поведение Cross: пройти через дверь в направлении `th` двери
//!
//! Робот целится в точку выхода за дверью, замедляется у проема и
//! останавливается, когда проем пройден.

use crate::config::behavior::{cross::EXIT_DISTANCE_M, movement, turn};
use crate::control::behavior::{declare_motion, Behavior};
use crate::control::behaviors::goto::{declare_heading, polar_to};
use crate::control::engine::{FuzzyController, InputState, RuleBase};
use crate::control::membership::Membership;
use crate::data::{Location, RobotState};
use crate::error::FuzzyError;
use crate::utils::math::{global_to_local, local_to_global};

pub struct Cross {
    door: Location,
    /// Точка выхода в глобальной системе
    exit: (f32, f32),
    controller: FuzzyController,
}

impl Behavior for Cross {
    type Param = Location;
    const NAME: &'static str = "Cross";

    fn setup(door: &Location, rules: &mut RuleBase) -> Result<(), FuzzyError> {
        declare_heading(rules)?;
        rules.add_predicate("Crossed", Membership::ramp_up(0.0, 0.5)?, "xd")?;
        rules.add_predicate(
            "NearDoor",
            Membership::ramp_down(door.radius, door.radius + 1.0)?,
            "gap",
        )?;

        declare_motion(rules)?;

        rules.add_rule("ToLeft", "TargetLeft AND NOT(Crossed)", turn::NAME, "Left")?;
        rules.add_rule("ToRight", "TargetRight AND NOT(Crossed)", turn::NAME, "Right")?;
        rules.add_rule("Straight", "TargetAhead AND NOT(Crossed)", turn::NAME, "None")?;
        rules.add_rule(
            "Far",
            "(TargetAhead AND NOT(NearDoor)) AND NOT(Crossed)",
            movement::NAME,
            "Fast",
        )?;
        rules.add_rule("Pass", "NearDoor AND NOT(Crossed)", movement::NAME, "Slow")?;
        rules.add_rule("Stop", "Crossed", movement::NAME, "None")?;
        rules.add_rule("Settle", "Crossed", turn::NAME, "None")?;

        rules.set_goal("Crossed");
        Ok(())
    }

    fn assemble(door: Location, controller: FuzzyController) -> Self {
        let exit = local_to_global(&door.pose(), EXIT_DISTANCE_M, 0.0);
        Self {
            door,
            exit,
            controller,
        }
    }

    fn param(&self) -> &Location {
        &self.door
    }

    fn controller(&self) -> &FuzzyController {
        &self.controller
    }

    fn controller_mut(&mut self) -> &mut FuzzyController {
        &mut self.controller
    }

    fn update_state(&self, state: &RobotState, inputs: &mut InputState) -> Result<(), FuzzyError> {
        let (phi, _) = polar_to(state, self.exit.0, self.exit.1);
        let (_, gap) = polar_to(state, self.door.x, self.door.y);
        let (xd, _) = global_to_local(&self.door.pose(), state.pose.x, state.pose.y);

        inputs.set("phi", phi)?;
        inputs.set("xd", xd)?;
        inputs.set("gap", gap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::engine::Verbosity;
    use crate::data::Pose;
    use core::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-3;

    /// Дверь в (2, 0) с проходом вдоль +X
    fn door() -> Location {
        Location::new(2.0, 0.0, 0.0, 0.4)
    }

    #[test]
    fn test_exit_point_beyond_door() {
        let cross = Cross::new(Location::new(1.0, 1.0, FRAC_PI_2, 0.4)).unwrap();
        assert!((cross.exit.0 - 1.0).abs() < 1e-5);
        assert!((cross.exit.1 - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_inputs_before_door() {
        let cross = Cross::new(door()).unwrap();
        let mut inputs = InputState::new();
        cross
            .update_state(&RobotState::new(Pose::default()), &mut inputs)
            .unwrap();
        assert!(inputs.get("phi").unwrap().abs() < EPS);
        assert!((inputs.get("xd").unwrap() + 2.0).abs() < EPS);
        assert!((inputs.get("gap").unwrap() - 2.0).abs() < EPS);
    }

    #[test]
    fn test_far_from_door_moves_fast() {
        let mut cross = Cross::new(door()).unwrap();
        let achieved = cross
            .run(&RobotState::new(Pose::new(-1.0, 0.0, 0.0)), Verbosity::QUIET)
            .unwrap();
        assert_eq!(achieved, 0.0);
        assert!((cross.vlin() - 0.5).abs() < EPS);
    }

    #[test]
    fn test_slows_in_doorway() {
        let mut cross = Cross::new(door()).unwrap();
        cross
            .run(&RobotState::new(Pose::new(1.8, 0.0, 0.0)), Verbosity::QUIET)
            .unwrap();
        assert!((cross.vlin() - 0.1).abs() < EPS);
    }

    #[test]
    fn test_crossed_stops() {
        let mut cross = Cross::new(door()).unwrap();
        let achieved = cross
            .run(&RobotState::new(Pose::new(2.6, 0.0, 0.0)), Verbosity::QUIET)
            .unwrap();
        assert_eq!(achieved, 1.0);
        assert_eq!(cross.vlin(), 0.0);
        assert_eq!(cross.vrot(), 0.0);
    }
}
