//! Поведение GoTo: подойти к объекту на карте
//!
//! Входы: `phi` (направление на цель, град), `rho` (расстояние до края
//! объекта, м) и расстояния до препятствий по секторам сонаров.

use crate::config::behavior::{movement, turn};
use crate::control::behavior::{declare_motion, Behavior};
use crate::control::engine::{FuzzyController, InputState, RuleBase};
use crate::control::membership::Membership;
use crate::data::{Location, RobotState};
use crate::error::FuzzyError;
use crate::utils::math::{bearing_deg, global_to_local, vector2_length};
use crate::utils::sonar::SonarSectors;

pub struct GoTo {
    target: Location,
    controller: FuzzyController,
}

/// Предикаты направления на цель по входу `phi`
pub(crate) fn declare_heading(rules: &mut RuleBase) -> Result<(), FuzzyError> {
    rules.add_predicate("TargetLeft", Membership::ramp_up(5.0, 60.0)?, "phi")?;
    rules.add_predicate("TargetRight", Membership::ramp_down(-60.0, -5.0)?, "phi")?;
    rules.add_predicate("TargetAhead", Membership::triangle(-60.0, 0.0, 60.0)?, "phi")?;
    Ok(())
}

/// Направление (град) и расстояние (м) от робота до точки
pub(crate) fn polar_to(state: &RobotState, x: f32, y: f32) -> (f32, f32) {
    let (lx, ly) = global_to_local(&state.pose, x, y);
    (bearing_deg(lx, ly), vector2_length(lx, ly))
}

impl Behavior for GoTo {
    type Param = Location;
    const NAME: &'static str = "GoTo";

    fn setup(_: &Location, rules: &mut RuleBase) -> Result<(), FuzzyError> {
        declare_heading(rules)?;
        rules.add_predicate("TargetHere", Membership::ramp_down(0.1, 2.0)?, "rho")?;
        rules.add_predicate("ObstacleFront", Membership::ramp_down(0.4, 1.0)?, "front")?;
        rules.add_predicate("ObstacleLeft", Membership::ramp_down(0.3, 0.8)?, "left")?;
        rules.add_predicate("ObstacleRight", Membership::ramp_down(0.3, 0.8)?, "right")?;

        declare_motion(rules)?;

        rules.add_rule("ToLeft", "TargetLeft AND NOT(TargetHere)", turn::NAME, "Left")?;
        rules.add_rule("ToRight", "TargetRight AND NOT(TargetHere)", turn::NAME, "Right")?;
        rules.add_rule("Straight", "TargetAhead AND NOT(TargetHere)", turn::NAME, "None")?;
        rules.add_rule(
            "Far",
            "(TargetAhead AND NOT(TargetHere)) AND NOT(ObstacleFront)",
            movement::NAME,
            "Fast",
        )?;
        rules.add_rule("Careful", "ObstacleFront AND NOT(TargetHere)", movement::NAME, "Slow")?;
        rules.add_rule("AvoidLeft", "ObstacleLeft", turn::NAME, "MRight")?;
        rules.add_rule("AvoidRight", "ObstacleRight", turn::NAME, "MLeft")?;
        rules.add_rule("Stop", "TargetHere", movement::NAME, "None")?;
        rules.add_rule("Settle", "TargetHere", turn::NAME, "None")?;

        rules.set_goal("TargetHere");
        Ok(())
    }

    fn assemble(target: Location, controller: FuzzyController) -> Self {
        Self { target, controller }
    }

    fn param(&self) -> &Location {
        &self.target
    }

    fn controller(&self) -> &FuzzyController {
        &self.controller
    }

    fn controller_mut(&mut self) -> &mut FuzzyController {
        &mut self.controller
    }

    fn update_state(&self, state: &RobotState, inputs: &mut InputState) -> Result<(), FuzzyError> {
        let (phi, dist) = polar_to(state, self.target.x, self.target.y);
        inputs.set("phi", phi)?;
        inputs.set("rho", (dist - self.target.radius).max(0.0))?;

        let sectors = SonarSectors::from_readings(&state.sonars);
        inputs.set("front", sectors.front)?;
        inputs.set("left", sectors.left)?;
        inputs.set("right", sectors.right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::behavior::sonar::MAX_RANGE_M;
    use crate::control::engine::Verbosity;
    use crate::data::{Pose, SonarReading};

    const EPS: f32 = 1e-3;

    #[test]
    fn test_inputs_from_pose() {
        let goto = GoTo::new(Location::new(3.0, 4.0, 0.0, 1.0)).unwrap();
        let mut inputs = InputState::new();
        goto.update_state(&RobotState::new(Pose::default()), &mut inputs)
            .unwrap();
        assert!((inputs.get("phi").unwrap() - 53.1301).abs() < EPS);
        assert!((inputs.get("rho").unwrap() - 4.0).abs() < EPS);
        assert_eq!(inputs.get("front"), Some(MAX_RANGE_M));
    }

    #[test]
    fn test_rho_never_negative() {
        let goto = GoTo::new(Location::new(0.5, 0.0, 0.0, 1.0)).unwrap();
        let mut inputs = InputState::new();
        goto.update_state(&RobotState::new(Pose::default()), &mut inputs)
            .unwrap();
        assert_eq!(inputs.get("rho"), Some(0.0));
    }

    #[test]
    fn test_turns_toward_target_on_the_left() {
        let mut goto = GoTo::new(Location::new(0.0, 5.0, 0.0, 0.0)).unwrap();
        let achieved = goto
            .run(&RobotState::new(Pose::default()), Verbosity::QUIET)
            .unwrap();
        assert_eq!(achieved, 0.0);
        assert!(goto.vrot() > 0.0);
    }

    #[test]
    fn test_turns_toward_target_on_the_right() {
        let mut goto = GoTo::new(Location::new(0.0, -5.0, 0.0, 0.0)).unwrap();
        goto.run(&RobotState::new(Pose::default()), Verbosity::QUIET)
            .unwrap();
        assert!(goto.vrot() < 0.0);
    }

    #[test]
    fn test_drives_fast_to_clear_target_ahead() {
        let mut goto = GoTo::new(Location::new(5.0, 0.0, 0.0, 0.0)).unwrap();
        goto.run(&RobotState::new(Pose::default()), Verbosity::QUIET)
            .unwrap();
        assert!((goto.vlin() - movement::LABELS[0].1).abs() < EPS);
        assert_eq!(goto.vrot(), 0.0);
    }

    #[test]
    fn test_slows_down_for_frontal_obstacle() {
        let mut goto = GoTo::new(Location::new(5.0, 0.0, 0.0, 0.0)).unwrap();
        let mut state = RobotState::new(Pose::default());
        state
            .add_sonar(SonarReading {
                pose: Pose::default(),
                range: 0.4,
            })
            .unwrap();
        goto.run(&state, Verbosity::QUIET).unwrap();
        assert!((goto.vlin() - 0.1).abs() < EPS);
    }

    #[test]
    fn test_stops_at_target() {
        let mut goto = GoTo::new(Location::new(1.0, 1.0, 0.0, 0.0)).unwrap();
        let achieved = goto
            .run(&RobotState::new(Pose::new(1.0, 1.05, 0.0)), Verbosity::QUIET)
            .unwrap();
        assert_eq!(achieved, 1.0);
        assert_eq!(goto.vlin(), 0.0);
        assert_eq!(goto.vrot(), 0.0);
    }
}
