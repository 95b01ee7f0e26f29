//! Поведение: нечеткий контроллер с конкретной таблицей правил
//!
//! Поведение объявляет таблицы один раз в `setup` и каждый цикл заполняет
//! входные переменные из внешнего состояния в `update_state`. Все поведения
//! движения выдают две выходные переменные: `Vlin` (м/с) и `Vrot`
//! (град/с в правилах, рад/с наружу).

use crate::config::behavior::{movement, outputs, turn};
use crate::control::engine::{FuzzyController, InputState, RuleBase, Verbosity};
use crate::data::RobotState;
use crate::error::FuzzyError;
use crate::utils::math::deg_to_rad;

pub trait Behavior: Sized {
    /// Параметр, фиксируемый при создании (цель, дверь)
    type Param: Copy;

    /// Имя в реестре поведений
    const NAME: &'static str;

    /// Объявление предикатов, переменных, правил и цели
    fn setup(param: &Self::Param, rules: &mut RuleBase) -> Result<(), FuzzyError>;

    fn assemble(param: Self::Param, controller: FuzzyController) -> Self;

    fn param(&self) -> &Self::Param;

    fn controller(&self) -> &FuzzyController;

    fn controller_mut(&mut self) -> &mut FuzzyController;

    /// Входные переменные из внешнего состояния; чистая функция состояния
    fn update_state(&self, state: &RobotState, inputs: &mut InputState)
        -> Result<(), FuzzyError>;

    /// Создание поведения с проверкой таблиц
    fn new(param: Self::Param) -> Result<Self, FuzzyError> {
        let mut rules = RuleBase::new();
        Self::setup(&param, &mut rules)?;
        for output in [outputs::VLIN, outputs::VROT] {
            if !rules.variables().iter().any(|v| v.output == output) {
                return Err(FuzzyError::MissingOutput { output });
            }
        }
        let controller = FuzzyController::new(rules)?;
        info!(
            "Поведение {}: {} предикатов, {} правил",
            Self::NAME,
            controller.rule_base().predicates().len(),
            controller.rule_base().rules().len()
        );
        Ok(Self::assemble(param, controller))
    }

    /// Один цикл: входы, нечеткий вывод, степень достижения
    fn run(&mut self, state: &RobotState, verbosity: Verbosity) -> Result<f32, FuzzyError> {
        let mut inputs = InputState::new();
        self.update_state(state, &mut inputs)?;
        let controller = self.controller_mut();
        controller.set_inputs(inputs);
        controller.run(verbosity)
    }

    /// Четкое значение выходной переменной
    fn get(&self, output: &str) -> Option<f32> {
        self.controller().output(output)
    }

    /// Линейная скорость, м/с
    fn vlin(&self) -> f32 {
        self.get(outputs::VLIN).unwrap_or(0.0)
    }

    /// Угловая скорость, рад/с
    fn vrot(&self) -> f32 {
        deg_to_rad(self.get(outputs::VROT).unwrap_or(0.0))
    }
}

/// Стандартные переменные движения `Move` и `Turn`
pub fn declare_motion(rules: &mut RuleBase) -> Result<(), FuzzyError> {
    rules.add_variable(movement::NAME, movement::LABELS, outputs::VLIN)?;
    rules.add_variable(turn::NAME, turn::LABELS, outputs::VROT)
}
