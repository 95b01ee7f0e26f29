//! Нечеткий контроллер на правилах
//!
//! Таблицы предикатов, лингвистических переменных и правил собираются в
//! `RuleBase` и проверяются один раз при создании `FuzzyController`.
//! Каждый цикл управления выполняется строго по шагам:
//!
//! 1. фазификация: значения функций принадлежности на текущих входах;
//! 2. правила: max-агрегация уровней срабатывания в нечеткие множества
//!    (множества обнуляются один раз перед первым правилом);
//! 3. дефазификация: взвешенный центр тяжести меток, при нулевой
//!    суммарной активации сохраняется значение прошлого цикла;
//! 4. цель: значение целевого выражения как степень достижения.

use heapless::{LinearMap, Vec};

use crate::config::engine::{
    MAX_INPUTS, MAX_LABELS, MAX_OUTPUTS, MAX_PREDICATES, MAX_RULES, MAX_VARIABLES,
};
use crate::control::eval::{self, Interpretation, TruthTable};
use crate::control::membership::Membership;
use crate::error::FuzzyError;

/// Нечеткий предикат: функция принадлежности над одной входной переменной
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Predicate {
    pub name: &'static str,
    pub membership: Membership,
    pub input: &'static str,
}

/// Лингвистическая переменная (нечеткое действие)
///
/// Каждая метка несет одно представительное четкое значение
/// (синглтоны вместо выходных нечетких множеств).
#[derive(Debug, Clone, PartialEq)]
pub struct LinguisticVariable {
    pub name: &'static str,
    pub labels: Vec<(&'static str, f32), MAX_LABELS>,
    pub output: &'static str,
}

impl LinguisticVariable {
    /// Индекс метки
    pub fn label_index(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|(name, _)| *name == label)
    }

    /// Четкое значение метки
    pub fn value(&self, label: &str) -> Option<f32> {
        self.label_index(label).map(|i| self.labels[i].1)
    }
}

/// Нечеткое правило: ЕСЛИ `antecedent` ТО `variable`(`label`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub name: &'static str,
    pub antecedent: &'static str,
    pub variable: &'static str,
    pub label: &'static str,
}

/// Уровень отладочного вывода
///
/// Влияет только на логирование, никогда на результат вычислений.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Verbosity(pub u8);

impl Verbosity {
    /// Без вывода
    pub const QUIET: Verbosity = Verbosity(0);
    /// Входы, значения предикатов, срабатывание правил
    pub const RULES: Verbosity = Verbosity(1);
    /// Степень достижения цели и выходы
    pub const OUTPUTS: Verbosity = Verbosity(2);
    /// Активации меток при дефазификации
    pub const DETAILS: Verbosity = Verbosity(3);
    /// Символьная запись каждого выражения
    pub const TRACE: Verbosity = Verbosity(4);
}

/// Входное состояние: значения входных переменных текущего цикла
#[derive(Debug, Clone, Default)]
pub struct InputState {
    values: LinearMap<&'static str, f32, MAX_INPUTS>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            values: LinearMap::new(),
        }
    }

    pub fn set(&mut self, name: &'static str, value: f32) -> Result<(), FuzzyError> {
        self.values
            .insert(name, value)
            .map_err(|_| FuzzyError::CapacityExceeded { table: "inputs" })?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        self.values.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        self.values.iter().map(|(name, value)| (*name, *value))
    }
}

/// Интерпретация для проверки правил: объявленные предикаты истинны на 0
struct Declared<'a>(&'a [Predicate]);

impl Interpretation for Declared<'_> {
    fn truth(&self, predicate: &str) -> Option<f32> {
        self.0
            .iter()
            .any(|p| p.name == predicate)
            .then_some(0.0)
    }
}

/// Таблицы одного нечеткого контроллера
#[derive(Debug, Clone, Default)]
pub struct RuleBase {
    predicates: Vec<Predicate, MAX_PREDICATES>,
    variables: Vec<LinguisticVariable, MAX_VARIABLES>,
    rules: Vec<Rule, MAX_RULES>,
    goal: Option<&'static str>,
}

impl RuleBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Объявление предиката `name` = `membership`(`input`)
    pub fn add_predicate(
        &mut self,
        name: &'static str,
        membership: Membership,
        input: &'static str,
    ) -> Result<(), FuzzyError> {
        if self.predicates.iter().any(|p| p.name == name) {
            return Err(FuzzyError::DuplicateName { name });
        }
        self.predicates
            .push(Predicate {
                name,
                membership,
                input,
            })
            .map_err(|_| FuzzyError::CapacityExceeded { table: "predicates" })
    }

    /// Объявление лингвистической переменной с метками и целевым выходом
    pub fn add_variable(
        &mut self,
        name: &'static str,
        labels: &[(&'static str, f32)],
        output: &'static str,
    ) -> Result<(), FuzzyError> {
        if self.variables.iter().any(|v| v.name == name) {
            return Err(FuzzyError::DuplicateName { name });
        }
        if self.variables.iter().any(|v| v.output == output) {
            return Err(FuzzyError::DuplicateName { name: output });
        }

        let mut table: Vec<(&'static str, f32), MAX_LABELS> = Vec::new();
        for &(label, value) in labels {
            if table.iter().any(|(l, _)| *l == label) {
                return Err(FuzzyError::DuplicateName { name: label });
            }
            table
                .push((label, value))
                .map_err(|_| FuzzyError::CapacityExceeded { table: "labels" })?;
        }

        self.variables
            .push(LinguisticVariable {
                name,
                labels: table,
                output,
            })
            .map_err(|_| FuzzyError::CapacityExceeded { table: "variables" })
    }

    /// Объявление правила ЕСЛИ `antecedent` ТО `variable`(`label`)
    pub fn add_rule(
        &mut self,
        name: &'static str,
        antecedent: &'static str,
        variable: &'static str,
        label: &'static str,
    ) -> Result<(), FuzzyError> {
        if self.rules.iter().any(|r| r.name == name) {
            return Err(FuzzyError::DuplicateName { name });
        }
        self.rules
            .push(Rule {
                name,
                antecedent,
                variable,
                label,
            })
            .map_err(|_| FuzzyError::CapacityExceeded { table: "rules" })
    }

    /// Целевое выражение: его значение и есть степень достижения
    pub fn set_goal(&mut self, statement: &'static str) {
        self.goal = Some(statement);
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn variables(&self) -> &[LinguisticVariable] {
        &self.variables
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn goal(&self) -> Option<&'static str> {
        self.goal
    }

    pub fn variable(&self, name: &str) -> Option<&LinguisticVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Синтаксис и ссылки выражения на объявленные предикаты
    fn check_statement(&self, statement: &'static str) -> Result<(), FuzzyError> {
        match eval::evaluate(statement, &Declared(&self.predicates)) {
            Ok(_) => Ok(()),
            Err(FuzzyError::UnknownPredicate { name }) => Err(FuzzyError::UndeclaredPredicate {
                statement,
                predicate: name,
            }),
            Err(e) => Err(e),
        }
    }

    /// Индексы (переменная, метка) следствия правила
    fn resolve(&self, rule: &Rule) -> Result<(usize, usize), FuzzyError> {
        let var_index = self
            .variables
            .iter()
            .position(|v| v.name == rule.variable)
            .ok_or(FuzzyError::UnknownVariable {
                rule: rule.name,
                variable: rule.variable,
            })?;
        let label_index = self.variables[var_index]
            .label_index(rule.label)
            .ok_or(FuzzyError::UnknownLabel {
                rule: rule.name,
                label: rule.label,
            })?;
        Ok((var_index, label_index))
    }

    /// Полная проверка таблиц; вызывается до первого цикла
    pub fn validate(&self) -> Result<(), FuzzyError> {
        let goal = self.goal.ok_or(FuzzyError::MissingGoal)?;
        for rule in &self.rules {
            self.resolve(rule)?;
            self.check_statement(rule.antecedent)?;
        }
        self.check_statement(goal)
    }
}

/// Нечеткое множество выходной переменной: активации меток
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzySet {
    activations: Vec<f32, MAX_LABELS>,
}

impl FuzzySet {
    fn for_variable(variable: &LinguisticVariable) -> Self {
        let mut activations = Vec::new();
        for _ in variable.labels.iter() {
            // число меток ограничено той же ёмкостью
            let _ = activations.push(0.0);
        }
        Self { activations }
    }

    fn reset(&mut self) {
        self.activations.iter_mut().for_each(|a| *a = 0.0);
    }

    /// Активации в порядке меток переменной
    pub fn activations(&self) -> &[f32] {
        &self.activations
    }

    /// Суммарная активация
    pub fn total(&self) -> f32 {
        self.activations.iter().sum()
    }
}

/// Нечеткий контроллер с проверенными таблицами
#[derive(Debug, Clone)]
pub struct FuzzyController {
    rule_base: RuleBase,
    /// Следствия правил, разрешенные в индексы при создании
    consequents: Vec<(usize, usize), MAX_RULES>,
    inputs: InputState,
    truths: TruthTable,
    sets: Vec<FuzzySet, MAX_VARIABLES>,
    outputs: LinearMap<&'static str, f32, MAX_OUTPUTS>,
}

impl FuzzyController {
    /// Проверка таблиц и создание контроллера; выходы начинают с 0
    pub fn new(rule_base: RuleBase) -> Result<Self, FuzzyError> {
        rule_base.validate()?;

        let mut consequents = Vec::new();
        for rule in rule_base.rules() {
            let resolved = rule_base.resolve(rule)?;
            consequents
                .push(resolved)
                .map_err(|_| FuzzyError::CapacityExceeded { table: "rules" })?;
        }

        let mut sets = Vec::new();
        let mut outputs = LinearMap::new();
        for variable in rule_base.variables() {
            sets.push(FuzzySet::for_variable(variable))
                .map_err(|_| FuzzyError::CapacityExceeded { table: "variables" })?;
            outputs
                .insert(variable.output, 0.0)
                .map_err(|_| FuzzyError::CapacityExceeded { table: "outputs" })?;
        }

        Ok(Self {
            rule_base,
            consequents,
            inputs: InputState::new(),
            truths: TruthTable::new(),
            sets,
            outputs,
        })
    }

    pub fn rule_base(&self) -> &RuleBase {
        &self.rule_base
    }

    /// Замена входного состояния (в начале каждого цикла)
    pub fn set_inputs(&mut self, inputs: InputState) {
        self.inputs = inputs;
    }

    pub fn inputs(&self) -> &InputState {
        &self.inputs
    }

    /// Значения истинности предикатов последнего цикла
    pub fn truths(&self) -> &TruthTable {
        &self.truths
    }

    /// Нечеткие множества в порядке объявления переменных
    pub fn fuzzy_sets(&self) -> &[FuzzySet] {
        &self.sets
    }

    /// Четкое значение выходной переменной
    pub fn output(&self, name: &str) -> Option<f32> {
        self.outputs.get(name).copied()
    }

    pub fn outputs(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        self.outputs.iter().map(|(name, value)| (*name, *value))
    }

    /// Шаг 1: значения истинности всех предикатов
    pub fn fuzzify(&mut self) -> Result<(), FuzzyError> {
        self.truths.clear();
        for predicate in self.rule_base.predicates.iter() {
            let x = self
                .inputs
                .get(predicate.input)
                .ok_or(FuzzyError::UnknownInput {
                    name: predicate.input,
                })?;
            self.truths
                .set(predicate.name, predicate.membership.evaluate(x))?;
        }
        Ok(())
    }

    /// Шаг 2: сброс нечетких множеств и max-агрегация всех правил
    pub fn evaluate_rules(&mut self, verbosity: Verbosity) -> Result<(), FuzzyError> {
        self.sets.iter_mut().for_each(FuzzySet::reset);

        for (rule, &(var_index, label_index)) in
            self.rule_base.rules.iter().zip(self.consequents.iter())
        {
            let level = eval::evaluate(rule.antecedent, &self.truths)?;
            let activation = &mut self.sets[var_index].activations[label_index];
            *activation = activation.max(level);

            if verbosity >= Verbosity::RULES {
                debug!(
                    "  {} [{}] -> {}({})",
                    rule.name,
                    level,
                    rule.variable,
                    rule.label
                );
            }
            if verbosity >= Verbosity::TRACE {
                let trace = eval::render(rule.antecedent, &self.truths)?;
                trace!("    {} = {}", rule.name, trace.as_str());
            }
        }
        Ok(())
    }

    /// Шаг 3: центр тяжести синглтонов; при нулевой активации выход не меняется
    pub fn defuzzify(&mut self, verbosity: Verbosity) {
        for (variable, set) in self.rule_base.variables.iter().zip(self.sets.iter()) {
            let mut weighted = 0.0;
            let mut total = 0.0;
            for (&(_, value), &mu) in variable.labels.iter().zip(set.activations.iter()) {
                weighted += mu * value;
                total += mu;
            }

            if verbosity >= Verbosity::DETAILS {
                for (&(label, _), &mu) in variable.labels.iter().zip(set.activations.iter()) {
                    debug!("  {}.{}: {}", variable.name, label, mu);
                }
            }

            if total == 0.0 {
                if verbosity >= Verbosity::DETAILS {
                    debug!("  {}: нет активных правил, выход сохранен", variable.output);
                }
                continue;
            }
            if let Some(slot) = self.outputs.get_mut(variable.output) {
                *slot = weighted / total;
            }
        }
    }

    /// Шаг 4: степень достижения цели
    pub fn evaluate_goal(&self, verbosity: Verbosity) -> Result<f32, FuzzyError> {
        let goal = self.rule_base.goal.ok_or(FuzzyError::MissingGoal)?;
        let achieved = eval::evaluate(goal, &self.truths)?;
        if verbosity >= Verbosity::TRACE {
            let trace = eval::render(goal, &self.truths)?;
            trace!("  goal = {}", trace.as_str());
        }
        Ok(achieved)
    }

    /// Полный цикл над уже заданным входным состоянием
    pub fn run(&mut self, verbosity: Verbosity) -> Result<f32, FuzzyError> {
        if verbosity >= Verbosity::RULES {
            for (name, value) in self.inputs.iter() {
                debug!("  вход {}: {}", name, value);
            }
        }

        self.fuzzify()?;
        if verbosity >= Verbosity::RULES {
            for (name, value) in self.truths.iter() {
                debug!("  предикат {}: {}", name, value);
            }
        }

        self.evaluate_rules(verbosity)?;
        self.defuzzify(verbosity);
        let achieved = self.evaluate_goal(verbosity)?;

        if verbosity >= Verbosity::OUTPUTS {
            debug!("Достижение цели: {}", achieved);
            for (name, value) in self.outputs.iter() {
                debug!("  выход {}: {}", name, value);
            }
        }
        Ok(achieved)
    }
}
