//! Ошибки нечеткого контроллера
//!
//! Ошибки разделены на классы (`ErrorClass`): ошибки определения правил,
//! синтаксические ошибки выражений, ошибки поиска значений и нарушение
//! предусловий. Ни одна из них не исправляется внутри цикла управления:
//! решение принимает внешний цикл.

use core::fmt;

use heapless::String;

use crate::config::engine::SNIPPET_LEN;

/// Ограниченная копия текста (имени или выражения) для сообщений об ошибках
pub type Snippet = String<SNIPPET_LEN>;

/// Копирует текст в `Snippet`, обрезая его при переполнении
pub(crate) fn snippet(text: &str) -> Snippet {
    let mut out = Snippet::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

/// Класс ошибки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Некорректное определение предикатов, переменных или правил
    Definition,
    /// Синтаксическая ошибка в нечетком выражении
    Syntax,
    /// Нет значения истинности предиката или входной переменной
    Lookup,
    /// Нарушено предусловие вызова
    Precondition,
}

/// Вид синтаксической ошибки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// Ожидался терм, а выражение закончилось
    UnexpectedEnd,
    /// На месте терма стоит оператор или закрывающая скобка
    UnexpectedToken,
    /// За NOT не следует выражение в скобках
    NotWithoutParens,
    /// Незакрытая скобка
    UnbalancedParens,
    /// После полного выражения остались лексемы
    TrailingTokens,
}

/// Ошибки нечеткого контроллера
#[derive(Debug, Clone, PartialEq)]
pub enum FuzzyError {
    /// Нарушен порядок или конечность параметров функции принадлежности
    InvalidMembership { shape: &'static str },
    /// Имя уже объявлено в той же таблице
    DuplicateName { name: &'static str },
    /// Таблица заполнена
    CapacityExceeded { table: &'static str },
    /// Выражение ссылается на необъявленный предикат
    UndeclaredPredicate {
        statement: &'static str,
        predicate: Snippet,
    },
    /// Правило ссылается на неизвестную лингвистическую переменную
    UnknownVariable {
        rule: &'static str,
        variable: &'static str,
    },
    /// Метка следствия отсутствует в лингвистической переменной
    UnknownLabel {
        rule: &'static str,
        label: &'static str,
    },
    /// Не задано целевое выражение
    MissingGoal,
    /// Поведение не объявляет обязательную выходную переменную
    MissingOutput { output: &'static str },
    /// Параметр не подходит для поведения
    InvalidParameter { behavior: &'static str },
    /// Поведение с таким именем не зарегистрировано
    UnknownBehavior { name: Snippet },
    /// Синтаксическая ошибка в выражении
    Syntax {
        kind: SyntaxErrorKind,
        statement: Snippet,
    },
    /// В интерпретации нет значения истинности предиката
    UnknownPredicate { name: Snippet },
    /// Во входном состоянии нет переменной
    UnknownInput { name: &'static str },
    /// `run` вызван без активного поведения
    NoActiveBehavior,
}

impl FuzzyError {
    /// Класс ошибки
    pub fn class(&self) -> ErrorClass {
        match self {
            FuzzyError::InvalidMembership { .. }
            | FuzzyError::DuplicateName { .. }
            | FuzzyError::CapacityExceeded { .. }
            | FuzzyError::UndeclaredPredicate { .. }
            | FuzzyError::UnknownVariable { .. }
            | FuzzyError::UnknownLabel { .. }
            | FuzzyError::MissingGoal
            | FuzzyError::MissingOutput { .. }
            | FuzzyError::InvalidParameter { .. }
            | FuzzyError::UnknownBehavior { .. } => ErrorClass::Definition,
            FuzzyError::Syntax { .. } => ErrorClass::Syntax,
            FuzzyError::UnknownPredicate { .. } | FuzzyError::UnknownInput { .. } => {
                ErrorClass::Lookup
            }
            FuzzyError::NoActiveBehavior => ErrorClass::Precondition,
        }
    }

    pub(crate) fn syntax(kind: SyntaxErrorKind, statement: &str) -> Self {
        FuzzyError::Syntax {
            kind,
            statement: snippet(statement),
        }
    }
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SyntaxErrorKind::UnexpectedEnd => "unexpected end of statement",
            SyntaxErrorKind::UnexpectedToken => "operator where a term is expected",
            SyntaxErrorKind::NotWithoutParens => "NOT must be followed by a parenthesized statement",
            SyntaxErrorKind::UnbalancedParens => "unbalanced parentheses",
            SyntaxErrorKind::TrailingTokens => "trailing tokens after statement",
        };
        f.write_str(text)
    }
}

impl fmt::Display for FuzzyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuzzyError::InvalidMembership { shape } => {
                write!(f, "invalid parameters for {} membership function", shape)
            }
            FuzzyError::DuplicateName { name } => write!(f, "name declared twice: {}", name),
            FuzzyError::CapacityExceeded { table } => write!(f, "table is full: {}", table),
            FuzzyError::UndeclaredPredicate {
                statement,
                predicate,
            } => write!(f, "undeclared predicate {} in \"{}\"", predicate, statement),
            FuzzyError::UnknownVariable { rule, variable } => {
                write!(f, "rule {} uses unknown linguistic variable {}", rule, variable)
            }
            FuzzyError::UnknownLabel { rule, label } => {
                write!(f, "rule {} uses unknown label {}", rule, label)
            }
            FuzzyError::MissingGoal => f.write_str("goal statement is not set"),
            FuzzyError::MissingOutput { output } => {
                write!(f, "output variable {} is not declared", output)
            }
            FuzzyError::InvalidParameter { behavior } => {
                write!(f, "wrong parameter kind for behavior {}", behavior)
            }
            FuzzyError::UnknownBehavior { name } => write!(f, "unknown behavior: {}", name),
            FuzzyError::Syntax { kind, statement } => {
                write!(f, "invalid syntax in fuzzy statement \"{}\": {}", statement, kind)
            }
            FuzzyError::UnknownPredicate { name } => {
                write!(f, "no truth value provided for fuzzy predicate: {}", name)
            }
            FuzzyError::UnknownInput { name } => write!(f, "no value for input variable: {}", name),
            FuzzyError::NoActiveBehavior => f.write_str("no active behavior"),
        }
    }
}

// Реализация Format для defmt
#[cfg(feature = "defmt")]
impl defmt::Format for FuzzyError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            FuzzyError::InvalidMembership { shape } => {
                defmt::write!(fmt, "Invalid {} membership parameters", shape)
            }
            FuzzyError::DuplicateName { name } => defmt::write!(fmt, "Duplicate name {}", name),
            FuzzyError::CapacityExceeded { table } => defmt::write!(fmt, "Table full: {}", table),
            FuzzyError::UndeclaredPredicate {
                statement,
                predicate,
            } => defmt::write!(
                fmt,
                "Undeclared predicate {} in {}",
                predicate.as_str(),
                statement
            ),
            FuzzyError::UnknownVariable { rule, variable } => {
                defmt::write!(fmt, "Rule {}: unknown variable {}", rule, variable)
            }
            FuzzyError::UnknownLabel { rule, label } => {
                defmt::write!(fmt, "Rule {}: unknown label {}", rule, label)
            }
            FuzzyError::MissingGoal => defmt::write!(fmt, "Goal not set"),
            FuzzyError::MissingOutput { output } => {
                defmt::write!(fmt, "Output {} not declared", output)
            }
            FuzzyError::InvalidParameter { behavior } => {
                defmt::write!(fmt, "Wrong parameter for {}", behavior)
            }
            FuzzyError::UnknownBehavior { name } => {
                defmt::write!(fmt, "Unknown behavior {}", name.as_str())
            }
            FuzzyError::Syntax { statement, .. } => {
                defmt::write!(fmt, "Invalid syntax: {}", statement.as_str())
            }
            FuzzyError::UnknownPredicate { name } => {
                defmt::write!(fmt, "No truth value for {}", name.as_str())
            }
            FuzzyError::UnknownInput { name } => defmt::write!(fmt, "No input {}", name),
            FuzzyError::NoActiveBehavior => defmt::write!(fmt, "No active behavior"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_truncates() {
        let long = "A AND B ".repeat(20);
        let s = snippet(&long);
        assert_eq!(s.len(), SNIPPET_LEN);
        assert!(long.starts_with(s.as_str()));
    }

    #[test]
    fn test_error_classes() {
        assert_eq!(FuzzyError::MissingGoal.class(), ErrorClass::Definition);
        assert_eq!(
            FuzzyError::syntax(SyntaxErrorKind::TrailingTokens, "A B").class(),
            ErrorClass::Syntax
        );
        assert_eq!(
            FuzzyError::UnknownInput { name: "phi" }.class(),
            ErrorClass::Lookup
        );
        assert_eq!(FuzzyError::NoActiveBehavior.class(), ErrorClass::Precondition);
    }
}
