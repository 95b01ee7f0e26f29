//! Вычисление нечетких высказываний
//!
//! Грамматика (LR(1), без приоритетов операторов):
//!
//! ```text
//! stmt ::= term | term "AND" term | term "OR" term
//! term ::= atom | encl | "NOT" encl
//! encl ::= "(" stmt ")"
//! atom ::= имя предиката
//! ```
//!
//! AND = min, OR = max, NOT = 1 - x, скобки не меняют значения.
//! Один и тот же разбор работает в двух режимах (`Semantics`): числовом,
//! который используется в цикле управления, и символьном, который
//! строит строку вида `min(TargetLeft[0.45], 1 - (TargetHere[0.00]))`
//! для отладки.

use core::fmt::Write;
use core::iter::Peekable;

use heapless::{LinearMap, String};

use crate::config::engine::{MAX_PREDICATES, TRACE_LEN};
use crate::error::{snippet, FuzzyError, SyntaxErrorKind};

/// Символьная трассировка выражения
pub type Trace = String<TRACE_LEN>;

/// Источник значений истинности предикатов
pub trait Interpretation {
    /// Значение истинности предиката или `None`, если оно не задано
    fn truth(&self, predicate: &str) -> Option<f32>;
}

/// Значения истинности, вычисленные на шаге фазификации
#[derive(Debug, Clone, Default)]
pub struct TruthTable {
    values: LinearMap<&'static str, f32, MAX_PREDICATES>,
}

impl TruthTable {
    pub fn new() -> Self {
        Self {
            values: LinearMap::new(),
        }
    }

    /// Записывает значение, обрезая его до [0, 1]
    pub fn set(&mut self, predicate: &'static str, value: f32) -> Result<(), FuzzyError> {
        self.values
            .insert(predicate, num_traits::clamp(value, 0.0, 1.0))
            .map_err(|_| FuzzyError::CapacityExceeded { table: "truth values" })?;
        Ok(())
    }

    pub fn get(&self, predicate: &str) -> Option<f32> {
        self.values.get(predicate).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        self.values.iter().map(|(name, value)| (*name, *value))
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl Interpretation for TruthTable {
    fn truth(&self, predicate: &str) -> Option<f32> {
        self.get(predicate)
    }
}

impl Interpretation for [(&str, f32)] {
    fn truth(&self, predicate: &str) -> Option<f32> {
        self.iter()
            .find(|(name, _)| *name == predicate)
            .map(|(_, value)| *value)
    }
}

impl<const N: usize> Interpretation for [(&str, f32); N] {
    fn truth(&self, predicate: &str) -> Option<f32> {
        self.as_slice().truth(predicate)
    }
}

/// Режим вычисления: что получается из атомов и связок
pub trait Semantics {
    type Value;

    fn atom(&self, name: &str, truth: f32) -> Self::Value;
    fn and(&self, lhs: Self::Value, rhs: Self::Value) -> Self::Value;
    fn or(&self, lhs: Self::Value, rhs: Self::Value) -> Self::Value;
    fn not(&self, value: Self::Value) -> Self::Value;
    fn paren(&self, value: Self::Value) -> Self::Value;
}

/// Числовой режим: значение истинности в [0, 1]
pub struct Numeric;

impl Semantics for Numeric {
    type Value = f32;

    fn atom(&self, _name: &str, truth: f32) -> f32 {
        truth
    }

    fn and(&self, lhs: f32, rhs: f32) -> f32 {
        lhs.min(rhs)
    }

    fn or(&self, lhs: f32, rhs: f32) -> f32 {
        lhs.max(rhs)
    }

    fn not(&self, value: f32) -> f32 {
        1.0 - value
    }

    fn paren(&self, value: f32) -> f32 {
        value
    }
}

/// Символьный режим: строка с тем же порядком вычисления
///
/// При переполнении буфера строка обрезается.
pub struct Symbolic;

impl Symbolic {
    fn render(args: core::fmt::Arguments<'_>) -> Trace {
        let mut out = Trace::new();
        let _ = out.write_fmt(args);
        out
    }
}

impl Semantics for Symbolic {
    type Value = Trace;

    fn atom(&self, name: &str, truth: f32) -> Trace {
        Self::render(format_args!("{}[{:.2}]", name, truth))
    }

    fn and(&self, lhs: Trace, rhs: Trace) -> Trace {
        Self::render(format_args!("min({}, {})", lhs, rhs))
    }

    fn or(&self, lhs: Trace, rhs: Trace) -> Trace {
        Self::render(format_args!("max({}, {})", lhs, rhs))
    }

    fn not(&self, value: Trace) -> Trace {
        Self::render(format_args!("1 - {}", value))
    }

    fn paren(&self, value: Trace) -> Trace {
        Self::render(format_args!("({})", value))
    }
}

/// Лексема нечеткого выражения
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Open,
    Close,
    And,
    Or,
    Not,
    Atom(&'a str),
}

/// Разбиение выражения по пробелам и скобкам
struct Lexer<'a> {
    rest: &'a str,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { rest: input }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        self.rest = self.rest.trim_start();
        let first = self.rest.chars().next()?;
        if first == '(' || first == ')' {
            self.rest = &self.rest[1..];
            return Some(if first == '(' { Token::Open } else { Token::Close });
        }

        let end = self
            .rest
            .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
            .unwrap_or(self.rest.len());
        let (word, rest) = self.rest.split_at(end);
        self.rest = rest;

        Some(match word {
            "AND" => Token::And,
            "OR" => Token::Or,
            "NOT" => Token::Not,
            _ => Token::Atom(word),
        })
    }
}

/// Рекурсивный разбор с одновременным вычислением
struct Parser<'a, 'i, I: ?Sized, S> {
    statement: &'a str,
    tokens: Peekable<Lexer<'a>>,
    interpretation: &'i I,
    semantics: S,
}

impl<'a, 'i, I, S> Parser<'a, 'i, I, S>
where
    I: Interpretation + ?Sized,
    S: Semantics,
{
    fn new(statement: &'a str, interpretation: &'i I, semantics: S) -> Self {
        Self {
            statement,
            tokens: Lexer::new(statement).peekable(),
            interpretation,
            semantics,
        }
    }

    fn syntax(&self, kind: SyntaxErrorKind) -> FuzzyError {
        FuzzyError::syntax(kind, self.statement)
    }

    /// Разбор всего выражения: после `stmt` лексем остаться не должно
    fn parse(mut self) -> Result<S::Value, FuzzyError> {
        let value = self.stmt()?;
        if self.tokens.next().is_some() {
            return Err(self.syntax(SyntaxErrorKind::TrailingTokens));
        }
        Ok(value)
    }

    fn stmt(&mut self) -> Result<S::Value, FuzzyError> {
        let lhs = self.term()?;
        match self.tokens.peek().copied() {
            Some(Token::And) => {
                self.tokens.next();
                let rhs = self.term()?;
                Ok(self.semantics.and(lhs, rhs))
            }
            Some(Token::Or) => {
                self.tokens.next();
                let rhs = self.term()?;
                Ok(self.semantics.or(lhs, rhs))
            }
            _ => Ok(lhs),
        }
    }

    fn term(&mut self) -> Result<S::Value, FuzzyError> {
        match self.tokens.peek().copied() {
            None => Err(self.syntax(SyntaxErrorKind::UnexpectedEnd)),
            Some(Token::Not) => {
                self.tokens.next();
                if self.tokens.peek() != Some(&Token::Open) {
                    return Err(self.syntax(SyntaxErrorKind::NotWithoutParens));
                }
                let value = self.encl()?;
                Ok(self.semantics.not(value))
            }
            Some(Token::Open) => self.encl(),
            Some(Token::Atom(name)) => {
                self.tokens.next();
                self.atom(name)
            }
            Some(Token::And | Token::Or | Token::Close) => {
                Err(self.syntax(SyntaxErrorKind::UnexpectedToken))
            }
        }
    }

    fn encl(&mut self) -> Result<S::Value, FuzzyError> {
        // открывающая скобка уже проверена вызывающей стороной
        self.tokens.next();
        let value = self.stmt()?;
        match self.tokens.next() {
            Some(Token::Close) => Ok(self.semantics.paren(value)),
            _ => Err(self.syntax(SyntaxErrorKind::UnbalancedParens)),
        }
    }

    fn atom(&mut self, name: &str) -> Result<S::Value, FuzzyError> {
        let truth = self
            .interpretation
            .truth(name)
            .ok_or_else(|| FuzzyError::UnknownPredicate {
                name: snippet(name),
            })?;
        Ok(self.semantics.atom(name, truth))
    }
}

/// Значение истинности выражения при заданной интерпретации
pub fn evaluate<I>(statement: &str, interpretation: &I) -> Result<f32, FuzzyError>
where
    I: Interpretation + ?Sized,
{
    Parser::new(statement, interpretation, Numeric).parse()
}

/// Символьная запись вычисления выражения (для отладки)
pub fn render<I>(statement: &str, interpretation: &I) -> Result<Trace, FuzzyError>
where
    I: Interpretation + ?Sized,
{
    Parser::new(statement, interpretation, Symbolic).parse()
}
