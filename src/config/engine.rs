//! Ёмкости таблиц нечеткого контроллера
//!
//! Все таблицы живут в `heapless` коллекциях фиксированного размера,
//! поэтому ограничения задаются здесь на этапе компиляции.

/// Максимальное число нечетких предикатов в одном поведении
pub const MAX_PREDICATES: usize = 16;

/// Максимальное число лингвистических переменных (нечетких действий)
pub const MAX_VARIABLES: usize = 4;

/// Максимальное число меток у одной лингвистической переменной
pub const MAX_LABELS: usize = 8;

/// Максимальное число правил
pub const MAX_RULES: usize = 24;

/// Максимальное число входных переменных
pub const MAX_INPUTS: usize = 8;

/// Максимальное число выходных (управляющих) переменных
pub const MAX_OUTPUTS: usize = 4;

/// Максимальное число показаний сонаров за цикл
pub const MAX_SONARS: usize = 16;

/// Максимальное число дверей в отчете о состоянии
pub const MAX_DOORS: usize = 8;

/// Длина фрагмента выражения, сохраняемого в ошибке
pub const SNIPPET_LEN: usize = 64;

/// Длина буфера символьной трассировки выражения
pub const TRACE_LEN: usize = 256;
