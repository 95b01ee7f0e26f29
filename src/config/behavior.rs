//! Конфигурация поведений: выходные переменные, метки и пороги

/// Имена управляющих (выходных) переменных
pub mod outputs {
    /// Линейная скорость, м/с
    pub const VLIN: &str = "Vlin";
    /// Угловая скорость; в правилах задается в град/с
    pub const VROT: &str = "Vrot";
}

/// Лингвистическая переменная `Move` (линейная скорость, м/с)
pub mod movement {
    pub const NAME: &str = "Move";

    pub const LABELS: &[(&str, f32)] = &[
        ("Fast", 0.5),
        ("Slow", 0.1),
        ("None", 0.0),
        ("Back", -0.1),
    ];
}

/// Лингвистическая переменная `Turn` (угловая скорость, град/с)
pub mod turn {
    pub const NAME: &str = "Turn";

    pub const LABELS: &[(&str, f32)] = &[
        ("Left", 40.0),
        ("MLeft", 10.0),
        ("None", 0.0),
        ("MRight", -10.0),
        ("Right", -40.0),
    ];
}

/// Уровень достижения цели, после которого поведение считается выполненным
pub const ACHIEVEMENT_THRESHOLD: f32 = 0.9;

/// Параметры обработки сонаров
pub mod sonar {
    /// Дальность отсечки: показания дальше считаются отсутствием эха (м)
    pub const MAX_RANGE_M: f32 = 5.0;

    /// Полуширина переднего сектора (градусы)
    pub const FRONT_HALF_WIDTH_DEG: f32 = 30.0;

    /// Граница боковых секторов (градусы)
    pub const SIDE_LIMIT_DEG: f32 = 110.0;
}

/// Параметры поведения Cross
pub mod cross {
    /// Расстояние от центра двери до точки выхода (м)
    pub const EXIT_DISTANCE_M: f32 = 1.0;
}

/// Значение входа `door`, если о двери нет сведений
pub const DOOR_UNKNOWN: f32 = 0.5;
