//! Параметры робота и цикла управления

/// Частота цикла управления (Гц)
pub const CONTROL_RATE_HZ: u32 = 10;

/// Максимальная линейная скорость (м/с)
pub const MAX_LINEAR_SPEED_MS: f32 = 0.5;

/// Максимальная угловая скорость (рад/с)
pub const MAX_ANGULAR_SPEED_RAD_S: f32 = 1.0;
