//! Математические функции и утилиты

use core::f32::consts::{PI, TAU};

use nalgebra::Point2;

use crate::data::Pose;

/// Ограничение значения в заданных пределах
#[inline(always)]
pub fn constrain(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Нормализация угла в диапазон (-π, π]
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut normalized = angle % TAU;
    if normalized > PI {
        normalized -= TAU;
    } else if normalized <= -PI {
        normalized += TAU;
    }
    normalized
}

#[inline]
pub fn deg_to_rad(deg: f32) -> f32 {
    deg * PI / 180.0
}

#[inline]
pub fn rad_to_deg(rad: f32) -> f32 {
    rad * 180.0 / PI
}

/// Квадратный корень с защитой от отрицательных значений
#[inline]
pub fn safe_sqrt(value: f32) -> f32 {
    if value <= 0.0 {
        0.0
    } else {
        libm::sqrtf(value)
    }
}

/// Вычисление длины 2D вектора
#[inline]
pub fn vector2_length(x: f32, y: f32) -> f32 {
    safe_sqrt(x * x + y * y)
}

/// Направление на точку в градусах, против часовой стрелки от оси X
#[inline]
pub fn bearing_deg(x: f32, y: f32) -> f32 {
    rad_to_deg(libm::atan2f(y, x))
}

/// Точка из глобальной системы в систему позы `pose`
pub fn global_to_local(pose: &Pose, x: f32, y: f32) -> (f32, f32) {
    let p = pose.isometry().inverse_transform_point(&Point2::new(x, y));
    (p.x, p.y)
}

/// Точка из системы позы `pose` в глобальную систему
pub fn local_to_global(pose: &Pose, x: f32, y: f32) -> (f32, f32) {
    let p = pose.isometry().transform_point(&Point2::new(x, y));
    (p.x, p.y)
}

// Модульные тесты
#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_constrain() {
        assert_eq!(constrain(5.0, 0.0, 10.0), 5.0);
        assert_eq!(constrain(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(constrain(15.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(0.0) - 0.0).abs() < EPS);
        assert!((normalize_angle(2.0 * PI) - 0.0).abs() < EPS);
        assert!((normalize_angle(3.0 * PI).abs() - PI).abs() < EPS);
        assert!((normalize_angle(-PI) - PI).abs() < EPS);
        assert!((normalize_angle(-1.5 * PI) - 0.5 * PI).abs() < EPS);
    }

    #[test]
    fn test_degrees_radians() {
        assert!((deg_to_rad(180.0) - PI).abs() < EPS);
        assert!((rad_to_deg(deg_to_rad(-40.0)) + 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_bearing() {
        assert!((bearing_deg(1.0, 1.0) - 45.0).abs() < 1e-4);
        assert!((bearing_deg(0.0, -2.0) + 90.0).abs() < 1e-4);
        assert_eq!(bearing_deg(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_frame_transforms() {
        let pose = Pose::new(1.0, 2.0, PI / 2.0);
        // точка в 1 м перед роботом, смотрящим вдоль +Y
        let (lx, ly) = global_to_local(&pose, 1.0, 3.0);
        assert!((lx - 1.0).abs() < EPS);
        assert!(ly.abs() < EPS);

        let (gx, gy) = local_to_global(&pose, 0.5, -0.25);
        let (bx, by) = global_to_local(&pose, gx, gy);
        assert!((bx - 0.5).abs() < EPS);
        assert!((by + 0.25).abs() < EPS);
    }
}
