//! Функции принадлежности нечетких предикатов
//!
//! Каждая функция хранит только параметры формы и отображает скаляр в
//! степень истинности в [0, 1]. Порядок параметров проверяется при
//! построении, поэтому `evaluate` не может завершиться ошибкой.

use crate::error::FuzzyError;

/// Функция принадлежности
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Membership {
    /// Ноль до `a`, линейный рост до `b`, далее единица
    RampUp { a: f32, b: f32 },
    /// Единица до `a`, линейный спад до `b`, далее ноль
    RampDown { a: f32, b: f32 },
    /// Ноль вне [a, c], вершина в `b`
    Triangle { a: f32, b: f32, c: f32 },
    /// Ноль вне [a, d], плато единицы между `b` и `c`
    Trapezoid { a: f32, b: f32, c: f32, d: f32 },
}

/// Параметры конечны и не убывают
fn ordered(points: &[f32]) -> bool {
    points.iter().all(|p| p.is_finite()) && points.windows(2).all(|w| w[0] <= w[1])
}

impl Membership {
    pub fn ramp_up(a: f32, b: f32) -> Result<Self, FuzzyError> {
        if !ordered(&[a, b]) {
            return Err(FuzzyError::InvalidMembership { shape: "ramp_up" });
        }
        Ok(Membership::RampUp { a, b })
    }

    pub fn ramp_down(a: f32, b: f32) -> Result<Self, FuzzyError> {
        if !ordered(&[a, b]) {
            return Err(FuzzyError::InvalidMembership { shape: "ramp_down" });
        }
        Ok(Membership::RampDown { a, b })
    }

    pub fn triangle(a: f32, b: f32, c: f32) -> Result<Self, FuzzyError> {
        if !ordered(&[a, b, c]) {
            return Err(FuzzyError::InvalidMembership { shape: "triangle" });
        }
        Ok(Membership::Triangle { a, b, c })
    }

    pub fn trapezoid(a: f32, b: f32, c: f32, d: f32) -> Result<Self, FuzzyError> {
        if !ordered(&[a, b, c, d]) {
            return Err(FuzzyError::InvalidMembership { shape: "trapezoid" });
        }
        Ok(Membership::Trapezoid { a, b, c, d })
    }

    /// Степень принадлежности `x`
    ///
    /// Участок нулевой ширины никогда не достигается ветками интерполяции,
    /// поэтому вырожденные формы работают как ступенька на границе.
    /// NaN на входе дает 0.
    pub fn evaluate(&self, x: f32) -> f32 {
        if x.is_nan() {
            return 0.0;
        }
        let mu = match *self {
            Membership::RampUp { a, b } => {
                if x <= a {
                    0.0
                } else if x > b {
                    1.0
                } else {
                    (x - a) / (b - a)
                }
            }
            Membership::RampDown { a, b } => {
                if x <= a {
                    1.0
                } else if x > b {
                    0.0
                } else {
                    (b - x) / (b - a)
                }
            }
            Membership::Triangle { a, b, c } => {
                if x <= a || x > c {
                    0.0
                } else if x <= b {
                    (x - a) / (b - a)
                } else {
                    (c - x) / (c - b)
                }
            }
            Membership::Trapezoid { a, b, c, d } => {
                if x <= a || x > d {
                    0.0
                } else if x <= b {
                    (x - a) / (b - a)
                } else if x <= c {
                    1.0
                } else {
                    (d - x) / (d - c)
                }
            }
        };
        num_traits::clamp(mu, 0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-6;

    #[test]
    fn test_ramp_up_shape() {
        let mu = Membership::ramp_up(5.0, 60.0).unwrap();
        assert_eq!(mu.evaluate(5.0), 0.0);
        assert_eq!(mu.evaluate(-100.0), 0.0);
        assert!((mu.evaluate(30.0) - 25.0 / 55.0).abs() < EPS);
        assert_eq!(mu.evaluate(60.0), 1.0);
        assert_eq!(mu.evaluate(61.0), 1.0);
    }

    #[test]
    fn test_ramp_down_shape() {
        let mu = Membership::ramp_down(0.1, 2.0).unwrap();
        assert_eq!(mu.evaluate(0.0), 1.0);
        assert_eq!(mu.evaluate(0.1), 1.0);
        assert_eq!(mu.evaluate(5.0), 0.0);
        assert!((mu.evaluate(1.05) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_triangle_shape() {
        let mu = Membership::triangle(-60.0, 0.0, 60.0).unwrap();
        assert_eq!(mu.evaluate(-60.0), 0.0);
        assert_eq!(mu.evaluate(0.0), 1.0);
        assert!((mu.evaluate(30.0) - 0.5).abs() < EPS);
        assert!((mu.evaluate(-30.0) - 0.5).abs() < EPS);
        assert_eq!(mu.evaluate(90.0), 0.0);
    }

    #[test]
    fn test_trapezoid_shape() {
        let mu = Membership::trapezoid(0.0, 1.0, 2.0, 4.0).unwrap();
        assert_eq!(mu.evaluate(0.0), 0.0);
        assert!((mu.evaluate(0.5) - 0.5).abs() < EPS);
        assert_eq!(mu.evaluate(1.5), 1.0);
        assert!((mu.evaluate(3.0) - 0.5).abs() < EPS);
        assert_eq!(mu.evaluate(4.5), 0.0);
    }

    #[test]
    fn test_degenerate_spans_are_steps() {
        let up = Membership::ramp_up(1.0, 1.0).unwrap();
        assert_eq!(up.evaluate(1.0), 0.0);
        assert_eq!(up.evaluate(1.0001), 1.0);

        let down = Membership::ramp_down(1.0, 1.0).unwrap();
        assert_eq!(down.evaluate(1.0), 1.0);
        assert_eq!(down.evaluate(1.0001), 0.0);

        let spike = Membership::triangle(0.0, 0.0, 0.0).unwrap();
        assert_eq!(spike.evaluate(0.0), 0.0);
        assert_eq!(spike.evaluate(1.0), 0.0);

        let block = Membership::trapezoid(1.0, 1.0, 2.0, 2.0).unwrap();
        assert_eq!(block.evaluate(1.5), 1.0);
        assert_eq!(block.evaluate(2.0), 1.0);
        assert_eq!(block.evaluate(2.5), 0.0);
    }

    #[test]
    fn test_invalid_parameters() {
        assert_eq!(
            Membership::ramp_up(2.0, 1.0),
            Err(FuzzyError::InvalidMembership { shape: "ramp_up" })
        );
        assert!(Membership::ramp_down(2.0, 1.0).is_err());
        assert!(Membership::triangle(0.0, 2.0, 1.0).is_err());
        assert!(Membership::trapezoid(0.0, 1.0, 3.0, 2.0).is_err());
        assert!(Membership::ramp_up(f32::NAN, 1.0).is_err());
        assert!(Membership::ramp_up(0.0, f32::INFINITY).is_err());
    }

    #[test]
    fn test_nan_input() {
        let mu = Membership::ramp_down(1.0, 1.0).unwrap();
        assert_eq!(mu.evaluate(f32::NAN), 0.0);
    }

    proptest! {
        #[test]
        fn prop_ramp_up_bounds_and_monotone(
            a in -100.0f32..100.0,
            w in 0.0f32..50.0,
            t1 in 0.0f32..1.0,
            t2 in 0.0f32..1.0,
        ) {
            let b = a + w;
            let mu = Membership::ramp_up(a, b).unwrap();
            prop_assert_eq!(mu.evaluate(a), 0.0);
            prop_assert_eq!(mu.evaluate(b + 1.0), 1.0);
            let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            prop_assert!(mu.evaluate(a + lo * w) <= mu.evaluate(a + hi * w));
        }

        #[test]
        fn prop_ramp_down_bounds_and_monotone(
            a in -100.0f32..100.0,
            w in 0.0f32..50.0,
            t1 in 0.0f32..1.0,
            t2 in 0.0f32..1.0,
        ) {
            let b = a + w;
            let mu = Membership::ramp_down(a, b).unwrap();
            prop_assert_eq!(mu.evaluate(a), 1.0);
            prop_assert_eq!(mu.evaluate(b + 1.0), 0.0);
            let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            prop_assert!(mu.evaluate(a + lo * w) >= mu.evaluate(a + hi * w));
        }

        #[test]
        fn prop_triangle_halves(
            a in -100.0f32..100.0,
            w1 in 0.1f32..50.0,
            w2 in 0.1f32..50.0,
            t1 in 0.0f32..1.0,
            t2 in 0.0f32..1.0,
        ) {
            let b = a + w1;
            let c = b + w2;
            let mu = Membership::triangle(a, b, c).unwrap();
            let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            prop_assert!(mu.evaluate(a + lo * w1) <= mu.evaluate(a + hi * w1));
            prop_assert!(mu.evaluate(b + lo * w2) >= mu.evaluate(b + hi * w2));
            prop_assert_eq!(mu.evaluate(a - 1.0), 0.0);
            prop_assert_eq!(mu.evaluate(c + 1.0), 0.0);
        }

        #[test]
        fn prop_trapezoid_in_unit_interval(
            a in -100.0f32..100.0,
            w in proptest::array::uniform3(0.0f32..20.0),
            x in -200.0f32..200.0,
        ) {
            let mu = Membership::trapezoid(a, a + w[0], a + w[0] + w[1], a + w[0] + w[1] + w[2])
                .unwrap();
            let v = mu.evaluate(x);
            prop_assert!((0.0..=1.0).contains(&v));
        }
    }
}
