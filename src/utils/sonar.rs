//! Сведение показаний сонаров к расстояниям по секторам

use crate::config::behavior::sonar::{FRONT_HALF_WIDTH_DEG, MAX_RANGE_M, SIDE_LIMIT_DEG};
use crate::data::SonarReading;
use crate::utils::math::{bearing_deg, local_to_global, vector2_length};

/// Ближайшее препятствие в каждом секторе (м)
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SonarSectors {
    pub front: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for SonarSectors {
    fn default() -> Self {
        Self {
            front: MAX_RANGE_M,
            left: MAX_RANGE_M,
            right: MAX_RANGE_M,
        }
    }
}

impl SonarSectors {
    /// Минимум расстояний по секторам; показания без эха пропускаются
    pub fn from_readings(readings: &[SonarReading]) -> Self {
        let mut sectors = Self::default();
        for reading in readings {
            // NaN тоже отсекается
            if !(reading.range > 0.0 && reading.range <= MAX_RANGE_M) {
                continue;
            }

            // точка эха в системе робота
            let (x, y) = local_to_global(&reading.pose, reading.range, 0.0);
            let distance = vector2_length(x, y);
            let bearing = bearing_deg(x, y);

            let slot = if libm::fabsf(bearing) <= FRONT_HALF_WIDTH_DEG {
                &mut sectors.front
            } else if bearing > 0.0 && bearing <= SIDE_LIMIT_DEG {
                &mut sectors.left
            } else if bearing < 0.0 && bearing >= -SIDE_LIMIT_DEG {
                &mut sectors.right
            } else {
                continue;
            };
            *slot = slot.min(distance);
        }
        sectors
    }
}
