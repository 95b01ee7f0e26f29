// src/data/mod.rs
//! Данные, которыми контроллер обменивается с внешними модулями:
//! оценка позы и показания датчиков на входе, команда скорости на выходе.

use heapless::Vec;
use nalgebra::{Isometry2, Vector2};

use crate::config::engine::{MAX_DOORS, MAX_SONARS};
use crate::error::FuzzyError;

/// Поза робота или датчика
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pose {
    pub x: f32,  // Координата X в метрах
    pub y: f32,  // Координата Y в метрах
    pub th: f32, // Курс в радианах
}

impl Pose {
    pub const fn new(x: f32, y: f32, th: f32) -> Self {
        Self { x, y, th }
    }

    /// Преобразование из системы позы в систему родителя
    pub fn isometry(&self) -> Isometry2<f32> {
        Isometry2::new(Vector2::new(self.x, self.y), self.th)
    }
}

/// Показание одного сонара
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SonarReading {
    pub pose: Pose,  // Поза датчика в системе робота
    pub range: f32,  // Дальность в метрах, <= 0 если эха нет
}

/// Идентификатор двери
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DoorId(pub u8);

/// Сообщение о состоянии двери
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DoorReport {
    pub door: DoorId,
    pub open: bool,
}

/// Внешнее состояние на один цикл управления
#[derive(Clone, Debug, Default)]
pub struct RobotState {
    pub pose: Pose,
    pub sonars: Vec<SonarReading, MAX_SONARS>,
    pub doors: Vec<DoorReport, MAX_DOORS>,
}

impl RobotState {
    pub fn new(pose: Pose) -> Self {
        Self {
            pose,
            sonars: Vec::new(),
            doors: Vec::new(),
        }
    }

    pub fn add_sonar(&mut self, reading: SonarReading) -> Result<(), FuzzyError> {
        self.sonars
            .push(reading)
            .map_err(|_| FuzzyError::CapacityExceeded { table: "sonars" })
    }

    /// Новое сообщение о двери заменяет прежнее
    pub fn report_door(&mut self, door: DoorId, open: bool) -> Result<(), FuzzyError> {
        if let Some(report) = self.doors.iter_mut().find(|r| r.door == door) {
            report.open = open;
            return Ok(());
        }
        self.doors
            .push(DoorReport { door, open })
            .map_err(|_| FuzzyError::CapacityExceeded { table: "doors" })
    }

    /// Состояние двери, если о ней есть сведения
    pub fn door_open(&self, door: DoorId) -> Option<bool> {
        self.doors.iter().find(|r| r.door == door).map(|r| r.open)
    }
}

/// Объект на карте: точка, направление и радиус
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Location {
    pub x: f32,
    pub y: f32,
    pub th: f32,     // Направление в радианах (для двери: направление прохода)
    pub radius: f32, // Радиус объекта в метрах
}

impl Location {
    pub const fn new(x: f32, y: f32, th: f32, radius: f32) -> Self {
        Self { x, y, th, radius }
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.x, self.y, self.th)
    }
}

/// Параметр поведения
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BehaviorParam {
    Location(Location),
    Door(DoorId),
}

/// Команда скорости для модуля исполнения
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VelocityCommand {
    pub vlin: f32, // Линейная скорость м/с
    pub vrot: f32, // Угловая скорость рад/с
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_door_reports_replace() {
        let mut state = RobotState::new(Pose::default());
        assert_eq!(state.door_open(DoorId(1)), None);
        state.report_door(DoorId(1), false).unwrap();
        state.report_door(DoorId(1), true).unwrap();
        assert_eq!(state.doors.len(), 1);
        assert_eq!(state.door_open(DoorId(1)), Some(true));
    }

    #[test]
    fn test_sonar_capacity() {
        let mut state = RobotState::new(Pose::default());
        let reading = SonarReading {
            pose: Pose::default(),
            range: 1.0,
        };
        for _ in 0..MAX_SONARS {
            state.add_sonar(reading).unwrap();
        }
        assert_eq!(
            state.add_sonar(reading),
            Err(FuzzyError::CapacityExceeded { table: "sonars" })
        );
    }
}
