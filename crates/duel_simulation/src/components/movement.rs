//! Movement компоненты: character motor, input axis, locomotion flags

use bevy::prelude::*;

/// Headless character motor (замена CharacterController движка)
///
/// Архитектура:
/// - Системы поведения копят смещение через `request_motion` (один "Move" за тик)
/// - `physics::apply_character_motion` применяет накопленное к Transform в конце тика
/// - Вертикальная скорость (gravity) хранится здесь же
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CharacterMotor {
    /// Накопленное за тик смещение (world space)
    pub pending_motion: Vec3,
    /// Текущая вертикальная скорость (m/s, отрицательная = вниз)
    pub vertical_velocity: f32,
    /// На земле ли персонаж (обновляет ground_detection)
    pub grounded: bool,
    /// false после смерти: motor игнорирует запросы движения
    pub enabled: bool,
}

impl Default for CharacterMotor {
    fn default() -> Self {
        Self {
            pending_motion: Vec3::ZERO,
            vertical_velocity: 0.0,
            grounded: true,
            enabled: true,
        }
    }
}

impl CharacterMotor {
    /// Запросить смещение (аналог CharacterController.Move)
    pub fn request_motion(&mut self, motion: Vec3) {
        if self.enabled {
            self.pending_motion += motion;
        }
    }

    /// Забрать накопленное смещение (обнуляет буфер)
    pub fn take_motion(&mut self) -> Vec3 {
        std::mem::take(&mut self.pending_motion)
    }
}

/// Ось движения игрока (пишет host из input device)
///
/// - `axis.x`: -1.0 (left) → +1.0 (right)
/// - `axis.y`: -1.0 (back) → +1.0 (forward относительно камеры)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct MovementInput {
    pub axis: Vec2,
}

/// Locomotion флаги для animator ("Walking")
///
/// Хранятся чтобы слать AnimationCommand только при изменении, а не каждый тик.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Locomotion {
    pub walking: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motor_accumulates_and_drains() {
        let mut motor = CharacterMotor::default();
        motor.request_motion(Vec3::X);
        motor.request_motion(Vec3::Z * 2.0);

        assert_eq!(motor.take_motion(), Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(motor.take_motion(), Vec3::ZERO);
    }

    #[test]
    fn test_disabled_motor_ignores_motion() {
        let mut motor = CharacterMotor {
            enabled: false,
            ..default()
        };
        motor.request_motion(Vec3::X);

        assert_eq!(motor.take_motion(), Vec3::ZERO);
    }
}
