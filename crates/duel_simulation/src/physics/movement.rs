//! Headless character motor
//!
//! Архитектура:
//! - Коллизии/character controller: ответственность движка (здесь только пол y = 0)
//! - Поведение (player/ai) копит смещение в `CharacterMotor` в течение тика
//! - `apply_character_motion` применяет его одним "Move" в конце тика
//!
//! Детерминизм: fixed timestep, без Rapier.

use bevy::prelude::*;

use crate::components::CharacterMotor;

/// Высота пола (персонаж стоит на y = 0)
pub const GROUND_HEIGHT: f32 = 0.0;

/// Допуск для ground check (numerical errors)
const GROUND_TOLERANCE: f32 = 0.01;

/// Чистая функция ground check
pub fn is_grounded(position: Vec3) -> bool {
    position.y <= GROUND_HEIGHT + GROUND_TOLERANCE
}

/// Система ground detection через простую Y-проверку
pub fn ground_detection(mut query: Query<(&Transform, &mut CharacterMotor)>) {
    for (transform, mut motor) in query.iter_mut() {
        motor.grounded = is_grounded(transform.translation);
    }
}

/// Система применения накопленного смещения → Transform
///
/// Персонаж не проваливается ниже пола.
pub fn apply_character_motion(mut query: Query<(&mut CharacterMotor, &mut Transform)>) {
    for (mut motor, mut transform) in query.iter_mut() {
        let motion = motor.take_motion();
        if motion == Vec3::ZERO {
            continue;
        }

        transform.translation += motion;
        if transform.translation.y < GROUND_HEIGHT {
            transform.translation.y = GROUND_HEIGHT;
        }
    }
}

/// Вертикальное смещение от гравитации за тик (velocity интегрируется в motor)
pub fn integrate_gravity(motor: &mut CharacterMotor, gravity: f32, delta: f32) -> f32 {
    motor.vertical_velocity -= gravity * delta;
    motor.vertical_velocity * delta
}

/// Медленный поворот к направлению (Slerp с коэффициентом speed * dt)
pub fn rotate_towards(transform: &mut Transform, direction: Vec3, speed: f32, delta: f32) {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if flat.length_squared() < 1e-6 {
        return;
    }

    let target = Transform::IDENTITY.looking_to(flat, Vec3::Y).rotation;
    let factor = (speed * delta).clamp(0.0, 1.0);
    transform.rotation = transform.rotation.slerp(target, factor);
}
