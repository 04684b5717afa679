//! Camera follow
//!
//! Камера плавно следует за первым активным target из списка приоритетов.
//! Работает в Update (каждый кадр), не зависит от time scale: как LateUpdate движка.

use bevy::prelude::*;

/// Marker главной камеры (от неё берётся базис для camera-relative движения игрока)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MainCamera;

/// Параметры следования камеры
///
/// # Priority
/// `targets` упорядочены по приоритету: берётся первый активный
/// (entity существует и не `Disabled`).
#[derive(Component, Debug, Clone)]
#[require(MainCamera, Transform)]
pub struct CameraFollow {
    pub targets: Vec<Entity>,
    /// Коэффициент lerp за кадр (0..1)
    pub smooth_speed: f32,
    /// Смещение от target (высота камеры не меняется)
    pub offset: Vec3,
}

impl Default for CameraFollow {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            smooth_speed: 0.125,
            offset: Vec3::new(0.0, 0.0, -6.0),
        }
    }
}

impl CameraFollow {
    pub fn new(targets: Vec<Entity>) -> Self {
        Self {
            targets,
            ..default()
        }
    }
}

/// Желаемая позиция камеры: target + offset, высота камеры сохраняется
pub fn desired_position(camera: Vec3, target: Vec3, offset: Vec3) -> Vec3 {
    let mut desired = target + offset;
    desired.y = camera.y;
    desired
}

/// Система: следование за первым активным target
pub fn follow_active_target(
    mut cameras: Query<(&mut Transform, &CameraFollow)>,
    targets: Query<&Transform, Without<CameraFollow>>,
) {
    for (mut transform, follow) in cameras.iter_mut() {
        // Despawned / Disabled targets не проходят query
        let Some(active) = follow.targets.iter().find_map(|e| targets.get(*e).ok()) else {
            continue;
        };

        let desired = desired_position(transform.translation, active.translation, follow.offset);
        transform.translation = transform.translation.lerp(desired, follow.smooth_speed);
    }
}

/// Camera Plugin
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, follow_active_target);
    }
}
