//! Feedback events (ECS → host engine)
//!
//! Симуляция не владеет animator/audio/particles/UI: только отправляет команды.
//! Host слушает эти события и вызывает свои collaborators.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::EffectHandle;
use crate::components::{Health, Locomotion};
use crate::DeterministicRng;

/// Bool параметр animator'а для ходьбы
pub const WALKING_PARAM: &str = "Walking";

/// Команда animator'у бойца
#[derive(Event, Debug, Clone, PartialEq)]
pub enum AnimationCommand {
    /// Проиграть clip по имени (`restart` = с начала, даже если уже играет)
    Play {
        entity: Entity,
        clip: String,
        restart: bool,
    },
    /// Установить bool параметр
    SetBool {
        entity: Entity,
        param: &'static str,
        value: bool,
    },
    /// Дёрнуть trigger параметр
    Trigger {
        entity: Entity,
        param: &'static str,
    },
}

/// One-shot звук у бойца
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AudioCue {
    pub entity: Entity,
    pub clip: String,
}

/// Команда particle system
#[derive(Event, Debug, Clone, PartialEq)]
pub enum EffectCommand {
    Play { entity: Entity, effect: EffectHandle },
    Stop { entity: Entity, effect: EffectHandle },
}

/// Обновление health bar (значение в [0, max])
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthChanged {
    pub entity: Entity,
    pub current: u32,
    pub max: u32,
}

/// Звуки и эффекты попадания бойца
///
/// Пустой набор валиден: просто ничего не играем.
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct HitFeedback {
    /// Варианты звука попадания (выбирается случайный)
    pub hit_sounds: Vec<String>,
    /// Звук смерти
    pub death_sound: Option<String>,
    /// Particle эффект попадания
    pub hit_effect: Option<EffectHandle>,
}

impl HitFeedback {
    /// Случайный звук попадания (детерминированный RNG)
    pub fn pick_hit_sound(&self, rng: &mut DeterministicRng) -> Option<String> {
        if self.hit_sounds.is_empty() {
            return None;
        }

        let index = rng.rng.gen_range(0..self.hit_sounds.len());
        Some(self.hit_sounds[index].clone())
    }
}

/// Все feedback writers одним SystemParam (чтобы не тащить 4 параметра в каждую систему)
#[derive(SystemParam)]
pub struct FeedbackWriters<'w> {
    pub animations: EventWriter<'w, AnimationCommand>,
    pub audio: EventWriter<'w, AudioCue>,
    pub effects: EventWriter<'w, EffectCommand>,
    pub health: EventWriter<'w, HealthChanged>,
}

impl FeedbackWriters<'_> {
    pub fn play(&mut self, entity: Entity, clip: &str, restart: bool) {
        self.animations.write(AnimationCommand::Play {
            entity,
            clip: clip.to_string(),
            restart,
        });
    }

    pub fn trigger(&mut self, entity: Entity, param: &'static str) {
        self.animations.write(AnimationCommand::Trigger { entity, param });
    }

    /// Выставить "Walking" только если значение изменилось
    pub fn set_walking(&mut self, entity: Entity, locomotion: &mut Locomotion, walking: bool) {
        if locomotion.walking == walking {
            return;
        }

        locomotion.walking = walking;
        self.animations.write(AnimationCommand::SetBool {
            entity,
            param: WALKING_PARAM,
            value: walking,
        });
    }

    pub fn sound(&mut self, entity: Entity, clip: Option<String>) {
        if let Some(clip) = clip {
            self.audio.write(AudioCue { entity, clip });
        }
    }

    pub fn play_effect(&mut self, entity: Entity, effect: &EffectHandle) {
        self.effects.write(EffectCommand::Play {
            entity,
            effect: effect.clone(),
        });
    }

    /// Stop + Play: перезапуск эффекта если он ещё идёт
    pub fn restart_effect(&mut self, entity: Entity, effect: &EffectHandle) {
        self.effects.write(EffectCommand::Stop {
            entity,
            effect: effect.clone(),
        });
        self.play_effect(entity, effect);
    }

    pub fn publish_health(&mut self, entity: Entity, health: &Health) {
        self.health.write(HealthChanged {
            entity,
            current: health.current,
            max: health.max,
        });
    }
}
