//! Отложенные шаги боевых последовательностей (cancellable timers)
//!
//! Каждый боец владеет таблицей `Sequences`. Один driver (`advance_sequences`)
//! тикает все таймеры в FixedUpdate и отдаёт истёкшие шаги как `SequenceElapsed`.
//! Обработку делает архетип-владелец (player / ai / combat::damage).
//!
//! ```text
//! schedule(step, delay) → PendingStep { timer }
//!   ↓ advance_sequences (каждый тик)
//! timer.finished() → SequenceElapsed { entity, step }
//!   ↓
//! resolve_player_sequences / resolve_opponent_sequences / despawn_fallen
//! ```

use std::time::Duration;

use bevy::prelude::*;

/// Идентификатор запланированного шага (для точечной отмены)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequenceId(u64);

/// Шаг последовательности, который сработает по истечении задержки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceStep {
    /// Игрок: отложенная реакция на удар (звук, урон, анимация)
    PlayerHitReaction { damage: u32 },
    /// Оппонент: удар "долетел": останавливаем ходьбу, играем hit анимацию
    OpponentHitLand,
    /// Оппонент: hit анимация закончилась: снимаем guard
    OpponentHitRecover,
    /// Сброс состояния атаки (по таймеру, не по окончанию анимации)
    AttackReset,
    /// Удаление бойца из сцены после смерти
    Despawn,
}

impl SequenceStep {
    pub fn is_hit_reaction(&self) -> bool {
        matches!(
            self,
            SequenceStep::PlayerHitReaction { .. }
                | SequenceStep::OpponentHitLand
                | SequenceStep::OpponentHitRecover
        )
    }
}

#[derive(Debug, Clone)]
struct PendingStep {
    id: SequenceId,
    step: SequenceStep,
    timer: Timer,
}

/// Таблица отложенных шагов бойца
#[derive(Component, Debug, Default, Clone)]
pub struct Sequences {
    pending: Vec<PendingStep>,
    next_id: u64,
}

impl Sequences {
    /// Запланировать шаг через `delay` секунд
    pub fn schedule(&mut self, step: SequenceStep, delay: f32) -> SequenceId {
        let id = SequenceId(self.next_id);
        self.next_id += 1;

        self.pending.push(PendingStep {
            id,
            step,
            timer: Timer::from_seconds(delay.max(0.0), TimerMode::Once),
        });

        id
    }

    /// Отменить конкретный шаг. false если уже сработал или не существует.
    pub fn cancel(&mut self, id: SequenceId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Отменить все шаги, подходящие под предикат. Возвращает количество отменённых.
    pub fn cancel_where(&mut self, predicate: impl Fn(&SequenceStep) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| !predicate(&p.step));
        before - self.pending.len()
    }

    pub fn contains(&self, predicate: impl Fn(&SequenceStep) -> bool) -> bool {
        self.pending.iter().any(|p| predicate(&p.step))
    }

    pub fn count(&self, predicate: impl Fn(&SequenceStep) -> bool) -> usize {
        self.pending.iter().filter(|p| predicate(&p.step)).count()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Продвинуть все таймеры на `delta`, вернуть истёкшие шаги (в порядке планирования)
    pub fn advance(&mut self, delta: Duration) -> Vec<SequenceStep> {
        let mut elapsed = Vec::new();

        self.pending.retain_mut(|p| {
            p.timer.tick(delta);
            if p.timer.finished() {
                elapsed.push(p.step);
                false
            } else {
                true
            }
        });

        elapsed
    }
}

/// Событие: шаг последовательности истёк
#[derive(Event, Debug, Clone, Copy)]
pub struct SequenceElapsed {
    pub entity: Entity,
    pub step: SequenceStep,
}

/// Система: единый driver отложенных шагов
pub fn advance_sequences(
    mut query: Query<(Entity, &mut Sequences)>,
    mut elapsed_events: EventWriter<SequenceElapsed>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta();

    for (entity, mut sequences) in query.iter_mut() {
        if sequences.is_empty() {
            continue;
        }

        for step in sequences.advance(delta) {
            elapsed_events.write(SequenceElapsed { entity, step });
        }
    }
}
