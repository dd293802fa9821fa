//! Special-status tracker: четыре независимых временных окна глобальных
//! модификаторов. Чистая бухгалтерия таймеров — само действие окон
//! применяется в input/ai/combat системах.
//!
//! Повторная активация окна заменяет остаток, stacking'а нет.

use bevy::prelude::*;
use serde::Serialize;

use crate::round::MatchPhase;

/// Длительности окон (секунды)
pub const INVERTED_SECS: f32 = 20.0;
pub const SELF_HARM_SECS: f32 = 10.0;
pub const SURGE_SECS: f32 = 2.0;
pub const POWER_COMBO_SECS: f32 = 5.0;

/// Множители
pub const SELF_HARM_DMG_MULT: f32 = 3.0;
/// Доля обычной длительности telegraph'а под speed boost (меньше = быстрее)
pub const SPEED_BOOST_FACTOR: f32 = 0.4;
/// Самоповреждение игрока за удар под self-harm окном
pub const SELF_HARM_PUNCH_DAMAGE: u32 = 10;

/// Виды глобальных модификаторов
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpecialKind {
    /// Зеркалит управление игрока (left ↔ right)
    Inverted,
    /// Удары игрока бьют его самого; атаки оппонента усилены ×3
    SelfHarm,
    /// Атаки оппонента наносят двойной урон
    DoubleDamage,
    /// Telegraph'ы оппонента ускорены
    SpeedBoost,
}

/// Remaining-time окна всех специальных модификаторов
#[derive(Resource, Debug, Clone, Default)]
pub struct SpecialStatus {
    inverted: f32,
    self_harm: f32,
    double_damage: f32,
    speed_boost: f32,
}

impl SpecialStatus {
    pub fn arm(&mut self, kind: SpecialKind, secs: f32) {
        match kind {
            SpecialKind::Inverted => self.inverted = secs,
            SpecialKind::SelfHarm => self.self_harm = secs,
            SpecialKind::DoubleDamage => self.double_damage = secs,
            SpecialKind::SpeedBoost => self.speed_boost = secs,
        }
    }

    pub fn is_active(&self, kind: SpecialKind) -> bool {
        match kind {
            SpecialKind::Inverted => self.inverted > 0.0,
            SpecialKind::SelfHarm => self.self_harm > 0.0,
            SpecialKind::DoubleDamage => self.double_damage > 0.0,
            SpecialKind::SpeedBoost => self.speed_boost > 0.0,
        }
    }

    pub fn tick(&mut self, delta: f32) {
        self.inverted = (self.inverted - delta).max(0.0);
        self.self_harm = (self.self_harm - delta).max(0.0);
        self.double_damage = (self.double_damage - delta).max(0.0);
        self.speed_boost = (self.speed_boost - delta).max(0.0);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Какой модификатор показывать хосту (приоритет: управление > урон)
    pub fn strongest_active(&self) -> Option<SpecialKind> {
        [
            SpecialKind::Inverted,
            SpecialKind::SelfHarm,
            SpecialKind::DoubleDamage,
            SpecialKind::SpeedBoost,
        ]
        .into_iter()
        .find(|&kind| self.is_active(kind))
    }
}

/// Система: тикаем окна пока идёт бой
pub fn tick_specials(
    phase: Res<MatchPhase>,
    mut specials: ResMut<SpecialStatus>,
    time: Res<Time<Fixed>>,
) {
    if *phase != MatchPhase::Playing {
        return;
    }
    specials.tick(time.delta_secs());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arm_and_expire() {
        let mut status = SpecialStatus::default();
        assert!(!status.is_active(SpecialKind::Inverted));

        status.arm(SpecialKind::Inverted, 2.0);
        assert!(status.is_active(SpecialKind::Inverted));

        status.tick(1.0);
        assert!(status.is_active(SpecialKind::Inverted));

        status.tick(1.0);
        assert!(!status.is_active(SpecialKind::Inverted));
    }

    #[test]
    fn test_rearm_replaces_remaining() {
        let mut status = SpecialStatus::default();
        status.arm(SpecialKind::DoubleDamage, 5.0);
        status.tick(4.0);

        // Повторная активация не суммируется с остатком
        status.arm(SpecialKind::DoubleDamage, 2.0);
        status.tick(1.9);
        assert!(status.is_active(SpecialKind::DoubleDamage));
        status.tick(0.2);
        assert!(!status.is_active(SpecialKind::DoubleDamage));
    }

    #[test]
    fn test_windows_independent() {
        let mut status = SpecialStatus::default();
        status.arm(SpecialKind::SelfHarm, 10.0);
        status.arm(SpecialKind::SpeedBoost, 2.0);

        status.tick(3.0);
        assert!(status.is_active(SpecialKind::SelfHarm));
        assert!(!status.is_active(SpecialKind::SpeedBoost));
    }

    #[test]
    fn test_strongest_active_priority() {
        let mut status = SpecialStatus::default();
        assert_eq!(status.strongest_active(), None);

        status.arm(SpecialKind::SpeedBoost, 2.0);
        status.arm(SpecialKind::DoubleDamage, 2.0);
        assert_eq!(status.strongest_active(), Some(SpecialKind::DoubleDamage));

        status.arm(SpecialKind::Inverted, 20.0);
        assert_eq!(status.strongest_active(), Some(SpecialKind::Inverted));
    }

    #[test]
    fn test_clear() {
        let mut status = SpecialStatus::default();
        status.arm(SpecialKind::Inverted, 20.0);
        status.arm(SpecialKind::SelfHarm, 10.0);

        status.clear();
        assert_eq!(status.strongest_active(), None);
    }
}
