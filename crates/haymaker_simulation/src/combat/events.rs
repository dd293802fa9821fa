//! Semantic combat cues — события для презентации (текст, звук, эффекты).
//!
//! Advisory: корректность core не зависит от того, читает ли их хост.

use bevy::prelude::*;
use serde::Serialize;

use crate::components::HitType;
use crate::specials::SpecialKind;

/// Чья сторона (для cue payload'ов)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FighterSide {
    Player,
    Opponent,
}

/// Событие: что-то заметное случилось в бою
#[derive(Event, Debug, Clone)]
pub enum CombatCue {
    /// Игрок ушёл от удара (и получил stamina reward)
    DodgeSuccess,
    /// Удар принят в блок (`by` — кто блокировал)
    Blocked { by: FighterSide },
    /// Контрудар в telegraph-окно
    CounterLanded,
    /// Достигнут лимит серии — принудительный разрыв
    ComboBreaker,
    /// Оппонент активировал спешл
    SpecialActivated {
        kind: Option<SpecialKind>,
        announce: &'static str,
    },
    /// Удар дошёл до цели
    HitLanded {
        target: FighterSide,
        hit: HitType,
        damage: u32,
    },
    /// Игрок ударил сам себя (self-harm окно)
    SelfInflicted { damage: u32 },
    /// Не хватило stamina на удар
    Tired,
    /// Нокаут
    Knockout { fighter: FighterSide },
    /// Полный круг по ростеру, difficulty выросла
    LevelUp,
}
