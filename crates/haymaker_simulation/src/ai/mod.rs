//! AI decision-making module
//!
//! Оппонент — state machine той же формы что и у игрока, но без прямого
//! ввода: решения принимает decision engine (pattern queue + seeded RNG).

use bevy::prelude::*;

pub mod engine;

// Re-export основных типов
pub use engine::{advance_opponent, OpponentAi, REFLEX_BLOCK_CHANCE};

use crate::SimSet;

/// AI Plugin
///
/// Регистрирует decision engine в FixedUpdate после Tick систем:
/// таймеры уже отсчитаны, решения принимаются по свежему состоянию.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, advance_opponent.in_set(SimSet::Ai));
    }
}
