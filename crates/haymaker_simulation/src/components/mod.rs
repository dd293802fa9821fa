//! ECS Components для бойцов
//!
//! Организация по доменам:
//! - fighter: базовые характеристики (Health, Stamina, маркеры player/opponent)
//! - action: боевые состояния (PlayerAction, OpponentAction, таблица ударов)

pub mod action;
pub mod fighter;

// Re-exports для удобного импорта
pub use action::*;
pub use fighter::*;
