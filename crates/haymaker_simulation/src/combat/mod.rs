//! Combat system module
//!
//! ECS ответственность:
//! - Game state: Health, Stamina, action state machines
//! - Combat rules: damage math, counter/stun, combo limiter, KO
//! - Events: CombatCue для презентации
//!
//! Хост отвечает за рендер/звук/ввод; сюда приходят только абстрактные
//! action requests (input module), отсюда уходят snapshot + cues.

use bevy::prelude::*;

pub mod events;
pub mod resolver;
pub mod stamina;

// Re-export основных типов
pub use events::{CombatCue, FighterSide};
pub use resolver::{
    apply_incoming_damage, opponent_strike_damage, resolve_player_attack, BLOCK_CHIP_FRACTION,
    COUNTER_MULTIPLIER, MAX_PLAYER_COMBO, PUNCH_DAMAGE_BODY, PUNCH_DAMAGE_HEAD,
};
pub use stamina::{DODGE_COST, DODGE_REWARD, PUNCH_COST};

use crate::components::HitType;
use crate::specials;
use crate::SimSet;

/// Счётчик непрерывной серии игрока (landed, non-counter удары)
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ComboCounter(pub u32);

/// Куда пришёлся последний долетевший удар игрока (для анимации)
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct LastHit(pub HitType);

/// Combat Plugin
///
/// Порядок внутри тика:
/// 1. Tick: stamina regen, countdown таймеры действий, special окна
/// 2. Resolve: telegraph → punch (+ защита игрока), возврат игрока в idle
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CombatCue>()
            .init_resource::<ComboCounter>()
            .init_resource::<LastHit>()
            .init_resource::<specials::SpecialStatus>();

        app.add_systems(
            FixedUpdate,
            (
                stamina::regenerate_stamina,
                resolver::tick_action_clocks,
                specials::tick_specials,
            )
                .chain()
                .in_set(SimSet::Tick),
        );

        app.add_systems(
            FixedUpdate,
            (
                resolver::resolve_opponent_strikes,
                resolver::recover_player_action,
            )
                .chain()
                .in_set(SimSet::Resolve),
        );
    }
}
