//! Stamina management: стоимость действий игрока и регенерация по тику.

use bevy::prelude::*;

use crate::components::Stamina;
use crate::round::MatchPhase;

/// Стоимость действий (stamina points)
pub const PUNCH_COST: f32 = 12.0;
pub const DODGE_COST: f32 = 5.0;
/// Награда за успешный dodge
pub const DODGE_REWARD: f32 = 10.0;

/// Система: regenerate stamina пока идёт бой
///
/// Работает в FixedUpdate для детерминизма; rate лежит в Stamina::regen_rate.
pub fn regenerate_stamina(
    phase: Res<MatchPhase>,
    mut query: Query<&mut Stamina>,
    time: Res<Time<Fixed>>,
) {
    if *phase != MatchPhase::Playing {
        return;
    }

    let delta = time.delta_secs();
    for mut stamina in query.iter_mut() {
        stamina.regenerate(delta);
    }
}
