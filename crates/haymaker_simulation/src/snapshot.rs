//! Read-only snapshot матча — единственная sanctioned поверхность чтения
//! для презентации. Пересобирается в конце каждого тика.

use bevy::prelude::*;
use serde::Serialize;

use crate::combat::LastHit;
use crate::components::{
    Health, HitType, OpponentAction, OpponentFighter, OpponentState, PlayerAction, PlayerFighter,
    PlayerState, Stamina,
};
use crate::roster::OpponentProfile;
use crate::round::MatchPhase;
use crate::specials::{SpecialKind, SpecialStatus};

/// Статы одного бойца на момент тика
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct FighterSnapshot {
    pub hp: u32,
    pub max_hp: u32,
    pub stamina: f32,
    pub max_stamina: f32,
}

impl FighterSnapshot {
    fn capture(health: &Health, stamina: &Stamina) -> Self {
        Self {
            hp: health.current,
            max_hp: health.max,
            stamina: stamina.current,
            max_stamina: stamina.max,
        }
    }
}

/// Полный снимок состояния матча
#[derive(Resource, Debug, Clone, Default, Serialize)]
pub struct MatchSnapshot {
    pub phase: MatchPhase,
    pub player: FighterSnapshot,
    pub opponent: FighterSnapshot,
    pub player_action: PlayerAction,
    pub opponent_action: OpponentAction,
    pub last_hit: HitType,
    pub opponent_id: String,
    pub opponent_name: String,
    pub active_special: Option<SpecialKind>,
}

/// Система: публикация снимка в конце тика
pub fn publish_snapshot(
    phase: Res<MatchPhase>,
    specials: Res<SpecialStatus>,
    last_hit: Res<LastHit>,
    mut snapshot: ResMut<MatchSnapshot>,
    player_q: Query<
        (&PlayerState, &Health, &Stamina),
        (With<PlayerFighter>, Without<OpponentFighter>),
    >,
    opponent_q: Query<
        (&OpponentState, &Health, &Stamina, &OpponentProfile),
        (With<OpponentFighter>, Without<PlayerFighter>),
    >,
) {
    let Ok((player_state, player_health, player_stamina)) = player_q.single() else {
        return;
    };
    let Ok((opp_state, opp_health, opp_stamina, profile)) = opponent_q.single() else {
        return;
    };

    *snapshot = MatchSnapshot {
        phase: *phase,
        player: FighterSnapshot::capture(player_health, player_stamina),
        opponent: FighterSnapshot::capture(opp_health, opp_stamina),
        player_action: player_state.action,
        opponent_action: opp_state.action,
        last_hit: last_hit.0,
        opponent_id: profile.id.to_string(),
        opponent_name: profile.name.to_string(),
        active_special: specials.strongest_active(),
    };
}
