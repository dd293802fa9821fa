//! Player state machine: превращает абстрактные action requests хоста в
//! переходы состояния и (для ударов) немедленную резолюцию боя.
//!
//! Ввод приходит событиями PlayerInput — единственная мутирующая точка
//! входа со стороны игрока. Невалидные запросы — молчаливые no-op'ы
//! (кроме advisory Tired при нехватке stamina на удар).

use bevy::prelude::*;
use rand::Rng;

use crate::ai::{OpponentAi, REFLEX_BLOCK_CHANCE};
use crate::combat::{resolver, CombatCue, ComboCounter, LastHit, DODGE_COST, PUNCH_COST};
use crate::components::{
    BlockHeight, Health, OpponentAction, OpponentFighter, OpponentState, PlayerAction,
    PlayerFighter, PlayerState, PunchTarget, Side, Stamina, OPPONENT_BLOCK_SECS,
    PLAYER_DODGE_SECS, PLAYER_PUNCH_SECS,
};
use crate::round::{MatchPhase, PendingPhase};
use crate::specials::{SpecialKind, SpecialStatus};
use crate::{DeterministicRng, SimSet};

/// Пауза решений AI после рефлекторного блока
const POST_REFLEX_DECISION_PAD: f32 = 0.2;

/// Абстрактный action request от хоста
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    Block,
    ReleaseBlock,
    Dodge(Side),
    Punch(Side, PunchTarget),
}

/// Зеркалирование управления под control-inversion окном:
/// left ↔ right у dodge и punch, вертикальная цель не меняется.
pub fn mirror_input(input: PlayerInput) -> PlayerInput {
    match input {
        PlayerInput::Dodge(side) => PlayerInput::Dodge(side.mirrored()),
        PlayerInput::Punch(side, target) => PlayerInput::Punch(side.mirrored(), target),
        other => other,
    }
}

/// Система: обработка входных событий игрока
///
/// Preconditions (всё — no-op): вне PLAYING, в Hit/Ko, или в середине
/// незавершённого punch/dodge. Block и Idle всегда прерываемы.
pub fn apply_player_input(
    mut inputs: EventReader<PlayerInput>,
    phase: Res<MatchPhase>,
    mut rng: ResMut<DeterministicRng>,
    specials: Res<SpecialStatus>,
    mut combo: ResMut<ComboCounter>,
    mut last_hit: ResMut<LastHit>,
    mut pending: ResMut<PendingPhase>,
    mut cues: EventWriter<CombatCue>,
    mut player_q: Query<
        (&mut PlayerState, &mut Health, &mut Stamina),
        (With<PlayerFighter>, Without<OpponentFighter>),
    >,
    mut opponent_q: Query<
        (&mut OpponentState, &mut OpponentAi, &mut Health),
        (With<OpponentFighter>, Without<PlayerFighter>),
    >,
) {
    let Ok((mut player_state, mut player_health, mut player_stamina)) = player_q.single_mut()
    else {
        return;
    };
    let Ok((mut opp_state, mut ai, mut opp_health)) = opponent_q.single_mut() else {
        return;
    };

    for input in inputs.read() {
        if *phase != MatchPhase::Playing {
            continue;
        }

        // ReleaseBlock идемпотентен: no-op если не блокируем
        if *input == PlayerInput::ReleaseBlock {
            if player_state.action == PlayerAction::Block {
                player_state.reset();
            }
            continue;
        }

        // Hit/Ko глотают ввод; незавершённый punch/dodge нельзя отменить
        if matches!(player_state.action, PlayerAction::Hit | PlayerAction::Ko) {
            continue;
        }
        if !player_state.action.is_interruptible() && player_state.busy() {
            continue;
        }

        // Inversion окно зеркалит запрос до обработки
        let action = if specials.is_active(SpecialKind::Inverted) {
            mirror_input(*input)
        } else {
            *input
        };

        match action {
            PlayerInput::Block => {
                // Держится до явного release
                player_state.set(PlayerAction::Block, 0.0);
            }

            PlayerInput::Dodge(side) => {
                if !player_stamina.consume(DODGE_COST) {
                    continue;
                }
                player_state.set(PlayerAction::Dodge(side), PLAYER_DODGE_SECS);
            }

            PlayerInput::Punch(side, target) => {
                // Reflex block: AI может дёрнуться на любую попытку удара,
                // если стоит свободным
                if opp_state.action == OpponentAction::Idle
                    && !opp_state.busy()
                    && rng.rng.gen::<f32>() < REFLEX_BLOCK_CHANCE
                {
                    opp_state.set(
                        OpponentAction::Block(BlockHeight::against(target)),
                        OPPONENT_BLOCK_SECS,
                    );
                    ai.decision_timer = OPPONENT_BLOCK_SECS + POST_REFLEX_DECISION_PAD;
                }

                if !player_stamina.can_afford(PUNCH_COST) {
                    cues.write(CombatCue::Tired);
                    continue;
                }
                player_stamina.consume(PUNCH_COST);
                player_state.set(PlayerAction::Punch(side, target), PLAYER_PUNCH_SECS);

                // Удары игрока резолвятся на вводе — windup есть только у
                // оппонента
                let mut buffer = Vec::new();
                resolver::resolve_player_attack(
                    target,
                    &mut player_state,
                    &mut player_health,
                    &mut opp_state,
                    &mut ai,
                    &mut opp_health,
                    &specials,
                    &mut combo,
                    &mut last_hit,
                    &mut pending,
                    &mut rng.rng,
                    &mut buffer,
                );
                for cue in buffer {
                    cues.write(cue);
                }
            }

            PlayerInput::ReleaseBlock => {}
        }
    }
}

/// Input Plugin
pub struct PlayerInputPlugin;

impl Plugin for PlayerInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlayerInput>()
            .add_systems(FixedUpdate, apply_player_input.in_set(SimSet::Input));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_swaps_sides() {
        assert_eq!(
            mirror_input(PlayerInput::Dodge(Side::Left)),
            PlayerInput::Dodge(Side::Right)
        );
        assert_eq!(
            mirror_input(PlayerInput::Punch(Side::Right, PunchTarget::Head)),
            PlayerInput::Punch(Side::Left, PunchTarget::Head)
        );
    }

    #[test]
    fn test_mirror_keeps_vertical_target() {
        let mirrored = mirror_input(PlayerInput::Punch(Side::Left, PunchTarget::Body));
        assert_eq!(mirrored, PlayerInput::Punch(Side::Right, PunchTarget::Body));
    }

    #[test]
    fn test_mirror_ignores_block() {
        assert_eq!(mirror_input(PlayerInput::Block), PlayerInput::Block);
        assert_eq!(
            mirror_input(PlayerInput::ReleaseBlock),
            PlayerInput::ReleaseBlock
        );
    }
}
