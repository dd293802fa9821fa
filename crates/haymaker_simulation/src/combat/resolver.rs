//! Combat resolver: turns committed attacks into damage and state changes.
//!
//! # Entry paths
//!
//! **Opponent strikes** — once a telegraph's timer expires the strike goes
//! live: `Telegraph(m, s)` → `Punch(m, s)`, damage is computed from the move
//! table × profile power × difficulty × active special windows, then runs
//! through the player defense check (dodge / block / unguarded).
//!
//! **Player punches** — resolved synchronously on input
//! (`resolve_player_attack`): the windup belongs to the opponent only.
//! Guard check → counter check → combo limiter → damage → KO check.
//!
//! Helpers are plain functions over component references so the rules are
//! unit-testable without an `App`; systems collect cues into a buffer and
//! forward them as events.

use bevy::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::ai::OpponentAi;
use crate::combat::events::{CombatCue, FighterSide};
use crate::combat::{ComboCounter, LastHit};
use crate::components::{
    BlockHeight, Health, HitType, MoveKind, OpponentAction, OpponentFighter, OpponentState,
    PlayerAction, PlayerFighter, PlayerState, PunchTarget, Stamina, COMBO_BREAK_GUARD_SECS,
    HIT_RECOVERY_SECS, STUNNED_SECS,
};
use crate::roster::OpponentProfile;
use crate::round::{Difficulty, MatchPhase, PendingPhase, KO_PHASE_DELAY_SECS};
use crate::specials::{SpecialKind, SpecialStatus, SELF_HARM_DMG_MULT, SELF_HARM_PUNCH_DAMAGE};

// ============================================================================
// Tuning constants
// ============================================================================

pub const PUNCH_DAMAGE_BODY: u32 = 6;
pub const PUNCH_DAMAGE_HEAD: u32 = 10;
/// Punching into a telegraph doubles the damage.
pub const COUNTER_MULTIPLIER: f32 = 2.0;
/// Smaller bonus for hitting an already-stunned opponent.
pub const STUNNED_BONUS_MULT: f32 = 1.2;
/// Fraction of damage that chips through a player block.
pub const BLOCK_CHIP_FRACTION: f32 = 0.15;
/// Landed punches in a row before the AI forces a break.
pub const MAX_PLAYER_COMBO: u32 = 5;

/// Extra decision delay after a stun wears off.
const POST_STUN_DECISION_PAD: f32 = 0.5;
/// Extra decision delay after a hit reaction.
const POST_HIT_DECISION_PAD: f32 = 0.1;
/// Decision delay imposed by a combo breaker.
const COMBO_BREAK_DECISION_SECS: f32 = 0.9;

// ============================================================================
// Pure resolution helpers
// ============================================================================

/// Damage of an opponent strike going live: move table × profile power ×
/// difficulty (floored), then doubled under a double-damage window and
/// amplified under a self-harm window.
pub fn opponent_strike_damage(
    kind: MoveKind,
    power: f32,
    difficulty: f32,
    specials: &SpecialStatus,
) -> u32 {
    let mut damage = (kind.stats().damage as f32 * power * difficulty) as u32;
    if specials.is_active(SpecialKind::DoubleDamage) {
        damage *= 2;
    }
    if specials.is_active(SpecialKind::SelfHarm) {
        damage = (damage as f32 * SELF_HARM_DMG_MULT) as u32;
    }
    damage
}

/// Player defense check for an incoming opponent strike.
///
/// - mid-dodge: fully negated, stamina rewarded, combo untouched
/// - blocking: chip damage only, combo reset
/// - unguarded: full damage, forced hit reaction, combo reset
///
/// HP 0 forces KO and schedules the defeat transition.
pub fn apply_incoming_damage(
    damage: u32,
    player_state: &mut PlayerState,
    player_health: &mut Health,
    player_stamina: &mut Stamina,
    combo: &mut ComboCounter,
    pending: &mut PendingPhase,
    cues: &mut Vec<CombatCue>,
) {
    if player_state.action == PlayerAction::Ko {
        return;
    }

    if player_state.action.is_dodge() {
        player_stamina.restore(super::DODGE_REWARD);
        cues.push(CombatCue::DodgeSuccess);
        return;
    }

    combo.0 = 0;

    if player_state.action == PlayerAction::Block {
        let chip = (damage as f32 * BLOCK_CHIP_FRACTION) as u32;
        player_health.take_damage(chip);
        cues.push(CombatCue::Blocked {
            by: FighterSide::Player,
        });
    } else {
        player_health.take_damage(damage);
        player_state.set(PlayerAction::Hit, HIT_RECOVERY_SECS);
        // Opponent strikes read as head hits for presentation
        cues.push(CombatCue::HitLanded {
            target: FighterSide::Player,
            hit: HitType::Head,
            damage,
        });
    }

    if !player_health.is_alive() {
        player_state.set(PlayerAction::Ko, 0.0);
        cues.push(CombatCue::Knockout {
            fighter: FighterSide::Player,
        });
        pending.schedule(MatchPhase::GameOver, KO_PHASE_DELAY_SECS);
    }
}

/// Resolve a committed player punch against the opponent.
///
/// Called synchronously from the input path once stamina is paid. The
/// combo counter only advances on landed, non-counter punches against a
/// non-stunned opponent; blocked punches and combo breakers reset it.
pub fn resolve_player_attack(
    target: PunchTarget,
    player_state: &mut PlayerState,
    player_health: &mut Health,
    opponent_state: &mut OpponentState,
    ai: &mut OpponentAi,
    opponent_health: &mut Health,
    specials: &SpecialStatus,
    combo: &mut ComboCounter,
    last_hit: &mut LastHit,
    pending: &mut PendingPhase,
    rng: &mut ChaCha8Rng,
    cues: &mut Vec<CombatCue>,
) {
    // Punching a downed opponent does nothing.
    if opponent_state.action.is_ko() {
        return;
    }

    // Self-harm window: the punch lands on the puncher instead.
    if specials.is_active(SpecialKind::SelfHarm) {
        player_health.take_damage(SELF_HARM_PUNCH_DAMAGE);
        cues.push(CombatCue::SelfInflicted {
            damage: SELF_HARM_PUNCH_DAMAGE,
        });
        if !player_health.is_alive() {
            player_state.set(PlayerAction::Ko, 0.0);
            cues.push(CombatCue::Knockout {
                fighter: FighterSide::Player,
            });
            pending.schedule(MatchPhase::GameOver, KO_PHASE_DELAY_SECS);
        }
        return;
    }

    let mut damage = match target {
        PunchTarget::Head => PUNCH_DAMAGE_HEAD,
        PunchTarget::Body => PUNCH_DAMAGE_BODY,
    } as f32;

    // Guard check: a matching stance swallows the punch.
    if let OpponentAction::Block(height) = opponent_state.action {
        if height.stops(target) {
            combo.0 = 0;
            cues.push(CombatCue::Blocked {
                by: FighterSide::Opponent,
            });
            return;
        }
    }

    let was_stunned = opponent_state.action == OpponentAction::Stunned;
    let mut is_counter = false;

    // Counter check: punching into a telegraph wins the exchange outright.
    if opponent_state.action.is_telegraph() {
        damage *= COUNTER_MULTIPLIER;
        is_counter = true;
        opponent_state.set(OpponentAction::Stunned, STUNNED_SECS);
        ai.queue.clear();
        ai.decision_timer = STUNNED_SECS + POST_STUN_DECISION_PAD;
        cues.push(CombatCue::CounterLanded);
    } else if was_stunned {
        damage *= STUNNED_BONUS_MULT;
    }

    // Combo limiter.
    if !is_counter && !was_stunned {
        combo.0 += 1;
        if combo.0 >= MAX_PLAYER_COMBO {
            combo.0 = 0;
            opponent_state.set(
                OpponentAction::Block(random_guard(rng)),
                COMBO_BREAK_GUARD_SECS,
            );
            ai.decision_timer = COMBO_BREAK_DECISION_SECS;
            cues.push(CombatCue::ComboBreaker);
            // No damage this call.
            return;
        }
    }

    let damage = damage as u32;
    opponent_health.take_damage(damage);

    // Hit reaction only for plain landed punches: counters already stunned
    // the target, stunned targets stay stunned.
    if damage > 0 && !is_counter && !was_stunned {
        last_hit.0 = target.into();
        opponent_state.set(OpponentAction::Hit, HIT_RECOVERY_SECS);
        ai.decision_timer = HIT_RECOVERY_SECS + POST_HIT_DECISION_PAD;
        cues.push(CombatCue::HitLanded {
            target: FighterSide::Opponent,
            hit: target.into(),
            damage,
        });
    }

    if !opponent_health.is_alive() {
        opponent_state.set(OpponentAction::Ko, 0.0);
        ai.queue.clear();
        cues.push(CombatCue::Knockout {
            fighter: FighterSide::Opponent,
        });
        pending.schedule(MatchPhase::Victory, KO_PHASE_DELAY_SECS);
    }
}

pub fn random_guard(rng: &mut ChaCha8Rng) -> BlockHeight {
    if rng.gen_bool(0.5) {
        BlockHeight::High
    } else {
        BlockHeight::Low
    }
}

// ============================================================================
// Systems
// ============================================================================

/// Система: countdown всех боевых таймеров (действия + AI decision)
pub fn tick_action_clocks(
    phase: Res<MatchPhase>,
    time: Res<Time<Fixed>>,
    mut player_q: Query<&mut PlayerState, (With<PlayerFighter>, Without<OpponentFighter>)>,
    mut opponent_q: Query<
        (&mut OpponentState, &mut OpponentAi),
        (With<OpponentFighter>, Without<PlayerFighter>),
    >,
) {
    if *phase != MatchPhase::Playing {
        return;
    }
    let delta = time.delta_secs();

    if let Ok(mut player_state) = player_q.single_mut() {
        player_state.timer = (player_state.timer - delta).max(0.0);
    }
    if let Ok((mut opp_state, mut ai)) = opponent_q.single_mut() {
        opp_state.timer = (opp_state.timer - delta).max(0.0);
        ai.decision_timer = (ai.decision_timer - delta).max(0.0);
    }
}

/// Система: telegraph с истёкшим таймером переходит в punch и бьёт игрока
pub fn resolve_opponent_strikes(
    phase: Res<MatchPhase>,
    specials: Res<SpecialStatus>,
    difficulty: Res<Difficulty>,
    mut combo: ResMut<ComboCounter>,
    mut pending: ResMut<PendingPhase>,
    mut cues: EventWriter<CombatCue>,
    mut opponent_q: Query<
        (&mut OpponentState, &OpponentProfile),
        (With<OpponentFighter>, Without<PlayerFighter>),
    >,
    mut player_q: Query<
        (&mut PlayerState, &mut Health, &mut Stamina),
        (With<PlayerFighter>, Without<OpponentFighter>),
    >,
) {
    if *phase != MatchPhase::Playing {
        return;
    }
    let Ok((mut opp_state, profile)) = opponent_q.single_mut() else {
        return;
    };
    let OpponentAction::Telegraph(kind, side) = opp_state.action else {
        return;
    };
    if opp_state.busy() {
        return;
    }

    // Strike goes live. Punch active window is not speed-scaled — only the
    // windup is.
    let stats = kind.stats();
    opp_state.set(OpponentAction::Punch(kind, side), stats.punch_secs);

    let damage = opponent_strike_damage(kind, profile.power, difficulty.0, &specials);

    let Ok((mut player_state, mut player_health, mut player_stamina)) = player_q.single_mut()
    else {
        return;
    };

    let mut buffer = Vec::new();
    apply_incoming_damage(
        damage,
        &mut player_state,
        &mut player_health,
        &mut player_stamina,
        &mut combo,
        &mut pending,
        &mut buffer,
    );
    for cue in buffer {
        cues.write(cue);
    }
}

/// Система: завершённые punch/dodge/hit игрока возвращаются в idle
///
/// Block держится до явного release, Ko терминален.
pub fn recover_player_action(
    phase: Res<MatchPhase>,
    mut player_q: Query<&mut PlayerState, (With<PlayerFighter>, Without<OpponentFighter>)>,
) {
    if *phase != MatchPhase::Playing {
        return;
    }
    let Ok(mut state) = player_q.single_mut() else {
        return;
    };

    let timed_action = !matches!(
        state.action,
        PlayerAction::Idle | PlayerAction::Block | PlayerAction::Ko
    );
    if timed_action && !state.busy() {
        state.reset();
    }
}
