//! Opponent decision engine.
//!
//! Once per tick (`advance_opponent`):
//! 1. Recovery — a completed non-telegraph action reverts to idle and the
//!    next decision is scheduled (faster when hurt, when chaining a queued
//!    pattern, or under an aggression special).
//! 2. Decision — when idle past the scheduled time, consume the next queued
//!    move or select a new pattern.
//!
//! Pattern selection draws from the seeded RNG resource, so fights replay
//! identically for a given seed and input script.

use bevy::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

use crate::combat::{resolver::random_guard, CombatCue};
use crate::components::{
    Health, OpponentAction, OpponentFighter, OpponentState, PlayerFighter, OPPONENT_BLOCK_SECS,
};
use crate::roster::{
    OpponentProfile, QueuedMove, SpecialMove, BASIC_ONE_TWO, DEMOLITION, FREIGHT_TRAIN,
    HOOK_COMBO, SURGE_UPPERCUT, THE_CRUSHER,
};
use crate::round::MatchPhase;
use crate::specials::{
    SpecialKind, SpecialStatus, INVERTED_SECS, POWER_COMBO_SECS, SELF_HARM_SECS, SURGE_SECS,
};
use crate::DeterministicRng;

// ============================================================================
// Tuning constants
// ============================================================================

/// Base pause between decisions (seconds, before modifiers).
pub const RECOVERY_BASE_SECS: f32 = 0.4;
/// Pause between moves of an already-chosen pattern.
pub const COMBO_INTERVAL_SECS: f32 = 0.08;
/// Pause before the first decision of a round.
pub const INITIAL_DECISION_SECS: f32 = 1.0;

/// Below this HP fraction the opponent speeds up (desperation).
pub const DESPERATION_HP_PERCENT: f32 = 0.3;
pub const DESPERATION_FACTOR: f32 = 0.6;

/// Chance to answer a player punch with an instant matching block.
/// Rolled from the input path, kept here with the other AI knobs.
pub const REFLEX_BLOCK_CHANCE: f32 = 0.6;
/// Chance to take a defensive stance instead of picking a pattern.
pub const REFLEX_STANCE_CHANCE: f32 = 0.15;

/// Special trigger gate: base chance, and the raised one below half HP.
pub const SPECIAL_CHANCE: f32 = 0.35;
pub const DESPERATE_SPECIAL_CHANCE: f32 = 0.6;
pub const SPECIAL_HP_PERCENT: f32 = 0.5;

/// Roll above this picks the profile's preferred pattern.
pub const PREFERRED_PATTERN_ROLL: f32 = 0.6;
/// Below this (of the generic branch) picks jab-jab over hook-hook.
pub const BASIC_PATTERN_ROLL: f32 = 0.4;

/// Recovery multiplier while the inversion special runs (more aggressive).
pub const INVERT_AGGRESSION_MOD: f32 = 0.5;
const POST_REFLEX_STANCE_PAD: f32 = 0.1;

// ============================================================================
// Component
// ============================================================================

/// Decision state: очередь паттерна + таймер до следующего решения.
#[derive(Component, Debug, Clone)]
pub struct OpponentAi {
    pub queue: VecDeque<QueuedMove>,
    /// Seconds until the next decision is allowed (while idle).
    pub decision_timer: f32,
    /// Recovery multiplier; armed by specials, 1.0 = normal.
    pub aggression_mod: f32,
}

impl Default for OpponentAi {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            decision_timer: INITIAL_DECISION_SECS,
            aggression_mod: 1.0,
        }
    }
}

impl OpponentAi {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// Pure decision helpers
// ============================================================================

/// Delay until the next decision after finishing an action.
pub fn recovery_delay(hp_percent: f32, has_queued: bool, aggression_mod: f32, speed: f32) -> f32 {
    let mut delay = if has_queued {
        COMBO_INTERVAL_SECS
    } else {
        RECOVERY_BASE_SECS
    };
    if hp_percent < DESPERATION_HP_PERCENT {
        delay *= DESPERATION_FACTOR;
    }
    delay * aggression_mod * speed
}

/// What a decision tick resolved to, before the reflex-stance override.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    Special(SpecialMove),
    Pattern(&'static [QueuedMove]),
}

/// Map one uniform roll to a special or a pattern.
///
/// One-shot-window specials (inversion, self-harm) fall through to normal
/// pattern selection while their window is still running.
pub fn choose_decision(
    r: f32,
    hp_percent: f32,
    profile: &OpponentProfile,
    specials: &SpecialStatus,
) -> Decision {
    let can_special =
        r < SPECIAL_CHANCE || (hp_percent < SPECIAL_HP_PERCENT && r < DESPERATE_SPECIAL_CHANCE);

    if can_special {
        match profile.special {
            SpecialMove::InvertControls if specials.is_active(SpecialKind::Inverted) => {}
            SpecialMove::SelfHarmHex if specials.is_active(SpecialKind::SelfHarm) => {}
            special => return Decision::Special(special),
        }
    }

    if r > PREFERRED_PATTERN_ROLL {
        Decision::Pattern(profile.preferred_pattern)
    } else if hp_percent < DESPERATION_HP_PERCENT {
        Decision::Pattern(THE_CRUSHER)
    } else if r < BASIC_PATTERN_ROLL {
        Decision::Pattern(BASIC_ONE_TWO)
    } else {
        Decision::Pattern(HOOK_COMBO)
    }
}

/// Telegraph/guard duration for a queued move: base × profile speed,
/// shortened further under a speed-boost window.
pub fn move_duration(mv: QueuedMove, speed: f32, speed_boosted: bool) -> f32 {
    let base = match mv {
        QueuedMove::Strike(kind, _) => kind.stats().telegraph_secs,
        QueuedMove::Guard(_) => OPPONENT_BLOCK_SECS,
    };
    let mut duration = base * speed;
    if speed_boosted {
        duration *= crate::specials::SPEED_BOOST_FACTOR;
    }
    duration
}

/// Put a queued move on the state machine.
pub fn start_move(
    mv: QueuedMove,
    state: &mut OpponentState,
    profile: &OpponentProfile,
    specials: &SpecialStatus,
) {
    let duration = move_duration(
        mv,
        profile.speed,
        specials.is_active(SpecialKind::SpeedBoost),
    );
    match mv {
        QueuedMove::Strike(kind, side) => {
            state.set(OpponentAction::Telegraph(kind, side), duration)
        }
        QueuedMove::Guard(height) => state.set(OpponentAction::Block(height), duration),
    }
}

/// Arm the profile's unique special.
fn fire_special(
    special: SpecialMove,
    announce: &'static str,
    ai: &mut OpponentAi,
    specials: &mut SpecialStatus,
    cues: &mut Vec<CombatCue>,
) {
    let kind = match special {
        SpecialMove::BlitzCombo => {
            ai.queue = OpponentProfile::queue_of(DEMOLITION);
            None
        }
        SpecialMove::SurgeStrike => {
            specials.arm(SpecialKind::DoubleDamage, SURGE_SECS);
            specials.arm(SpecialKind::SpeedBoost, SURGE_SECS);
            ai.queue = OpponentProfile::queue_of(SURGE_UPPERCUT);
            Some(SpecialKind::DoubleDamage)
        }
        SpecialMove::InvertControls => {
            specials.arm(SpecialKind::Inverted, INVERTED_SECS);
            ai.aggression_mod = INVERT_AGGRESSION_MOD;
            Some(SpecialKind::Inverted)
        }
        SpecialMove::PowerCombo => {
            specials.arm(SpecialKind::DoubleDamage, POWER_COMBO_SECS);
            ai.queue = OpponentProfile::queue_of(FREIGHT_TRAIN);
            Some(SpecialKind::DoubleDamage)
        }
        SpecialMove::SelfHarmHex => {
            specials.arm(SpecialKind::SelfHarm, SELF_HARM_SECS);
            Some(SpecialKind::SelfHarm)
        }
    };

    cues.push(CombatCue::SpecialActivated { kind, announce });
}

/// Full pattern-selection step for one decision tick.
pub fn select_new_pattern(
    state: &mut OpponentState,
    ai: &mut OpponentAi,
    profile: &OpponentProfile,
    health: &Health,
    specials: &mut SpecialStatus,
    rng: &mut ChaCha8Rng,
    cues: &mut Vec<CombatCue>,
) {
    let hp_percent = health.percent();
    let r: f32 = rng.gen();

    match choose_decision(r, hp_percent, profile, specials) {
        Decision::Special(special) => {
            fire_special(special, profile.announce, ai, specials, cues);
        }
        Decision::Pattern(pattern) => {
            // Defensive stance override instead of attacking this decision
            if hp_percent > DESPERATION_HP_PERCENT && rng.gen::<f32>() < REFLEX_STANCE_CHANCE {
                state.set(OpponentAction::Block(random_guard(rng)), OPPONENT_BLOCK_SECS);
                ai.decision_timer = OPPONENT_BLOCK_SECS + POST_REFLEX_STANCE_PAD;
                return;
            }
            ai.queue = OpponentProfile::queue_of(pattern);
        }
    }
}

// ============================================================================
// System
// ============================================================================

/// Система: один шаг decision engine за тик
pub fn advance_opponent(
    phase: Res<MatchPhase>,
    mut rng: ResMut<DeterministicRng>,
    mut specials: ResMut<SpecialStatus>,
    mut cues: EventWriter<CombatCue>,
    mut opponent_q: Query<
        (&mut OpponentState, &mut OpponentAi, &OpponentProfile, &Health),
        (With<OpponentFighter>, Without<PlayerFighter>),
    >,
) {
    if *phase != MatchPhase::Playing {
        return;
    }
    let Ok((mut state, mut ai, profile, health)) = opponent_q.single_mut() else {
        return;
    };

    if state.action.is_ko() {
        return;
    }
    // Ещё в анимации (telegraph/punch/hit/stun/block) — ждём
    if state.busy() {
        return;
    }

    // Recovery: завершённое действие → idle, пауза до следующего решения.
    // Telegraph не recovery — его забирает combat resolver.
    if state.action != OpponentAction::Idle && !state.action.is_telegraph() {
        state.reset();
        ai.decision_timer = recovery_delay(
            health.percent(),
            !ai.queue.is_empty(),
            ai.aggression_mod,
            profile.speed,
        );
    }

    // Aggression модификатор живёт ровно пока активно его inversion окно
    if ai.aggression_mod != 1.0 && !specials.is_active(SpecialKind::Inverted) {
        ai.aggression_mod = 1.0;
    }

    // Decision
    if state.action == OpponentAction::Idle && ai.decision_timer <= 0.0 {
        if let Some(mv) = ai.queue.pop_front() {
            start_move(mv, &mut state, profile, &specials);
        } else {
            let mut buffer = Vec::new();
            select_new_pattern(
                &mut state,
                &mut ai,
                profile,
                health,
                &mut specials,
                &mut rng.rng,
                &mut buffer,
            );
            for cue in buffer {
                cues.write(cue);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{BlockHeight, MoveKind, Side};
    use crate::roster::Roster;
    use rand::SeedableRng;

    fn profile(idx: usize) -> OpponentProfile {
        Roster::default().0[idx].clone()
    }

    #[test]
    fn test_recovery_delay_modifiers() {
        // База
        assert_eq!(recovery_delay(1.0, false, 1.0, 1.0), RECOVERY_BASE_SECS);
        // Очередь паттерна — короткий combo interval
        assert_eq!(recovery_delay(1.0, true, 1.0, 1.0), COMBO_INTERVAL_SECS);
        // Desperation ускоряет
        let desperate = recovery_delay(0.2, false, 1.0, 1.0);
        assert!((desperate - RECOVERY_BASE_SECS * DESPERATION_FACTOR).abs() < 1e-6);
        // Aggression и speed — множители
        let modified = recovery_delay(1.0, false, 0.5, 1.3);
        assert!((modified - RECOVERY_BASE_SECS * 0.5 * 1.3).abs() < 1e-6);
    }

    #[test]
    fn test_low_roll_fires_special() {
        let specials = SpecialStatus::default();
        let p = profile(0);
        assert_eq!(
            choose_decision(0.1, 1.0, &p, &specials),
            Decision::Special(SpecialMove::BlitzCombo)
        );
    }

    #[test]
    fn test_half_hp_raises_special_chance() {
        let specials = SpecialStatus::default();
        let p = profile(1);
        // 0.5 не проходит базовый гейт, но проходит desperate
        assert_eq!(
            choose_decision(0.5, 0.4, &p, &specials),
            Decision::Special(SpecialMove::SurgeStrike)
        );
        assert_eq!(
            choose_decision(0.5, 0.9, &p, &specials),
            Decision::Pattern(HOOK_COMBO)
        );
    }

    #[test]
    fn test_high_roll_prefers_signature_pattern() {
        let specials = SpecialStatus::default();
        let p = profile(0);
        assert_eq!(
            choose_decision(0.7, 1.0, &p, &specials),
            Decision::Pattern(p.preferred_pattern)
        );
    }

    #[test]
    fn test_generic_branch_split() {
        let specials = SpecialStatus::default();
        let p = profile(0);
        assert_eq!(
            choose_decision(0.38, 1.0, &p, &specials),
            Decision::Pattern(BASIC_ONE_TWO)
        );
        assert_eq!(
            choose_decision(0.55, 1.0, &p, &specials),
            Decision::Pattern(HOOK_COMBO)
        );
    }

    #[test]
    fn test_active_window_falls_through_to_crusher() {
        // InvertControls уже активен → стандартная логика, при низком HP —
        // desperation pattern
        let mut specials = SpecialStatus::default();
        specials.arm(SpecialKind::Inverted, 20.0);
        let p = profile(2);
        assert_eq!(
            choose_decision(0.2, 0.2, &p, &specials),
            Decision::Pattern(THE_CRUSHER)
        );
    }

    #[test]
    fn test_move_duration_scaling() {
        let jab = QueuedMove::Strike(MoveKind::Jab, Side::Left);
        assert!((move_duration(jab, 1.0, false) - 0.45).abs() < 1e-6);
        assert!((move_duration(jab, 0.8, false) - 0.36).abs() < 1e-6);
        // Speed boost сокращает telegraph
        assert!((move_duration(jab, 1.0, true) - 0.45 * 0.4).abs() < 1e-6);

        let guard = QueuedMove::Guard(BlockHeight::High);
        assert!((move_duration(guard, 1.0, false) - OPPONENT_BLOCK_SECS).abs() < 1e-6);
    }

    #[test]
    fn test_start_move_sets_telegraph() {
        let mut state = OpponentState::default();
        let specials = SpecialStatus::default();
        let p = profile(0);

        start_move(
            QueuedMove::Strike(MoveKind::Hook, Side::Right),
            &mut state,
            &p,
            &specials,
        );

        assert_eq!(
            state.action,
            OpponentAction::Telegraph(MoveKind::Hook, Side::Right)
        );
        assert!(state.busy());
    }

    #[test]
    fn test_fire_special_effects() {
        let mut specials = SpecialStatus::default();
        let mut cues = Vec::new();

        let mut ai = OpponentAi::default();
        fire_special(SpecialMove::SurgeStrike, "!", &mut ai, &mut specials, &mut cues);
        assert!(specials.is_active(SpecialKind::DoubleDamage));
        assert!(specials.is_active(SpecialKind::SpeedBoost));
        assert_eq!(ai.queue.len(), 1);

        specials.clear();
        let mut ai = OpponentAi::default();
        fire_special(SpecialMove::PowerCombo, "!", &mut ai, &mut specials, &mut cues);
        assert!(specials.is_active(SpecialKind::DoubleDamage));
        assert_eq!(ai.queue.len(), FREIGHT_TRAIN.len());

        let mut ai = OpponentAi::default();
        fire_special(SpecialMove::InvertControls, "!", &mut ai, &mut specials, &mut cues);
        assert!(specials.is_active(SpecialKind::Inverted));
        assert_eq!(ai.aggression_mod, INVERT_AGGRESSION_MOD);

        let mut ai = OpponentAi::default();
        fire_special(SpecialMove::SelfHarmHex, "!", &mut ai, &mut specials, &mut cues);
        assert!(specials.is_active(SpecialKind::SelfHarm));

        assert_eq!(cues.len(), 4);
    }

    #[test]
    fn test_select_pattern_queues_moves() {
        let mut state = OpponentState::default();
        let mut ai = OpponentAi::default();
        let p = profile(0);
        let health = Health::new(200);
        let mut specials = SpecialStatus::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut cues = Vec::new();

        select_new_pattern(
            &mut state, &mut ai, &p, &health, &mut specials, &mut rng, &mut cues,
        );

        // Любой исход валиден: очередь, спешл или защитная стойка — но
        // что-то должно было произойти
        let acted = !ai.queue.is_empty() || !cues.is_empty() || state.action.is_guarding();
        assert!(acted);
    }
}
