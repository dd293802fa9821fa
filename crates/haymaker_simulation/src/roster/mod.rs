//! Opponent roster: immutable per-match profiles plus the named attack
//! patterns the AI queues from.
//!
//! The roster is an injectable resource: hosts with their own character
//! data overwrite `Roster` before the first round. The built-in five cover
//! every special archetype and feed the headless binary and tests.

use bevy::prelude::*;
use std::collections::VecDeque;

use crate::components::{BlockHeight, MoveKind, Side};

/// One entry of an AI attack pattern: a strike to telegraph, or a guard
/// stance to take mid-pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueuedMove {
    Strike(MoveKind, Side),
    Guard(BlockHeight),
}

use BlockHeight::{High, Low};
use MoveKind::{Hook, Jab, Uppercut};
use QueuedMove::{Guard, Strike};
use Side::{Left, Right};

// ============================================================================
// Named patterns
// ============================================================================

pub const BASIC_ONE_TWO: &[QueuedMove] = &[Strike(Jab, Left), Strike(Jab, Right)];
pub const HOOK_COMBO: &[QueuedMove] = &[Strike(Hook, Left), Strike(Hook, Right)];
/// Desperation pattern below 30% HP.
pub const THE_CRUSHER: &[QueuedMove] = &[Strike(Hook, Right), Strike(Uppercut, Left)];
/// Single fast uppercut queued by the surge special.
pub const SURGE_UPPERCUT: &[QueuedMove] = &[Strike(Uppercut, Left)];

// Signature patterns
pub const DEMOLITION: &[QueuedMove] =
    &[Strike(Jab, Left), Strike(Hook, Right), Strike(Uppercut, Left)];
pub const FIVE_ALARM: &[QueuedMove] = &[
    Strike(Jab, Left),
    Strike(Jab, Right),
    Strike(Hook, Left),
    Strike(Hook, Right),
    Strike(Uppercut, Left),
];
pub const BEAT_DROP: &[QueuedMove] = &[
    Strike(Jab, Left),
    Strike(Hook, Right),
    Strike(Hook, Left),
    Strike(Uppercut, Right),
];
pub const FREIGHT_TRAIN: &[QueuedMove] = &[
    Strike(Hook, Left),
    Strike(Hook, Right),
    Strike(Uppercut, Left),
    Strike(Uppercut, Right),
    Strike(Hook, Left),
];
pub const STONEWALL: &[QueuedMove] = &[
    Guard(High),
    Guard(Low),
    Strike(Jab, Right),
    Strike(Jab, Right),
];

// ============================================================================
// Profiles
// ============================================================================

/// Each profile owns exactly one unique special maneuver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialMove {
    /// Queue the signature three-hit combo.
    BlitzCombo,
    /// Short double-damage + speed-boost windows, one fast uppercut queued.
    SurgeStrike,
    /// Long control-inversion window, halved recovery delay.
    InvertControls,
    /// Medium double-damage window plus the signature five-hit combo.
    PowerCombo,
    /// Window during which the player's own punches hurt the player.
    SelfHarmHex,
}

/// Immutable per-match opponent record. `speed` is a duration multiplier
/// (lower is faster).
#[derive(Component, Debug, Clone)]
pub struct OpponentProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub max_hp: u32,
    pub power: f32,
    pub speed: f32,
    pub preferred_pattern: &'static [QueuedMove],
    pub special: SpecialMove,
    /// Announce line passed through to presentation when the special fires.
    pub announce: &'static str,
}

impl OpponentProfile {
    /// Fresh pattern queue from a static pattern slice.
    pub fn queue_of(pattern: &[QueuedMove]) -> VecDeque<QueuedMove> {
        pattern.iter().copied().collect()
    }
}

/// Ordered opponent progression. Index 0 is the first match.
#[derive(Resource, Debug, Clone)]
pub struct Roster(pub Vec<OpponentProfile>);

impl Default for Roster {
    fn default() -> Self {
        Self(vec![
            OpponentProfile {
                id: "brick_house",
                name: "BRICK HOUSE",
                description: "The gold standard. Balanced and tough.",
                max_hp: 200,
                power: 1.0,
                speed: 1.0,
                preferred_pattern: BASIC_ONE_TWO,
                special: SpecialMove::BlitzCombo,
                announce: "DEMOLITION!",
            },
            OpponentProfile {
                id: "quick_fuse",
                name: "QUICK FUSE",
                description: "Fast, annoying, and mischievous.",
                max_hp: 150,
                power: 0.8,
                speed: 0.8,
                preferred_pattern: FIVE_ALARM,
                special: SpecialMove::SurgeStrike,
                announce: "SHORT FUSE!",
            },
            OpponentProfile {
                id: "dj_southpaw",
                name: "DJ SOUTHPAW",
                description: "Rhythm-based counter puncher.",
                max_hp: 180,
                power: 1.0,
                speed: 1.1,
                preferred_pattern: BEAT_DROP,
                special: SpecialMove::InvertControls,
                announce: "SWITCH UP!",
            },
            OpponentProfile {
                id: "big_freight",
                name: "BIG FREIGHT",
                description: "Slow but hits like a truck.",
                max_hp: 250,
                power: 1.4,
                speed: 1.3,
                preferred_pattern: FREIGHT_TRAIN,
                special: SpecialMove::PowerCombo,
                announce: "FULL CARGO!",
            },
            OpponentProfile {
                id: "mad_hexer",
                name: "MAD HEXER",
                description: "Brawler with wild swings.",
                max_hp: 220,
                power: 1.1,
                speed: 1.0,
                preferred_pattern: STONEWALL,
                special: SpecialMove::SelfHarmHex,
                announce: "JINXED!",
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_roster_shape() {
        let roster = Roster::default();
        assert_eq!(roster.0.len(), 5);

        // Каждый спешл уникален
        for (i, a) in roster.0.iter().enumerate() {
            for b in roster.0.iter().skip(i + 1) {
                assert_ne!(a.special, b.special, "{} vs {}", a.id, b.id);
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_profiles_sane() {
        for profile in Roster::default().0 {
            assert!(profile.max_hp > 0, "{}", profile.id);
            assert!(profile.power > 0.0, "{}", profile.id);
            assert!(profile.speed > 0.0, "{}", profile.id);
            assert!(!profile.preferred_pattern.is_empty(), "{}", profile.id);
        }
    }

    #[test]
    fn test_queue_of_preserves_order() {
        let mut queue = OpponentProfile::queue_of(DEMOLITION);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop_front(), Some(Strike(Jab, Left)));
        assert_eq!(queue.pop_front(), Some(Strike(Hook, Right)));
        assert_eq!(queue.pop_front(), Some(Strike(Uppercut, Left)));
    }

    #[test]
    fn test_stonewall_opens_with_guards() {
        assert!(matches!(STONEWALL[0], Guard(High)));
        assert!(matches!(STONEWALL[1], Guard(Low)));
    }
}
