//! Action state machines for both fighters.
//!
//! Both fighters hold a current action plus a countdown timer (seconds).
//! When the timer runs out the action is "completed" and the owning system
//! decides what happens next (revert to idle, telegraph → punch, etc.).
//!
//! States are tagged enums with predicate methods; dispatch never inspects
//! state names.

use bevy::prelude::*;
use serde::Serialize;

// ============================================================================
// Shared vocabulary
// ============================================================================

/// Left/right, from the player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect, Serialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Mirror image, used by the control-inversion special.
    pub fn mirrored(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Vertical target of a player punch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect, Serialize)]
pub enum PunchTarget {
    Head,
    Body,
}

/// Opponent guard height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect, Serialize)]
pub enum BlockHeight {
    High,
    Low,
}

impl BlockHeight {
    /// High guard stops head punches, low guard stops body punches.
    pub fn stops(self, target: PunchTarget) -> bool {
        matches!(
            (self, target),
            (BlockHeight::High, PunchTarget::Head) | (BlockHeight::Low, PunchTarget::Body)
        )
    }

    /// The guard that would stop a punch at `target`.
    pub fn against(target: PunchTarget) -> Self {
        match target {
            PunchTarget::Head => BlockHeight::High,
            PunchTarget::Body => BlockHeight::Low,
        }
    }
}

/// Where the last landed player punch connected (for presentation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize)]
pub enum HitType {
    #[default]
    None,
    Head,
    Body,
}

impl From<PunchTarget> for HitType {
    fn from(target: PunchTarget) -> Self {
        match target {
            PunchTarget::Head => HitType::Head,
            PunchTarget::Body => HitType::Body,
        }
    }
}

// ============================================================================
// Opponent move table
// ============================================================================

/// Opponent strike kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect, Serialize)]
pub enum MoveKind {
    Jab,
    Hook,
    Uppercut,
}

/// Static per-move numbers: damage plus telegraph/punch durations (seconds,
/// before profile speed scaling).
#[derive(Debug, Clone, Copy)]
pub struct AttackMove {
    pub damage: u32,
    pub telegraph_secs: f32,
    pub punch_secs: f32,
}

impl MoveKind {
    pub const fn stats(self) -> AttackMove {
        match self {
            MoveKind::Jab => AttackMove {
                damage: 8,
                telegraph_secs: 0.45,
                punch_secs: 0.20,
            },
            MoveKind::Hook => AttackMove {
                damage: 15,
                telegraph_secs: 0.70,
                punch_secs: 0.30,
            },
            MoveKind::Uppercut => AttackMove {
                damage: 25,
                telegraph_secs: 1.10,
                punch_secs: 0.40,
            },
        }
    }
}

// ============================================================================
// Action durations (seconds)
// ============================================================================

pub const PLAYER_PUNCH_SECS: f32 = 0.12;
pub const PLAYER_DODGE_SECS: f32 = 0.25;
pub const HIT_RECOVERY_SECS: f32 = 0.12;
pub const STUNNED_SECS: f32 = 1.5;
pub const OPPONENT_BLOCK_SECS: f32 = 0.6;
/// Forced guard window after a combo breaker.
pub const COMBO_BREAK_GUARD_SECS: f32 = 0.8;

// ============================================================================
// Player states
// ============================================================================

/// Player action states. Exactly one active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize)]
pub enum PlayerAction {
    #[default]
    Idle,
    /// Ends only on explicit release.
    Block,
    Dodge(Side),
    Punch(Side, PunchTarget),
    Hit,
    /// Terminal for the round.
    Ko,
}

impl PlayerAction {
    pub fn is_dodge(self) -> bool {
        matches!(self, PlayerAction::Dodge(_))
    }

    pub fn is_punch(self) -> bool {
        matches!(self, PlayerAction::Punch(..))
    }

    /// Block and Idle can always be interrupted by new input.
    pub fn is_interruptible(self) -> bool {
        matches!(self, PlayerAction::Idle | PlayerAction::Block)
    }
}

/// Current player action + remaining time.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PlayerState {
    pub action: PlayerAction,
    /// Seconds until the action completes. Unused for Idle/Block/Ko.
    pub timer: f32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            action: PlayerAction::Idle,
            timer: 0.0,
        }
    }
}

impl PlayerState {
    pub fn set(&mut self, action: PlayerAction, secs: f32) {
        self.action = action;
        self.timer = secs;
    }

    pub fn busy(&self) -> bool {
        self.timer > 0.0
    }

    pub fn reset(&mut self) {
        self.action = PlayerAction::Idle;
        self.timer = 0.0;
    }
}

// ============================================================================
// Opponent states
// ============================================================================

/// Opponent action states. A telegraph always precedes its punch variant —
/// that windup is the player's counter window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize)]
pub enum OpponentAction {
    #[default]
    Idle,
    Block(BlockHeight),
    Telegraph(MoveKind, Side),
    Punch(MoveKind, Side),
    Hit,
    Stunned,
    /// Terminal for the round.
    Ko,
}

impl OpponentAction {
    pub fn is_telegraph(self) -> bool {
        matches!(self, OpponentAction::Telegraph(..))
    }

    pub fn is_guarding(self) -> bool {
        matches!(self, OpponentAction::Block(_))
    }

    pub fn is_ko(self) -> bool {
        matches!(self, OpponentAction::Ko)
    }
}

/// Current opponent action + remaining time.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct OpponentState {
    pub action: OpponentAction,
    pub timer: f32,
}

impl Default for OpponentState {
    fn default() -> Self {
        Self {
            action: OpponentAction::Idle,
            timer: 0.0,
        }
    }
}

impl OpponentState {
    pub fn set(&mut self, action: OpponentAction, secs: f32) {
        self.action = action;
        self.timer = secs;
    }

    pub fn busy(&self) -> bool {
        self.timer > 0.0
    }

    pub fn reset(&mut self) {
        self.action = OpponentAction::Idle;
        self.timer = 0.0;
    }
}
