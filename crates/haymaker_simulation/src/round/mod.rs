//! Match/round lifecycle: MENU → ENTRANCE → PLAYING → {VICTORY | GAME_OVER},
//! roster progression и difficulty scaling.
//!
//! Отложенные переходы фаз (entrance → fight, KO → victory/defeat) живут в
//! `PendingPhase` — scheduled event с явной отменой при reset'е раунда,
//! вместо неотменяемых host-таймеров. Stale KO из прошлого раунда не может
//! выстрелить в новый.

use bevy::prelude::*;
use serde::Serialize;

use crate::combat::{CombatCue, ComboCounter, LastHit};
use crate::components::{
    Health, OpponentFighter, OpponentState, PlayerFighter, PlayerState, Stamina,
};
use crate::roster::{OpponentProfile, Roster};
use crate::specials::SpecialStatus;
use crate::{ai::OpponentAi, log_info};

/// Длительность entrance-фазы перед боем (секунды)
pub const ENTRANCE_SECS: f32 = 4.0;
/// Задержка между KO и сменой фазы матча
pub const KO_PHASE_DELAY_SECS: f32 = 3.0;
/// Прирост difficulty за полный круг по ростеру
pub const DIFFICULTY_STEP: f32 = 0.2;

/// Фаза матча
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum MatchPhase {
    #[default]
    Menu,
    Entrance,
    Playing,
    Victory,
    GameOver,
}

/// Событие: фаза матча сменилась (advisory, для презентации)
#[derive(Event, Debug, Clone)]
pub struct PhaseChanged {
    pub phase: MatchPhase,
}

/// Host-команда: начать раунд (из меню, rematch или следующий оппонент)
#[derive(Event, Debug, Clone)]
pub struct StartRound {
    pub next_opponent: bool,
}

/// Session-wide множитель HP оппонентов (растёт с каждым кругом ростера)
#[derive(Resource, Debug, Clone, Copy)]
pub struct Difficulty(pub f32);

impl Default for Difficulty {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Позиция в ростере
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct RosterCursor(pub usize);

/// Отложенная смена фазы с явной отменой
#[derive(Resource, Debug, Clone, Default)]
pub struct PendingPhase(pub Option<ScheduledPhase>);

#[derive(Debug, Clone)]
pub struct ScheduledPhase {
    pub next: MatchPhase,
    pub timer: f32,
}

impl PendingPhase {
    pub fn schedule(&mut self, next: MatchPhase, secs: f32) {
        self.0 = Some(ScheduledPhase { next, timer: secs });
    }

    pub fn cancel(&mut self) {
        self.0 = None;
    }
}

/// Система: обработка StartRound команд хоста
///
/// Атомарный reset всего per-round состояния: статы, state machines, AI
/// queue/таймеры, special окна, combo counter, отложенные переходы.
pub fn handle_round_commands(
    mut commands_in: EventReader<StartRound>,
    roster: Res<Roster>,
    mut phase: ResMut<MatchPhase>,
    mut pending: ResMut<PendingPhase>,
    mut difficulty: ResMut<Difficulty>,
    mut cursor: ResMut<RosterCursor>,
    mut specials: ResMut<SpecialStatus>,
    mut combo: ResMut<ComboCounter>,
    mut last_hit: ResMut<LastHit>,
    mut cues: EventWriter<CombatCue>,
    mut phase_events: EventWriter<PhaseChanged>,
    mut player_q: Query<
        (&mut PlayerState, &mut Health, &mut Stamina),
        (With<PlayerFighter>, Without<OpponentFighter>),
    >,
    mut opponent_q: Query<
        (
            &mut OpponentState,
            &mut OpponentAi,
            &mut OpponentProfile,
            &mut Health,
            &mut Stamina,
        ),
        (With<OpponentFighter>, Without<PlayerFighter>),
    >,
) {
    for command in commands_in.read() {
        let Ok((mut player_state, mut player_hp, mut player_stamina)) = player_q.single_mut()
        else {
            return;
        };
        let Ok((mut opp_state, mut ai, mut profile, mut opp_hp, mut opp_stamina)) =
            opponent_q.single_mut()
        else {
            return;
        };

        if roster.0.is_empty() {
            return;
        }

        // Stale KO/victory переход не должен выстрелить в новый раунд
        pending.cancel();

        // Roster progression
        if command.next_opponent {
            cursor.0 = (cursor.0 + 1) % roster.0.len();
            if cursor.0 == 0 {
                difficulty.0 += DIFFICULTY_STEP;
                cues.write(CombatCue::LevelUp);
            }
        } else {
            // Рестарт (game over или из меню) сбрасывает difficulty
            cursor.0 = 0;
            difficulty.0 = 1.0;
        }

        let next = roster.0[cursor.0].clone();
        let scaled_hp = (next.max_hp as f32 * difficulty.0) as u32;

        player_state.reset();
        player_hp.reset(100);
        player_stamina.reset();

        opp_state.reset();
        ai.reset();
        opp_hp.reset(scaled_hp);
        opp_stamina.reset();
        *profile = next;

        specials.clear();
        combo.0 = 0;
        last_hit.0 = Default::default();

        *phase = MatchPhase::Entrance;
        pending.schedule(MatchPhase::Playing, ENTRANCE_SECS);
        phase_events.write(PhaseChanged {
            phase: MatchPhase::Entrance,
        });

        log_info(&format!(
            "Round start: {} (hp {}, difficulty {:.1})",
            profile.name, scaled_hp, difficulty.0
        ));
    }
}

/// Система: отложенные переходы фаз (entrance countdown, KO задержки)
pub fn run_pending_phase(
    time: Res<Time<Fixed>>,
    mut phase: ResMut<MatchPhase>,
    mut pending: ResMut<PendingPhase>,
    mut phase_events: EventWriter<PhaseChanged>,
) {
    let Some(scheduled) = pending.0.as_mut() else {
        return;
    };

    scheduled.timer -= time.delta_secs();
    if scheduled.timer > 0.0 {
        return;
    }

    let next = scheduled.next;
    pending.cancel();
    *phase = next;
    phase_events.write(PhaseChanged { phase: next });

    log_info(&format!("Match phase → {:?}", next));
}

/// Round Plugin
///
/// Порядок: команды хоста в начале тика (Round set), отложенные переходы и
/// snapshot в конце (Publish set).
pub struct RoundPlugin;

impl Plugin for RoundPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<StartRound>()
            .add_event::<PhaseChanged>()
            .init_resource::<MatchPhase>()
            .init_resource::<Difficulty>()
            .init_resource::<RosterCursor>()
            .init_resource::<PendingPhase>()
            .init_resource::<Roster>()
            .init_resource::<crate::snapshot::MatchSnapshot>();

        app.add_systems(
            FixedUpdate,
            handle_round_commands.in_set(crate::SimSet::Round),
        );
        app.add_systems(
            FixedUpdate,
            (run_pending_phase, crate::snapshot::publish_snapshot)
                .chain()
                .in_set(crate::SimSet::Publish),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_phase_schedule_and_cancel() {
        let mut pending = PendingPhase::default();
        pending.schedule(MatchPhase::Victory, 3.0);
        assert!(pending.0.is_some());

        pending.cancel();
        assert!(pending.0.is_none());
    }

    #[test]
    fn test_pending_phase_replaced_by_newer_schedule() {
        let mut pending = PendingPhase::default();
        pending.schedule(MatchPhase::Victory, 3.0);
        pending.schedule(MatchPhase::Playing, ENTRANCE_SECS);

        let scheduled = pending.0.unwrap();
        assert_eq!(scheduled.next, MatchPhase::Playing);
        assert_eq!(scheduled.timer, ENTRANCE_SECS);
    }

    #[test]
    fn test_difficulty_default() {
        assert_eq!(Difficulty::default().0, 1.0);
    }
}
