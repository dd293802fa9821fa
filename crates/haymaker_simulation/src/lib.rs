//! HAYMAKER Simulation Core
//!
//! Headless ECS-симуляция боксёрского поединка на Bevy 0.16: игрок против
//! AI-оппонента, fixed 60Hz tick. Рендер, звук и сырой ввод — на стороне
//! хоста; сюда приходят абстрактные action requests (PlayerInput,
//! StartRound), наружу уходят MatchSnapshot и advisory CombatCue события.
//!
//! Мутации состояния возможны только через два входа: события ввода
//! (Input set) и сам frame tick — никаких полуприменённых переходов.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod input;
pub mod logger;
pub mod roster;
pub mod round;
pub mod snapshot;
pub mod specials;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, OpponentAi};
pub use combat::{CombatCue, CombatPlugin, ComboCounter, FighterSide, LastHit};
pub use components::*;
pub use input::{PlayerInput, PlayerInputPlugin};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_logger, LogLevel, LogPrinter,
};
pub use roster::{OpponentProfile, Roster};
pub use round::{Difficulty, MatchPhase, PhaseChanged, RoundPlugin, StartRound};
pub use snapshot::{FighterSnapshot, MatchSnapshot};
pub use specials::{SpecialKind, SpecialStatus};

/// Фазы одного simulation тика (жёсткий порядок для детерминизма)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Команды хоста (StartRound)
    Round,
    /// Ввод игрока (+ синхронная резолюция ударов)
    Input,
    /// Stamina regen, countdown таймеры, special окна
    Tick,
    /// Decision engine оппонента
    Ai,
    /// Telegraph → punch, возврат игрока в idle
    Resolve,
    /// Отложенные переходы фаз + публикация снимка
    Publish,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG; init_resource не перетирает seed,
            // выставленный хостом заранее
            .init_resource::<DeterministicRng>();

        app.configure_sets(
            FixedUpdate,
            (
                SimSet::Round,
                SimSet::Input,
                SimSet::Tick,
                SimSet::Ai,
                SimSet::Resolve,
                SimSet::Publish,
            )
                .chain(),
        );

        // Подсистемы
        app.add_plugins((RoundPlugin, PlayerInputPlugin, CombatPlugin, AIPlugin));

        // Оба бойца живут весь сеанс; раунды только сбрасывают их состояние
        spawn_fighters(app.world_mut());
    }
}

fn spawn_fighters(world: &mut World) {
    world.spawn((
        PlayerFighter,
        PlayerState::default(),
        Health::new(100),
        Stamina::new(100.0),
    ));

    let profile = Roster::default().0[0].clone();
    let max_hp = profile.max_hp;
    world.spawn((
        OpponentFighter,
        OpponentState::default(),
        OpponentAi::default(),
        Health::new(max_hp),
        Stamina::new(100.0),
        profile,
    ));
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}
