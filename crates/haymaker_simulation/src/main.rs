//! Headless бой HAYMAKER
//!
//! Запускает симуляцию без рендера: простейший скрипт ввода против AI,
//! периодическая печать снимка.

use std::time::Duration;

use bevy::prelude::*;
use haymaker_simulation::{
    create_headless_app, MatchPhase, MatchSnapshot, PlayerInput, PunchTarget, Side,
    SimulationPlugin, StartRound,
};

fn main() {
    let seed = 42;
    println!("Starting HAYMAKER headless bout (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    app.world_mut().send_event(StartRound {
        next_opponent: false,
    });

    let step = Duration::from_secs_f64(1.0 / 60.0);

    // Две минуты симуляции максимум
    for tick in 0..7200u32 {
        app.world_mut()
            .resource_mut::<Time<Fixed>>()
            .advance_by(step);
        app.world_mut().run_schedule(FixedUpdate);

        // Скрипт: прикрылись, отпустили, ударили
        match tick % 90 {
            0 => {
                app.world_mut()
                    .send_event(PlayerInput::Punch(Side::Left, PunchTarget::Head));
            }
            10 => {
                app.world_mut()
                    .send_event(PlayerInput::Punch(Side::Right, PunchTarget::Body));
            }
            30 => {
                app.world_mut().send_event(PlayerInput::Block);
            }
            80 => {
                app.world_mut().send_event(PlayerInput::ReleaseBlock);
            }
            _ => {}
        }

        if tick % 300 == 0 {
            let snapshot = app.world().resource::<MatchSnapshot>();
            println!(
                "tick {}: phase {:?}, player hp {}, {} hp {}",
                tick,
                snapshot.phase,
                snapshot.player.hp,
                snapshot.opponent_name,
                snapshot.opponent.hp,
            );
        }

        let phase = *app.world().resource::<MatchPhase>();
        if matches!(phase, MatchPhase::Victory | MatchPhase::GameOver) {
            println!("Bout over: {:?}", phase);
            return;
        }
    }

    println!("Time limit reached");
}
