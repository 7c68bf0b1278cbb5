use inquire::Select;
use pokemon_quest::game::GameSession;
use pokemon_quest::{save, Pokedex};
use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics go to a file only; the console belongs to the game.
    let _guard = init_tracing();

    let dex = match Pokedex::builtin() {
        Ok(dex) => dex,
        Err(error) => {
            eprintln!("Failed to load game data: {}", error);
            std::process::exit(1);
        }
    };

    println!("==============================");
    println!("       POKEMON  QUEST");
    println!("==============================");

    loop {
        let Ok(choice) = Select::new("Main menu:", vec!["New Game", "Load Game", "Quit"]).prompt()
        else {
            return;
        };

        match choice {
            "New Game" => {
                if let Some(mut session) = GameSession::new_game(dex.clone()) {
                    session.run();
                }
            }
            "Load Game" => {
                let saves = save::list_saves();
                if saves.is_empty() {
                    println!("No saved games found.");
                    continue;
                }
                let Ok(name) = Select::new("Load which save?", saves).prompt() else {
                    continue;
                };
                match save::load_game(&name) {
                    Ok(trainer) => {
                        println!("Welcome back, {}!", trainer.name);
                        GameSession::new(dex.clone(), trainer).run();
                    }
                    Err(error) => println!("Failed to load game: {}", error),
                }
            }
            _ => return,
        }
    }
}

fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    if std::fs::create_dir_all("logs").is_err() {
        return None;
    }
    let appender = tracing_appender::rolling::never("logs", "pokemon-quest.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}
