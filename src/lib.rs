//! Pokemon Quest Battle Engine
//!
//! A single-player, text-driven creature-collection adventure. The heart
//! of the crate is the turn-based battle resolution engine; the world,
//! shops, bag and save files are thin layers around it.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod dex;
pub mod errors;
pub mod game;
pub mod inventory;
pub mod pokemon;
pub mod save;
pub mod trainer;
pub mod world;

// --- PUBLIC API RE-EXPORTS ---
// The most important types, importable directly from the crate root.

// --- From the `schema` crate ---
pub use schema::{
    BaseStats, EvolutionData, EvolutionMethod, MoveTemplate, PokemonType, SpeciesTemplate,
    StatusCondition,
};

// --- From this crate's modules (`src/`) ---

// Core battle engine types.
pub use battle::catch::{attempt_catch, catch_probability};
pub use battle::engine::{experience_reward, Battle, MAX_TURNS, RUN_CHANCE};
pub use battle::state::{
    BattleAction, BattleEvent, BattleKind, BattleOutcome, BattlePhase, EventBus, TurnOutcome,
    TurnRng,
};

// Core runtime types.
pub use dex::Pokedex;
pub use pokemon::{MoveInstance, Pokemon, StatStages, Stats};
pub use trainer::Trainer;

// Crate-specific error and result types.
pub use errors::{
    BattleError, BattleResult, DataError, DataResult, GameError, GameResult, SaveError, SaveResult,
};
