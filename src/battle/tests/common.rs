use crate::battle::state::{BattleEvent, EventBus, TurnRng};
use crate::dex::Pokedex;
use crate::pokemon::Pokemon;
use crate::trainer::Trainer;
use schema::StatusCondition;

/// A builder for creating test creatures with common defaults.
///
/// ```ignore
/// let pokemon = TestPokemonBuilder::new("Pikachu", 25)
///     .with_moves(vec!["Thunder Shock"])
///     .with_hp(1)
///     .build(&dex);
/// ```
pub struct TestPokemonBuilder {
    species: String,
    level: u8,
    moves: Option<Vec<&'static str>>,
    status: Option<StatusCondition>,
    hp: Option<u16>,
}

impl TestPokemonBuilder {
    pub fn new(species: &str, level: u8) -> Self {
        Self {
            species: species.to_string(),
            level,
            moves: None,
            status: None,
            hp: None,
        }
    }

    pub fn with_moves(mut self, moves: Vec<&'static str>) -> Self {
        self.moves = Some(moves);
        self
    }

    #[allow(dead_code)]
    pub fn with_status(mut self, status: StatusCondition) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets current HP. If not set, HP is at max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.hp = Some(hp);
        self
    }

    pub fn build(self, dex: &Pokedex) -> Pokemon {
        let mut pokemon = match &self.moves {
            Some(moves) => Pokemon::with_moves(dex, &self.species, self.level, moves),
            None => Pokemon::from_species(dex, &self.species, self.level, false),
        };
        pokemon.status = self.status;
        if let Some(hp) = self.hp {
            pokemon.set_hp(hp);
        }
        pokemon
    }
}

pub fn test_dex() -> Pokedex {
    Pokedex::builtin().expect("builtin data tables should parse")
}

/// A trainer holding exactly the given team.
pub fn trainer_with(team: Vec<Pokemon>) -> Trainer {
    let mut trainer = Trainer::new("Test Trainer");
    for pokemon in team {
        trainer.add_pokemon(pokemon, false);
    }
    trainer
}

/// A `TurnRng` with a generous buffer of mid-range values, for tests where
/// the specific outcomes don't matter.
#[allow(dead_code)]
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![50; 100])
}

/// Whether any collected event satisfies the predicate.
pub fn has_event(events: &EventBus, predicate: impl Fn(&BattleEvent) -> bool) -> bool {
    events.events().iter().any(predicate)
}
