use crate::errors::{DataError, DataResult};
use schema::{BaseStats, MoveTemplate, PokemonType, SpeciesTemplate};
use std::collections::HashMap;

/// Read-only lookup tables for species and move templates.
///
/// The engine depends only on this interface, never on where the data came
/// from. Lookups for unknown keys substitute a generic template instead of
/// failing, so a corrupted roster entry or an unknown trainer move can
/// never abort a battle.
#[derive(Debug, Clone)]
pub struct Pokedex {
    species: HashMap<String, SpeciesTemplate>,
    moves: HashMap<String, MoveTemplate>,
}

impl Pokedex {
    /// Parse a pokedex from RON tables.
    pub fn from_ron(species_ron: &str, moves_ron: &str) -> DataResult<Self> {
        let species: HashMap<String, SpeciesTemplate> = ron::from_str(species_ron)
            .map_err(|e| DataError::MalformedSpeciesTable(e.to_string()))?;
        let moves: HashMap<String, MoveTemplate> =
            ron::from_str(moves_ron).map_err(|e| DataError::MalformedMoveTable(e.to_string()))?;
        Ok(Self { species, moves })
    }

    /// The tables shipped with the game, embedded at compile time.
    pub fn builtin() -> DataResult<Self> {
        Self::from_ron(
            include_str!("../data/species.ron"),
            include_str!("../data/moves.ron"),
        )
    }

    /// Look up a species template, substituting the generic fallback for
    /// unknown keys.
    pub fn species(&self, key: &str) -> SpeciesTemplate {
        match self.species.get(key) {
            Some(template) => template.clone(),
            None => {
                tracing::warn!(species = key, "unknown species key, using fallback template");
                fallback_species(key)
            }
        }
    }

    pub fn find_species(&self, key: &str) -> Option<&SpeciesTemplate> {
        self.species.get(key)
    }

    /// Look up a move template, substituting the generic fallback for
    /// unknown names.
    pub fn move_template(&self, name: &str) -> MoveTemplate {
        match self.moves.get(name) {
            Some(template) => template.clone(),
            None => {
                tracing::warn!(move_name = name, "unknown move name, using fallback template");
                fallback_move(name)
            }
        }
    }

    pub fn find_move(&self, name: &str) -> Option<&MoveTemplate> {
        self.moves.get(name)
    }

    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }
}

fn fallback_species(key: &str) -> SpeciesTemplate {
    SpeciesTemplate {
        name: key.to_string(),
        types: vec![PokemonType::Normal],
        base_stats: BaseStats {
            hp: 50,
            attack: 50,
            defense: 50,
            sp_attack: 50,
            sp_defense: 50,
            speed: 50,
        },
        abilities: vec!["Unknown".to_string()],
        catch_rate: 100,
        moves: vec!["Tackle".to_string()],
        evolution: None,
    }
}

fn fallback_move(name: &str) -> MoveTemplate {
    MoveTemplate {
        name: name.to_string(),
        move_type: PokemonType::Normal,
        power: 40,
        accuracy: 100,
        max_pp: 25,
        description: "A basic move.".to_string(),
    }
}
