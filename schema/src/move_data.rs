use crate::pokemon_types::PokemonType;
use serde::{Deserialize, Serialize};

/// Immutable move template. The per-creature PP counter lives with the
/// creature that knows the move, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveTemplate {
    pub name: String,
    pub move_type: PokemonType,
    /// Base power; 0 marks a status move that deals no damage.
    pub power: u16,
    /// Hit chance out of 100.
    pub accuracy: u8,
    pub max_pp: u8,
    pub description: String,
}

impl MoveTemplate {
    pub fn is_status_move(&self) -> bool {
        self.power == 0
    }
}
