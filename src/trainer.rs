use crate::inventory::{apply_battle_item, find_item, Inventory, ItemError};
use crate::pokemon::Pokemon;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const MAX_PARTY_SIZE: usize = 6;
pub const STARTING_MONEY: u32 = 3000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub name: String,
    pub gym_leader: String,
    pub location: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerStats {
    pub battles_won: u32,
    pub battles_lost: u32,
    pub pokemon_caught: u32,
    pub gyms_defeated: u32,
    pub items_used: u32,
}

/// The player: party, boxed reserves, bag, money and progress flags.
/// The battle engine borrows this exclusively for the length of a battle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trainer {
    pub name: String,
    party: Vec<Pokemon>,
    storage: Vec<Pokemon>,
    pub inventory: Inventory,
    pub money: u32,
    pub badges: Vec<Badge>,
    pub current_location: String,
    pub visited: BTreeSet<String>,
    pub pokedex_seen: BTreeSet<String>,
    pub pokedex_caught: BTreeSet<String>,
    pub stats: TrainerStats,
}

impl Trainer {
    pub fn new(name: &str) -> Self {
        let mut inventory = Inventory::new();
        inventory.add_item("Pokeball", 10);
        inventory.add_item("Potion", 5);

        let current_location = "pallet_town".to_string();
        let mut visited = BTreeSet::new();
        visited.insert(current_location.clone());

        Trainer {
            name: name.to_string(),
            party: Vec::new(),
            storage: Vec::new(),
            inventory,
            money: STARTING_MONEY,
            badges: Vec::new(),
            current_location,
            visited,
            pokedex_seen: BTreeSet::new(),
            pokedex_caught: BTreeSet::new(),
            stats: TrainerStats::default(),
        }
    }

    pub fn party(&self) -> &[Pokemon] {
        &self.party
    }

    pub fn party_mut(&mut self) -> &mut [Pokemon] {
        &mut self.party
    }

    pub fn storage(&self) -> &[Pokemon] {
        &self.storage
    }

    /// Add a creature to the party, or to storage when the party is full.
    /// Returns true when it joined the party.
    pub fn add_pokemon(&mut self, pokemon: Pokemon, caught: bool) -> bool {
        self.pokedex_seen.insert(pokemon.species.clone());
        if caught {
            self.pokedex_caught.insert(pokemon.species.clone());
            self.stats.pokemon_caught += 1;
        }

        if self.party.len() < MAX_PARTY_SIZE {
            self.party.push(pokemon);
            true
        } else {
            self.storage.push(pokemon);
            false
        }
    }

    pub fn release_pokemon(&mut self, index: usize) -> Option<Pokemon> {
        if index < self.party.len() {
            Some(self.party.remove(index))
        } else {
            None
        }
    }

    /// Index of the first conscious party member.
    pub fn first_usable(&self) -> Option<usize> {
        self.party.iter().position(|p| !p.is_fainted())
    }

    pub fn has_usable_pokemon(&self) -> bool {
        self.first_usable().is_some()
    }

    /// Whether a conscious member other than `except` exists.
    pub fn has_other_usable(&self, except: usize) -> bool {
        self.party
            .iter()
            .enumerate()
            .any(|(i, p)| i != except && !p.is_fainted())
    }

    pub fn heal_all(&mut self) {
        for pokemon in &mut self.party {
            pokemon.heal(None);
            for mv in &mut pokemon.moves {
                mv.restore_pp(None);
            }
        }
    }

    pub fn add_money(&mut self, amount: u32) {
        self.money += amount;
    }

    pub fn spend_money(&mut self, amount: u32) -> bool {
        if self.money >= amount {
            self.money -= amount;
            true
        } else {
            false
        }
    }

    pub fn mark_seen(&mut self, species: &str) {
        self.pokedex_seen.insert(species.to_string());
    }

    pub fn earn_badge(&mut self, name: &str, gym_leader: &str, location: &str) {
        self.badges.push(Badge {
            name: name.to_string(),
            gym_leader: gym_leader.to_string(),
            location: location.to_string(),
        });
        self.stats.gyms_defeated += 1;
    }

    pub fn has_badge(&self, name: &str) -> bool {
        self.badges.iter().any(|badge| badge.name == name)
    }

    pub fn move_to_location(&mut self, location: &str) {
        self.current_location = location.to_string();
        self.visited.insert(location.to_string());
    }

    /// Consume one unit of a battle item and apply it to the party member
    /// at `target_index`. The item is only consumed when it had an effect.
    pub fn use_battle_item(
        &mut self,
        item_name: &str,
        target_index: usize,
    ) -> Result<String, ItemError> {
        if !self.inventory.has_item(item_name) {
            return Err(ItemError::NotInBag(item_name.to_string()));
        }
        let data = find_item(item_name).ok_or_else(|| ItemError::Unknown(item_name.to_string()))?;
        let target = self
            .party
            .get_mut(target_index)
            .ok_or_else(|| ItemError::NoEffect("there is no Pokemon there".to_string()))?;

        let effect = apply_battle_item(data, target)?;
        self.inventory.remove_item(item_name, 1);
        self.stats.items_used += 1;
        Ok(effect)
    }
}
