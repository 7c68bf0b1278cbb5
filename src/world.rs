use crate::dex::Pokedex;
use crate::pokemon::Pokemon;
use rand::Rng;

/// Chance of finding a wild creature while exploring.
pub const ENCOUNTER_CHANCE: f64 = 0.7;
/// Chance that a wild creature is shiny.
pub const SHINY_CHANCE: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopKind {
    Basic,
    Advanced,
}

impl ShopKind {
    /// Item names stocked by this kind of shop.
    pub fn stock(self) -> &'static [&'static str] {
        match self {
            ShopKind::Basic => &["Pokeball", "Potion", "Antidote", "Paralyze Heal"],
            ShopKind::Advanced => &[
                "Pokeball",
                "Great Ball",
                "Ultra Ball",
                "Potion",
                "Super Potion",
                "Hyper Potion",
                "Antidote",
                "Paralyze Heal",
                "Awakening",
                "Full Heal",
                "Revive",
                "Thunder Stone",
                "Water Stone",
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GymInfo {
    pub leader: &'static str,
    pub gym_type: &'static str,
    pub badge: &'static str,
    pub prize_money: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct Location {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub wild_pokemon: &'static [&'static str],
    pub level_range: (u8, u8),
    pub pokemon_center: bool,
    pub shop: Option<ShopKind>,
    pub gym: Option<GymInfo>,
    pub connections: &'static [&'static str],
}

pub const WORLD_MAP: &[Location] = &[
    Location {
        key: "pallet_town",
        name: "Pallet Town",
        description: "A quiet town with a Pokemon research lab.",
        wild_pokemon: &["Pidgey", "Rattata"],
        level_range: (2, 4),
        pokemon_center: true,
        shop: Some(ShopKind::Basic),
        gym: None,
        connections: &["route_1", "oak_lab"],
    },
    Location {
        key: "oak_lab",
        name: "Professor Oak's Lab",
        description: "A research laboratory filled with Pokemon research equipment.",
        wild_pokemon: &[],
        level_range: (0, 0),
        pokemon_center: false,
        shop: None,
        gym: None,
        connections: &["pallet_town"],
    },
    Location {
        key: "route_1",
        name: "Route 1",
        description: "A peaceful route connecting Pallet Town to Viridian City.",
        wild_pokemon: &["Pidgey", "Rattata", "Caterpie", "Weedle"],
        level_range: (2, 5),
        pokemon_center: false,
        shop: None,
        gym: None,
        connections: &["pallet_town", "viridian_city"],
    },
    Location {
        key: "viridian_city",
        name: "Viridian City",
        description: "A city with a Pokemon Gym and a forest nearby.",
        wild_pokemon: &["Pidgey", "Rattata"],
        level_range: (3, 5),
        pokemon_center: true,
        shop: Some(ShopKind::Basic),
        gym: Some(GymInfo {
            leader: "giovanni",
            gym_type: "Ground",
            badge: "Earth Badge",
            prize_money: 5000,
        }),
        connections: &["route_1", "viridian_forest"],
    },
    Location {
        key: "viridian_forest",
        name: "Viridian Forest",
        description: "A dense forest full of Bug-type Pokemon.",
        wild_pokemon: &["Caterpie", "Weedle", "Pikachu"],
        level_range: (3, 6),
        pokemon_center: false,
        shop: None,
        gym: None,
        connections: &["viridian_city", "pewter_city"],
    },
    Location {
        key: "pewter_city",
        name: "Pewter City",
        description: "A city known for its Rock-type Pokemon Gym.",
        wild_pokemon: &["Spearow", "Sandshrew"],
        level_range: (4, 7),
        pokemon_center: true,
        shop: Some(ShopKind::Basic),
        gym: Some(GymInfo {
            leader: "brock",
            gym_type: "Rock",
            badge: "Boulder Badge",
            prize_money: 1000,
        }),
        connections: &["viridian_forest", "route_3"],
    },
    Location {
        key: "route_3",
        name: "Route 3",
        description: "A route leading to Mt. Moon.",
        wild_pokemon: &["Spearow", "Sandshrew", "Jigglypuff"],
        level_range: (5, 9),
        pokemon_center: false,
        shop: None,
        gym: None,
        connections: &["pewter_city", "mt_moon"],
    },
    Location {
        key: "mt_moon",
        name: "Mt. Moon",
        description: "A mysterious mountain cave.",
        wild_pokemon: &["Zubat", "Geodude", "Clefairy"],
        level_range: (7, 12),
        pokemon_center: false,
        shop: None,
        gym: None,
        connections: &["route_3", "cerulean_city"],
    },
    Location {
        key: "cerulean_city",
        name: "Cerulean City",
        description: "A city with a Water-type Pokemon Gym.",
        wild_pokemon: &["Oddish", "Bellsprout"],
        level_range: (10, 14),
        pokemon_center: true,
        shop: Some(ShopKind::Advanced),
        gym: Some(GymInfo {
            leader: "misty",
            gym_type: "Water",
            badge: "Cascade Badge",
            prize_money: 2000,
        }),
        connections: &["mt_moon", "route_5"],
    },
    Location {
        key: "route_5",
        name: "Route 5",
        description: "A route south of Cerulean City.",
        wild_pokemon: &["Oddish", "Bellsprout", "Meowth"],
        level_range: (10, 16),
        pokemon_center: false,
        shop: None,
        gym: None,
        connections: &["cerulean_city"],
    },
];

pub fn location(key: &str) -> Option<&'static Location> {
    WORLD_MAP.iter().find(|location| location.key == key)
}

#[derive(Debug, Clone, Copy)]
pub struct GymPokemon {
    pub species: &'static str,
    pub level: u8,
    pub moves: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct GymLeader {
    pub key: &'static str,
    pub name: &'static str,
    pub intro: &'static str,
    pub roster: &'static [GymPokemon],
}

pub const GYM_LEADERS: &[GymLeader] = &[
    GymLeader {
        key: "brock",
        name: "Brock",
        intro: "I'm Brock! I'm Pewter's Gym Leader! My rock-hard willpower is evident even in my Pokemon!",
        roster: &[
            GymPokemon { species: "Geodude", level: 12, moves: &["Tackle", "Defense Curl", "Rock Throw"] },
            GymPokemon { species: "Onix", level: 14, moves: &["Tackle", "Screech", "Bind", "Rock Throw"] },
        ],
    },
    GymLeader {
        key: "misty",
        name: "Misty",
        intro: "Hi, I'm Misty! I'm Cerulean's Gym Leader! I'm an expert on Water-type Pokemon!",
        roster: &[
            GymPokemon { species: "Staryu", level: 18, moves: &["Tackle", "Water Gun"] },
            GymPokemon { species: "Starmie", level: 21, moves: &["Tackle", "Water Gun", "Harden"] },
        ],
    },
    GymLeader {
        key: "giovanni",
        name: "Giovanni",
        intro: "I am Giovanni! For your insolence, you will feel a world of pain!",
        roster: &[
            GymPokemon { species: "Rhyhorn", level: 45, moves: &["Tackle", "Horn Attack", "Fury Attack"] },
            GymPokemon { species: "Dugtrio", level: 42, moves: &["Dig", "Slash", "Sand Attack"] },
            GymPokemon { species: "Nidoqueen", level: 44, moves: &["Tackle", "Poison Sting", "Body Slam"] },
            GymPokemon { species: "Nidoking", level: 45, moves: &["Tackle", "Poison Sting", "Thrash"] },
            GymPokemon { species: "Rhydon", level: 50, moves: &["Tackle", "Horn Attack", "Fury Attack", "Take Down"] },
        ],
    },
];

pub fn gym_leader(key: &str) -> Option<&'static GymLeader> {
    GYM_LEADERS.iter().find(|leader| leader.key == key)
}

/// Roll for a wild encounter in a location. `None` means nothing showed up.
pub fn random_encounter(
    dex: &Pokedex,
    location: &Location,
    rng: &mut impl Rng,
) -> Option<Pokemon> {
    if location.wild_pokemon.is_empty() {
        return None;
    }
    if rng.random::<f64>() >= ENCOUNTER_CHANCE {
        return None;
    }

    let species = location.wild_pokemon[rng.random_range(0..location.wild_pokemon.len())];
    let (low, high) = location.level_range;
    let level = rng.random_range(low..=high.max(low));
    let is_shiny = rng.random::<f64>() < SHINY_CHANCE;

    Some(Pokemon::from_species(dex, species, level, is_shiny))
}

/// Build a gym leader's creature with its scripted move list.
pub fn gym_pokemon(dex: &Pokedex, entry: &GymPokemon) -> Pokemon {
    Pokemon::with_moves(dex, entry.species, entry.level, entry.moves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn every_connection_points_at_a_real_location() {
        for loc in WORLD_MAP {
            for connection in loc.connections {
                assert!(
                    location(connection).is_some(),
                    "{} connects to unknown location {}",
                    loc.key,
                    connection
                );
            }
        }
    }

    #[test]
    fn gym_locations_reference_known_leaders() {
        for loc in WORLD_MAP {
            if let Some(gym) = &loc.gym {
                assert!(
                    gym_leader(gym.leader).is_some(),
                    "{} references unknown gym leader {}",
                    loc.key,
                    gym.leader
                );
            }
        }
    }

    #[test]
    fn encounters_respect_the_location_tables() {
        let dex = Pokedex::builtin().unwrap();
        let route_1 = location("route_1").unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let mut found = 0;
        for _ in 0..200 {
            if let Some(wild) = random_encounter(&dex, route_1, &mut rng) {
                found += 1;
                assert!(route_1.wild_pokemon.contains(&wild.species.as_str()));
                assert!(wild.level >= route_1.level_range.0);
                assert!(wild.level <= route_1.level_range.1);
                assert_eq!(wild.current_hp(), wild.max_hp());
            }
        }
        // ~70% of 200 attempts; an empty or full tally would mean the
        // encounter roll is broken.
        assert!(found > 100 && found < 200);
    }

    #[test]
    fn no_encounters_where_no_wild_pokemon_live() {
        let dex = Pokedex::builtin().unwrap();
        let lab = location("oak_lab").unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert!(random_encounter(&dex, lab, &mut rng).is_none());
        }
    }

    #[test]
    fn gym_rosters_build_with_scripted_moves() {
        let dex = Pokedex::builtin().unwrap();
        let brock = gym_leader("brock").unwrap();
        let onix = gym_pokemon(&dex, &brock.roster[1]);
        assert_eq!(onix.species, "Onix");
        assert_eq!(onix.level, 14);
        assert_eq!(onix.moves.len(), 4);
        assert_eq!(onix.moves[1].template.name, "Screech");
    }
}
