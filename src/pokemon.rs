use crate::battle::state::TurnRng;
use crate::dex::Pokedex;
use schema::{
    BaseStats, EvolutionData, EvolutionMethod, MoveTemplate, PokemonType, SpeciesTemplate,
    StatusCondition,
};
use serde::{Deserialize, Serialize};

pub const MAX_LEVEL: u8 = 100;
pub const MAX_MOVES: usize = 4;

/// Fixed individual value applied to every derived stat.
const FIXED_IV: u32 = 15;

/// A move known by a creature: the immutable template plus its PP counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveInstance {
    pub template: MoveTemplate,
    pub pp: u8,
}

impl MoveInstance {
    pub fn new(template: MoveTemplate) -> Self {
        let pp = template.max_pp;
        MoveInstance { template, pp }
    }

    /// Use the move (decrease PP). Fails without effect at 0 PP.
    pub fn use_move(&mut self) -> bool {
        if self.pp > 0 {
            self.pp -= 1;
            true
        } else {
            false
        }
    }

    /// Restore PP, up to the template maximum. `None` restores fully.
    pub fn restore_pp(&mut self, amount: Option<u8>) {
        match amount {
            None => self.pp = self.template.max_pp,
            Some(n) => self.pp = self.pp.saturating_add(n).min(self.template.max_pp),
        }
    }
}

/// Derived stats at the current level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub max_hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub sp_attack: u16,
    pub sp_defense: u16,
    pub speed: u16,
}

impl Stats {
    pub fn from_base(base: &BaseStats, level: u8) -> Self {
        Stats {
            max_hp: computed_stat(base.hp, level),
            attack: computed_stat(base.attack, level),
            defense: computed_stat(base.defense, level),
            sp_attack: computed_stat(base.sp_attack, level),
            sp_defense: computed_stat(base.sp_defense, level),
            speed: computed_stat(base.speed, level),
        }
    }
}

/// floor(((2*base + IV) * level) / 100) + 5
fn computed_stat(base: u8, level: u8) -> u16 {
    ((2 * base as u32 + FIXED_IV) * level as u32 / 100) as u16 + 5
}

/// floor(1.2 * level^2)
pub fn exp_to_next_level(level: u8) -> u32 {
    (1.2 * (level as u32 * level as u32) as f64) as u32
}

/// Transient in-battle stage modifiers, reset at the start of every battle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatStages {
    pub attack: i8,
    pub defense: i8,
    pub speed: i8,
}

impl StatStages {
    pub fn reset(&mut self) {
        *self = StatStages::default();
    }
}

/// Result of one damage computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRoll {
    pub amount: u16,
    pub effectiveness: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub species: String,
    pub nickname: String,
    is_shiny: bool,
    pub ability: String,
    pub types: Vec<PokemonType>,
    base_stats: BaseStats,
    pub level: u8,
    pub experience: u32,
    pub exp_to_next: u32,
    pub stats: Stats,
    current_hp: u16,
    pub status: Option<StatusCondition>,
    pub status_turns: u8,
    pub moves: Vec<MoveInstance>,
    pub stages: StatStages,
    pub catch_rate: u8,
    evolution: Option<EvolutionData>,
}

impl Pokemon {
    /// Create a creature of the given species at full health, knowing the
    /// species' default moves.
    pub fn from_species(dex: &Pokedex, species_key: &str, level: u8, is_shiny: bool) -> Self {
        let template = dex.species(species_key);
        let move_names: Vec<String> = template.moves.clone();
        Self::build(dex, species_key, template, level, is_shiny, &move_names)
    }

    /// Create a creature with an explicit move list (trainer rosters).
    pub fn with_moves(dex: &Pokedex, species_key: &str, level: u8, moves: &[&str]) -> Self {
        let template = dex.species(species_key);
        let move_names: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
        Self::build(dex, species_key, template, level, false, &move_names)
    }

    fn build(
        dex: &Pokedex,
        species_key: &str,
        template: SpeciesTemplate,
        level: u8,
        is_shiny: bool,
        move_names: &[String],
    ) -> Self {
        let level = level.clamp(1, MAX_LEVEL);
        let stats = Stats::from_base(&template.base_stats, level);
        let moves = move_names
            .iter()
            .take(MAX_MOVES)
            .map(|name| MoveInstance::new(dex.move_template(name)))
            .collect();

        Pokemon {
            species: species_key.to_string(),
            nickname: template.name.clone(),
            is_shiny,
            ability: template.abilities.first().cloned().unwrap_or_default(),
            types: template.types,
            base_stats: template.base_stats,
            level,
            experience: 0,
            exp_to_next: exp_to_next_level(level),
            current_hp: stats.max_hp,
            stats,
            status: None,
            status_turns: 0,
            moves,
            stages: StatStages::default(),
            catch_rate: template.catch_rate,
            evolution: template.evolution,
        }
    }

    pub fn is_shiny(&self) -> bool {
        self.is_shiny
    }

    pub fn current_hp(&self) -> u16 {
        self.current_hp
    }

    pub fn max_hp(&self) -> u16 {
        self.stats.max_hp
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    /// Clamp HP into `0..=max_hp` directly (used by Revive and tests).
    pub fn set_hp(&mut self, hp: u16) {
        self.current_hp = hp.min(self.stats.max_hp);
    }

    /// Take damage and report whether the creature is now fainted.
    pub fn take_damage(&mut self, amount: u16) -> bool {
        self.current_hp = self.current_hp.saturating_sub(amount);
        self.current_hp == 0
    }

    /// Heal the creature. With `None` the creature is fully restored;
    /// with an amount, HP is added up to the cap. The status condition
    /// clears only when the creature ends up at full health.
    pub fn heal(&mut self, amount: Option<u16>) {
        match amount {
            None => self.current_hp = self.stats.max_hp,
            Some(n) => {
                self.current_hp = self.current_hp.saturating_add(n).min(self.stats.max_hp)
            }
        }
        if self.current_hp == self.stats.max_hp {
            self.clear_status();
        }
    }

    pub fn clear_status(&mut self) {
        self.status = None;
        self.status_turns = 0;
    }

    /// Use the move in the given slot, spending one PP. Returns false with
    /// no effect when the slot is empty or out of PP.
    pub fn use_move(&mut self, index: usize) -> bool {
        match self.moves.get_mut(index) {
            Some(instance) => instance.use_move(),
            None => false,
        }
    }

    /// Gain experience and report whether at least one level was gained.
    ///
    /// Level-ups carry the overflow: a large award can cascade through
    /// several levels, recomputing the threshold and stats each time. At
    /// level 100 experience gain has no effect at all.
    pub fn gain_experience(&mut self, amount: u32) -> bool {
        if self.level >= MAX_LEVEL {
            return false;
        }

        self.experience += amount;
        let mut leveled_up = false;
        while self.level < MAX_LEVEL && self.experience >= self.exp_to_next {
            self.experience -= self.exp_to_next;
            self.level += 1;
            self.exp_to_next = exp_to_next_level(self.level);
            self.recalculate_stats();
            leveled_up = true;
        }
        leveled_up
    }

    /// Recompute derived stats, preserving the HP deficit.
    fn recalculate_stats(&mut self) {
        let old_max = self.stats.max_hp;
        self.stats = Stats::from_base(&self.base_stats, self.level);
        let delta = self.stats.max_hp as i32 - old_max as i32;
        self.current_hp =
            (self.current_hp as i32 + delta).clamp(0, self.stats.max_hp as i32) as u16;
    }

    pub fn evolution(&self) -> Option<&EvolutionData> {
        self.evolution.as_ref()
    }

    /// Whether the creature's level meets its level-based evolution trigger.
    pub fn can_evolve(&self) -> bool {
        matches!(
            &self.evolution,
            Some(EvolutionData { method: EvolutionMethod::Level(required), .. })
                if self.level >= *required
        )
    }

    /// Whether using the named item triggers this creature's evolution.
    pub fn can_evolve_with(&self, item: &str) -> bool {
        matches!(
            &self.evolution,
            Some(EvolutionData { method: EvolutionMethod::Item(required), .. })
                if required == item
        )
    }

    /// Evolve in place: species, types, ability, base stats and catch rate
    /// are replaced and the derived stats recomputed with the HP deficit
    /// preserved. Returns the previous species key.
    pub fn evolve(&mut self, dex: &Pokedex) -> Option<String> {
        let target = self.evolution.as_ref()?.evolves_into.clone();
        let template = dex.species(&target);

        let old_species = std::mem::replace(&mut self.species, target);
        // A creature still carrying its species name as a nickname follows
        // the evolution; a custom nickname stays.
        if self.nickname == old_species {
            self.nickname = template.name.clone();
        }
        self.types = template.types;
        self.ability = template.abilities.first().cloned().unwrap_or_default();
        self.base_stats = template.base_stats;
        self.catch_rate = template.catch_rate;
        self.evolution = template.evolution;
        self.recalculate_stats();

        Some(old_species)
    }

    /// Damage dealt by one of this creature's moves against a defender.
    ///
    /// Status moves (power 0) deal no damage and consume no randomness;
    /// otherwise the single random draw is the 0.85..=1.00 variance factor.
    pub fn damage_against(
        &self,
        mv: &MoveTemplate,
        defender: &Pokemon,
        rng: &mut TurnRng,
    ) -> DamageRoll {
        if mv.power == 0 {
            return DamageRoll { amount: 0, effectiveness: 1.0 };
        }

        let physical = matches!(mv.move_type, PokemonType::Normal | PokemonType::Fighting);
        let (attack_stat, defense_stat) = if physical {
            (self.stats.attack, defender.stats.defense)
        } else {
            (self.stats.sp_attack, defender.stats.sp_defense)
        };

        let level_factor = (2.0 * self.level as f64 / 5.0) + 2.0;
        let mut raw = (level_factor * mv.power as f64 * attack_stat as f64
            / defense_stat as f64)
            / 50.0
            + 2.0;

        let effectiveness = PokemonType::effectiveness_against(mv.move_type, &defender.types);
        raw *= effectiveness as f64;

        if self.types.contains(&mv.move_type) {
            raw *= 1.5;
        }

        raw *= rng.damage_variance();

        DamageRoll {
            amount: raw.max(0.0) as u16,
            effectiveness,
        }
    }
}

impl std::fmt::Display for Pokemon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (Lv.{}) - {}/{} HP",
            self.nickname, self.level, self.current_hp, self.stats.max_hp
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dex() -> Pokedex {
        Pokedex::builtin().unwrap()
    }

    #[test]
    fn derived_stats_follow_the_formula() {
        let bulbasaur = Pokemon::from_species(&dex(), "Bulbasaur", 5, false);
        // floor(((2*45 + 15) * 5) / 100) + 5 = 10
        assert_eq!(bulbasaur.max_hp(), 10);
        // floor(((2*49 + 15) * 5) / 100) + 5 = 10
        assert_eq!(bulbasaur.stats.attack, 10);
        assert_eq!(bulbasaur.current_hp(), bulbasaur.max_hp());
        assert_eq!(bulbasaur.exp_to_next, 30); // floor(1.2 * 25)
    }

    #[test]
    fn take_damage_clamps_at_zero_and_is_idempotent_at_the_floor() {
        let mut pokemon = Pokemon::from_species(&dex(), "Rattata", 5, false);
        let max = pokemon.max_hp();

        assert!(!pokemon.take_damage(max - 1));
        assert_eq!(pokemon.current_hp(), 1);
        assert!(pokemon.take_damage(500));
        assert_eq!(pokemon.current_hp(), 0);
        assert!(pokemon.is_fainted());

        // Repeated hits at the floor stay at exactly zero.
        assert!(pokemon.take_damage(100));
        assert_eq!(pokemon.current_hp(), 0);
    }

    #[test]
    fn partial_heal_clears_status_only_at_full_health() {
        let mut pokemon = Pokemon::from_species(&dex(), "Pidgey", 10, false);
        pokemon.take_damage(10);
        pokemon.status = Some(StatusCondition::Poison);
        pokemon.status_turns = 3;

        pokemon.heal(Some(4));
        assert_eq!(pokemon.status, Some(StatusCondition::Poison));

        pokemon.heal(Some(100));
        assert_eq!(pokemon.current_hp(), pokemon.max_hp());
        assert_eq!(pokemon.status, None);
        assert_eq!(pokemon.status_turns, 0);
    }

    #[test]
    fn full_heal_restores_and_clears_status() {
        let mut pokemon = Pokemon::from_species(&dex(), "Pidgey", 10, false);
        pokemon.take_damage(pokemon.max_hp());
        pokemon.status = Some(StatusCondition::Burn);

        pokemon.heal(None);
        assert_eq!(pokemon.current_hp(), pokemon.max_hp());
        assert_eq!(pokemon.status, None);
    }

    #[test]
    fn experience_overflow_cascades_levels_and_preserves_hp_deficit() {
        let mut pokemon = Pokemon::from_species(&dex(), "Charmander", 5, false);
        pokemon.take_damage(3);
        let deficit = pokemon.max_hp() - pokemon.current_hp();

        // Enough for several level-ups in one award.
        assert!(pokemon.gain_experience(200));
        assert!(pokemon.level > 6);
        assert_eq!(pokemon.exp_to_next, exp_to_next_level(pokemon.level));
        assert!(pokemon.experience < pokemon.exp_to_next);
        assert_eq!(pokemon.max_hp() - pokemon.current_hp(), deficit);
        assert!(pokemon.current_hp() <= pokemon.max_hp());
    }

    #[test]
    fn level_100_is_a_fixed_point() {
        let mut pokemon = Pokemon::from_species(&dex(), "Pikachu", 100, false);
        let before_exp = pokemon.experience;
        let before_threshold = pokemon.exp_to_next;

        assert!(!pokemon.gain_experience(1_000_000));
        assert_eq!(pokemon.level, 100);
        assert_eq!(pokemon.experience, before_exp);
        assert_eq!(pokemon.exp_to_next, before_threshold);
    }

    #[test]
    fn level_cap_stops_a_cascade() {
        let mut pokemon = Pokemon::from_species(&dex(), "Pikachu", 99, false);
        assert!(pokemon.gain_experience(1_000_000));
        assert_eq!(pokemon.level, 100);
        // Further gains are no-ops.
        let leftover = pokemon.experience;
        assert!(!pokemon.gain_experience(500));
        assert_eq!(pokemon.experience, leftover);
    }

    #[test]
    fn use_move_spends_pp_and_fails_empty() {
        let mut pokemon = Pokemon::from_species(&dex(), "Caterpie", 5, false);
        let max_pp = pokemon.moves[0].template.max_pp;

        assert!(pokemon.use_move(0));
        assert_eq!(pokemon.moves[0].pp, max_pp - 1);

        pokemon.moves[0].pp = 0;
        assert!(!pokemon.use_move(0));
        assert_eq!(pokemon.moves[0].pp, 0);

        assert!(!pokemon.use_move(9));
    }

    #[test]
    fn status_move_deals_no_damage_and_draws_no_randomness() {
        let d = dex();
        let bulbasaur = Pokemon::from_species(&d, "Bulbasaur", 5, false);
        let target = Pokemon::from_species(&d, "Rattata", 5, false);
        let growl = d.move_template("Growl");

        // An empty RNG queue panics on any draw, so this doubles as proof
        // that the zero-power path is deterministic.
        let mut rng = TurnRng::new_for_test(vec![]);
        let roll = bulbasaur.damage_against(&growl, &target, &mut rng);
        assert_eq!(roll.amount, 0);
        assert_eq!(roll.effectiveness, 1.0);
    }

    #[test]
    fn stab_applies_when_move_type_matches_attacker() {
        let d = dex();
        let charmander = Pokemon::from_species(&d, "Charmander", 10, false);
        let target = Pokemon::from_species(&d, "Rattata", 10, false);
        let ember = d.move_template("Ember");

        // Variance fixed at 1.0 (roll of 100).
        let mut rng = TurnRng::new_for_test(vec![100]);
        let roll = charmander.damage_against(&ember, &target, &mut rng);

        let level_factor = (2.0 * 10.0 / 5.0) + 2.0;
        let raw = (level_factor * 40.0 * charmander.stats.sp_attack as f64
            / target.stats.sp_defense as f64)
            / 50.0
            + 2.0;
        let expected = (raw * 1.5) as u16;
        assert_eq!(roll.amount, expected);
        assert_eq!(roll.effectiveness, 1.0);
    }

    #[test]
    fn variance_floor_reduces_damage() {
        let d = dex();
        let attacker = Pokemon::from_species(&d, "Pikachu", 30, false);
        let target = Pokemon::from_species(&d, "Pidgey", 30, false);
        let shock = d.move_template("Thunder Shock");

        let mut max_rng = TurnRng::new_for_test(vec![100]);
        let mut min_rng = TurnRng::new_for_test(vec![1]);
        let max_roll = attacker.damage_against(&shock, &target, &mut max_rng);
        let min_roll = attacker.damage_against(&shock, &target, &mut min_rng);

        assert!(min_roll.amount < max_roll.amount);
        assert_eq!(max_roll.effectiveness, 2.0); // Electric vs Normal/Flying
    }

    #[test]
    fn level_evolution_recomputes_stats_in_place() {
        let d = dex();
        let mut caterpie = Pokemon::from_species(&d, "Caterpie", 6, false);
        assert!(!caterpie.can_evolve());
        caterpie.take_damage(2);
        let deficit = caterpie.max_hp() - caterpie.current_hp();

        caterpie.gain_experience(200);
        assert!(caterpie.level >= 7);
        assert!(caterpie.can_evolve());

        let old = caterpie.evolve(&d).expect("evolution should trigger");
        assert_eq!(old, "Caterpie");
        assert_eq!(caterpie.species, "Metapod");
        assert_eq!(caterpie.nickname, "Metapod");
        assert_eq!(caterpie.max_hp() - caterpie.current_hp(), deficit);
        assert!(caterpie.current_hp() <= caterpie.max_hp());
    }

    #[test]
    fn item_evolution_requires_the_named_stone() {
        let d = dex();
        let pikachu = Pokemon::from_species(&d, "Pikachu", 20, false);
        assert!(!pikachu.can_evolve());
        assert!(pikachu.can_evolve_with("Thunder Stone"));
        assert!(!pikachu.can_evolve_with("Water Stone"));
    }

    #[test]
    fn custom_nickname_survives_evolution() {
        let d = dex();
        let mut pikachu = Pokemon::from_species(&d, "Pikachu", 20, false);
        pikachu.nickname = "Sparky".to_string();
        pikachu.evolve(&d);
        assert_eq!(pikachu.species, "Raichu");
        assert_eq!(pikachu.nickname, "Sparky");
    }
}
