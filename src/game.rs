use crate::battle::catch::attempt_catch;
use crate::battle::engine::Battle;
use crate::battle::state::{
    BattleAction, BattleEvent, BattleKind, BattleOutcome, BattlePhase, EventBus, TurnRng,
};
use crate::dex::Pokedex;
use crate::errors::BattleError;
use crate::inventory::{find_item, ItemKind};
use crate::pokemon::Pokemon;
use crate::save;
use crate::trainer::Trainer;
use crate::world::{self, Location, ShopKind};
use inquire::{Confirm, CustomType, Select, Text};

/// One interactive play session: the data tables, the trainer, and the
/// menu loop around them.
pub struct GameSession {
    dex: Pokedex,
    trainer: Trainer,
    running: bool,
}

impl GameSession {
    pub fn new(dex: Pokedex, trainer: Trainer) -> Self {
        Self {
            dex,
            trainer,
            running: false,
        }
    }

    /// Interactive new-game setup: trainer name, starter, nickname.
    pub fn new_game(dex: Pokedex) -> Option<Self> {
        println!("Welcome to the world of Pokemon!");
        let name = Text::new("What's your name, trainer?")
            .with_default("Red")
            .prompt()
            .ok()?;
        let mut trainer = Trainer::new(&name);

        let starters = ["Bulbasaur", "Charmander", "Squirtle"];
        let choice = Select::new("Choose your starter Pokemon:", starters.to_vec())
            .prompt()
            .ok()?;
        let mut starter = Pokemon::from_species(&dex, choice, 5, false);
        if let Some(nickname) = prompt_nickname(&starter.species) {
            starter.nickname = nickname;
        }
        println!("Congratulations! You received {}!", starter.nickname);
        trainer.add_pokemon(starter, true);

        Some(Self::new(dex, trainer))
    }

    pub fn trainer(&self) -> &Trainer {
        &self.trainer
    }

    /// Main menu loop. Returns when the player quits.
    pub fn run(&mut self) {
        self.running = true;
        while self.running {
            let Some(location) = world::location(&self.trainer.current_location) else {
                // A stale save can point at a location that no longer
                // exists; fall back to the starting town.
                tracing::warn!(
                    location = %self.trainer.current_location,
                    "unknown current location, resetting to pallet_town"
                );
                self.trainer.move_to_location("pallet_town");
                continue;
            };

            println!();
            println!("=== {} ===", location.name);
            println!("{}", location.description);

            let options = location_menu(location);
            let Ok(choice) = Select::new("What would you like to do?", options).prompt() else {
                continue;
            };

            match choice {
                "Explore" => self.explore(location),
                "Challenge Gym" => self.challenge_gym(location),
                "Visit Shop" => self.visit_shop(location),
                "Visit Pokemon Center" => self.pokemon_center(),
                "View Team" => self.view_team(),
                "View Bag" => self.view_bag(),
                "View Pokedex" => self.view_pokedex(),
                "Trainer Info" => self.trainer_info(),
                "Travel" => self.travel(location),
                "Save Game" => self.save_game(),
                "Quit" => self.quit(),
                _ => {}
            }
        }
    }

    fn explore(&mut self, location: &Location) {
        if location.wild_pokemon.is_empty() {
            println!("There are no wild Pokemon in this area.");
            return;
        }
        println!("You start exploring the area...");

        let mut rng = rand::rng();
        match world::random_encounter(&self.dex, location, &mut rng) {
            Some(wild) => {
                if wild.is_shiny() {
                    println!("It's sparkling... a shiny one!");
                }
                self.run_battle(wild, BattleKind::Wild);
            }
            None => println!("No Pokemon found this time."),
        }
    }

    /// Drive one battle from start to its terminal outcome.
    fn run_battle(&mut self, opponent: Pokemon, kind: BattleKind) -> Option<BattleOutcome> {
        self.trainer.mark_seen(&opponent.species);
        let mut events = EventBus::new();

        let mut battle = match Battle::new(&mut self.trainer, opponent, kind, &mut events) {
            Ok(battle) => battle,
            Err(BattleError::NoUsablePokemon) => {
                println!("You have no Pokemon that can battle!");
                return None;
            }
            Err(error) => {
                println!("The battle could not start: {}", error);
                return None;
            }
        };
        print_events(&mut events);

        let outcome = loop {
            match battle.phase() {
                BattlePhase::Ended(outcome) => break outcome,
                BattlePhase::AwaitingReplacement => {
                    let choice = prompt_replacement(&battle);
                    battle.resolve_replacement(choice, &mut events);
                    print_events(&mut events);
                }
                BattlePhase::AwaitingAction => {
                    print_battle_header(&battle);
                    let action = prompt_action(&battle);
                    let mut rng = TurnRng::new_random();
                    battle.resolve_action(action, &mut rng, &mut events);
                    print_events(&mut events);
                }
            }
        };

        let wild = battle.into_opponent();
        match outcome {
            BattleOutcome::Victory => {
                self.trainer.stats.battles_won += 1;
                if kind == BattleKind::Wild {
                    self.offer_catch(wild);
                }
                self.offer_evolutions();
            }
            BattleOutcome::Defeat => {
                self.trainer.stats.battles_lost += 1;
            }
            BattleOutcome::Draw | BattleOutcome::Fled => {}
        }
        Some(outcome)
    }

    /// Post-victory capture offer for wild encounters. The ball is spent
    /// whether or not the creature is caught.
    fn offer_catch(&mut self, mut wild: Pokemon) {
        let wants_to = Confirm::new("Would you like to try to catch this Pokemon?")
            .with_default(true)
            .prompt()
            .unwrap_or(false);
        if !wants_to {
            println!("The wild {} wandered off.", wild.nickname);
            return;
        }

        let balls = self.trainer.inventory.pokeballs();
        if balls.is_empty() {
            println!("You don't have any Pokeballs!");
            return;
        }
        let labels: Vec<String> = balls
            .iter()
            .map(|(data, count)| format!("{} x{}", data.name, count))
            .collect();
        let Ok(selection) = Select::new("Which ball?", labels).raw_prompt() else {
            return;
        };
        let (ball, _) = balls[selection.index];
        let modifier = match ball.kind {
            ItemKind::Pokeball { modifier } => modifier,
            _ => return,
        };

        // The ball is gone whether or not the creature stays in it.
        self.trainer.inventory.remove_item(ball.name, 1);

        let mut events = EventBus::new();
        events.push(BattleEvent::CatchAttempted {
            species: wild.nickname.clone(),
            ball: ball.name.to_string(),
        });

        let mut rng = TurnRng::new_random();
        let caught = attempt_catch(&wild, modifier, &mut rng);
        if caught {
            events.push(BattleEvent::CatchSucceeded { species: wild.nickname.clone() });
        } else {
            events.push(BattleEvent::CatchFailed { species: wild.nickname.clone() });
        }
        print_events(&mut events);

        if caught {
            wild.heal(None);
            if let Some(nickname) = prompt_nickname(&wild.species) {
                wild.nickname = nickname;
            }
            let name = wild.nickname.clone();
            if self.trainer.add_pokemon(wild, true) {
                println!("{} joined your team!", name);
            } else {
                println!("{} was sent to storage!", name);
            }
        }
    }

    /// Offer any pending level-based evolutions on the party.
    fn offer_evolutions(&mut self) {
        for index in 0..self.trainer.party().len() {
            if !self.trainer.party()[index].can_evolve() {
                continue;
            }
            let member = &self.trainer.party()[index];
            let target = member
                .evolution()
                .map(|evo| evo.evolves_into.clone())
                .unwrap_or_default();
            let question = format!("{} wants to evolve into {}! Allow it?", member.nickname, target);
            let allow = Confirm::new(&question).with_default(true).prompt().unwrap_or(false);
            if allow {
                if let Some(old) = self.trainer.party_mut()[index].evolve(&self.dex) {
                    let species = self.trainer.party()[index].species.clone();
                    println!("{} evolved into {}!", old, species);
                    self.trainer.mark_seen(&species);
                }
            }
        }
    }

    fn challenge_gym(&mut self, location: &Location) {
        let Some(gym) = &location.gym else {
            println!("There's no gym in this location.");
            return;
        };
        let Some(leader) = world::gym_leader(gym.leader) else {
            println!("The gym leader isn't here right now.");
            return;
        };
        if self.trainer.has_badge(gym.badge) {
            println!("You have already defeated this gym!");
            return;
        }

        println!("Gym Leader {} wants to battle!", leader.name);
        println!("{}", leader.intro);
        let ready = Confirm::new("Are you ready to battle?")
            .with_default(true)
            .prompt()
            .unwrap_or(false);
        if !ready {
            return;
        }

        let mut victories = 0;
        for entry in leader.roster {
            let pokemon = world::gym_pokemon(&self.dex, entry);
            println!("{} sends out {}!", leader.name, pokemon.nickname);
            match self.run_battle(pokemon, BattleKind::Trainer) {
                Some(BattleOutcome::Victory) => victories += 1,
                _ => break,
            }
        }

        if victories == leader.roster.len() {
            println!("Congratulations! You defeated {}!", leader.name);
            println!("You earned the {}!", gym.badge);
            println!("You received ${}!", gym.prize_money);
            self.trainer.earn_badge(gym.badge, leader.name, location.key);
            self.trainer.add_money(gym.prize_money);
        } else {
            println!("You were defeated by {}! Come back when you're stronger!", leader.name);
        }
    }

    fn visit_shop(&mut self, location: &Location) {
        let Some(shop) = location.shop else {
            println!("There's no shop in this location.");
            return;
        };

        loop {
            println!("You have ${}.", self.trainer.money);
            let stock = shop_stock(shop);
            let mut labels: Vec<String> = stock
                .iter()
                .map(|item| format!("{} - ${} ({})", item.name, item.price, item.description))
                .collect();
            labels.push("Leave".to_string());

            let Ok(selection) = Select::new("What would you like to buy?", labels).raw_prompt()
            else {
                return;
            };
            if selection.index >= stock.len() {
                return;
            }
            let item = stock[selection.index];

            let quantity = CustomType::<u32>::new("How many?")
                .with_error_message("Please enter a number")
                .prompt()
                .unwrap_or(0);
            if quantity == 0 || quantity > 99 {
                continue;
            }

            let total = item.price * quantity;
            let question = format!("Buy {} {} for ${}?", quantity, item.name, total);
            let confirmed = Confirm::new(&question).with_default(true).prompt().unwrap_or(false);
            if !confirmed {
                continue;
            }
            if self.trainer.spend_money(total) {
                self.trainer.inventory.add_item(item.name, quantity);
                println!("Bought {} {}!", quantity, item.name);
            } else {
                println!("You don't have enough money!");
            }
        }
    }

    fn pokemon_center(&mut self) {
        println!("Welcome to the Pokemon Center!");
        self.trainer.heal_all();
        println!("Your Pokemon have been healed to full health!");
    }

    fn view_team(&self) {
        if self.trainer.party().is_empty() {
            println!("You don't have any Pokemon!");
            return;
        }
        for pokemon in self.trainer.party() {
            let shiny = if pokemon.is_shiny() { " *shiny*" } else { "" };
            println!("{}{}", pokemon, shiny);
            let types: Vec<String> = pokemon.types.iter().map(|t| t.to_string()).collect();
            println!(
                "  {} | ATK {} DEF {} SP.ATK {} SP.DEF {} SPD {}",
                types.join("/"),
                pokemon.stats.attack,
                pokemon.stats.defense,
                pokemon.stats.sp_attack,
                pokemon.stats.sp_defense,
                pokemon.stats.speed
            );
            let moves: Vec<String> = pokemon
                .moves
                .iter()
                .map(|m| format!("{} ({}/{})", m.template.name, m.pp, m.template.max_pp))
                .collect();
            println!("  Moves: {}", moves.join(", "));
            if let Some(status) = pokemon.status {
                println!("  Status: {}", status);
            }
        }
        if !self.trainer.storage().is_empty() {
            println!("(+ {} more in storage)", self.trainer.storage().len());
        }
    }

    fn view_bag(&mut self) {
        if self.trainer.inventory.is_empty() {
            println!("Your bag is empty!");
            return;
        }

        let entries: Vec<(String, u32)> = self
            .trainer
            .inventory
            .iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        let mut labels: Vec<String> = entries
            .iter()
            .map(|(name, count)| {
                let description = find_item(name).map(|d| d.description).unwrap_or("???");
                format!("{} x{} - {}", name, count, description)
            })
            .collect();
        labels.push("Close bag".to_string());

        let Ok(selection) = Select::new("Your bag:", labels).raw_prompt() else {
            return;
        };
        if selection.index >= entries.len() {
            return;
        }
        let item_name = entries[selection.index].0.clone();
        self.use_bag_item(&item_name);
    }

    /// Use an item from the bag outside of battle.
    fn use_bag_item(&mut self, item_name: &str) {
        let Some(data) = find_item(item_name) else {
            println!("You can't use that right now.");
            return;
        };

        match data.kind {
            ItemKind::Healing { .. } | ItemKind::Revive | ItemKind::StatusHeal { .. } => {
                let Some(target) = prompt_party_member(&self.trainer, "Use it on which Pokemon?")
                else {
                    return;
                };
                match self.trainer.use_battle_item(item_name, target) {
                    Ok(effect) => println!("{}", effect),
                    Err(error) => println!("{}", error),
                }
            }
            ItemKind::Evolution => {
                let candidates: Vec<usize> = (0..self.trainer.party().len())
                    .filter(|&i| self.trainer.party()[i].can_evolve_with(item_name))
                    .collect();
                if candidates.is_empty() {
                    println!("It won't have any effect on your Pokemon.");
                    return;
                }
                let labels: Vec<String> = candidates
                    .iter()
                    .map(|&i| self.trainer.party()[i].to_string())
                    .collect();
                let Ok(selection) = Select::new("Use it on which Pokemon?", labels).raw_prompt()
                else {
                    return;
                };
                let index = candidates[selection.index];
                if let Some(old) = self.trainer.party_mut()[index].evolve(&self.dex) {
                    self.trainer.inventory.remove_item(item_name, 1);
                    let species = self.trainer.party()[index].species.clone();
                    println!("{} evolved into {}!", old, species);
                    self.trainer.mark_seen(&species);
                }
            }
            ItemKind::RareCandy => {
                let Some(target) = prompt_party_member(&self.trainer, "Feed it to which Pokemon?")
                else {
                    return;
                };
                let member = &mut self.trainer.party_mut()[target];
                if member.level >= crate::pokemon::MAX_LEVEL {
                    println!("{} is already at the level cap.", member.nickname);
                    return;
                }
                let needed = member.exp_to_next - member.experience;
                member.gain_experience(needed);
                let line = format!("{} grew to level {}!", member.nickname, member.level);
                self.trainer.inventory.remove_item(item_name, 1);
                println!("{}", line);
                self.offer_evolutions();
            }
            ItemKind::Pokeball { .. } => {
                println!("Better save that for a wild encounter.");
            }
        }
    }

    fn view_pokedex(&self) {
        println!(
            "Pokedex: {} seen, {} caught",
            self.trainer.pokedex_seen.len(),
            self.trainer.pokedex_caught.len()
        );
        for species in &self.trainer.pokedex_seen {
            let marker = if self.trainer.pokedex_caught.contains(species) {
                "caught"
            } else {
                "seen"
            };
            println!("  {} ({})", species, marker);
        }
    }

    fn trainer_info(&self) {
        let trainer = &self.trainer;
        println!("Trainer {}", trainer.name);
        println!("  Money: ${}", trainer.money);
        println!(
            "  Battles: {} won / {} lost",
            trainer.stats.battles_won, trainer.stats.battles_lost
        );
        println!("  Pokemon caught: {}", trainer.stats.pokemon_caught);
        if trainer.badges.is_empty() {
            println!("  Badges: none yet");
        } else {
            let names: Vec<&str> = trainer.badges.iter().map(|b| b.name.as_str()).collect();
            println!("  Badges: {}", names.join(", "));
        }
    }

    fn travel(&mut self, location: &Location) {
        let destinations: Vec<&'static Location> = location
            .connections
            .iter()
            .filter_map(|key| world::location(key))
            .collect();
        if destinations.is_empty() {
            println!("You can't travel from here!");
            return;
        }

        let labels: Vec<&str> = destinations.iter().map(|l| l.name).collect();
        let Ok(selection) = Select::new("Where would you like to go?", labels).raw_prompt() else {
            return;
        };
        let destination = destinations[selection.index];
        self.trainer.move_to_location(destination.key);
        println!("You traveled to {}!", destination.name);
    }

    fn save_game(&self) {
        let Ok(name) = Text::new("Save name:").with_default(&self.trainer.name).prompt() else {
            return;
        };
        match save::save_game(&self.trainer, &name) {
            Ok(path) => println!("Game saved to {}.", path.display()),
            Err(error) => println!("Failed to save game: {}", error),
        }
    }

    fn quit(&mut self) {
        let save_first = Confirm::new("Do you want to save before quitting?")
            .with_default(true)
            .prompt()
            .unwrap_or(false);
        if save_first {
            self.save_game();
        }
        println!("Thanks for playing!");
        self.running = false;
    }
}

fn location_menu(location: &Location) -> Vec<&'static str> {
    let mut options = Vec::new();
    if !location.wild_pokemon.is_empty() {
        options.push("Explore");
    }
    if location.gym.is_some() {
        options.push("Challenge Gym");
    }
    if location.shop.is_some() {
        options.push("Visit Shop");
    }
    if location.pokemon_center {
        options.push("Visit Pokemon Center");
    }
    options.extend([
        "View Team",
        "View Bag",
        "View Pokedex",
        "Trainer Info",
        "Travel",
        "Save Game",
        "Quit",
    ]);
    options
}

fn shop_stock(shop: ShopKind) -> Vec<&'static crate::inventory::ItemData> {
    shop.stock().iter().filter_map(|name| find_item(name)).collect()
}

fn print_events(events: &mut EventBus) {
    for line in events.take_lines() {
        println!("{}", line);
    }
}

fn print_battle_header(battle: &Battle<'_>) {
    let active = battle.active();
    let opponent = battle.opponent();
    println!();
    println!("--- Turn {} ---", battle.turn_number() + 1);
    println!(
        "  {} (Lv.{})  HP {}/{}",
        opponent.nickname,
        opponent.level,
        opponent.current_hp(),
        opponent.max_hp()
    );
    println!(
        "  {} (Lv.{})  HP {}/{}",
        active.nickname,
        active.level,
        active.current_hp(),
        active.max_hp()
    );
}

/// Ask the player for their next battle action. Keeps prompting until a
/// structurally valid choice is made; the engine still re-validates it.
fn prompt_action(battle: &Battle<'_>) -> BattleAction {
    loop {
        let Ok(choice) =
            Select::new("What will you do?", vec!["Fight", "Item", "Pokemon", "Run"]).prompt()
        else {
            continue;
        };

        match choice {
            "Fight" => {
                let moves: Vec<String> = battle
                    .active()
                    .moves
                    .iter()
                    .map(|m| {
                        format!(
                            "{} [{}] ({}/{} PP)",
                            m.template.name, m.template.move_type, m.pp, m.template.max_pp
                        )
                    })
                    .collect();
                if moves.is_empty() {
                    println!("No moves available!");
                    continue;
                }
                if let Ok(selection) = Select::new("Choose a move:", moves).raw_prompt() {
                    return BattleAction::Fight { move_index: selection.index };
                }
            }
            "Item" => {
                let items = battle.trainer().inventory.battle_items();
                if items.is_empty() {
                    println!("No usable items!");
                    continue;
                }
                let labels: Vec<String> = items
                    .iter()
                    .map(|(data, count)| format!("{} x{}", data.name, count))
                    .collect();
                if let Ok(selection) = Select::new("Use which item?", labels).raw_prompt() {
                    return BattleAction::UseItem {
                        item: items[selection.index].0.name.to_string(),
                    };
                }
            }
            "Pokemon" => {
                let party = battle.trainer().party();
                let candidates: Vec<usize> = (0..party.len())
                    .filter(|&i| i != battle.active_index() && !party[i].is_fainted())
                    .collect();
                if candidates.is_empty() {
                    println!("No other Pokemon available!");
                    continue;
                }
                let labels: Vec<String> =
                    candidates.iter().map(|&i| party[i].to_string()).collect();
                if let Ok(selection) = Select::new("Switch to:", labels).raw_prompt() {
                    return BattleAction::Switch { team_index: candidates[selection.index] };
                }
            }
            "Run" => return BattleAction::Run,
            _ => {}
        }
    }
}

/// Forced-replacement prompt. Returning `None` concedes the battle.
fn prompt_replacement(battle: &Battle<'_>) -> Option<usize> {
    let party = battle.trainer().party();
    let candidates: Vec<usize> = (0..party.len())
        .filter(|&i| i != battle.active_index() && !party[i].is_fainted())
        .collect();
    if candidates.is_empty() {
        return None;
    }

    println!("Choose another Pokemon!");
    let labels: Vec<String> = candidates.iter().map(|&i| party[i].to_string()).collect();
    let selection = Select::new("Send out:", labels).raw_prompt().ok()?;
    Some(candidates[selection.index])
}

fn prompt_nickname(species: &str) -> Option<String> {
    let question = format!("Give {} a nickname? (leave empty to skip)", species);
    let answer = Text::new(&question).prompt().ok()?;
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn prompt_party_member(trainer: &Trainer, question: &str) -> Option<usize> {
    if trainer.party().is_empty() {
        println!("You don't have any Pokemon!");
        return None;
    }
    let labels: Vec<String> = trainer.party().iter().map(|p| p.to_string()).collect();
    let selection = Select::new(question, labels).raw_prompt().ok()?;
    Some(selection.index)
}
