use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleKind {
    /// Encounter with an unowned creature; fleeing and capture are allowed.
    Wild,
    /// Battle against another trainer's creature; no fleeing, no capture.
    Trainer,
}

/// Terminal result of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    Victory,
    Defeat,
    Draw,
    Fled,
}

/// Where the battle currently stands between decision points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    /// Waiting for the player's next action.
    AwaitingAction,
    /// The active creature fainted; waiting for a forced replacement.
    AwaitingReplacement,
    Ended(BattleOutcome),
}

/// One player decision, exhaustively matched by the turn resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleAction {
    Fight { move_index: usize },
    UseItem { item: String },
    Switch { team_index: usize },
    Run,
}

/// What happened to the turn the action was submitted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The turn ran to completion; the counter advanced.
    Consumed,
    /// The selection was invalid or a fault was swallowed; the same turn
    /// should be re-prompted and the counter did not advance.
    Retry,
    Ended(BattleOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionFailureReason {
    InvalidMoveSlot,
    NoPpRemaining,
    NoSuchItem,
    ItemHadNoEffect,
    NoOtherPokemon,
    InvalidSwitchTarget,
    CannotRunFromTrainer,
    TurnFaulted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    BattleStarted {
        player: String,
        opponent: String,
        kind: BattleKind,
    },
    MoveUsed {
        attacker: String,
        move_name: String,
    },
    MoveMissed {
        attacker: String,
    },
    DamageDealt {
        target: String,
        amount: u16,
        remaining_hp: u16,
    },
    Effectiveness {
        multiplier: f32,
    },
    Fainted {
        name: String,
    },
    SwitchedIn {
        name: String,
        replaced: String,
    },
    ItemUsed {
        item: String,
        target: String,
        effect: String,
    },
    ActionFailed {
        reason: ActionFailureReason,
    },
    EscapeFailed,
    RanAway,
    ExperienceGained {
        name: String,
        amount: u32,
    },
    LeveledUp {
        name: String,
        level: u8,
    },
    CatchAttempted {
        species: String,
        ball: String,
    },
    CatchSucceeded {
        species: String,
    },
    CatchFailed {
        species: String,
    },
    BattleEnded {
        outcome: BattleOutcome,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable string. Returns None for
    /// silent events that should not produce user-visible text.
    pub fn format(&self) -> Option<String> {
        match self {
            BattleEvent::BattleStarted { opponent, kind, .. } => match kind {
                BattleKind::Wild => Some(format!("A wild {} appeared!", opponent)),
                BattleKind::Trainer => Some(format!("{} was sent out!", opponent)),
            },
            BattleEvent::MoveUsed { attacker, move_name } => {
                Some(format!("{} used {}!", attacker, move_name))
            }
            BattleEvent::MoveMissed { attacker } => {
                Some(format!("{}'s attack missed!", attacker))
            }
            BattleEvent::DamageDealt { target, amount, .. } => {
                if *amount == 0 {
                    Some(format!("{} took no damage.", target))
                } else {
                    Some(format!("{} took {} damage!", target, amount))
                }
            }
            BattleEvent::Effectiveness { multiplier } => match *multiplier {
                m if m > 1.0 => Some("It's super effective!".to_string()),
                m if m > 0.0 && m < 1.0 => Some("It's not very effective...".to_string()),
                m if m == 0.0 => Some("It had no effect!".to_string()),
                _ => None, // Normal effectiveness, no message
            },
            BattleEvent::Fainted { name } => Some(format!("{} fainted!", name)),
            BattleEvent::SwitchedIn { name, replaced } => {
                Some(format!("Come back, {}! Go, {}!", replaced, name))
            }
            BattleEvent::ItemUsed { item, target, effect } => {
                Some(format!("Used {} on {}! {}", item, target, effect))
            }
            BattleEvent::ActionFailed { reason } => Some(Self::format_failure(reason)),
            BattleEvent::EscapeFailed => Some("Can't escape!".to_string()),
            BattleEvent::RanAway => Some("Got away safely!".to_string()),
            BattleEvent::ExperienceGained { name, amount } => {
                Some(format!("{} gained {} experience!", name, amount))
            }
            BattleEvent::LeveledUp { name, level } => {
                Some(format!("{} grew to level {}!", name, level))
            }
            BattleEvent::CatchAttempted { species, ball } => {
                Some(format!("You threw a {} at {}!", ball, species))
            }
            BattleEvent::CatchSucceeded { species } => {
                Some(format!("Gotcha! {} was caught!", species))
            }
            BattleEvent::CatchFailed { species } => {
                Some(format!("Oh no! {} broke free!", species))
            }
            BattleEvent::BattleEnded { outcome } => match outcome {
                BattleOutcome::Victory => Some("You won the battle!".to_string()),
                BattleOutcome::Defeat => Some("You were defeated!".to_string()),
                BattleOutcome::Draw => {
                    Some("The battle has gone on too long! It's a draw!".to_string())
                }
                BattleOutcome::Fled => None, // RanAway already said it
            },
        }
    }

    fn format_failure(reason: &ActionFailureReason) -> String {
        match reason {
            ActionFailureReason::InvalidMoveSlot => "There's no move in that slot!".to_string(),
            ActionFailureReason::NoPpRemaining => "There's no PP left for this move!".to_string(),
            ActionFailureReason::NoSuchItem => "You don't have that item!".to_string(),
            ActionFailureReason::ItemHadNoEffect => {
                "It won't have any effect right now.".to_string()
            }
            ActionFailureReason::NoOtherPokemon => {
                "There's no other Pokemon able to battle!".to_string()
            }
            ActionFailureReason::InvalidSwitchTarget => {
                "That Pokemon can't battle right now!".to_string()
            }
            ActionFailureReason::CannotRunFromTrainer => {
                "Can't run from a trainer battle!".to_string()
            }
            ActionFailureReason::TurnFaulted => {
                "Something went wrong. The battle continues...".to_string()
            }
        }
    }
}

/// Collects the structured events emitted while resolving actions.
///
/// The engine only pushes events; the caller decides what to do with them
/// (print, log, discard). This keeps the engine free of any output concern.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Drain the collected events into their formatted lines, skipping
    /// silent events.
    pub fn take_lines(&mut self) -> Vec<String> {
        self.events.drain(..).filter_map(|e| e.format()).collect()
    }
}

/// Pre-drawn random outcomes for battle resolution.
///
/// Each draw is a uniform value in 1..=100 tagged with the reason it was
/// consumed, which makes every battle roll replayable under test.
#[derive(Debug, Clone)]
pub struct TurnRng {
    outcomes: Vec<u8>,
    index: usize,
}

impl TurnRng {
    pub fn new_for_test(outcomes: Vec<u8>) -> Self {
        Self { outcomes, index: 0 }
    }

    pub fn new_random() -> Self {
        use rand::Rng;
        let mut rng = rand::rng();
        // More than one action's worth of draws; a single action never
        // needs anywhere near this many.
        let outcomes: Vec<u8> = (0..64).map(|_| rng.random_range(1..=100)).collect();
        Self { outcomes, index: 0 }
    }

    pub fn next_outcome(&mut self, reason: &str) -> u8 {
        if self.index >= self.outcomes.len() {
            panic!(
                "TurnRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                reason
            );
        }
        let outcome = self.outcomes[self.index];
        self.index += 1;
        outcome
    }

    /// The per-hit damage variance factor: a draw of 1 maps to exactly
    /// 0.85 and a draw of 100 to exactly 1.0, uniformly in between.
    pub fn damage_variance(&mut self) -> f64 {
        let roll = self.next_outcome("damage variance");
        0.85 + (roll as f64 - 1.0) / 99.0 * 0.15
    }

    /// Roll against a percentage; succeeds on draws up to `chance`.
    pub fn chance(&mut self, chance: u8, reason: &str) -> bool {
        self.next_outcome(reason) <= chance
    }

    /// Pick an index in `0..len`.
    pub fn choose(&mut self, len: usize, reason: &str) -> usize {
        debug_assert!(len > 0, "choose() requires a non-empty range");
        (self.next_outcome(reason) as usize - 1) % len
    }
}
