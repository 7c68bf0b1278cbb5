use crate::pokemon::Pokemon;
use schema::StatusCondition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// What an item does when used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemKind {
    /// Capture device with its catch-rate modifier.
    Pokeball { modifier: f64 },
    /// Restores HP; `None` restores fully.
    Healing { amount: Option<u16> },
    /// Revives a fainted creature at half HP.
    Revive,
    /// Cures a status condition; `None` cures any.
    StatusHeal { cures: Option<StatusCondition> },
    /// Evolution stone, applied from the bag.
    Evolution,
    /// Instantly grants the experience still needed for the next level.
    RareCandy,
}

/// Static catalog entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemData {
    pub name: &'static str,
    pub kind: ItemKind,
    pub price: u32,
    pub description: &'static str,
}

/// The full item catalog. Shop stock and bag entries both refer into this
/// table by name.
pub const ITEM_CATALOG: &[ItemData] = &[
    ItemData {
        name: "Pokeball",
        kind: ItemKind::Pokeball { modifier: 1.0 },
        price: 200,
        description: "A basic ball for catching Pokemon.",
    },
    ItemData {
        name: "Great Ball",
        kind: ItemKind::Pokeball { modifier: 1.5 },
        price: 600,
        description: "A good, high-performance ball.",
    },
    ItemData {
        name: "Ultra Ball",
        kind: ItemKind::Pokeball { modifier: 2.0 },
        price: 1200,
        description: "An ultra-high performance ball.",
    },
    ItemData {
        name: "Master Ball",
        kind: ItemKind::Pokeball { modifier: 255.0 },
        price: 0,
        description: "The best ball with the ultimate level of performance.",
    },
    ItemData {
        name: "Potion",
        kind: ItemKind::Healing { amount: Some(20) },
        price: 300,
        description: "Restores 20 HP.",
    },
    ItemData {
        name: "Super Potion",
        kind: ItemKind::Healing { amount: Some(50) },
        price: 700,
        description: "Restores 50 HP.",
    },
    ItemData {
        name: "Hyper Potion",
        kind: ItemKind::Healing { amount: Some(200) },
        price: 1200,
        description: "Restores 200 HP.",
    },
    ItemData {
        name: "Max Potion",
        kind: ItemKind::Healing { amount: None },
        price: 2500,
        description: "Fully restores HP.",
    },
    ItemData {
        name: "Revive",
        kind: ItemKind::Revive,
        price: 1500,
        description: "Revives a fainted Pokemon with half its HP.",
    },
    ItemData {
        name: "Antidote",
        kind: ItemKind::StatusHeal { cures: Some(StatusCondition::Poison) },
        price: 100,
        description: "Cures poison.",
    },
    ItemData {
        name: "Paralyze Heal",
        kind: ItemKind::StatusHeal { cures: Some(StatusCondition::Paralysis) },
        price: 200,
        description: "Cures paralysis.",
    },
    ItemData {
        name: "Awakening",
        kind: ItemKind::StatusHeal { cures: Some(StatusCondition::Sleep) },
        price: 250,
        description: "Cures sleep.",
    },
    ItemData {
        name: "Full Heal",
        kind: ItemKind::StatusHeal { cures: None },
        price: 600,
        description: "Cures all status conditions.",
    },
    ItemData {
        name: "Thunder Stone",
        kind: ItemKind::Evolution,
        price: 2100,
        description: "Makes certain Pokemon evolve.",
    },
    ItemData {
        name: "Fire Stone",
        kind: ItemKind::Evolution,
        price: 2100,
        description: "Makes certain Pokemon evolve.",
    },
    ItemData {
        name: "Water Stone",
        kind: ItemKind::Evolution,
        price: 2100,
        description: "Makes certain Pokemon evolve.",
    },
    ItemData {
        name: "Leaf Stone",
        kind: ItemKind::Evolution,
        price: 2100,
        description: "Makes certain Pokemon evolve.",
    },
    ItemData {
        name: "Rare Candy",
        kind: ItemKind::RareCandy,
        price: 4800,
        description: "Raises a Pokemon's level by one.",
    },
];

pub fn find_item(name: &str) -> Option<&'static ItemData> {
    ITEM_CATALOG.iter().find(|item| item.name == name)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    #[error("unknown item: {0}")]
    Unknown(String),
    #[error("no {0} in the bag")]
    NotInBag(String),
    #[error("{0}")]
    NoEffect(String),
}

/// The trainer's bag: item name -> count.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    items: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&mut self, name: &str, quantity: u32) {
        *self.items.entry(name.to_string()).or_insert(0) += quantity;
    }

    /// Remove items; fails without change when there are not enough.
    pub fn remove_item(&mut self, name: &str, quantity: u32) -> bool {
        match self.items.get_mut(name) {
            Some(count) if *count >= quantity => {
                *count -= quantity;
                if *count == 0 {
                    self.items.remove(name);
                }
                true
            }
            _ => false,
        }
    }

    pub fn count(&self, name: &str) -> u32 {
        self.items.get(name).copied().unwrap_or(0)
    }

    pub fn has_item(&self, name: &str) -> bool {
        self.count(name) > 0
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.items.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Items in the bag whose catalog entry satisfies the predicate.
    pub fn items_matching(
        &self,
        mut predicate: impl FnMut(&ItemData) -> bool,
    ) -> Vec<(&'static ItemData, u32)> {
        self.iter()
            .filter_map(|(name, count)| find_item(name).map(|data| (data, count)))
            .filter(|(data, _)| predicate(data))
            .collect()
    }

    pub fn pokeballs(&self) -> Vec<(&'static ItemData, u32)> {
        self.items_matching(|data| matches!(data.kind, ItemKind::Pokeball { .. }))
    }

    /// Items usable on the active creature during battle.
    pub fn battle_items(&self) -> Vec<(&'static ItemData, u32)> {
        self.items_matching(|data| {
            matches!(
                data.kind,
                ItemKind::Healing { .. } | ItemKind::Revive | ItemKind::StatusHeal { .. }
            )
        })
    }
}

/// Apply a battle item to a creature. Returns a description of what
/// happened, or `NoEffect` when the item would do nothing (the item is not
/// consumed in that case).
pub fn apply_battle_item(data: &ItemData, target: &mut Pokemon) -> Result<String, ItemError> {
    match data.kind {
        ItemKind::Healing { amount } => {
            if target.is_fainted() {
                return Err(ItemError::NoEffect(format!(
                    "{} is fainted and needs a Revive",
                    target.nickname
                )));
            }
            if target.current_hp() == target.max_hp() {
                return Err(ItemError::NoEffect(format!(
                    "{}'s HP is already full",
                    target.nickname
                )));
            }
            let before = target.current_hp();
            target.heal(amount);
            let restored = target.current_hp() - before;
            Ok(format!("{} recovered {} HP!", target.nickname, restored))
        }
        ItemKind::Revive => {
            if !target.is_fainted() {
                return Err(ItemError::NoEffect(format!(
                    "{} is still able to battle",
                    target.nickname
                )));
            }
            target.set_hp(target.max_hp() / 2);
            Ok(format!("{} was revived!", target.nickname))
        }
        ItemKind::StatusHeal { cures } => match (target.status, cures) {
            (None, _) => Err(ItemError::NoEffect(format!(
                "{} has no status condition",
                target.nickname
            ))),
            (Some(current), Some(cured)) if current != cured => Err(ItemError::NoEffect(
                format!("it won't cure {}", current),
            )),
            (Some(current), _) => {
                target.clear_status();
                Ok(format!("{} was cured of its {}!", target.nickname, current))
            }
        },
        _ => Err(ItemError::NoEffect(
            "it can't be used during battle".to_string(),
        )),
    }
}
