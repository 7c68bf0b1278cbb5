use serde::{Deserialize, Serialize};

/// Persistent status conditions. A creature holds at most one, together
/// with a remaining-turn counter owned by the creature itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum StatusCondition {
    Sleep,
    Freeze,
    Paralysis,
    Burn,
    Poison,
}
