// Pokemon Quest Schema - Shared type definitions
// This crate contains the core enums and data templates that are shared
// between the battle engine, the data tables, and the save format.

// Re-export the main types
pub use move_data::*;
pub use pokemon_types::*;
pub use species_data::*;
pub use status::*;

pub mod move_data;
pub mod pokemon_types;
pub mod species_data;
pub mod status;
