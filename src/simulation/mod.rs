pub mod deck;
pub mod engine;
pub mod hand;
pub mod mulligan;

pub use deck::{Category, Deck, DeckComposition, DeckError};
pub use engine::{simulate_requirement, ColorRequirement, Estimate, LandSplit, Requirement, RequirementError, SimSettings};
pub use mulligan::resolve_mulligans;
