pub mod food;
pub mod plan;
pub mod targets;

pub use food::{Category, FoodRecord, excluded_by};
pub use plan::{MealSlot, Selection, SelectionEntry};
pub use targets::{MacroRatio, Targets, parse_exclusions};
