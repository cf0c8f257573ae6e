pub mod catalog;
pub mod cli;
pub mod error;
pub mod interface;
pub mod models;
pub mod planner;
pub mod session;
pub mod suggestion;

pub use catalog::{NutritionCatalog, load_catalog};
pub use error::{PlanError, Result};
pub use models::{Category, FoodRecord, MacroRatio, MealSlot, Selection, Targets};
pub use session::{PlanReport, PlanSession, PlanStatus, plan_text};
