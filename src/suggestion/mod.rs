pub mod parser;
pub mod prompt;
pub mod source;

pub use parser::{
    AnnotatedMeal, RowLabel, SuggestedMeal, SuggestedMeals, parse_meal_annotations,
    parse_meal_items, split_items,
};
pub use prompt::build_prompt;
pub use source::{FileSource, StaticSource, StdinSource, SuggestionSource};
