pub mod output;
pub mod prompts;
pub mod render;

pub use output::{write_report_json, write_selection_csv};
pub use prompts::{collect_targets, prompt_exclusions, prompt_goal_kcal, prompt_ratio, prompt_yes_no};
pub use render::{
    display_annotations, display_comparison, display_dropped, display_log, display_report,
    display_selection, display_suggested, display_taste,
};
