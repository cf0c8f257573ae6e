use std::fmt;

use serde::Serialize;

/// Calories per gram of carbohydrate, protein and fat.
pub const KCAL_PER_G_CARB: f64 = 4.0;
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Dish category, assigned once from substring markers in the food name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    SoupStew,
    Rice,
    MainDish,
    SideOther,
}

const SOUP_STEW_MARKERS: &[&str] = &["국", "탕", "찌개", "soup", "stew"];
const RICE_MARKERS: &[&str] = &["밥", "덮밥", "비빔밥", "rice", "bowl"];
const MAIN_DISH_MARKERS: &[&str] = &[
    "볶음", "구이", "조림", "찜", "튀김", "stir-fr", "grill", "brais", "steam", "fried", "fry",
];

impl Category {
    /// Classify a food name. Rules are checked in order soup/stew, rice, main dish.
    pub fn classify(name: &str) -> Self {
        let lower = name.to_lowercase();
        let has_any = |markers: &[&str]| markers.iter().any(|m| lower.contains(m));

        if has_any(SOUP_STEW_MARKERS) {
            Category::SoupStew
        } else if has_any(RICE_MARKERS) {
            Category::Rice
        } else if has_any(MAIN_DISH_MARKERS) {
            Category::MainDish
        } else {
            Category::SideOther
        }
    }

    /// Substantial dishes preferred when the calorie deficit is large.
    #[inline]
    pub fn is_substantial(self) -> bool {
        matches!(self, Category::MainDish | Category::Rice)
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::SoupStew => "soup/stew",
            Category::Rice => "rice",
            Category::MainDish => "main dish",
            Category::SideOther => "side/other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One nutrition catalog entry.
///
/// `energy_kcal` is informational; plan totals derive calories from macros.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodRecord {
    pub name: String,
    pub energy_kcal: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
    pub sugar: f64,
    pub sodium: f64,
    pub category: Category,
}

impl FoodRecord {
    pub fn new(
        name: impl Into<String>,
        energy_kcal: f64,
        carbs: f64,
        protein: f64,
        fat: f64,
        sugar: f64,
        sodium: f64,
    ) -> Self {
        let name = name.into();
        let category = Category::classify(&name);
        Self {
            name,
            energy_kcal,
            carbs,
            protein,
            fat,
            sugar,
            sodium,
            category,
        }
    }

    /// Calories derived from macros with the 4/4/9 rule.
    #[inline]
    pub fn derived_kcal(&self) -> f64 {
        self.carbs * KCAL_PER_G_CARB + self.protein * KCAL_PER_G_PROTEIN + self.fat * KCAL_PER_G_FAT
    }

    /// True when any non-empty exclusion substring occurs in the name.
    pub fn is_excluded(&self, exclusions: &[String]) -> bool {
        excluded_by(&self.name, exclusions).is_some()
    }
}

/// First non-empty exclusion substring contained in `name`.
pub fn excluded_by<'a>(name: &str, exclusions: &'a [String]) -> Option<&'a str> {
    exclusions
        .iter()
        .map(String::as_str)
        .find(|ex| !ex.is_empty() && name.contains(ex))
}
