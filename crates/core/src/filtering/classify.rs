use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::menu::{Dish, Menu};
use crate::text::{format_dish, normalize};

pub const VEGETARIAN_SAFE_WORDS: [&str; 2] = ["vegan", "vegetarian"];

/// Keyword lists for one classification pass. Words are expected to be
/// lower-cased already.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordLists {
    pub safe: Vec<String>,
    pub danger: Vec<String>,
}

impl WordLists {
    pub fn new(safe: Vec<String>, danger: Vec<String>) -> Self {
        Self { safe, danger }
    }

    pub fn vegetarian(danger: Vec<String>) -> Self {
        Self::new(VEGETARIAN_SAFE_WORDS.iter().map(ToString::to_string).collect(), danger)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeepReason {
    HasSafeWord,
    HasNoDangerWords,
}

impl KeepReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HasSafeWord => "has safe word",
            Self::HasNoDangerWords => "has no danger words",
        }
    }
}

impl fmt::Display for KeepReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassifiedDish {
    pub dish: Dish,
    pub reason: KeepReason,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DroppedDish {
    pub name: String,
    pub danger_word: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilteredMenu {
    pub restaurant: String,
    pub kept: Vec<ClassifiedDish>,
    pub dropped: Vec<DroppedDish>,
}

impl FilteredMenu {
    /// The kept dishes as a fresh menu, in original order.
    pub fn menu(&self) -> Menu {
        Menu {
            restaurant: self.restaurant.clone(),
            dishes: self.kept.iter().map(|classified| classified.dish.clone()).collect(),
        }
    }
}

enum Verdict {
    Keep(KeepReason),
    Drop(String),
}

/// Partitions a menu into kept and dropped dishes.
///
/// Safe words win over danger words. Matching is plain substring containment
/// against the normalized name and description, so false positives and
/// negatives are expected.
pub fn classify_menu(menu: &Menu, words: &WordLists) -> FilteredMenu {
    let mut kept = Vec::new();
    let mut dropped = Vec::new();

    for dish in &menu.dishes {
        let name = normalize(&dish.name);
        let info = normalize(&dish.info);

        match verdict(&name, &info, words) {
            Verdict::Keep(reason) => kept.push(ClassifiedDish {
                dish: Dish::new(dish.name.clone(), format_dish(&info)),
                reason,
            }),
            Verdict::Drop(danger_word) => {
                dropped.push(DroppedDish { name: dish.name.clone(), danger_word })
            }
        }
    }

    FilteredMenu { restaurant: menu.restaurant.clone(), kept, dropped }
}

fn verdict(name: &str, info: &str, words: &WordLists) -> Verdict {
    let mentions = |word: &String| name.contains(word.as_str()) || info.contains(word.as_str());

    if words.safe.iter().any(mentions) {
        return Verdict::Keep(KeepReason::HasSafeWord);
    }

    match words.danger.iter().find(|word| mentions(*word)) {
        Some(word) => Verdict::Drop(word.clone()),
        None => Verdict::Keep(KeepReason::HasNoDangerWords),
    }
}
