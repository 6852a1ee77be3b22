use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    pub name: String,
    pub info: String,
}

impl Dish {
    pub fn new(name: impl Into<String>, info: impl Into<String>) -> Self {
        Self { name: name.into(), info: info.into() }
    }
}

impl fmt::Display for Dish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.info.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}: {}", self.name, self.info)
        }
    }
}

/// Ordered dishes tagged with the owning restaurant's display name.
///
/// Dish names are unique within a menu produced by the flattener; the type
/// itself does not enforce it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub restaurant: String,
    pub dishes: Vec<Dish>,
}

impl Menu {
    pub fn new(restaurant: impl Into<String>) -> Self {
        Self { restaurant: restaurant.into(), dishes: Vec::new() }
    }

    pub fn add_dish(&mut self, dish: Dish) {
        self.dishes.push(dish);
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    /// Single-line, name-only rendering used when the bulleted form is too
    /// large for the reply channel.
    pub fn simplified(&self) -> String {
        let names = self.dishes.iter().map(|dish| dish.name.as_str()).collect::<Vec<_>>();
        format!("{}: {}", self.restaurant, names.join("; "))
    }
}

impl fmt::Display for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "*{}*", self.restaurant)?;
        for dish in &self.dishes {
            writeln!(f, "- {dish}")?;
        }
        Ok(())
    }
}
