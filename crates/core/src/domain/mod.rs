pub mod menu;
pub mod restaurant;
