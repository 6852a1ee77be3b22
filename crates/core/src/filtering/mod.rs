pub mod classify;
pub mod flatten;

pub use classify::{
    classify_menu, ClassifiedDish, DroppedDish, FilteredMenu, KeepReason, WordLists,
    VEGETARIAN_SAFE_WORDS,
};
pub use flatten::{flatten_menu, is_excluded_section, FlattenError, EXCLUDED_SECTION_MARKERS};
