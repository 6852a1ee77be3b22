pub mod config;
pub mod domain;
pub mod errors;
pub mod filtering;
pub mod governor;
pub mod pipeline;
pub mod text;
pub mod venue;
pub mod words;

pub use config::{AppConfig, ConfigError, LoadOptions, LogFormat};
pub use domain::menu::{Dish, Menu};
pub use domain::restaurant::{Restaurant, VenueId};
pub use errors::{ApplicationError, InterfaceError, PipelineError, ProviderError};
pub use filtering::{classify_menu, flatten_menu, FilteredMenu, KeepReason, WordLists};
pub use governor::{cap_reply, render_menu, Rendering};
pub use pipeline::{MenuChecker, MenuOutcome, MenuReply};
pub use venue::{FoursquareClient, VenueProvider};
pub use words::{FileWordSource, StaticWordSource, WordSource, WordSourceError};
