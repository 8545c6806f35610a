// Declare modules that are part of the library
pub mod cli;
pub mod codes;
pub mod collector;
pub mod config;
pub mod page;
pub mod popup;
pub mod script;
pub mod selector;

// Re-export types needed by the binary and the integration tests
pub use collector::{render, EventAction, FieldId, FieldList, FieldView, Key};
pub use config::{Config, ConfigError, SelectorOptions, SplitPlacement};
pub use page::{Checkbox, Click, PageError, Section, SectionPage, StaticPage};
pub use popup::{Popup, RunError, SingleTab, TabHost};
pub use script::injection_script;
pub use selector::{select_sections, CodeStatus, MatchOutcome, SelectionReport};
