#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod identifier;
pub mod loader;
pub mod milestone;
pub mod page;
pub mod render;
pub mod runner;
pub mod summary;

pub use config::{ConfigError, DataLocation, ProgressConfig};
pub use identifier::{IdentifierError, IssueIdentifier};
pub use loader::{DataLoader, FileSource, HttpSource, LoadError, MilestoneSource};
pub use milestone::{IssueRecord, IssueState, MilestoneDocument, Progress};
pub use page::{find_placeholders, update_page, PageUpdate, Placeholder, PLACEHOLDER_CLASS};
pub use render::{escape_html, FragmentTemplates, ProgressRenderer, TemplateError};
pub use runner::{ConfiguredSource, Runner, RunnerError};
pub use summary::{PageSummary, PlaceholderOutcome};
