pub mod api;
pub mod contest;
pub mod identity;
pub mod merge;
pub mod resolver;
pub mod sources;
pub mod window;

pub use api::{Resolution, SourceTier, SOURCE_HEADER};
pub use contest::{Contest, ContestStatus, Platform};
pub use resolver::ContestResolver;
pub use sources::{ContestSource, SourceConfig, SourceError};
pub use window::{Window, WindowPolicy, DEFAULT_PAST_MONTHS};
