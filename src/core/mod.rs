pub mod engine;
pub mod entries;
pub mod pipeline;
pub mod sitemap;

pub use crate::domain::model::{
    ChangeFreq, FailurePolicy, ImageRef, Priority, SitemapDocument, SitemapEntry, SourceEntries,
    SourceKind, SourceOutcome,
};
pub use crate::domain::ports::{ConfigProvider, EntrySource, Pipeline, Storage};
pub use crate::utils::error::Result;
