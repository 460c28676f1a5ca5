use crate::utils::error::{Result, SitemapError};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Title used for product images that carry no alt text.
pub const DEFAULT_IMAGE_TITLE: &str = "Product Image";

/// Relative crawl priority in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize)]
#[serde(try_from = "f64")]
pub struct Priority(f64);

impl Priority {
    /// Fallback for entries built without an explicit priority.
    pub const DEFAULT: Priority = Priority(0.5);
    pub const STATIC_PAGE: Priority = Priority(0.3);
    pub const PRODUCT: Priority = Priority(0.8);
    pub const COLLECTION: Priority = Priority(0.9);

    pub fn new(value: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(SitemapError::ValidationError {
                message: format!("priority {} is outside [0.0, 1.0]", value),
            });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for Priority {
    type Error = SitemapError;

    fn try_from(value: f64) -> Result<Self> {
        Priority::new(value)
    }
}

// Shortest round-trip decimal; whole numbers keep one fractional digit ("1.0").
impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for Priority {
    type Err = SitemapError;

    fn from_str(s: &str) -> Result<Self> {
        let value: f64 = s.trim().parse().map_err(|_| SitemapError::ValidationError {
            message: format!("'{}' is not a valid priority", s),
        })?;
        Priority::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFreq::Always => "always",
            ChangeFreq::Hourly => "hourly",
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
            ChangeFreq::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeFreq {
    type Err = SitemapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "always" => Ok(ChangeFreq::Always),
            "hourly" => Ok(ChangeFreq::Hourly),
            "daily" => Ok(ChangeFreq::Daily),
            "weekly" => Ok(ChangeFreq::Weekly),
            "monthly" => Ok(ChangeFreq::Monthly),
            "yearly" => Ok(ChangeFreq::Yearly),
            "never" => Ok(ChangeFreq::Never),
            other => Err(SitemapError::ValidationError {
                message: format!("'{}' is not a recognized changefreq", other),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub src: String,
    pub title: String,
}

impl ImageRef {
    /// Builds an image reference, falling back to [`DEFAULT_IMAGE_TITLE`]
    /// when the alt text is missing or empty. Any other alt text is kept as-is.
    pub fn new(src: impl Into<String>, alt_text: Option<&str>) -> Self {
        let title = match alt_text {
            Some(alt) if !alt.is_empty() => alt.to_string(),
            _ => DEFAULT_IMAGE_TITLE.to_string(),
        };
        Self {
            src: src.into(),
            title,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub priority: Priority,
    pub changefreq: ChangeFreq,
    pub images: Vec<ImageRef>,
}

impl SitemapEntry {
    pub fn new(loc: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            priority: Priority::default(),
            changefreq: ChangeFreq::default(),
            images: Vec::new(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_changefreq(mut self, changefreq: ChangeFreq) -> Self {
        self.changefreq = changefreq;
        self
    }

    pub fn with_images(mut self, images: Vec<ImageRef>) -> Self {
        self.images = images;
        self
    }
}

/// The sources a sitemap is assembled from, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    StaticPages,
    Collections,
    Products,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceKind::StaticPages => "static pages",
            SourceKind::Collections => "collections",
            SourceKind::Products => "products",
        })
    }
}

/// What to do when a source cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Continue with an empty entry list for the source.
    Degrade,
    /// Fail the run before anything is written.
    Abort,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome {
    Fetched(Vec<SitemapEntry>),
    Degraded { error: String },
}

impl SourceOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, SourceOutcome::Degraded { .. })
    }

    pub fn len(&self) -> usize {
        match self {
            SourceOutcome::Fetched(entries) => entries.len(),
            SourceOutcome::Degraded { .. } => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_entries(self) -> Vec<SitemapEntry> {
        match self {
            SourceOutcome::Fetched(entries) => entries,
            SourceOutcome::Degraded { .. } => Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceEntries {
    pub static_pages: SourceOutcome,
    pub collections: SourceOutcome,
    pub products: SourceOutcome,
}

impl SourceEntries {
    pub fn total(&self) -> usize {
        self.static_pages.len() + self.collections.len() + self.products.len()
    }

    pub fn degraded(&self) -> Vec<SourceKind> {
        [
            (SourceKind::StaticPages, &self.static_pages),
            (SourceKind::Collections, &self.collections),
            (SourceKind::Products, &self.products),
        ]
        .into_iter()
        .filter(|(_, outcome)| outcome.is_degraded())
        .map(|(kind, _)| kind)
        .collect()
    }
}

#[derive(Debug, Clone)]
pub struct SitemapDocument {
    pub entries: Vec<SitemapEntry>,
    pub xml: String,
    pub degraded: Vec<SourceKind>,
}
