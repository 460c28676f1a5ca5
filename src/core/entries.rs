//! Builders that turn source records into sitemap entries.
//!
//! Each source has a fixed priority/changefreq policy; only static pages may
//! override it.

use crate::domain::model::{ChangeFreq, ImageRef, Priority, SitemapEntry};

pub fn static_entry(
    loc: String,
    priority: Option<Priority>,
    changefreq: Option<ChangeFreq>,
) -> SitemapEntry {
    SitemapEntry::new(loc)
        .with_priority(priority.unwrap_or(Priority::STATIC_PAGE))
        .with_changefreq(changefreq.unwrap_or(ChangeFreq::Monthly))
}

pub fn collection_entry(site_url: &str, handle: &str) -> SitemapEntry {
    SitemapEntry::new(format!("{}/collections/{}", site_url, handle))
        .with_priority(Priority::COLLECTION)
        .with_changefreq(ChangeFreq::Weekly)
}

pub fn product_entry(site_url: &str, handle: &str, images: Vec<ImageRef>) -> SitemapEntry {
    SitemapEntry::new(format!("{}/products/{}", site_url, handle))
        .with_priority(Priority::PRODUCT)
        .with_changefreq(ChangeFreq::Weekly)
        .with_images(images)
}
