//! Sitemap assembly and XML serialization.
//!
//! Output follows the sitemaps.org 0.9 schema with the Google image extension
//! bound to the `image` prefix:
//!
//! ```xml
//! <?xml version="1.0" ?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" xmlns:image="...">
//!   <url>
//!     <loc>https://shop.example/products/shoe</loc>
//!     <priority>0.8</priority>
//!     <changefreq>weekly</changefreq>
//!     <image:image>
//!       <image:loc>https://cdn.example/shoe.jpg</image:loc>
//!       <image:title>Product Image</image:title>
//!     </image:image>
//!   </url>
//! </urlset>
//! ```

use crate::domain::model::{ChangeFreq, ImageRef, Priority, SitemapEntry};
use crate::utils::error::{Result, SitemapError};
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::collections::HashSet;

pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
pub const IMAGE_NS: &str = "http://www.google.com/schemas/sitemap-image/1.1";

const XML_DECLARATION: &str = "<?xml version=\"1.0\" ?>\n";
const INDENT_SIZE: usize = 2;

/// Concatenates the three sources in their fixed output order.
pub fn assemble(
    static_pages: Vec<SitemapEntry>,
    collections: Vec<SitemapEntry>,
    products: Vec<SitemapEntry>,
) -> Vec<SitemapEntry> {
    let mut entries =
        Vec::with_capacity(static_pages.len() + collections.len() + products.len());
    entries.extend(static_pages);
    entries.extend(collections);
    entries.extend(products);
    entries
}

/// Logs every `loc` that appears more than once. Entries are left as-is.
pub fn report_duplicates(entries: &[SitemapEntry]) -> usize {
    let mut seen = HashSet::new();
    let mut duplicates = 0;
    for entry in entries {
        if !seen.insert(entry.loc.as_str()) {
            duplicates += 1;
            tracing::warn!("Duplicate sitemap URL: {}", entry.loc);
        }
    }
    duplicates
}

pub fn render(entries: &[SitemapEntry]) -> Result<String> {
    let mut writer =
        Writer::new_with_indent(XML_DECLARATION.as_bytes().to_vec(), b' ', INDENT_SIZE);

    let urlset = BytesStart::new("urlset")
        .with_attributes([("xmlns", SITEMAP_NS), ("xmlns:image", IMAGE_NS)]);
    writer.write_event(Event::Start(urlset))?;

    for entry in entries {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        write_text_element(&mut writer, "loc", &entry.loc)?;
        write_text_element(&mut writer, "priority", &entry.priority.to_string())?;
        write_text_element(&mut writer, "changefreq", entry.changefreq.as_str())?;

        for image in &entry.images {
            writer.write_event(Event::Start(BytesStart::new("image:image")))?;
            write_text_element(&mut writer, "image:loc", &image.src)?;
            write_text_element(&mut writer, "image:title", &image.title)?;
            writer.write_event(Event::End(BytesEnd::new("image:image")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;

    let mut buffer = writer.into_inner();
    buffer.push(b'\n');
    String::from_utf8(buffer).map_err(|e| SitemapError::ValidationError {
        message: format!("rendered sitemap is not valid UTF-8: {}", e),
    })
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[derive(Default)]
struct UrlBuilder {
    loc: Option<String>,
    priority: Option<Priority>,
    changefreq: Option<ChangeFreq>,
    images: Vec<ImageRef>,
}

#[derive(Default)]
struct ImageBuilder {
    src: Option<String>,
    title: Option<String>,
}

/// Reads a sitemap produced by [`render`] back into entries.
///
/// Missing `priority`/`changefreq` fall back to the protocol defaults; a
/// `<url>` without `<loc>` is an error. Leaf text is taken verbatim, so
/// leading and trailing whitespace survive a round trip.
pub fn parse_sitemap(xml: &str) -> Result<Vec<SitemapEntry>> {
    let mut reader = Reader::from_str(xml);

    let mut entries = Vec::new();
    let mut url: Option<UrlBuilder> = None;
    let mut image: Option<ImageBuilder> = None;
    let mut open_element = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match name.as_str() {
                    "url" => url = Some(UrlBuilder::default()),
                    "image:image" => image = Some(ImageBuilder::default()),
                    _ => {}
                }
                open_element = name;
            }
            // Indentation between tags arrives with no leaf element open.
            Event::Text(t) if !open_element.is_empty() => {
                let text = t.unescape()?.into_owned();
                match (open_element.as_str(), url.as_mut(), image.as_mut()) {
                    ("image:loc", _, Some(img)) => img.src = Some(text),
                    ("image:title", _, Some(img)) => img.title = Some(text),
                    ("loc", Some(u), _) => u.loc = Some(text),
                    ("priority", Some(u), _) => u.priority = Some(text.parse()?),
                    ("changefreq", Some(u), _) => u.changefreq = Some(text.parse()?),
                    _ => {}
                }
            }
            Event::End(e) => {
                match e.name().as_ref() {
                    b"image:image" => {
                        if let (Some(img), Some(u)) = (image.take(), url.as_mut()) {
                            let src = img.src.ok_or_else(|| SitemapError::ValidationError {
                                message: "<image:image> without <image:loc>".to_string(),
                            })?;
                            u.images.push(ImageRef::new(src, img.title.as_deref()));
                        }
                    }
                    b"url" => {
                        if let Some(u) = url.take() {
                            let loc = u.loc.ok_or_else(|| SitemapError::ValidationError {
                                message: "<url> without <loc>".to_string(),
                            })?;
                            entries.push(SitemapEntry {
                                loc,
                                priority: u.priority.unwrap_or_default(),
                                changefreq: u.changefreq.unwrap_or_default(),
                                images: u.images,
                            });
                        }
                    }
                    _ => {}
                }
                open_element.clear();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(entries)
}
