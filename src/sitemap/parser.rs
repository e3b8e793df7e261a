//! Sitemap XML parsing with quick-xml
//!
//! Handles both `<urlset>` documents and `<sitemapindex>` documents. Only a
//! `<loc>` whose parent is `<url>` or `<sitemap>` is collected, so extension
//! elements such as `<image:loc>` are ignored.

use crate::SurveyError;
use quick_xml::events::Event as XmlEvent;
use quick_xml::Reader;
use url::Url;

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<urlset>`: page locations
    UrlSet(Vec<String>),

    /// `<sitemapindex>`: locations of further sitemaps
    Index(Vec<String>),
}

impl SitemapDocument {
    pub fn locations(&self) -> &[String] {
        match self {
            Self::UrlSet(locs) | Self::Index(locs) => locs,
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index(_))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Root {
    UrlSet,
    Index,
}

/// Parses a sitemap document
///
/// Relative `<loc>` values are resolved against `sitemap_url`.
///
/// # Arguments
///
/// * `xml` - Raw document body
/// * `sitemap_url` - Where the document was fetched from
///
/// # Returns
///
/// * `Ok(SitemapDocument)` - The document's locations in order
/// * `Err(SurveyError::Parse)` - Malformed XML, truncated document, or an
///   unknown root element
pub fn parse_sitemap(xml: &str, sitemap_url: &str) -> Result<SitemapDocument, SurveyError> {
    let parse_error = |message: String| SurveyError::Parse {
        url: sitemap_url.to_string(),
        message,
    };

    let base = Url::parse(sitemap_url).ok();
    let mut reader = Reader::from_reader(xml.as_bytes());
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut root: Option<Root> = None;
    let mut current_loc: Option<String> = None;
    let mut locs: Vec<String> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(XmlEvent::Start(e)) => {
                let name = e.local_name().as_ref().to_ascii_lowercase();

                if stack.is_empty() {
                    root = Some(root_kind(&name).map_err(parse_error)?);
                }

                let parent = stack.last().map(Vec::as_slice);
                if name == b"loc" && matches!(parent, Some(b"url") | Some(b"sitemap")) {
                    current_loc = Some(String::new());
                }
                stack.push(name);
            }
            Ok(XmlEvent::Empty(e)) => {
                if stack.is_empty() {
                    let name = e.local_name().as_ref().to_ascii_lowercase();
                    root = Some(root_kind(&name).map_err(parse_error)?);
                }
            }
            Ok(XmlEvent::End(_)) => {
                let closed = stack.pop();
                if closed.as_deref() == Some(b"loc".as_slice()) {
                    if let Some(loc) = current_loc.take() {
                        let loc = loc.trim();
                        if !loc.is_empty() {
                            locs.push(resolve(loc, base.as_ref()));
                        }
                    }
                }
            }
            Ok(XmlEvent::Text(t)) => {
                if let Some(loc) = current_loc.as_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| parse_error(format!("bad text in <loc>: {}", e)))?;
                    loc.push_str(&text);
                }
            }
            Ok(XmlEvent::CData(c)) => {
                if let Some(loc) = current_loc.as_mut() {
                    loc.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Ok(XmlEvent::Eof) => break,
            Err(e) => {
                return Err(parse_error(format!(
                    "XML error at byte {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(parse_error("document ended inside an open element".to_string()));
    }

    match root {
        Some(Root::UrlSet) => Ok(SitemapDocument::UrlSet(locs)),
        Some(Root::Index) => Ok(SitemapDocument::Index(locs)),
        None => Err(parse_error("no root element".to_string())),
    }
}

fn root_kind(name: &[u8]) -> Result<Root, String> {
    match name {
        b"urlset" => Ok(Root::UrlSet),
        b"sitemapindex" => Ok(Root::Index),
        other => Err(format!(
            "unexpected root element <{}>",
            String::from_utf8_lossy(other)
        )),
    }
}

fn resolve(loc: &str, base: Option<&Url>) -> String {
    if let Ok(parsed) = Url::parse(loc) {
        return parsed.to_string();
    }
    match base.and_then(|b| b.join(loc).ok()) {
        Some(joined) => joined.to_string(),
        None => loc.to_string(),
    }
}
