//! Anchor location and text substitution over page HTML.
//!
//! Grid containers are located by the exact opening tag the pages carry;
//! the matching close tag is found by tracking `<div>`/`</div>` nesting
//! depth, so trailing page markup survives the replacement intact.

use crate::model::ContentDocument;
use once_cell::sync::Lazy;
use regex_lite::{Captures, Regex};

use super::fragments::escape_html;

/// Opening tag of the portfolio page's project grid.
pub const PORTFOLIO_GRID_ANCHOR: &str =
    r#"<div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6 md:gap-8">"#;

/// Opening tag of the services page's card grid.
pub const SERVICES_GRID_ANCHOR: &str =
    r#"<div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6 md:gap-8 max-w-6xl mx-auto">"#;

/// Replace the inner contents of the container whose opening tag equals
/// `anchor`. Returns None when the anchor (or a matching close tag) is not
/// present, leaving the caller to report the anchor-not-found condition.
pub fn replace_container(html: &str, anchor: &str, inner: &str) -> Option<String> {
    let start = html.find(anchor)?;
    let open_end = start + anchor.len();
    let close_start = find_container_close(html, open_end)?;

    let mut out = String::with_capacity(html.len() + inner.len());
    out.push_str(&html[..open_end]);
    out.push_str(inner);
    out.push_str(&html[close_start..]);
    Some(out)
}

/// Byte offset of the `</div>` that closes the container whose opening tag
/// ends at `from`. Positions are only taken at ASCII tag starts, so the
/// returned offset is always a valid char boundary.
fn find_container_close(html: &str, from: usize) -> Option<usize> {
    let bytes = html.as_bytes();
    let mut depth = 1usize;
    let mut i = from;

    while i < bytes.len() {
        if bytes[i..].starts_with(b"</div>") {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
            i += 6;
        } else if bytes[i..].starts_with(b"<div")
            && matches!(bytes.get(i + 4), Some(b' ') | Some(b'>') | Some(b'\t') | Some(b'\n'))
        {
            depth += 1;
            i += 4;
        } else {
            i += 1;
        }
    }
    None
}

/// The slice of the content document the global substitutions consume.
/// Empty strings count as absent, matching how the admin surface treats
/// cleared fields.
#[derive(Debug, Clone, Default)]
pub struct GlobalContent {
    pub site_title: Option<String>,
    pub meta_description: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
}

impl GlobalContent {
    pub fn from_content(content: &ContentDocument) -> Self {
        let global = content.get("global");
        let field = |key: &str| -> Option<String> {
            global
                .and_then(|g| g.get(key))
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Self {
            site_title: field("siteTitle"),
            meta_description: field("metaDescription"),
            email: field("email"),
            phone: field("phone"),
            whatsapp: field("whatsapp"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.site_title.is_none()
            && self.meta_description.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.whatsapp.is_none()
    }
}

static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<title>.*?</title>").unwrap());
static META_DESC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<meta name="description" content="[^"]*""#).unwrap());
static MAILTO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"href="mailto:[^"]*""#).unwrap());
static TEL_HREF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"href="tel:[^"]*""#).unwrap());
static TEL_INLINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"tel:\+?\d+").unwrap());
static WHATSAPP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https://wa\.me/\d+").unwrap());

/// Targeted replacement of known tag patterns. Pages without a given
/// pattern are left unchanged for that field.
pub fn apply_global(html: &str, global: &GlobalContent) -> String {
    let mut out = html.to_string();

    if let Some(title) = &global.site_title {
        let replacement = format!("<title>{}</title>", escape_html(title));
        out = TITLE_RE
            .replace_all(&out, |_: &Captures| replacement.clone())
            .into_owned();
    }

    if let Some(desc) = &global.meta_description {
        let replacement = format!(r#"<meta name="description" content="{}""#, escape_html(desc));
        out = META_DESC_RE
            .replace_all(&out, |_: &Captures| replacement.clone())
            .into_owned();
    }

    if let Some(email) = &global.email {
        let replacement = format!(r#"href="mailto:{}""#, escape_html(email));
        out = MAILTO_RE
            .replace_all(&out, |_: &Captures| replacement.clone())
            .into_owned();
    }

    if let Some(phone) = &global.phone {
        let href = format!(r#"href="tel:{}""#, escape_html(phone));
        out = TEL_HREF_RE
            .replace_all(&out, |_: &Captures| href.clone())
            .into_owned();
        let inline = format!("tel:{}", phone);
        out = TEL_INLINE_RE
            .replace_all(&out, |_: &Captures| inline.clone())
            .into_owned();
    }

    if let Some(number) = &global.whatsapp {
        let link = format!("https://wa.me/{}", number);
        out = WHATSAPP_RE
            .replace_all(&out, |_: &Captures| link.clone())
            .into_owned();
    }

    out
}
