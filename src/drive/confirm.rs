//! Parsing of the HTML pages Drive serves instead of file content.
//!
//! Files above the virus-scan size limit come back as a warning page with a
//! form (or, on older frontends, a link) that leads to the real download.
//! Private or quota-limited files come back as an error page.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

/// What an HTML response from Drive turned out to be.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Interstitial {
    /// Request this URL next.
    Next(Url),
    /// Drive explained why the file cannot be downloaded.
    Error(String),
    /// Nothing recognizable on the page.
    Unknown,
}

fn form_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?is)<form\b[^>]*\bid\s*=\s*"download-form"[^>]*>(.*?)</form>"#).unwrap()
    })
}

fn form_open_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"(?is)<form\b[^>]*\bid\s*=\s*"download-form"[^>]*>"#).unwrap())
}

fn input_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?is)<input\b[^>]*>").unwrap())
}

fn attr_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"(?is)\b([a-z-]+)\s*=\s*"([^"]*)""#).unwrap())
}

fn confirm_href_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"href="(/uc\?export=download[^"]+)""#).unwrap())
}

fn download_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#""downloadUrl":"([^"]+)""#).unwrap())
}

fn error_caption_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?is)<p class="uc-error-subcaption">(.*?)</p>"#).unwrap()
    })
}

/// Work out where to go from an HTML page served at `page_url`.
pub fn parse_interstitial(html: &str, page_url: &Url) -> Interstitial {
    if let Some(next) = next_from_form(html, page_url) {
        return Interstitial::Next(next);
    }

    if let Some(href) = confirm_href_pattern()
        .captures(html)
        .and_then(|caps| caps.get(1))
    {
        if let Ok(next) = page_url.join(&unescape_html(href.as_str())) {
            return Interstitial::Next(next);
        }
    }

    if let Some(raw) = download_url_pattern()
        .captures(html)
        .and_then(|caps| caps.get(1))
    {
        let decoded = raw
            .as_str()
            .replace("\\u003d", "=")
            .replace("\\u0026", "&")
            .replace("\\/", "/");
        if let Ok(next) = Url::parse(&decoded) {
            return Interstitial::Next(next);
        }
    }

    if let Some(caption) = error_caption_pattern()
        .captures(html)
        .and_then(|caps| caps.get(1))
    {
        let text = strip_tags(caption.as_str());
        if !text.is_empty() {
            return Interstitial::Error(text);
        }
    }

    Interstitial::Unknown
}

fn next_from_form(html: &str, page_url: &Url) -> Option<Url> {
    let open_tag = form_open_tag_pattern().find(html)?;
    let action = attributes(open_tag.as_str())
        .into_iter()
        .find(|(name, _)| name == "action")
        .map(|(_, value)| value)?;

    let mut next = page_url.join(&action).ok()?;

    let body = form_tag_pattern()
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or_default();

    let hidden: Vec<(String, String)> = input_tag_pattern()
        .find_iter(body)
        .filter_map(|input| {
            let attrs = attributes(input.as_str());
            let is_hidden = attrs
                .iter()
                .any(|(name, value)| name == "type" && value.eq_ignore_ascii_case("hidden"));
            if !is_hidden {
                return None;
            }
            let name = attrs.iter().find(|(n, _)| n == "name")?.1.clone();
            let value = attrs
                .iter()
                .find(|(n, _)| n == "value")
                .map(|(_, v)| v.clone())
                .unwrap_or_default();
            Some((name, value))
        })
        .collect();

    if !hidden.is_empty() {
        let mut query = next.query_pairs_mut();
        for (name, value) in &hidden {
            query.append_pair(name, value);
        }
    }

    Some(next)
}

fn attributes(tag: &str) -> Vec<(String, String)> {
    attr_pattern()
        .captures_iter(tag)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = unescape_html(caps.get(2)?.as_str());
            Some((name, value))
        })
        .collect()
}

fn unescape_html(value: &str) -> String {
    value
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}

fn strip_tags(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    unescape_html(out.split_whitespace().collect::<Vec<_>>().join(" ").as_str())
}
