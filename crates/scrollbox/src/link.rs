//! Link localization and URL comparison.
//!
//! The same tree markup is reused at every directory depth of the site, so
//! relative targets are re-anchored with the page's root path. Comparison
//! against the current page happens on fully resolved URLs, the same value a
//! browser reports for `anchor.href`.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Matches `scheme://` and protocol-relative `//` targets.
static ABSOLUTE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[a-z+]+:)?//").unwrap());

/// Whether `href` should be re-anchored against the root path.
pub fn is_relative(href: &str) -> bool {
    !href.starts_with('#') && !ABSOLUTE_URL.is_match(href)
}

/// Prefix a relative target with `root_path`; leave others untouched.
pub fn localize(href: &str, root_path: &str) -> String {
    if is_relative(href) {
        format!("{root_path}{href}")
    } else {
        href.to_string()
    }
}

/// Canonical form of the current page URL used for matching.
///
/// A directory URL (`.../guide/`) stands for its `index.html`.
pub fn normalize_current_page(url: &str) -> String {
    if url.ends_with('/') {
        format!("{url}index.html")
    } else {
        url.to_string()
    }
}

/// Resolves rendered hrefs against the page they appear on.
#[derive(Debug, Clone)]
pub struct LinkResolver {
    base: Option<Url>,
}

impl LinkResolver {
    /// `page_url` is the address of the page hosting the sidebar.
    ///
    /// When it is not an absolute URL (e.g. a bare path handed to the CLI),
    /// hrefs are compared verbatim.
    pub fn new(page_url: &str) -> Self {
        let base = match Url::parse(page_url) {
            Ok(url) => Some(url),
            Err(error) => {
                log::debug!("page url {page_url:?} is not absolute ({error}), comparing hrefs verbatim");
                None
            }
        };
        Self { base }
    }

    /// Canonical serialization of the page URL, when it parsed.
    pub fn page(&self) -> Option<&str> {
        self.base.as_ref().map(Url::as_str)
    }

    /// Absolute form of `href`, as a browser would report it.
    pub fn resolve(&self, href: &str) -> String {
        match &self.base {
            Some(base) => base
                .join(href)
                .map(String::from)
                .unwrap_or_else(|_| href.to_string()),
            None => href.to_string(),
        }
    }
}
