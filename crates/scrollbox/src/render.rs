//! Sidebar markup rendering.
//!
//! Produces the nested list structure the site stylesheet expects:
//!
//! ```text
//! <ol class="chapter">
//!   <li class="chapter-item"><a href="..">Home</a></li>
//!   <li class="part-title">Guide</li>
//!   <li class="chapter-item expanded">
//!     <a href="..">guide</a><a class="toggle"><div>❱</div></a>
//!   </li>
//!   <li><ol class="section"> ..children.. </ol></li>
//! </ol>
//! ```
//!
//! Links and toggles carry `data-entry` / `data-section` attributes holding
//! the `EntryId`, which is how DOM events are mapped back to tree entries.

use std::fmt::Write;

use crate::active::SidebarState;
use crate::link::localize;
use crate::tree::{EntryId, NavigationEntry, NavigationTree};

/// Glyph inside every section toggle.
pub const TOGGLE_GLYPH: &str = "❱";

/// One clickable link in the rendered markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLink {
    pub entry: EntryId,
    /// Localized href as written into the markup.
    pub href: String,
}

/// Result of rendering a tree for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSidebar {
    pub html: String,
    /// Clickable links in document order.
    pub links: Vec<RenderedLink>,
    /// Sections that received a toggle control.
    pub toggles: Vec<EntryId>,
}

/// Render `tree` with hrefs re-anchored at `root_path` and `state` applied
/// as `active` / `expanded` classes.
pub fn render(tree: &NavigationTree, root_path: &str, state: &SidebarState) -> RenderedSidebar {
    let mut renderer = Renderer {
        root_path,
        state,
        next_id: 0,
        out: RenderedSidebar {
            html: String::new(),
            links: Vec::new(),
            toggles: Vec::new(),
        },
    };
    renderer.list("chapter", tree.entries());
    renderer.out
}

/// Render the bare template: no localization, nothing active.
pub fn render_template(tree: &NavigationTree) -> RenderedSidebar {
    render(tree, "", &SidebarState::default())
}

struct Renderer<'a> {
    root_path: &'a str,
    state: &'a SidebarState,
    next_id: usize,
    out: RenderedSidebar,
}

impl Renderer<'_> {
    fn list(&mut self, class: &str, entries: &[NavigationEntry]) {
        let _ = write!(self.out.html, r#"<ol class="{class}">"#);
        for entry in entries {
            self.entry(entry);
        }
        self.out.html.push_str("</ol>");
    }

    fn entry(&mut self, entry: &NavigationEntry) {
        let id = EntryId(self.next_id);
        self.next_id += 1;

        match entry {
            NavigationEntry::Header { label } => {
                let _ = write!(self.out.html, r#"<li class="part-title">{}</li>"#, escape_html(label));
            }
            NavigationEntry::Spacer => {
                self.out.html.push_str(r#"<li class="spacer"></li>"#);
            }
            NavigationEntry::Link { label, href, number } => {
                self.open_item(id);
                self.anchor(id, href, number.as_deref(), label);
                self.out.html.push_str("</li>");
            }
            NavigationEntry::Draft { label, number } => {
                self.open_item(id);
                self.label_div(number.as_deref(), label);
                self.out.html.push_str("</li>");
            }
            NavigationEntry::Section { label, href, number, children } => {
                self.open_item(id);
                match href {
                    Some(href) => self.anchor(id, href, number.as_deref(), label),
                    None => self.label_div(number.as_deref(), label),
                }
                let _ = write!(
                    self.out.html,
                    r#"<a class="toggle" data-section="{id}"><div>{TOGGLE_GLYPH}</div></a></li>"#
                );
                self.out.toggles.push(id);
                self.out.html.push_str("<li>");
                self.list("section", children);
                self.out.html.push_str("</li>");
            }
        }
    }

    fn open_item(&mut self, id: EntryId) {
        if self.state.is_expanded(id) {
            self.out.html.push_str(r#"<li class="chapter-item expanded">"#);
        } else {
            self.out.html.push_str(r#"<li class="chapter-item">"#);
        }
    }

    fn anchor(&mut self, id: EntryId, href: &str, number: Option<&str>, label: &str) {
        let href = localize(href, self.root_path);
        let class = if self.state.is_active(id) { r#" class="active""# } else { "" };
        let _ = write!(
            self.out.html,
            r#"<a href="{}" data-entry="{id}"{class}>"#,
            escape_html(&href)
        );
        self.number(number);
        self.out.html.push_str(&escape_html(label));
        self.out.html.push_str("</a>");
        self.out.links.push(RenderedLink { entry: id, href });
    }

    fn label_div(&mut self, number: Option<&str>, label: &str) {
        self.out.html.push_str("<div>");
        self.number(number);
        self.out.html.push_str(&escape_html(label));
        self.out.html.push_str("</div>");
    }

    fn number(&mut self, number: Option<&str>) {
        if let Some(number) = number {
            let _ = write!(
                self.out.html,
                r#"<strong aria-hidden="true">{}</strong> "#,
                escape_html(number)
            );
        }
    }
}

/// Escape text for use in element content and quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
