//! Navigation tree: the static description of the sidebar contents.
//!
//! The tree is built once (usually from a JSON literal baked in at build
//! time) and never mutated afterwards. Every entry gets an `EntryId` equal
//! to its pre-order position, so ids are stable across renders and match
//! the order in which entries appear in the rendered markup.
//!
//! ```text
//! [0] Link "Home"
//! [1] Header "Reference"
//! [2] Section "interfaces"
//!     [3] Link "IOVMClient"
//!     [4] Link "IOVMGateway"
//! [5] Link "OVMClient"
//! ```

use serde::{Deserialize, Serialize};

/// Pre-order position of an entry in its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub usize);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// A single node of the navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavigationEntry {
    /// Non-clickable part title.
    Header { label: String },
    /// Clickable leaf chapter.
    Link {
        label: String,
        href: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        number: Option<String>,
    },
    /// Collapsible chapter owning a child list.
    Section {
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        href: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        number: Option<String>,
        #[serde(default)]
        children: Vec<NavigationEntry>,
    },
    /// Chapter without a page yet.
    Draft {
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        number: Option<String>,
    },
    Spacer,
}

impl NavigationEntry {
    /// Link target, if this entry renders a clickable link.
    pub fn href(&self) -> Option<&str> {
        match self {
            NavigationEntry::Link { href, .. } => Some(href),
            NavigationEntry::Section { href, .. } => href.as_deref(),
            _ => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            NavigationEntry::Header { label }
            | NavigationEntry::Link { label, .. }
            | NavigationEntry::Section { label, .. }
            | NavigationEntry::Draft { label, .. } => Some(label),
            NavigationEntry::Spacer => None,
        }
    }

    pub fn children(&self) -> &[NavigationEntry] {
        match self {
            NavigationEntry::Section { children, .. } => children,
            _ => &[],
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(self, NavigationEntry::Section { .. })
    }
}

/// Per-entry index data computed once at construction.
#[derive(Debug, Clone)]
struct Node {
    /// Child positions from the top-level list down to this entry.
    path: Vec<usize>,
    /// Nearest enclosing section.
    parent: Option<EntryId>,
}

/// Immutable, indexed navigation tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<NavigationEntry>", into = "Vec<NavigationEntry>")]
pub struct NavigationTree {
    entries: Vec<NavigationEntry>,
    nodes: Vec<Node>,
}

impl NavigationTree {
    pub fn new(entries: Vec<NavigationEntry>) -> Self {
        let mut nodes = Vec::new();
        index_entries(&entries, &mut Vec::new(), None, &mut nodes);
        Self { entries, nodes }
    }

    /// Parse a tree from its JSON literal (an array of entries).
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Top-level entries.
    pub fn entries(&self) -> &[NavigationEntry] {
        &self.entries
    }

    /// Total number of entries at every depth.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&NavigationEntry> {
        let node = self.nodes.get(id.0)?;
        let (first, rest) = node.path.split_first()?;
        let mut entry = self.entries.get(*first)?;
        for index in rest {
            entry = entry.children().get(*index)?;
        }
        Some(entry)
    }

    /// Nearest section that owns `id` in its child list.
    pub fn parent_section(&self, id: EntryId) -> Option<EntryId> {
        self.nodes.get(id.0)?.parent
    }

    /// Enclosing sections of `id`, innermost first, up to the root.
    pub fn ancestors(&self, id: EntryId) -> impl Iterator<Item = EntryId> + '_ {
        std::iter::successors(self.parent_section(id), move |section| {
            self.parent_section(*section)
        })
    }

    /// All entries in document (pre-order) order.
    pub fn walk(&self) -> Vec<(EntryId, &NavigationEntry)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        walk_entries(&self.entries, &mut out);
        out
    }

    /// Entries that render a clickable link, in document order.
    pub fn links(&self) -> Vec<(EntryId, &str)> {
        self.walk()
            .into_iter()
            .filter_map(|(id, entry)| entry.href().map(|href| (id, href)))
            .collect()
    }

    pub fn is_section(&self, id: EntryId) -> bool {
        self.get(id).is_some_and(NavigationEntry::is_section)
    }

    pub fn is_link(&self, id: EntryId) -> bool {
        self.get(id).and_then(NavigationEntry::href).is_some()
    }
}

impl From<Vec<NavigationEntry>> for NavigationTree {
    fn from(entries: Vec<NavigationEntry>) -> Self {
        Self::new(entries)
    }
}

impl From<NavigationTree> for Vec<NavigationEntry> {
    fn from(tree: NavigationTree) -> Self {
        tree.entries
    }
}

fn index_entries(
    entries: &[NavigationEntry],
    path: &mut Vec<usize>,
    parent: Option<EntryId>,
    nodes: &mut Vec<Node>,
) {
    for (index, entry) in entries.iter().enumerate() {
        path.push(index);
        let id = EntryId(nodes.len());
        nodes.push(Node {
            path: path.clone(),
            parent,
        });
        if entry.is_section() {
            index_entries(entry.children(), path, Some(id), nodes);
        }
        path.pop();
    }
}

fn walk_entries<'a>(entries: &'a [NavigationEntry], out: &mut Vec<(EntryId, &'a NavigationEntry)>) {
    for entry in entries {
        out.push((EntryId(out.len()), entry));
        walk_entries(entry.children(), out);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn link(label: &str, href: &str) -> NavigationEntry {
        NavigationEntry::Link {
            label: label.to_string(),
            href: href.to_string(),
            number: None,
        }
    }

    pub(crate) fn section(label: &str, href: Option<&str>, children: Vec<NavigationEntry>) -> NavigationEntry {
        NavigationEntry::Section {
            label: label.to_string(),
            href: href.map(str::to_string),
            number: None,
            children,
        }
    }

    pub(crate) fn header(label: &str) -> NavigationEntry {
        NavigationEntry::Header { label: label.to_string() }
    }

    /// Home, a part title, and two nested sections.
    pub(crate) fn sample_tree() -> NavigationTree {
        NavigationTree::new(vec![
            link("Home", "index.html"),
            header("Guide"),
            section(
                "guide",
                Some("guide/index.html"),
                vec![
                    link("Install", "guide/install.html"),
                    section(
                        "advanced",
                        Some("guide/advanced/index.html"),
                        vec![link("Tuning", "guide/advanced/tuning.html")],
                    ),
                ],
            ),
            link("FAQ", "faq.html"),
        ])
    }

    #[test]
    fn ids_follow_document_order() {
        let tree = sample_tree();
        let labels: Vec<_> = tree
            .walk()
            .into_iter()
            .map(|(id, entry)| (id.0, entry.label().unwrap_or_default().to_string()))
            .collect();
        assert_eq!(
            labels,
            vec![
                (0, "Home".to_string()),
                (1, "Guide".to_string()),
                (2, "guide".to_string()),
                (3, "Install".to_string()),
                (4, "advanced".to_string()),
                (5, "Tuning".to_string()),
                (6, "FAQ".to_string()),
            ]
        );
        assert_eq!(tree.len(), 7);
    }

    #[test]
    fn get_follows_nested_paths() {
        let tree = sample_tree();
        assert_eq!(tree.get(EntryId(5)).and_then(NavigationEntry::label), Some("Tuning"));
        assert!(tree.get(EntryId(7)).is_none());
    }

    #[test]
    fn ancestors_reach_the_root() {
        let tree = sample_tree();
        let chain: Vec<_> = tree.ancestors(EntryId(5)).collect();
        assert_eq!(chain, vec![EntryId(4), EntryId(2)]);
        assert_eq!(tree.ancestors(EntryId(6)).count(), 0);
    }

    #[test]
    fn links_skip_headers() {
        let tree = sample_tree();
        let ids: Vec<_> = tree.links().into_iter().map(|(id, _)| id.0).collect();
        assert_eq!(ids, vec![0, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn json_literal_parses() {
        let tree = NavigationTree::from_json(
            r#"[
                {"kind": "link", "label": "Home", "href": "index.html"},
                {"kind": "spacer"},
                {"kind": "section", "label": "api", "children": [
                    {"kind": "draft", "label": "Soon", "number": "1.1."}
                ]}
            ]"#,
        )
        .expect("tree json");
        assert_eq!(tree.len(), 4);
        assert!(tree.is_section(EntryId(2)));
        assert_eq!(tree.parent_section(EntryId(3)), Some(EntryId(2)));
        assert!(!tree.is_link(EntryId(2)));
    }
}
