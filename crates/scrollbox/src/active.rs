//! Active-entry resolution and the expanded-section set.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::link::{LinkResolver, localize, normalize_current_page};
use crate::tree::{EntryId, NavigationTree};

/// Per-page interaction state of the sidebar.
///
/// Recomputed from scratch on every attachment; nothing here is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SidebarState {
    pub active: Option<EntryId>,
    pub expanded: BTreeSet<EntryId>,
}

impl SidebarState {
    /// Locate the entry for `current_page` and expand its section chain.
    pub fn resolve(tree: &NavigationTree, root_path: &str, current_page: &str) -> Self {
        let active = resolve_active(tree, root_path, current_page);
        let expanded = active
            .map(|id| expansion_chain(tree, id))
            .unwrap_or_default();
        Self { active, expanded }
    }

    pub fn is_active(&self, id: EntryId) -> bool {
        self.active == Some(id)
    }

    pub fn is_expanded(&self, id: EntryId) -> bool {
        self.expanded.contains(&id)
    }

    /// Flip one section; returns the new expanded flag.
    pub fn toggle(&mut self, id: EntryId) -> bool {
        if self.expanded.remove(&id) {
            false
        } else {
            self.expanded.insert(id);
            true
        }
    }
}

/// First link, in document order, pointing at `current_page`.
///
/// The first link of the tree additionally aliases any `/index.html` page
/// when rendered at the site root (`root_path` empty): the book's index page
/// is the first chapter.
pub fn resolve_active(tree: &NavigationTree, root_path: &str, current_page: &str) -> Option<EntryId> {
    let normalized = normalize_current_page(current_page);
    let resolver = LinkResolver::new(&normalized);
    let current_page = resolver.page().map(str::to_string).unwrap_or(normalized);

    let active = tree
        .links()
        .into_iter()
        .enumerate()
        .find_map(|(index, (id, href))| {
            let resolved = resolver.resolve(&localize(href, root_path));
            let index_alias = index == 0 && root_path.is_empty() && current_page.ends_with("/index.html");
            (resolved == current_page || index_alias).then_some(id)
        });

    match active {
        Some(id) => log::debug!("active entry {id} for {current_page}"),
        None => log::debug!("no sidebar entry matches {current_page}"),
    }
    active
}

/// Sections to expand so that `id` is visible.
///
/// Includes `id` itself when it is a section, then every enclosing section
/// up to the root.
pub fn expansion_chain(tree: &NavigationTree, id: EntryId) -> BTreeSet<EntryId> {
    let mut chain: BTreeSet<EntryId> = tree.ancestors(id).collect();
    if tree.is_section(id) {
        chain.insert(id);
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::tests::{header, link, sample_tree, section};

    const BOOK: &str = "https://docs.example/book/";

    #[test]
    fn nested_page_activates_and_expands_chain() {
        let tree = sample_tree();
        let state = SidebarState::resolve(
            &tree,
            "../../",
            &format!("{BOOK}guide/advanced/tuning.html"),
        );
        assert_eq!(state.active, Some(EntryId(5)));
        assert_eq!(
            state.expanded.into_iter().collect::<Vec<_>>(),
            vec![EntryId(2), EntryId(4)]
        );
    }

    #[test]
    fn active_section_expands_itself() {
        let tree = sample_tree();
        let state = SidebarState::resolve(&tree, "../", &format!("{BOOK}guide/index.html"));
        assert_eq!(state.active, Some(EntryId(2)));
        assert!(state.is_expanded(EntryId(2)));
        assert!(!state.is_expanded(EntryId(4)));
    }

    #[test]
    fn trailing_slash_matches_index() {
        let tree = sample_tree();
        let with_slash = SidebarState::resolve(&tree, "../", &format!("{BOOK}guide/"));
        let with_index = SidebarState::resolve(&tree, "../", &format!("{BOOK}guide/index.html"));
        assert_eq!(with_slash, with_index);
        assert_eq!(with_slash.active, Some(EntryId(2)));
    }

    #[test]
    fn first_link_aliases_index_at_root() {
        // The only link sits two sections deep and is therefore link 0.
        let tree = NavigationTree::new(vec![
            header("Docs"),
            section(
                "outer",
                None,
                vec![section("inner", None, vec![link("Guide", "guide/index.html")])],
            ),
        ]);
        let state = SidebarState::resolve(&tree, "", "https://docs.example/guide/index.html");
        assert_eq!(state.active, Some(EntryId(3)));
        assert_eq!(
            state.expanded.into_iter().collect::<Vec<_>>(),
            vec![EntryId(1), EntryId(2)]
        );
    }

    #[test]
    fn index_alias_requires_empty_root() {
        let tree = sample_tree();
        let state = SidebarState::resolve(&tree, "../", &format!("{BOOK}other/index.html"));
        assert_eq!(state.active, None);
    }

    #[test]
    fn index_alias_only_applies_to_first_link() {
        let tree = NavigationTree::new(vec![
            link("Introduction", "intro.html"),
            link("Index", "index.html"),
        ]);
        let state = SidebarState::resolve(&tree, "", &format!("{BOOK}index.html"));
        assert_eq!(state.active, Some(EntryId(0)));
    }

    #[test]
    fn unmatched_page_leaves_everything_collapsed() {
        let tree = sample_tree();
        let state = SidebarState::resolve(&tree, "", &format!("{BOOK}missing.html"));
        assert_eq!(state, SidebarState::default());
    }

    #[test]
    fn first_match_wins() {
        let tree = NavigationTree::new(vec![
            link("Home", "index.html"),
            link("Again", "faq.html"),
            link("Duplicate", "faq.html"),
        ]);
        let state = SidebarState::resolve(&tree, "", &format!("{BOOK}faq.html"));
        assert_eq!(state.active, Some(EntryId(1)));
    }

    #[test]
    fn non_canonical_page_url_still_matches() {
        let tree = sample_tree();
        let state = SidebarState::resolve(&tree, "", "https://Docs.Example/book/faq.html");
        assert_eq!(state.active, Some(EntryId(6)));
    }

    #[test]
    fn toggle_flips_only_its_section() {
        let tree = sample_tree();
        let mut state = SidebarState::resolve(
            &tree,
            "../../",
            &format!("{BOOK}guide/advanced/tuning.html"),
        );
        assert!(!state.toggle(EntryId(4)));
        assert!(state.is_expanded(EntryId(2)));
        assert!(!state.is_expanded(EntryId(4)));
        assert!(state.toggle(EntryId(4)));
        assert!(state.is_expanded(EntryId(4)));
        assert_eq!(state.active, Some(EntryId(5)));
    }
}
