//! The sidebar widget: attachment lifecycle and interaction events.
//!
//! # Lifecycle
//!
//! ```text
//! attach()
//!   ├── resolve active entry + expanded chain   (SidebarState::resolve)
//!   ├── render localized markup                 (render::render)
//!   ├── inject markup into the host             (SidebarHost::inject_markup)
//!   └── restore scroll                          (ScrollSlot::take)
//!         stored offset → set_scroll_top(offset)
//!         otherwise     → center_entry(active)
//!
//! handle_event()
//!   ├── LinkClicked   → ScrollSlot::set(host.scroll_top())
//!   └── ToggleClicked → SidebarState::toggle + host.set_expanded
//! ```
//!
//! The widget knows nothing about the DOM; everything rendering-specific goes
//! through `SidebarHost`, and persistence through `SessionStore`.

use std::sync::Arc;

use serde::Serialize;

use crate::active::SidebarState;
use crate::render::{RenderedSidebar, render};
use crate::storage::{ScrollSlot, SessionStore};
use crate::tree::{EntryId, NavigationTree};

/// The container element the sidebar lives in.
pub trait SidebarHost {
    /// Replace the container contents with rendered markup.
    fn inject_markup(&mut self, sidebar: &RenderedSidebar);
    /// Current vertical scroll offset of the container.
    fn scroll_top(&self) -> i32;
    fn set_scroll_top(&mut self, offset: i32);
    /// Scroll so that `entry` sits in the vertical center of the viewport.
    fn center_entry(&mut self, entry: EntryId);
    /// Reflect a section's expanded flag in the rendered markup.
    fn set_expanded(&mut self, section: EntryId, expanded: bool);
}

/// Interaction events delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarEvent {
    /// A rendered link was clicked; navigation follows.
    LinkClicked(EntryId),
    /// A section's toggle control was clicked.
    ToggleClicked(EntryId),
}

/// How the container scroll was adjusted on attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ScrollAction {
    /// Arrived via a sidebar link: the stored offset was applied.
    Restore(i32),
    /// Arrived another way: the active entry was centered.
    CenterActive(EntryId),
    /// No stored offset and nothing active.
    Unchanged,
}

/// Outcome of one attachment, for logging and inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    #[serde(flatten)]
    pub state: SidebarState,
    pub scroll: ScrollAction,
}

/// One sidebar instance for the lifetime of a page view.
pub struct SidebarWidget<S, H> {
    tree: Arc<NavigationTree>,
    state: SidebarState,
    slot: ScrollSlot<S>,
    host: H,
    attachment: Attachment,
}

impl<S: SessionStore, H: SidebarHost> SidebarWidget<S, H> {
    /// Render into `host` and restore the scroll position.
    ///
    /// `current_page` is the full URL of the page being viewed.
    pub fn attach(
        tree: Arc<NavigationTree>,
        root_path: &str,
        current_page: &str,
        mut slot: ScrollSlot<S>,
        mut host: H,
    ) -> Self {
        let state = SidebarState::resolve(&tree, root_path, current_page);
        let sidebar = render(&tree, root_path, &state);
        host.inject_markup(&sidebar);

        let scroll = match (slot.take(), state.active) {
            (Some(offset), _) => {
                host.set_scroll_top(offset);
                ScrollAction::Restore(offset)
            }
            (None, Some(active)) => {
                host.center_entry(active);
                ScrollAction::CenterActive(active)
            }
            (None, None) => ScrollAction::Unchanged,
        };
        log::debug!("sidebar attached: active {:?}, scroll {:?}", state.active, scroll);

        let attachment = Attachment {
            state: state.clone(),
            scroll,
        };
        Self {
            tree,
            state,
            slot,
            host,
            attachment,
        }
    }

    /// Single entry point for interaction events.
    ///
    /// Events naming entries of the wrong kind are ignored.
    pub fn handle_event(&mut self, event: SidebarEvent) {
        match event {
            SidebarEvent::LinkClicked(entry) => {
                if !self.tree.is_link(entry) {
                    log::debug!("ignoring click on non-link entry {entry}");
                    return;
                }
                let offset = self.host.scroll_top();
                self.slot.set(offset);
            }
            SidebarEvent::ToggleClicked(section) => {
                if !self.tree.is_section(section) {
                    log::debug!("ignoring toggle on non-section entry {section}");
                    return;
                }
                let expanded = self.state.toggle(section);
                self.host.set_expanded(section, expanded);
            }
        }
    }

    pub fn state(&self) -> &SidebarState {
        &self.state
    }

    /// What happened during `attach`.
    pub fn attachment(&self) -> &Attachment {
        &self.attachment
    }

    pub fn tree(&self) -> &NavigationTree {
        &self.tree
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn slot(&self) -> &ScrollSlot<S> {
        &self.slot
    }

    /// Tear down, handing back the session store for the next page.
    pub fn into_store(self) -> S {
        self.slot.into_store()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::storage::{MemoryStore, SCROLL_KEY};
    use crate::tree::tests::sample_tree;

    /// Host that records everything it is asked to do.
    #[derive(Debug, Default)]
    pub(crate) struct FakeHost {
        pub html: String,
        pub scroll_top: i32,
        pub centered: Option<EntryId>,
        pub expanded: BTreeMap<EntryId, bool>,
    }

    impl SidebarHost for FakeHost {
        fn inject_markup(&mut self, sidebar: &RenderedSidebar) {
            self.html = sidebar.html.clone();
        }

        fn scroll_top(&self) -> i32 {
            self.scroll_top
        }

        fn set_scroll_top(&mut self, offset: i32) {
            self.scroll_top = offset;
        }

        fn center_entry(&mut self, entry: EntryId) {
            self.centered = Some(entry);
        }

        fn set_expanded(&mut self, section: EntryId, expanded: bool) {
            self.expanded.insert(section, expanded);
        }
    }

    const TUNING: &str = "https://docs.example/book/guide/advanced/tuning.html";
    const FAQ: &str = "https://docs.example/book/faq.html";

    fn attach(store: MemoryStore, root: &str, page: &str) -> SidebarWidget<MemoryStore, FakeHost> {
        SidebarWidget::attach(
            Arc::new(sample_tree()),
            root,
            page,
            ScrollSlot::new(store),
            FakeHost::default(),
        )
    }

    #[test]
    fn attach_without_stored_offset_centers_active() {
        let widget = attach(MemoryStore::new(), "../../", TUNING);
        assert_eq!(widget.attachment().scroll, ScrollAction::CenterActive(EntryId(5)));
        assert_eq!(widget.host().centered, Some(EntryId(5)));
        assert_eq!(widget.host().scroll_top, 0);
        assert!(widget.host().html.contains(r#"class="active""#));
    }

    #[test]
    fn attach_without_anything_leaves_scroll_alone() {
        let widget = attach(MemoryStore::new(), "", "https://docs.example/book/nowhere.html");
        assert_eq!(widget.attachment().scroll, ScrollAction::Unchanged);
        assert_eq!(widget.host().centered, None);
        assert_eq!(widget.state().active, None);
    }

    #[test]
    fn click_then_next_attach_restores_once() {
        let mut widget = attach(MemoryStore::new(), "../../", TUNING);
        widget.host_mut().scroll_top = 310;
        widget.handle_event(SidebarEvent::LinkClicked(EntryId(6)));
        assert_eq!(widget.slot().get(), Some(310));

        // Next page.
        let widget = attach(widget.into_store(), "", FAQ);
        assert_eq!(widget.attachment().scroll, ScrollAction::Restore(310));
        assert_eq!(widget.host().scroll_top, 310);
        assert_eq!(widget.host().centered, None);
        assert!(widget.slot().store().get_item(SCROLL_KEY).is_none());

        // The page after that did not come from a sidebar click.
        let widget = attach(widget.into_store(), "../../", TUNING);
        assert_eq!(widget.attachment().scroll, ScrollAction::CenterActive(EntryId(5)));
    }

    /// Storage that is present but refuses every read and write.
    struct BrokenStore;

    impl SessionStore for BrokenStore {
        fn get_item(&self, _key: &str) -> Option<String> {
            None
        }

        fn set_item(&mut self, _key: &str, _value: &str) {}

        fn remove_item(&mut self, _key: &str) {}
    }

    #[test]
    fn broken_storage_always_centers_active() {
        let tree = Arc::new(sample_tree());
        let mut widget = SidebarWidget::attach(
            tree.clone(),
            "../../",
            TUNING,
            ScrollSlot::new(BrokenStore),
            FakeHost::default(),
        );
        widget.host_mut().scroll_top = 310;
        widget.handle_event(SidebarEvent::LinkClicked(EntryId(6)));
        assert_eq!(widget.slot().get(), None);

        let widget = SidebarWidget::attach(tree, "", FAQ, ScrollSlot::new(widget.into_store()), FakeHost::default());
        assert_eq!(widget.attachment().scroll, ScrollAction::CenterActive(EntryId(6)));
        assert_eq!(widget.host().centered, Some(EntryId(6)));
        assert_eq!(widget.host().scroll_top, 0);
    }

    #[test]
    fn clicks_on_non_links_are_ignored() {
        let mut widget = attach(MemoryStore::new(), "", FAQ);
        widget.host_mut().scroll_top = 99;
        widget.handle_event(SidebarEvent::LinkClicked(EntryId(1)));
        assert_eq!(widget.slot().get(), None);
    }

    #[test]
    fn toggle_flips_only_its_section() {
        let mut widget = attach(MemoryStore::new(), "../../", TUNING);
        widget.handle_event(SidebarEvent::ToggleClicked(EntryId(2)));
        assert!(!widget.state().is_expanded(EntryId(2)));
        assert!(widget.state().is_expanded(EntryId(4)));
        assert_eq!(widget.host().expanded.get(&EntryId(2)), Some(&false));
        assert_eq!(widget.host().expanded.len(), 1);

        widget.handle_event(SidebarEvent::ToggleClicked(EntryId(2)));
        assert!(widget.state().is_expanded(EntryId(2)));
        assert_eq!(widget.state().active, Some(EntryId(5)));
    }

    #[test]
    fn toggle_on_leaf_is_ignored() {
        let mut widget = attach(MemoryStore::new(), "", FAQ);
        widget.handle_event(SidebarEvent::ToggleClicked(EntryId(6)));
        assert!(widget.host().expanded.is_empty());
        assert!(widget.state().expanded.is_empty());
    }

    #[test]
    fn toggles_do_not_touch_the_scroll_slot() {
        let mut widget = attach(MemoryStore::new(), "", FAQ);
        widget.handle_event(SidebarEvent::ToggleClicked(EntryId(2)));
        assert!(widget.slot().store().is_empty());
    }
}
