//! Host without a rendering surface.

use std::collections::BTreeMap;

use crate::render::RenderedSidebar;
use crate::tree::EntryId;
use crate::widget::SidebarHost;

/// Keeps the injected markup and scroll requests in memory.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    pub html: String,
    pub scroll_top: i32,
    pub centered: Option<EntryId>,
    /// Toggle changes applied after attachment.
    pub toggled: BTreeMap<EntryId, bool>,
}

impl SidebarHost for HeadlessHost {
    fn inject_markup(&mut self, sidebar: &RenderedSidebar) {
        self.html.clone_from(&sidebar.html);
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
        self.toggled.insert(section, expanded);
    }
}
