//! Table-of-contents sidebar for statically generated documentation sites.
//!
//! The sidebar is described once as a [`NavigationTree`] and rendered on
//! every page. On attachment the widget re-anchors relative links at the
//! page's root path, marks the entry for the current page as active (opening
//! every section above it) and restores the scroll offset saved by the last
//! sidebar click, or centers the active entry when there is none.

pub mod active;
pub mod config;
pub mod link;
pub mod platform;
pub mod render;
pub mod storage;
pub mod tree;
pub mod widget;

pub use active::SidebarState;
pub use config::ScrollboxConfig;
pub use render::{RenderedLink, RenderedSidebar, render};
pub use storage::{MemoryStore, SCROLL_KEY, ScrollSlot, SessionStore};
pub use tree::{EntryId, NavigationEntry, NavigationTree};
pub use widget::{Attachment, ScrollAction, SidebarEvent, SidebarHost, SidebarWidget};
