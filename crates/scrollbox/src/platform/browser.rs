//! Browser platform: custom element registration, `sessionStorage` and the
//! DOM scroll container.
//!
//! ```rust,ignore
//! #[wasm_bindgen(start)]
//! pub fn start() -> Result<(), JsValue> {
//!     let tree = NavigationTree::from_json(include_str!("toc.json")).unwrap();
//!     scrollbox::platform::browser::register(Arc::new(tree), ScrollboxConfig::default())
//! }
//! ```
//!
//! Host pages then embed `<mdbook-sidebar-scrollbox>` inside the sidebar and
//! define the `path_to_root` global before the element connects.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Element, Event, HtmlElement, ScrollIntoViewOptions, ScrollLogicalPosition, Storage,
};

use crate::config::ScrollboxConfig;
use crate::render::RenderedSidebar;
use crate::storage::{ScrollSlot, SessionStore};
use crate::tree::{EntryId, NavigationTree};
use crate::widget::{SidebarEvent, SidebarHost, SidebarWidget};

#[wasm_bindgen(inline_js = r#"
export function define_element(name, on_connected) {
    customElements.define(name, class extends HTMLElement {
        connectedCallback() {
            on_connected(this);
        }
    });
}
"#)]
extern "C" {
    #[wasm_bindgen(catch)]
    fn define_element(name: &str, on_connected: &js_sys::Function) -> Result<(), JsValue>;
}

type BrowserWidget = SidebarWidget<BrowserSessionStore, DomHost>;

/// Register the sidebar custom element under `config.element_name`.
///
/// Fails when the name is already taken.
pub fn register(tree: Arc<NavigationTree>, config: ScrollboxConfig) -> Result<(), JsValue> {
    let element_name = config.element_name.clone();
    let on_connected = Closure::<dyn FnMut(HtmlElement)>::new(move |element: HtmlElement| {
        connect(element, tree.clone(), &config);
    });
    define_element(&element_name, on_connected.as_ref().unchecked_ref())?;
    // The element class lives as long as the page.
    on_connected.forget();
    Ok(())
}

/// `connectedCallback` body: attach the widget and install its listeners.
fn connect(element: HtmlElement, tree: Arc<NavigationTree>, config: &ScrollboxConfig) {
    let root_path = read_root_path(&config.root_path_global);
    let current_page = web_sys::window()
        .and_then(|window| window.location().href().ok())
        .unwrap_or_default();
    let slot = ScrollSlot::with_key(BrowserSessionStore::new(), config.storage_key.clone());
    let host = DomHost {
        element: element.clone(),
        toggles: Vec::new(),
    };

    let widget = Rc::new(RefCell::new(SidebarWidget::attach(
        tree,
        &root_path,
        &current_page,
        slot,
        host,
    )));

    install_link_listener(&element, &widget);
    let toggles = std::mem::take(&mut widget.borrow_mut().host_mut().toggles);
    for (section, toggle) in toggles {
        install_toggle_listener(&toggle, section, &widget);
    }
}

fn read_root_path(global: &str) -> String {
    let Some(window) = web_sys::window() else {
        return String::new();
    };
    js_sys::Reflect::get(&window, &JsValue::from_str(global))
        .ok()
        .and_then(|value| value.as_string())
        .unwrap_or_default()
}

/// One delegated, passive listener records the scroll offset before any
/// sidebar link navigates away.
fn install_link_listener(element: &HtmlElement, widget: &Rc<RefCell<BrowserWidget>>) {
    let widget = widget.clone();
    let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        // Clicks may land on the section number or label inside the anchor.
        let Some(link) = target.closest("a[data-entry]").ok().flatten() else {
            return;
        };
        if let Some(entry) = entry_attribute(&link, "data-entry") {
            widget.borrow_mut().handle_event(SidebarEvent::LinkClicked(entry));
        }
    });

    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    if let Err(error) = element.add_event_listener_with_callback_and_add_event_listener_options(
        "click",
        on_click.as_ref().unchecked_ref(),
        &options,
    ) {
        log::warn!("cannot install sidebar click listener: {error:?}");
    }
    on_click.forget();
}

fn install_toggle_listener(toggle: &Element, section: EntryId, widget: &Rc<RefCell<BrowserWidget>>) {
    let widget = widget.clone();
    let on_click = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
        widget.borrow_mut().handle_event(SidebarEvent::ToggleClicked(section));
    });
    if let Err(error) = toggle.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref()) {
        log::warn!("cannot install toggle listener for section {section}: {error:?}");
    }
    on_click.forget();
}

fn entry_attribute(element: &Element, name: &str) -> Option<EntryId> {
    element.get_attribute(name)?.parse().ok().map(EntryId)
}

// ═══════════════════════════════════════════════════════════════════════════
// sessionStorage
// ═══════════════════════════════════════════════════════════════════════════

/// `window.sessionStorage`, or nothing when the page may not use it.
pub struct BrowserSessionStore {
    storage: Option<Storage>,
}

impl BrowserSessionStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|window| match window.session_storage() {
            Ok(storage) => storage,
            Err(error) => {
                log::warn!("sessionStorage unavailable: {error:?}");
                None
            }
        });
        Self { storage }
    }
}

impl Default for BrowserSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for BrowserSessionStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok()?
    }

    fn set_item(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if let Err(error) = storage.set_item(key, value) {
                log::warn!("cannot store {key:?}: {error:?}");
            }
        }
    }

    fn remove_item(&mut self, key: &str) {
        if let Some(storage) = &self.storage {
            let _ = storage.remove_item(key);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// DOM host
// ═══════════════════════════════════════════════════════════════════════════

/// The custom element itself acts as the scroll container.
pub struct DomHost {
    element: HtmlElement,
    /// Toggle controls found after injection, handed to listener setup.
    toggles: Vec<(EntryId, Element)>,
}

impl DomHost {
    fn find(&self, selector: &str) -> Option<Element> {
        self.element.query_selector(selector).ok().flatten()
    }

    fn toggle(&self, section: EntryId) -> Option<Element> {
        self.find(&format!(r#"a.toggle[data-section="{section}"]"#))
    }
}

impl SidebarHost for DomHost {
    fn inject_markup(&mut self, sidebar: &RenderedSidebar) {
        self.element.set_inner_html(&sidebar.html);
        self.toggles = sidebar
            .toggles
            .iter()
            .filter_map(|section| Some((*section, self.toggle(*section)?)))
            .collect();
    }

    fn scroll_top(&self) -> i32 {
        self.element.scroll_top()
    }

    fn set_scroll_top(&mut self, offset: i32) {
        self.element.set_scroll_top(offset);
    }

    fn center_entry(&mut self, entry: EntryId) {
        if let Some(link) = self.find(&format!(r#"a[data-entry="{entry}"]"#)) {
            let options = ScrollIntoViewOptions::new();
            options.set_block(ScrollLogicalPosition::Center);
            link.scroll_into_view_with_scroll_into_view_options(&options);
        }
    }

    fn set_expanded(&mut self, section: EntryId, expanded: bool) {
        let Some(item) = self.toggle(section).and_then(|toggle| toggle.parent_element()) else {
            return;
        };
        let _ = item.class_list().toggle_with_force("expanded", expanded);
    }
}
