use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use scrollbox::platform::cli::{FileStorage, HeadlessHost};
use scrollbox::{
    EntryId, NavigationEntry, NavigationTree, ScrollSlot, ScrollboxConfig, SidebarEvent, SidebarState, SidebarWidget,
};

#[derive(Parser)]
#[command(name = "scrollbox")]
#[command(about = "Render and exercise the documentation sidebar outside a browser")]
struct Cli {
    /// TOML file overriding element name, storage key and root path global
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the sidebar markup for one page
    Render {
        /// Path to the navigation tree JSON
        #[arg(long)]
        tree: PathBuf,
        /// Relative path from the page back to the site root
        #[arg(long, default_value = "")]
        root: String,
        /// Full URL of the page; marks the active entry when given
        #[arg(long)]
        current: Option<String>,
    },
    /// Attach the sidebar as a page load would and report the outcome
    Visit {
        #[arg(long)]
        tree: PathBuf,
        #[arg(long, default_value = "")]
        root: String,
        #[arg(long)]
        current: String,
        /// Directory holding session state between invocations
        #[arg(long, default_value = ".scrollbox-session")]
        state: PathBuf,
    },
    /// Load a page, scroll the sidebar, then click one of its links
    Click {
        #[arg(long)]
        tree: PathBuf,
        #[arg(long, default_value = "")]
        root: String,
        #[arg(long)]
        current: String,
        /// Entry id of the clicked link
        #[arg(long)]
        entry: usize,
        /// Sidebar scroll offset at click time
        #[arg(long, default_value_t = 0)]
        scroll_top: i32,
        #[arg(long, default_value = ".scrollbox-session")]
        state: PathBuf,
    },
    /// Load a page, then click section toggles in order
    Toggle {
        #[arg(long)]
        tree: PathBuf,
        #[arg(long, default_value = "")]
        root: String,
        #[arg(long)]
        current: String,
        /// Entry ids of the toggled sections; repeat to click several
        #[arg(long = "section", required = true)]
        sections: Vec<usize>,
        #[arg(long, default_value = ".scrollbox-session")]
        state: PathBuf,
    },
    /// Validate a navigation tree and list its entries
    Check {
        #[arg(long)]
        tree: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(error) = run(Cli::parse()) {
        eprintln!("Error: {:#}", error);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Render { tree, root, current } => {
            let tree = load_tree(&tree)?;
            let state = match current {
                Some(current) => SidebarState::resolve(&tree, &root, &current),
                None => SidebarState::default(),
            };
            println!("{}", scrollbox::render(&tree, &root, &state).html);
        }
        Commands::Visit { tree, root, current, state } => {
            let tree = Arc::new(load_tree(&tree)?);
            let widget = attach(tree, &root, &current, &state, &config);
            println!("{}", serde_json::to_string_pretty(widget.attachment())?);
        }
        Commands::Click { tree, root, current, entry, scroll_top, state } => {
            let tree = Arc::new(load_tree(&tree)?);
            let entry = EntryId(entry);
            if !tree.is_link(entry) {
                bail!("entry {} is not a link", entry);
            }
            let mut widget = attach(tree, &root, &current, &state, &config);
            widget.host_mut().scroll_top = scroll_top;
            widget.handle_event(SidebarEvent::LinkClicked(entry));
            let output = json!({
                "entry": entry,
                "href": widget.tree().get(entry).and_then(NavigationEntry::href),
                "stored": widget.slot().get(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Toggle { tree, root, current, sections, state } => {
            let tree = Arc::new(load_tree(&tree)?);
            let sections: Vec<EntryId> = sections.into_iter().map(EntryId).collect();
            if let Some(entry) = sections.iter().find(|entry| !tree.is_section(**entry)) {
                bail!("entry {} is not a section", entry);
            }
            let widget = toggle(attach(tree, &root, &current, &state, &config), &sections);
            let output = json!({
                "active": widget.state().active,
                "expanded": widget.state().expanded,
                "toggled": widget.host().toggled,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Check { tree } => {
            let tree = load_tree(&tree)?;
            check_tree(&tree);
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ScrollboxConfig> {
    let Some(path) = path else {
        return Ok(ScrollboxConfig::default());
    };
    let contents = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    ScrollboxConfig::from_toml(&contents).with_context(|| format!("parsing config {}", path.display()))
}

fn load_tree(path: &Path) -> Result<NavigationTree> {
    let json = fs::read_to_string(path).with_context(|| format!("reading tree {}", path.display()))?;
    NavigationTree::from_json(&json).with_context(|| format!("parsing tree {}", path.display()))
}

fn attach(
    tree: Arc<NavigationTree>,
    root: &str,
    current: &str,
    state_dir: &Path,
    config: &ScrollboxConfig,
) -> SidebarWidget<FileStorage, HeadlessHost> {
    let slot = ScrollSlot::with_key(FileStorage::new(state_dir.to_path_buf()), config.storage_key.clone());
    SidebarWidget::attach(tree, root, current, slot, HeadlessHost::default())
}

fn toggle(
    mut widget: SidebarWidget<FileStorage, HeadlessHost>,
    sections: &[EntryId],
) -> SidebarWidget<FileStorage, HeadlessHost> {
    for section in sections {
        widget.handle_event(SidebarEvent::ToggleClicked(*section));
    }
    widget
}

fn check_tree(tree: &NavigationTree) {
    let mut sections = 0;
    for (id, entry) in tree.walk() {
        if entry.is_section() {
            sections += 1;
        }
        println!("{}", entry_line(tree, id, entry));
    }
    println!(
        "{} entries, {} links, {} sections",
        tree.len(),
        tree.links().len(),
        sections
    );
}

fn entry_line(tree: &NavigationTree, id: EntryId, entry: &NavigationEntry) -> String {
    let indent = "  ".repeat(tree.ancestors(id).count());
    let label = entry.label().unwrap_or("-");
    match entry.href() {
        Some(href) => format!("{:>4} {}{} -> {}", id, indent, label, href),
        None => format!("{:>4} {}{}", id, indent, label),
    }
}
