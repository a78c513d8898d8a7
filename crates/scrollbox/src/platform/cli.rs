//! Headless platform for the command line: file-backed session state and a
//! host that records what the widget did.

pub mod host;
pub mod storage;

pub use host::HeadlessHost;
pub use storage::FileStorage;
