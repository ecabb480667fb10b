//! Platform abstraction layer
//!
//! Native/browser differences live here. For now that is only where the high
//! score is kept: a JSON file on native, LocalStorage in the browser.

pub mod storage;

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStore;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorageStore;
