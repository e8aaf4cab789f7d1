//! Platform abstraction layer
//!
//! Browser glue for the wasm page:
//! - Cancelable event listeners (removed on drop)
//! - Media queries and window metrics
//! - LocalStorage snapshot cache and the embedded feed source
//!
//! Everything here is `wasm32`-only; the engine never calls into it.

#[cfg(target_arch = "wasm32")]
pub mod listener;
#[cfg(target_arch = "wasm32")]
pub mod media;
#[cfg(target_arch = "wasm32")]
pub mod storage;

#[cfg(target_arch = "wasm32")]
pub use listener::EventListener;
#[cfg(target_arch = "wasm32")]
pub use storage::{LocalStorageCache, ScriptTagSource};
