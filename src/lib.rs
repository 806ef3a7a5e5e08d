//! pageshell: navigation, state and page-lifecycle substrate for a
//! multi-page admin panel.
//!
//! The crate is single-threaded by construction. A [`store::StateStore`]
//! holds the shared application state, the [`router::Router`] maps location
//! hashes to pages, and the [`lifecycle::PageLifecycleManager`] keeps exactly
//! one page active with ordered enter/leave hooks. [`shell::Shell`] wires
//! them together.

pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod navigation;
pub mod pages;
pub mod router;
pub mod sampler;
pub mod shell;
pub mod storage;
pub mod store;
