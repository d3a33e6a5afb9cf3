//! Grid Lock (workspace facade crate).
//!
//! Re-exports the member crates under `gridlock::{types,core,engine,adapter}` so the binary,
//! integration tests and benches depend on one package.

pub use gridlock_adapter as adapter;
pub use gridlock_core as core;
pub use gridlock_engine as engine;
pub use gridlock_types as types;
