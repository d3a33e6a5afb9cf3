//! Client-side orchestration over the pure rules engine
//!
//! - [`clock`]: where `now` comes from
//! - [`sync`]: the [`MatchSync`] seam and the single-player backend
//! - [`liveness`]: heartbeat writes and opponent-timeout claims
//! - [`session`]: one participant's optimistic view plus the per-tick loop
//! - [`place`]: placement rejections and the greedy placement search

pub mod clock;
pub mod liveness;
pub mod place;
pub mod session;
pub mod sync;

pub use gridlock_core as core;
pub use gridlock_types as types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use liveness::{LivenessMonitor, LivenessReport};
pub use place::{best_placement, PlaceError, Placement};
pub use session::{merge_snapshot, ClientSession, TickReport};
pub use sync::{LocalSync, MatchSync, SyncError};
