//! Adapter module - multiplayer matches over a shared document store
//!
//! Two client processes play one match by reading and writing a single JSON document. There is
//! no referee process: each client writes only its own player namespace, and the shared
//! `status`/`winner` fields move through writes guarded on the current status.
//!
//! # Store Contract
//!
//! A [`DocumentStore`] supports:
//!
//! 1. **create**: insert a match record, returns its id
//! 2. **get**: point read
//! 3. **update**: partial write of dotted paths (`player1.score`), optionally guarded by a
//!    single-field equality precondition, all-or-nothing
//! 4. **query_eq**: equality query with a limit, oldest first
//! 5. **subscribe**: full-document snapshot after every committed write
//!
//! [`InMemoryStore`] implements it in-process for tests and the demo binary.
//!
//! # Match Record
//!
//! ```text
//! {
//!   "player1": {"uid": "3f2c...", "board": "0000...0110", "pieces": [{"instanceId": "9a1b...", "shapeId": "L"}, null, null],
//!               "score": 24, "incomingAttack": null, "lockedUntil": 0, "lastSeen": 1700000001000},
//!   "player2": {...},
//!   "status": "playing",
//!   "winner": null,
//!   "createdAt": 1700000000000,
//!   "startedAt": 1700000000500
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `GRIDLOCK_MODE`: `solo` (default) or `multiplayer`
//! - `GRIDLOCK_SEED`: piece generator seed
//! - `GRIDLOCK_HEARTBEAT_MS` / `GRIDLOCK_CHECK_MS`: liveness schedule
//! - `GRIDLOCK_TICK_MS`: client loop period (default: 50)
//! - `GRIDLOCK_MAX_TURNS`: placement budget of the headless bot (default: 500)
//!
//! # Implementation
//!
//! - Uses **tokio** for the store tasks; the client loop itself stays synchronous
//! - See [`protocol`] for the wire schema
//! - See [`sync`] for the write queue and snapshot forwarding
//! - See [`matchmaking`] for seat claiming

pub mod config;
pub mod identity;
pub mod matchmaking;
pub mod memory;
pub mod protocol;
pub mod runtime;
pub mod store;
pub mod sync;

pub use gridlock_core as core;
pub use gridlock_engine as engine;
pub use gridlock_types as types;

pub use config::ClientConfig;
pub use identity::{AnonymousIdentity, IdentityProvider};
pub use matchmaking::{find_match, MatchTicket, MatchmakingError, MatchmakingOutcome};
pub use memory::InMemoryStore;
pub use protocol::{decode_snapshot, update_to_fields, DecodeError, MatchRecord};
pub use runtime::MatchRuntime;
pub use store::{Document, DocumentStore, Precondition, StoreError};
pub use sync::StoreSync;
