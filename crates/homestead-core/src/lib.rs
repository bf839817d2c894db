//! Game clock, event subscriptions, and session orchestration for Homestead.
//!
//! This crate owns in-game time and wires the world engines to it. A
//! [`GameSession`] holds the world state, advances the [`GameClock`] one
//! day at a time, and dispatches season-change and day-change events to
//! the listeners installed by its `init_*_system` hooks.
//!
//! # Modules
//!
//! - [`clock`] -- Day counter with season derivation.
//! - [`config`] -- Configuration loading from `homestead-config.yaml` into
//!   strongly-typed structs.
//! - [`events`] -- Day and season subscriptions with unsubscribe handles.
//! - [`persist`] -- Yield ledger snapshots.
//! - [`session`] -- [`GameSession`] and the [`World`] it owns.
//!
//! [`GameSession`]: session::GameSession
//! [`World`]: session::World
//! [`GameClock`]: clock::GameClock

pub mod clock;
pub mod config;
pub mod events;
pub mod persist;
pub mod session;

pub use clock::{ClockError, DayAdvance, GameClock, SeasonChange};
pub use config::{ConfigError, GameConfig};
pub use events::{DayChanged, EventBus, EventKind, SeasonChanged, Subscription};
pub use persist::{PersistError, YieldSnapshot};
pub use session::{GameSession, SessionError, SpoilageStatus, World};
