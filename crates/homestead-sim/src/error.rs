//! Error types for the headless simulator.

/// Top-level error for the simulator binary.
///
/// Each variant wraps a specific subsystem error so `main` can propagate
/// everything with `?`.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: homestead_core::ConfigError,
    },

    /// Session setup or a day advance failed.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: homestead_core::SessionError,
    },

    /// The definition catalog could not be loaded.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: homestead_world::WorldError,
    },

    /// A command-line argument was not understood.
    #[error("invalid argument {arg:?}: {reason}")]
    Args {
        /// The offending argument.
        arg: String,
        /// What is wrong with it.
        reason: String,
    },
}
