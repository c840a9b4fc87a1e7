//! Crate error type.
//!
//! Load and parse failures are fatal during init: the barrier aborts and no
//! draw hook runs. Configuration problems never surface here; bad config
//! values fall back to their defaults instead.

use crate::plugins::PluginId;

#[derive(Debug, thiserror::Error)]
pub enum PlanetError {
    #[error("could not load world file {path}: {source}")]
    WorldLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse world file {path}: {source}")]
    WorldParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("topology has no object named '{0}'")]
    MissingObject(String),
    #[error("topology arc index {0} out of range")]
    ArcIndex(i64),
    #[error("plugin state not registered: {0:?}")]
    MissingPlugin(PluginId),
    #[error("unknown plugin: {0}")]
    UnknownPlugin(String),
    #[error("planet has not finished initializing")]
    NotStarted,
    #[error("planet initialization failed earlier")]
    InitFailed,
    #[error("surface call failed: {0}")]
    Surface(String),
}
