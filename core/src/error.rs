use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Player segment '{name}' is not configured")]
    UnknownSegment { name: String },

    #[error("Player archetype '{name}' is not configured")]
    UnknownArchetype { name: String },

    #[error("Simulation duration must be at least one day")]
    ZeroDuration,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type SimResult<T> = Result<T, SimError>;
