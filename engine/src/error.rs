use thiserror::Error;

/// Failures at the document edges (bestiary files, settings, saved encounters, note text).
/// Combat-state operations themselves never fail; they degrade to "leave it as it was".
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("front-matter block is not valid YAML: {0}")]
    FrontMatter(#[source] serde_yaml::Error),

    #[error("no creature named '{0}' in the encounter")]
    CreatureNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
