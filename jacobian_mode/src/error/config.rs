use std::path::PathBuf;

/// Errors raised while loading a `ModeConfig`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    /// An environment variable holds a value that cannot be parsed.
    #[error("invalid value '{value}' for environment variable {var}")]
    Env { var: &'static str, value: String },
}
