use thiserror::Error;

/// Errors raised by the raster surface
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Invalid surface dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Failed to encode surface: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Failed to decode surface image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Font '{0}' is not available")]
    FontUnavailable(String),
}

/// Result type for surface operations
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Errors raised while moving through the undo/redo history
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Failed to capture snapshot: {0}")]
    Capture(#[source] SurfaceError),

    #[error("Failed to restore snapshot: {0}")]
    Restore(#[source] SurfaceError),
}

/// Result type for history operations
pub type HistoryResult<T> = Result<T, HistoryError>;

/// Errors raised while producing an exported image
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Export scale must be positive, got {0}")]
    InvalidScale(f32),

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors raised while loading a session configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while setting up a drawing session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Result type for session setup
pub type SessionResult<T> = Result<T, SessionError>;
