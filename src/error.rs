//! Error handling for Strata
//!
//! Display strings are the messages the command loop prints after `[ERROR] `,
//! so they stay short and free of detail. The structured fields carry the
//! detail for logging.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Strata operations
pub type Result<T> = std::result::Result<T, StrataError>;

/// Main error type for Strata operations
#[derive(Error, Debug)]
pub enum StrataError {
    // Resource Errors
    #[error("Memory allocation failed!")]
    OutOfMemory { details: String },

    // Startup Errors
    #[error("Invalid amount of command line parameters!")]
    InvalidArgumentCount,

    #[error("Invalid canvas size specified!")]
    InvalidCanvasSize { value: String },

    #[error("Invalid configuration: {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    // Command Errors
    #[error("Command unknown!")]
    CommandUnknown { name: String },

    #[error("Wrong number of arguments!")]
    WrongArgumentCount {
        command: String,
        expected: usize,
        found: usize,
    },

    // Library Errors
    #[error("BMP ID not found!")]
    BitmapNotFound { id: String },

    // File Errors
    #[error("Cannot open file!")]
    CannotOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid file!")]
    InvalidFile { path: PathBuf, reason: String },

    #[error("Invalid file path!")]
    InvalidFilePath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Geometry Errors
    #[error("Crop coordinates are outside the BMP!")]
    OutOfRange,

    #[error("Crop coordinates do not form a valid rectangle!")]
    InvalidRectangle,

    #[error("Canvas coordinates are invalid!")]
    InvalidCoordinates,

    #[error("BMP does not fit on the canvas!")]
    DoesNotFit,

    // Layer Errors
    #[error("Invalid blend mode!")]
    InvalidBlendMode { mode: String },

    #[error("Already at root layer!")]
    AlreadyAtRoot,

    #[error("Layer ID not found!")]
    LayerNotFound { id: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StrataError {
    /// Build an `OutOfMemory` error from a failed reservation.
    pub fn out_of_memory(what: &str, err: std::collections::TryReserveError) -> Self {
        StrataError::OutOfMemory {
            details: format!("{}: {}", what, err),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            StrataError::OutOfMemory { .. } => "OUT_OF_MEMORY",
            StrataError::InvalidArgumentCount => "INVALID_ARGUMENT_COUNT",
            StrataError::InvalidCanvasSize { .. } => "INVALID_CANVAS_SIZE",
            StrataError::Config { .. } => "CONFIG_ERROR",
            StrataError::CommandUnknown { .. } => "COMMAND_UNKNOWN",
            StrataError::WrongArgumentCount { .. } => "WRONG_ARGUMENT_COUNT",
            StrataError::BitmapNotFound { .. } => "BITMAP_NOT_FOUND",
            StrataError::CannotOpen { .. } => "CANNOT_OPEN",
            StrataError::InvalidFile { .. } => "INVALID_FILE",
            StrataError::InvalidFilePath { .. } => "INVALID_FILE_PATH",
            StrataError::OutOfRange => "OUT_OF_RANGE",
            StrataError::InvalidRectangle => "INVALID_RECTANGLE",
            StrataError::InvalidCoordinates => "INVALID_COORDINATES",
            StrataError::DoesNotFit => "DOES_NOT_FIT",
            StrataError::InvalidBlendMode { .. } => "INVALID_BLEND_MODE",
            StrataError::AlreadyAtRoot => "ALREADY_AT_ROOT",
            StrataError::LayerNotFound { .. } => "LAYER_NOT_FOUND",
            StrataError::Io(_) => "IO_ERROR",
        }
    }

    /// Check if the session can keep accepting commands after this error.
    ///
    /// Only allocation failure ends a session. Failures writing to the
    /// terminal itself never reach here; the loop propagates them directly.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, StrataError::OutOfMemory { .. })
    }

    /// Process exit status used when this error ends the program
    pub fn exit_code(&self) -> i32 {
        match self {
            StrataError::InvalidArgumentCount => 2,
            StrataError::InvalidCanvasSize { .. } => 3,
            _ => 1,
        }
    }

    /// Returns a user-friendly recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StrataError::CommandUnknown { .. } => Some("Type 'help' for the list of commands."),
            StrataError::CannotOpen { .. } => Some("Check the file path and try again."),
            StrataError::InvalidFile { .. } => {
                Some("Only uncompressed 32-bit BMP files can be loaded.")
            }
            StrataError::BitmapNotFound { .. } => Some("Use 'bmps' to list the loaded bitmaps."),
            StrataError::LayerNotFound { .. } => Some("Use 'tree' to list the layers."),
            StrataError::DoesNotFit => Some("Crop the bitmap or place it further up and left."),
            StrataError::InvalidBlendMode { .. } => {
                Some("Blend modes are n (normal), m (multiply) and s (difference).")
            }
            _ => None,
        }
    }
}
