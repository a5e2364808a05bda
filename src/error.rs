//! Error types for the leaf_scan library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for leaf_scan operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Error types for leaf analysis operations
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Image is empty, has no usable channels, or otherwise cannot be analyzed
    #[error("Invalid input image: {reason}")]
    InvalidInput { reason: String },

    /// Image file could not be loaded or decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// OpenCV operation failed
    #[error("OpenCV error: {operation}")]
    OpenCvError {
        operation: String,
        #[source]
        source: Option<opencv::Error>,
    },

    /// Writing or reading the tabular export failed
    #[error("Export failed for {}: {message}", path.display())]
    ExportError {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },
}

impl AnalysisError {
    /// Create an invalid input error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an OpenCV error with context
    pub fn opencv(operation: impl Into<String>, source: opencv::Error) -> Self {
        Self::OpenCvError {
            operation: operation.into(),
            source: Some(source),
        }
    }

    /// Create an export error with context
    pub fn export<E>(path: impl Into<PathBuf>, message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ExportError {
            path: path.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Check if this error leaves an already computed analysis usable
    ///
    /// Export failures never invalidate the analysis they were exporting.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AnalysisError::ExportError { .. })
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::InvalidInput { .. } => {
                "The image is empty or unreadable. Please choose a different leaf photo."
                    .to_string()
            }
            AnalysisError::ImageLoadError { .. } => {
                "Could not load the image. Please check the file format (JPG, PNG) and try again."
                    .to_string()
            }
            AnalysisError::ExportError { path, .. } => {
                format!(
                    "The analysis finished but results could not be saved to {}.",
                    path.display()
                )
            }
            AnalysisError::ConfigError { .. } | AnalysisError::InvalidParameter { .. } => {
                "The analysis settings are invalid. Please check the configuration file."
                    .to_string()
            }
            _ => "Leaf analysis failed. Please try with a different image.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_export_errors_are_recoverable() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        assert!(AnalysisError::export("/tmp/out.csv", "write failed", io).is_recoverable());
        assert!(!AnalysisError::invalid_input("zero width").is_recoverable());
        assert!(!AnalysisError::invalid_parameter("kernel_size", 4).is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = AnalysisError::invalid_input("image has zero width");
        assert_eq!(err.to_string(), "Invalid input image: image has zero width");

        let err = AnalysisError::invalid_parameter("texture.distance", 0);
        assert_eq!(err.to_string(), "Invalid parameter: texture.distance = 0");
    }

    #[test]
    fn test_user_message_mentions_export_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = AnalysisError::export("results/run.csv", "create failed", io);
        assert!(err.user_message().contains("results/run.csv"));
    }
}
