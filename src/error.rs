//! Error types for the analysis and export pipeline

use std::fmt;

/// Errors that can occur during audio analysis or event-file export
#[derive(Debug, Clone)]
pub enum AnalysisError {
    /// Invalid input parameters
    InvalidInput(String),

    /// Audio decoding error (the waveform could not be acquired)
    DecodingError(String),

    /// Processing error during analysis
    ProcessingError(String),

    /// Numerical error (overflow, NaN, etc.)
    NumericalError(String),

    /// An exporter operation was called out of order
    ContractViolation(String),

    /// Event file serialization or write failure
    ExportError(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            AnalysisError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            AnalysisError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            AnalysisError::ContractViolation(msg) => write!(f, "Contract violation: {}", msg),
            AnalysisError::ExportError(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        AnalysisError::ExportError(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::InvalidInput(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let err = AnalysisError::ContractViolation("not initialized".to_string());
        assert_eq!(err.to_string(), "Contract violation: not initialized");

        let err = AnalysisError::DecodingError("bad header".to_string());
        assert_eq!(err.to_string(), "Decoding error: bad header");
    }

    #[test]
    fn test_io_error_maps_to_export() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AnalysisError = io.into();
        assert!(matches!(err, AnalysisError::ExportError(_)));
    }
}
