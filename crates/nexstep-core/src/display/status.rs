//! Status and notification messages for operation feedback.

use std::fmt;

/// Severity of an [`OperationStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Success,
    /// The operation went through, but not the way it was asked for
    Warning,
    Failure,
}

/// Wrapper type for displaying confirmations and user notifications.
pub struct OperationStatus {
    pub message: String,
    pub level: StatusLevel,
}

impl OperationStatus {
    pub fn success(message: String) -> Self {
        Self {
            message,
            level: StatusLevel::Success,
        }
    }

    pub fn warning(message: String) -> Self {
        Self {
            message,
            level: StatusLevel::Warning,
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            message,
            level: StatusLevel::Failure,
        }
    }

    pub fn is_success(&self) -> bool {
        self.level == StatusLevel::Success
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.level {
            StatusLevel::Success => "Success:",
            StatusLevel::Warning => "Warning:",
            StatusLevel::Failure => "Error:",
        };
        writeln!(f, "{label} {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_status_display() {
        let success = OperationStatus::success("Flight removed".to_string());
        assert_eq!(success.to_string(), "Success: Flight removed\n");
        assert!(success.is_success());

        let warning = OperationStatus::warning("Activity marked by hand".to_string());
        assert!(warning.to_string().starts_with("Warning:"));
        assert!(!warning.is_success());

        let failure = OperationStatus::failure("Trip has no departure".to_string());
        assert!(failure.to_string().contains("Error:"));
    }
}
