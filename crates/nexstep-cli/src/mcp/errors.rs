//! Error handling utilities for MCP server

use nexstep_core::NexstepError;
use rmcp::ErrorData;

/// Convert an agency error into an MCP error.
///
/// Errors the caller can fix by changing the request (unknown IDs, bad
/// input, a status that moved underneath them) become `invalid_params`;
/// everything else is reported as an internal error.
pub fn to_mcp_error(message: &str, error: &NexstepError) -> ErrorData {
    let text = format!("{message}: {error}");
    match error {
        NexstepError::TripNotFound { .. }
        | NexstepError::DayNotFound { .. }
        | NexstepError::ActivityNotFound { .. }
        | NexstepError::BookingNotFound { .. }
        | NexstepError::InvalidInput { .. }
        | NexstepError::StatusConflict { .. } => ErrorData::invalid_params(text, None),
        _ => ErrorData::internal_error(text, None),
    }
}

#[cfg(test)]
mod tests {
    use nexstep_core::TripStatus;
    use rmcp::model::ErrorCode;

    use super::*;

    #[test]
    fn test_not_found_is_invalid_params() {
        let error = to_mcp_error("Failed to get trip", &NexstepError::TripNotFound { id: 7 });
        assert_eq!(error.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(error.message, "Failed to get trip: Trip with ID 7 not found");
    }

    #[test]
    fn test_conflict_is_invalid_params() {
        let error = to_mcp_error(
            "Failed to set trip status",
            &NexstepError::StatusConflict {
                id: 1,
                expected: TripStatus::Upcoming,
                actual: TripStatus::Active,
            },
        );
        assert_eq!(error.code, ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn test_configuration_is_internal() {
        let error = to_mcp_error(
            "Failed to refresh",
            &NexstepError::Configuration {
                message: "no database".to_string(),
            },
        );
        assert_eq!(error.code, ErrorCode::INTERNAL_ERROR);
        assert!(error.message.contains("no database"));
    }
}
