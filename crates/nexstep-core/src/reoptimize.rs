//! Boundary to the external activity re-optimization service.
//!
//! When an issue is reported against an activity, the remaining itinerary
//! can be handed to an external re-planner. The service is opaque: it gets a
//! [`DisruptionRequest`] as JSON and answers with a JSON payload that
//! [`parse_reoptimization`] turns into a list of [`ActivityRevision`]s.
//!
//! Accepted payloads:
//!
//! ```json
//! {"success": true, "activities": [{"id": 3, "time": "14:30", "title": "Museum"}]}
//! {"success": false, "message": "No alternative found"}
//! ```

use std::{process::Stdio, time::Duration};

use async_trait::async_trait;
use jiff::civil::Time;
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::{io::AsyncWriteExt, process::Command, time::timeout};

use crate::{
    error::{NexstepError, Result},
    models::Activity,
    params::parse_time,
};

/// How long an external re-optimizer may run before it is abandoned.
pub const DEFAULT_REOPTIMIZER_TIMEOUT: Duration = Duration::from_secs(60);

/// Everything the re-optimizer gets to see about a disruption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisruptionRequest {
    /// Kind of issue, e.g. "weather", "closure", "delay"
    pub disruption_type: String,
    pub description: String,
    /// The disrupted activity
    pub activity: Activity,
    /// Other activities of the same day, in time order
    pub remaining_activities: Vec<Activity>,
    pub destination: String,
}

impl DisruptionRequest {
    fn knows(&self, activity_id: u64) -> bool {
        self.activity.id == activity_id
            || self.remaining_activities.iter().any(|a| a.id == activity_id)
    }
}

/// A replacement for one existing activity. `None` fields keep the stored
/// value.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRevision {
    pub id: u64,
    pub time: Option<Time>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPayload {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    activities: Vec<RawActivity>,
}

#[derive(Debug, Deserialize)]
struct RawActivity {
    id: u64,
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

/// Parses a re-optimizer response into revisions for `request`.
///
/// # Errors
///
/// Returns `NexstepError::Reoptimization` when the payload is malformed,
/// reports failure, contains no activities, names an activity the request
/// did not include, or carries an unparseable time.
///
/// # Examples
///
/// ```rust
/// # use jiff::civil::time;
/// # use nexstep_core::{models::Activity, reoptimize::{parse_reoptimization, DisruptionRequest}};
/// # let activity = Activity {
/// #     id: 3, day_id: 1, title: "Boat tour".into(), time: time(14, 0, 0, 0),
/// #     location: None, notes: None, disrupted: false, position: 0,
/// # };
/// # let request = DisruptionRequest {
/// #     disruption_type: "weather".into(), description: "Storm".into(),
/// #     activity, remaining_activities: vec![], destination: "Lisbon".into(),
/// # };
/// let revisions = parse_reoptimization(
///     r#"{"success": true, "activities": [{"id": 3, "time": "15:30", "title": "Tile museum"}]}"#,
///     &request,
/// )?;
/// assert_eq!(revisions[0].time, Some(time(15, 30, 0, 0)));
/// # Ok::<(), nexstep_core::NexstepError>(())
/// ```
pub fn parse_reoptimization(payload: &str, request: &DisruptionRequest) -> Result<Vec<ActivityRevision>> {
    let failure = |message: String| NexstepError::Reoptimization { message };

    if payload.trim().is_empty() {
        return Err(failure("Empty response".to_string()));
    }

    let raw: RawPayload =
        serde_json::from_str(payload).map_err(|e| failure(format!("Malformed response: {e}")))?;

    if !raw.success {
        return Err(failure(
            raw.message
                .unwrap_or_else(|| "Re-optimizer reported failure".to_string()),
        ));
    }
    if raw.activities.is_empty() {
        return Err(failure("Response contains no activities".to_string()));
    }

    raw.activities
        .into_iter()
        .map(|activity| {
            if !request.knows(activity.id) {
                return Err(failure(format!(
                    "Response refers to unknown activity {}",
                    activity.id
                )));
            }
            let time = activity
                .time
                .as_deref()
                .map(|t| parse_time("time", t))
                .transpose()
                .map_err(|e| failure(e.to_string()))?;
            Ok(ActivityRevision {
                id: activity.id,
                time,
                title: activity.title.filter(|t| !t.trim().is_empty()),
                location: activity.location,
                notes: activity.notes,
            })
        })
        .collect()
}

/// An external service that proposes a revised itinerary.
#[async_trait]
pub trait Reoptimizer: Send + Sync {
    /// Returns the raw response payload.
    async fn reoptimize(&self, request: &DisruptionRequest) -> Result<String>;
}

/// Used when no re-optimizer is configured. Always fails, so a disruption
/// report falls back to marking the activity by hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

#[async_trait]
impl Reoptimizer for Unconfigured {
    async fn reoptimize(&self, _request: &DisruptionRequest) -> Result<String> {
        Err(NexstepError::Reoptimization {
            message: "No re-optimizer is configured".to_string(),
        })
    }
}

/// Runs a shell command, writes the request JSON to its stdin and reads the
/// response JSON from its stdout.
#[derive(Debug, Clone)]
pub struct CommandReoptimizer {
    command: String,
    timeout: Duration,
}

impl CommandReoptimizer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout: DEFAULT_REOPTIMIZER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

#[async_trait]
impl Reoptimizer for CommandReoptimizer {
    async fn reoptimize(&self, request: &DisruptionRequest) -> Result<String> {
        let failure = |message: String| NexstepError::Reoptimization { message };
        let input = serde_json::to_vec(request)?;

        debug!("Running re-optimizer: {}", self.command);
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .kill_on_drop(true)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| failure(format!("Failed to start '{}': {e}", self.command)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&input)
                .await
                .map_err(|e| failure(format!("Failed to send request: {e}")))?;
        }

        let output = timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| failure(format!("Timed out after {}s", self.timeout.as_secs())))?
            .map_err(|e| failure(format!("Failed to run '{}': {e}", self.command)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failure(format!(
                "'{}' exited with code {}: {}",
                self.command,
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::time;

    use super::*;

    fn activity(id: u64, hour: i8) -> Activity {
        Activity {
            id,
            day_id: 1,
            title: format!("Activity {id}"),
            time: time(hour, 0, 0, 0),
            location: None,
            notes: None,
            disrupted: false,
            position: 0,
        }
    }

    fn request() -> DisruptionRequest {
        DisruptionRequest {
            disruption_type: "weather".to_string(),
            description: "Storm over the harbour".to_string(),
            activity: activity(1, 10),
            remaining_activities: vec![activity(2, 12), activity(3, 15)],
            destination: "Lisbon".to_string(),
        }
    }

    fn assert_failure(result: Result<Vec<ActivityRevision>>, needle: &str) {
        match result {
            Err(NexstepError::Reoptimization { message }) => {
                assert!(message.contains(needle), "'{message}' lacks '{needle}'")
            }
            other => panic!("Expected Reoptimization error, got {other:?}"),
        }
    }

    #[test]
    fn test_successful_payload() {
        let payload = r#"{
            "success": true,
            "activities": [
                {"id": 1, "time": "16:00", "title": "Indoor tile workshop", "location": "Museu do Azulejo"},
                {"id": 2, "time": "12:30"}
            ]
        }"#;

        let revisions = parse_reoptimization(payload, &request()).unwrap();
        assert_eq!(revisions.len(), 2);
        assert_eq!(revisions[0].time, Some(time(16, 0, 0, 0)));
        assert_eq!(revisions[0].title.as_deref(), Some("Indoor tile workshop"));
        assert_eq!(revisions[1].title, None);
        assert_eq!(revisions[1].location, None);
    }

    #[test]
    fn test_reported_failure_keeps_message() {
        assert_failure(
            parse_reoptimization(r#"{"success": false, "message": "Nothing open"}"#, &request()),
            "Nothing open",
        );
    }

    #[test]
    fn test_malformed_and_empty_payloads_fail() {
        assert_failure(parse_reoptimization("", &request()), "Empty");
        assert_failure(parse_reoptimization("not json", &request()), "Malformed");
        assert_failure(
            parse_reoptimization(r#"{"success": true, "activities": []}"#, &request()),
            "no activities",
        );
    }

    #[test]
    fn test_unknown_activity_fails() {
        assert_failure(
            parse_reoptimization(r#"{"success": true, "activities": [{"id": 99}]}"#, &request()),
            "unknown activity 99",
        );
    }

    #[test]
    fn test_bad_time_fails() {
        assert_failure(
            parse_reoptimization(
                r#"{"success": true, "activities": [{"id": 1, "time": "25:99"}]}"#,
                &request(),
            ),
            "time",
        );
    }

    #[tokio::test]
    async fn test_unconfigured_always_fails() {
        assert!(matches!(
            Unconfigured.reoptimize(&request()).await,
            Err(NexstepError::Reoptimization { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_receives_request_on_stdin() {
        // Echo the disrupted activity id back as a revision.
        let script = r#"read -r body; id=$(printf '%s' "$body" | sed 's/.*"activity":{"id":\([0-9]*\).*/\1/'); printf '{"success":true,"activities":[{"id":%s,"time":"09:15"}]}' "$id""#;
        let reoptimizer = CommandReoptimizer::new(script);

        let payload = reoptimizer.reoptimize(&request()).await.unwrap();
        let revisions = parse_reoptimization(&payload, &request()).unwrap();
        assert_eq!(revisions[0].id, 1);
        assert_eq!(revisions[0].time, Some(time(9, 15, 0, 0)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_command_is_reported() {
        let reoptimizer = CommandReoptimizer::new("cat > /dev/null; echo boom >&2; exit 3");
        match reoptimizer.reoptimize(&request()).await {
            Err(NexstepError::Reoptimization { message }) => {
                assert!(message.contains("code 3"));
                assert!(message.contains("boom"));
            }
            other => panic!("Expected Reoptimization error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_command_times_out() {
        let reoptimizer =
            CommandReoptimizer::new("sleep 5").with_timeout(Duration::from_millis(100));
        match reoptimizer.reoptimize(&request()).await {
            Err(NexstepError::Reoptimization { message }) => assert!(message.contains("Timed out")),
            other => panic!("Expected Reoptimization error, got {other:?}"),
        }
    }
}
