use std::sync::Arc;

use jiff::{tz::TimeZone, Timestamp};
use nexstep_core::{clock::ManualClock, Agency, AgencyBuilder};
use tempfile::TempDir;

/// Helper function to create a test agency in UTC whose clock the test
/// controls
pub async fn create_test_agency(now: &str) -> (TempDir, Agency, Arc<ManualClock>) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let now: Timestamp = now.parse().expect("valid timestamp");
    let clock = Arc::new(ManualClock::new(now));
    let agency = AgencyBuilder::new()
        .with_database_path(Some(&db_path))
        .with_time_zone(TimeZone::UTC)
        .with_time_source(clock.clone())
        .build()
        .await
        .expect("Failed to create agency");
    (temp_dir, agency, clock)
}
