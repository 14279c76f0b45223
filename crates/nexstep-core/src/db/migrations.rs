//! Database schema initialization and migrations.

use crate::error::{DatabaseResultExt, NexstepError, Result};

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        // Cascading deletes of days, activities and bookings rely on this
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        self.apply_migrations()?;

        Ok(())
    }

    /// Apply database migrations for existing databases
    fn apply_migrations(&self) -> Result<()> {
        // Stores created before disruption reporting have no issue column
        let has_issue_column: bool = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('trips') WHERE name = 'issue_summary'",
                [],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .unwrap_or(false);

        if !has_issue_column {
            self.connection
                .execute("ALTER TABLE trips ADD COLUMN issue_summary TEXT", [])
                .map_err(|e| {
                    NexstepError::database_error("Failed to add issue_summary column to trips table", e)
                })?;
        }

        Ok(())
    }
}
