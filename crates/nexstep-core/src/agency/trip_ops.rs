//! Trip operations for the Agency.

use log::{debug, info};

use super::Agency;
use crate::{
    error::{NexstepError, Result},
    models::{Trip, TripFilter, UpdateTripRequest},
    params::{CreateTrip, DeleteTrip, Id, SetTripStatus, UpdateTrip},
};

impl Agency {
    /// Creates a new trip. Without an explicit status it starts as a draft.
    pub async fn create_trip(&self, params: &CreateTrip) -> Result<Trip> {
        params.validate()?;

        let client_name = params.client_name.trim().to_string();
        let destination = params.destination.trim().to_string();
        let dates = params.dates.clone();
        let status = params.status;

        let trip = self
            .with_database(move |db| {
                db.create_trip(&client_name, &destination, dates.as_deref(), status)
            })
            .await?;
        info!("Created trip {} for {}", trip.id, trip.client_name);
        Ok(trip)
    }

    /// Retrieves a trip with its full itinerary.
    pub async fn get_trip(&self, params: &Id) -> Result<Option<Trip>> {
        let trip_id = params.id;
        self.with_database(move |db| db.get_trip(trip_id)).await
    }

    /// Like [`get_trip`](Self::get_trip), failing when the trip is missing.
    pub async fn require_trip(&self, trip_id: u64) -> Result<Trip> {
        self.get_trip(&Id { id: trip_id })
            .await?
            .ok_or(NexstepError::TripNotFound { id: trip_id })
    }

    /// Lists all trips with optional filtering.
    pub async fn list_trips(&self, filter: Option<TripFilter>) -> Result<Vec<Trip>> {
        self.with_database(move |db| db.list_trips(filter.as_ref()))
            .await
    }

    /// Applies a sparse update. Returns the updated trip together with the
    /// list of changes made.
    ///
    /// # Errors
    ///
    /// * `NexstepError::InvalidInput` - When the update is empty or invalid
    /// * `NexstepError::TripNotFound` - When the trip doesn't exist
    pub async fn update_trip(&self, params: &UpdateTrip) -> Result<(Trip, Vec<String>)> {
        let trip_id = params.id;
        let request = UpdateTripRequest::try_from(params.clone())?;
        if request.is_empty() {
            return Err(NexstepError::invalid_input("update")
                .with_reason("Nothing to update; provide at least one field"));
        }
        let changes = request.describe_changes();

        let trip = self
            .with_database(move |db| db.update_trip(trip_id, &request))
            .await?;
        debug!("Updated trip {trip_id}: {changes:?}");
        Ok((trip, changes))
    }

    /// Sets a trip's status by hand. Manual changes may move in any
    /// direction, including back to draft.
    pub async fn set_trip_status(&self, params: &SetTripStatus) -> Result<(Trip, Vec<String>)> {
        self.update_trip(&UpdateTrip {
            id: params.id,
            status: Some(params.status.clone()),
            ..Default::default()
        })
        .await
    }

    /// Permanently deletes a trip and returns what was deleted.
    ///
    /// # Errors
    ///
    /// * `NexstepError::InvalidInput` - When deletion was not confirmed
    /// * `NexstepError::TripNotFound` - When the trip doesn't exist
    pub async fn delete_trip(&self, params: &DeleteTrip) -> Result<Trip> {
        if !params.confirmed {
            return Err(NexstepError::invalid_input("confirmed")
                .with_reason("Deleting a trip cannot be undone; confirmation is required"));
        }

        let trip = self.require_trip(params.id).await?;
        let trip_id = trip.id;
        self.with_database(move |db| db.delete_trip(trip_id)).await?;
        info!("Deleted trip {trip_id}");
        Ok(trip)
    }
}
