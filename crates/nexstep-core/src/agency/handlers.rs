//! Handler operations that return formatted wrapper types for the Agency.
//!
//! Interfaces call these rather than the raw operations so that the CLI and
//! the MCP server print identical text for the same action.

use super::Agency;
use crate::{
    display::{CreateResult, DeleteResult, TripSummaries, UpdateResult},
    error::Result,
    models::{Activity, Day, Flight, HotelStay, Trip, TripFilter, TripSummary},
    params::{
        AddActivity, AddDay, AddFlight, AddHotel, CreateTrip, DeleteTrip, Id, ListTrips,
        SetTripStatus, UpdateActivity, UpdateTrip,
    },
};

impl Agency {
    /// Handle listing trips as summaries with itinerary counts.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use nexstep_core::{params::ListTrips, AgencyBuilder};
    /// # async {
    /// let agency = AgencyBuilder::new().build().await?;
    /// let summaries = agency.list_trips_summary(&ListTrips::default()).await?;
    /// println!("{summaries}");
    /// # Result::<(), nexstep_core::NexstepError>::Ok(())
    /// # };
    /// ```
    pub async fn list_trips_summary(&self, params: &ListTrips) -> Result<TripSummaries> {
        let trips = self.list_trips(Some(TripFilter::from(params))).await?;
        let summaries: Vec<TripSummary> = trips.iter().map(Into::into).collect();
        Ok(TripSummaries(summaries))
    }

    /// Handle showing a trip with its whole itinerary.
    pub async fn show_trip(&self, params: &Id) -> Result<Option<Trip>> {
        self.get_trip(params).await
    }

    pub async fn create_trip_result(&self, params: &CreateTrip) -> Result<CreateResult<Trip>> {
        self.create_trip(params).await.map(CreateResult::new)
    }

    pub async fn update_trip_result(&self, params: &UpdateTrip) -> Result<UpdateResult<Trip>> {
        let (trip, changes) = self.update_trip(params).await?;
        Ok(UpdateResult::with_changes(trip, changes))
    }

    pub async fn set_trip_status_result(
        &self,
        params: &SetTripStatus,
    ) -> Result<UpdateResult<Trip>> {
        let (trip, changes) = self.set_trip_status(params).await?;
        Ok(UpdateResult::with_changes(trip, changes))
    }

    pub async fn delete_trip_result(&self, params: &DeleteTrip) -> Result<DeleteResult<Trip>> {
        self.delete_trip(params).await.map(DeleteResult::new)
    }

    pub async fn add_day_result(&self, params: &AddDay) -> Result<CreateResult<Day>> {
        self.add_day(params).await.map(CreateResult::new)
    }

    pub async fn add_activity_result(&self, params: &AddActivity) -> Result<CreateResult<Activity>> {
        self.add_activity(params).await.map(CreateResult::new)
    }

    /// Handle a sparse activity update, reporting which fields changed.
    pub async fn update_activity_result(
        &self,
        params: &UpdateActivity,
    ) -> Result<UpdateResult<Activity>> {
        let mut changes = Vec::new();
        if let Some(title) = &params.title {
            changes.push(format!("Title set to {title}"));
        }
        if let Some(time) = &params.time {
            changes.push(format!("Time set to {time}"));
        }
        if params.location.is_some() {
            changes.push("Location updated".to_string());
        }
        if params.notes.is_some() {
            changes.push("Notes updated".to_string());
        }
        match params.disrupted {
            Some(true) => changes.push("Marked as disrupted".to_string()),
            Some(false) => changes.push("Disruption marker cleared".to_string()),
            None => {}
        }

        let activity = self.update_activity(params).await?;
        Ok(UpdateResult::with_changes(activity, changes))
    }

    pub async fn delete_activity_result(&self, params: &Id) -> Result<DeleteResult<Activity>> {
        self.delete_activity(params).await.map(DeleteResult::new)
    }

    pub async fn add_flight_result(&self, params: &AddFlight) -> Result<CreateResult<Flight>> {
        self.add_flight(params).await.map(CreateResult::new)
    }

    pub async fn add_hotel_result(&self, params: &AddHotel) -> Result<CreateResult<HotelStay>> {
        self.add_hotel(params).await.map(CreateResult::new)
    }
}
