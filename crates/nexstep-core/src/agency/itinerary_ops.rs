//! Day, activity, flight and hotel operations for the Agency.

use super::Agency;
use crate::{
    error::{NexstepError, Result},
    models::{Activity, Day, Flight, HotelStay, UpdateActivityRequest},
    params::{AddActivity, AddDay, AddFlight, AddHotel, Id, UpdateActivity},
};

impl Agency {
    /// Adds a numbered day to a trip.
    pub async fn add_day(&self, params: &AddDay) -> Result<Day> {
        params.validate()?;

        let AddDay {
            trip_id,
            day_number,
            title,
        } = params.clone();
        self.with_database(move |db| db.add_day(trip_id, day_number, title.as_deref()))
            .await
    }

    /// Deletes a day together with its activities.
    pub async fn delete_day(&self, params: &Id) -> Result<()> {
        let day_id = params.id;
        self.with_database(move |db| db.delete_day(day_id)).await
    }

    /// Appends an activity to a day.
    pub async fn add_activity(&self, params: &AddActivity) -> Result<Activity> {
        let time = params.validate()?;
        let params = params.clone();

        self.with_database(move |db| {
            db.add_activity(
                params.day_id,
                time,
                params.title.trim(),
                params.location.as_deref(),
                params.notes.as_deref(),
            )
        })
        .await
    }

    /// Retrieves a single activity.
    pub async fn get_activity(&self, params: &Id) -> Result<Option<Activity>> {
        let activity_id = params.id;
        self.with_database(move |db| db.get_activity(activity_id))
            .await
    }

    /// Applies a sparse update to an activity.
    pub async fn update_activity(&self, params: &UpdateActivity) -> Result<Activity> {
        let activity_id = params.id;
        let request = UpdateActivityRequest::try_from(params.clone())?;
        if let Some(title) = &request.title {
            if title.trim().is_empty() {
                return Err(NexstepError::invalid_input("title").with_reason("Must not be empty"));
            }
        }

        self.with_database(move |db| db.update_activity(activity_id, &request))
            .await
    }

    /// Deletes an activity and returns what was deleted.
    pub async fn delete_activity(&self, params: &Id) -> Result<Activity> {
        let activity_id = params.id;
        self.with_database(move |db| {
            let activity = db
                .get_activity(activity_id)?
                .ok_or(NexstepError::ActivityNotFound { id: activity_id })?;
            db.delete_activity(activity_id)?;
            Ok(activity)
        })
        .await
    }

    /// Attaches a flight to a trip.
    pub async fn add_flight(&self, params: &AddFlight) -> Result<Flight> {
        let date = params.validate()?;
        let params = params.clone();
        self.with_database(move |db| db.add_flight(&params, date))
            .await
    }

    /// Removes a flight, returning the ID of its trip.
    pub async fn delete_flight(&self, params: &Id) -> Result<u64> {
        let flight_id = params.id;
        self.with_database(move |db| db.delete_flight(flight_id))
            .await
    }

    /// Attaches a hotel stay to a trip.
    pub async fn add_hotel(&self, params: &AddHotel) -> Result<HotelStay> {
        let (check_in, check_out) = params.validate()?;
        let params = params.clone();
        self.with_database(move |db| {
            db.add_hotel(
                params.trip_id,
                params.name.trim(),
                check_in,
                check_out,
                params.address.as_deref(),
            )
        })
        .await
    }

    /// Removes a hotel stay, returning the ID of its trip.
    pub async fn delete_hotel(&self, params: &Id) -> Result<u64> {
        let hotel_id = params.id;
        self.with_database(move |db| db.delete_hotel(hotel_id))
            .await
    }
}
