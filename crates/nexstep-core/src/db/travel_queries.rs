//! Flight and hotel stay operations.

use jiff::{civil::Date, Timestamp};
use rusqlite::{params, OptionalExtension, Transaction};

use super::{id_column, parse_column};
use crate::{
    error::{DatabaseResultExt, NexstepError, Result},
    models::{Flight, FlightKind, HotelStay},
    params::AddFlight,
};

const CHECK_TRIP_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM trips WHERE id = ?1)";
const UPDATE_TRIP_TIMESTAMP_SQL: &str = "UPDATE trips SET updated_at = ?1 WHERE id = ?2";

const INSERT_FLIGHT_SQL: &str = "INSERT INTO flights (trip_id, kind, date, airline, flight_number, origin, destination) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
const SELECT_FLIGHTS_BY_TRIP_SQL: &str = "SELECT id, trip_id, kind, date, airline, flight_number, origin, destination FROM flights WHERE trip_id = ?1 ORDER BY date, id";
const DELETE_FLIGHT_SQL: &str = "DELETE FROM flights WHERE id = ?1 RETURNING trip_id";

const INSERT_HOTEL_SQL: &str = "INSERT INTO hotel_stays (trip_id, name, check_in, check_out, address) VALUES (?1, ?2, ?3, ?4, ?5)";
const SELECT_HOTELS_BY_TRIP_SQL: &str = "SELECT id, trip_id, name, check_in, check_out, address FROM hotel_stays WHERE trip_id = ?1 ORDER BY check_in, id";
const DELETE_HOTEL_SQL: &str = "DELETE FROM hotel_stays WHERE id = ?1 RETURNING trip_id";

fn ensure_trip(tx: &Transaction, trip_id: u64) -> Result<()> {
    let exists: bool = tx
        .query_row(CHECK_TRIP_EXISTS_SQL, params![trip_id as i64], |row| row.get(0))
        .db_context("Failed to check trip existence")?;
    if !exists {
        return Err(NexstepError::TripNotFound { id: trip_id });
    }
    Ok(())
}

fn touch_trip(tx: &Transaction, trip_id: u64, now: Timestamp) -> Result<()> {
    tx.execute(
        UPDATE_TRIP_TIMESTAMP_SQL,
        params![now.to_string(), trip_id as i64],
    )
    .db_context("Failed to update trip timestamp")?;
    Ok(())
}

impl super::Database {
    /// Attaches a flight to a trip. `date` is the already validated
    /// `flight.date`.
    pub fn add_flight(&mut self, flight: &AddFlight, date: Date) -> Result<Flight> {
        let now = self.now();
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        ensure_trip(&tx, flight.trip_id)?;

        tx.execute(
            INSERT_FLIGHT_SQL,
            params![
                flight.trip_id as i64,
                flight.kind.as_str(),
                date.to_string(),
                flight.airline.as_deref(),
                flight.flight_number.as_deref(),
                flight.origin.as_deref(),
                flight.destination.as_deref()
            ],
        )
        .db_context("Failed to insert flight")?;
        let id = tx.last_insert_rowid() as u64;

        touch_trip(&tx, flight.trip_id, now)?;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Flight {
            id,
            trip_id: flight.trip_id,
            kind: flight.kind,
            date,
            airline: flight.airline.clone(),
            flight_number: flight.flight_number.clone(),
            origin: flight.origin.clone(),
            destination: flight.destination.clone(),
        })
    }

    /// Retrieves the flights of a trip in date order.
    pub fn get_flights(&self, trip_id: u64) -> Result<Vec<Flight>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_FLIGHTS_BY_TRIP_SQL)
            .db_context("Failed to prepare query")?;

        let flights = stmt
            .query_map(params![trip_id as i64], |row| {
                Ok(Flight {
                    id: id_column(row, 0)?,
                    trip_id: id_column(row, 1)?,
                    kind: parse_column::<FlightKind>(row, 2)?,
                    date: parse_column::<Date>(row, 3)?,
                    airline: row.get(4)?,
                    flight_number: row.get(5)?,
                    origin: row.get(6)?,
                    destination: row.get(7)?,
                })
            })
            .db_context("Failed to query flights")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch flights")?;

        Ok(flights)
    }

    /// Removes a flight. Returns the ID of the trip it belonged to.
    pub fn delete_flight(&mut self, id: u64) -> Result<u64> {
        self.delete_booking(DELETE_FLIGHT_SQL, id, "flight")
    }

    /// Attaches a hotel stay to a trip.
    pub fn add_hotel(
        &mut self,
        trip_id: u64,
        name: &str,
        check_in: Date,
        check_out: Date,
        address: Option<&str>,
    ) -> Result<HotelStay> {
        if check_out < check_in {
            return Err(NexstepError::invalid_input("check_out")
                .with_reason(format!("Check-out {check_out} is before check-in {check_in}")));
        }

        let now = self.now();
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        ensure_trip(&tx, trip_id)?;

        tx.execute(
            INSERT_HOTEL_SQL,
            params![
                trip_id as i64,
                name,
                check_in.to_string(),
                check_out.to_string(),
                address
            ],
        )
        .db_context("Failed to insert hotel stay")?;
        let id = tx.last_insert_rowid() as u64;

        touch_trip(&tx, trip_id, now)?;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(HotelStay {
            id,
            trip_id,
            name: name.into(),
            check_in,
            check_out,
            address: address.map(String::from),
        })
    }

    /// Retrieves the hotel stays of a trip in check-in order.
    pub fn get_hotels(&self, trip_id: u64) -> Result<Vec<HotelStay>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_HOTELS_BY_TRIP_SQL)
            .db_context("Failed to prepare query")?;

        let hotels = stmt
            .query_map(params![trip_id as i64], |row| {
                Ok(HotelStay {
                    id: id_column(row, 0)?,
                    trip_id: id_column(row, 1)?,
                    name: row.get(2)?,
                    check_in: parse_column::<Date>(row, 3)?,
                    check_out: parse_column::<Date>(row, 4)?,
                    address: row.get(5)?,
                })
            })
            .db_context("Failed to query hotel stays")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch hotel stays")?;

        Ok(hotels)
    }

    /// Removes a hotel stay. Returns the ID of the trip it belonged to.
    pub fn delete_hotel(&mut self, id: u64) -> Result<u64> {
        self.delete_booking(DELETE_HOTEL_SQL, id, "hotel stay")
    }

    fn delete_booking(&mut self, sql: &str, id: u64, kind: &'static str) -> Result<u64> {
        let now = self.now();
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let trip_id = tx
            .query_row(sql, params![id as i64], |row| id_column(row, 0))
            .optional()
            .db_context("Failed to delete booking")?
            .ok_or(NexstepError::BookingNotFound { kind, id })?;

        touch_trip(&tx, trip_id, now)?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(trip_id)
    }
}
