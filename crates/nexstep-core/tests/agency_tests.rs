mod common;

use nexstep_core::{
    clock::TimeSource,
    params::{AddActivity, AddDay, AddFlight, AddHotel, CreateTrip, Id, ListTrips, ReportDisruption},
    ActivityStage, FlightKind, TripStatus,
};

#[tokio::test]
#[allow(clippy::too_many_lines)]
async fn test_trip_lifecycle_follows_the_clock() {
    let (_temp_dir, agency, clock) = common::create_test_agency("2025-05-10T12:00:00Z").await;

    let trip = agency
        .create_trip(&CreateTrip {
            client_name: "Ada Lovelace".to_string(),
            destination: "Lisbon".to_string(),
            dates: Some("12-13 May".to_string()),
            status: Some(TripStatus::Upcoming),
        })
        .await
        .expect("Failed to create trip");

    for (kind, date) in [(FlightKind::Departure, "2025-05-12"), (FlightKind::Return, "2025-05-13")] {
        agency
            .add_flight(&AddFlight {
                trip_id: trip.id,
                kind,
                date: date.to_string(),
                airline: None,
                flight_number: None,
                origin: None,
                destination: None,
            })
            .await
            .expect("Failed to add flight");
    }

    let day1 = agency
        .add_day(&AddDay {
            trip_id: trip.id,
            day_number: 1,
            title: Some("Arrival".to_string()),
        })
        .await
        .expect("Failed to add day");
    let day2 = agency
        .add_day(&AddDay {
            trip_id: trip.id,
            day_number: 2,
            title: None,
        })
        .await
        .expect("Failed to add day");

    for (day_id, time, title) in [
        (day1.id, "15:00", "Check-in"),
        (day1.id, "19:30", "Dinner"),
        (day2.id, "09:00", "Castle"),
        (day2.id, "12:00", "Lunch"),
    ] {
        agency
            .add_activity(&AddActivity {
                day_id,
                time: time.to_string(),
                title: title.to_string(),
                location: None,
                notes: None,
            })
            .await
            .expect("Failed to add activity");
    }

    // Two days before departure nothing moves
    let report = agency.refresh_statuses().await.unwrap();
    assert!(report.outcomes.is_empty());
    assert!(report.to_string().contains("All trip statuses are up to date."));

    // Departure day
    clock.set("2025-05-12T16:00:00Z".parse().unwrap());
    let report = agency.refresh_statuses().await.unwrap();
    assert_eq!(report.applied(), 1);
    assert!(report.to_string().contains("moved from upcoming to active"));

    let view = agency.trip_timeline(&Id { id: trip.id }).await.unwrap();
    let stages: Vec<ActivityStage> = view.statuses().map(|(_, s)| s.stage).collect();
    assert_eq!(
        stages,
        vec![
            ActivityStage::NowHappening,
            ActivityStage::Upcoming,
            ActivityStage::Upcoming,
            ActivityStage::Upcoming
        ]
    );

    // Mid-morning on day 2 the trip is still active
    clock.set("2025-05-13T10:00:00Z".parse().unwrap());
    let report = agency.refresh_statuses().await.unwrap();
    assert!(report.outcomes.is_empty());

    // Lunch is the last activity and ends two hours after it starts
    clock.set("2025-05-13T14:00:00Z".parse().unwrap());
    assert_eq!(agency.now(), clock.now());
    let report = agency.refresh_statuses().await.unwrap();
    assert_eq!(report.applied(), 1);

    let stored = agency.require_trip(trip.id).await.unwrap();
    assert_eq!(stored.status, TripStatus::Completed);

    let view = agency.trip_timeline(&Id { id: trip.id }).await.unwrap();
    assert!(view
        .statuses()
        .all(|(_, status)| status.stage == ActivityStage::Completed && status.progress == 100.0));
}

#[tokio::test]
async fn test_disrupted_trip_still_completes() {
    let (_temp_dir, agency, clock) = common::create_test_agency("2025-05-12T08:00:00Z").await;

    let trip = agency
        .create_trip(&CreateTrip {
            client_name: "Grace Hopper".to_string(),
            destination: "Kyoto".to_string(),
            dates: None,
            status: Some(TripStatus::Active),
        })
        .await
        .unwrap();
    agency
        .add_flight(&AddFlight {
            trip_id: trip.id,
            kind: FlightKind::Departure,
            date: "2025-05-12".to_string(),
            airline: None,
            flight_number: None,
            origin: None,
            destination: None,
        })
        .await
        .unwrap();
    let day = agency
        .add_day(&AddDay {
            trip_id: trip.id,
            day_number: 1,
            title: None,
        })
        .await
        .unwrap();
    let temple = agency
        .add_activity(&AddActivity {
            day_id: day.id,
            time: "10:00".to_string(),
            title: "Temple visit".to_string(),
            location: None,
            notes: None,
        })
        .await
        .unwrap();

    // No re-optimizer is configured, so the activity is only marked
    let report = agency
        .report_disruption(&ReportDisruption {
            activity_id: temple.id,
            disruption_type: "closure".to_string(),
            description: "Closed for a festival".to_string(),
        })
        .await
        .unwrap();
    assert!(!report.reoptimized());
    assert!(report.to_string().contains("**Notice**"));

    let view = agency.trip_timeline(&Id { id: trip.id }).await.unwrap();
    let (_, status) = view.statuses().next().unwrap();
    assert_eq!(status.stage, ActivityStage::Disrupted);

    clock.set("2025-05-12T13:00:00Z".parse().unwrap());
    let view = agency.trip_timeline(&Id { id: trip.id }).await.unwrap();
    let (_, status) = view.statuses().next().unwrap();
    assert_eq!(status.stage, ActivityStage::MissedDisrupted);

    let report = agency.refresh_statuses().await.unwrap();
    assert_eq!(report.applied(), 1);
    assert_eq!(
        agency.require_trip(trip.id).await.unwrap().status,
        TripStatus::Completed
    );
}

#[tokio::test]
async fn test_handler_results_render() {
    let (_temp_dir, agency, _clock) = common::create_test_agency("2025-05-01T00:00:00Z").await;

    let created = agency
        .create_trip_result(&CreateTrip {
            client_name: "Ada Lovelace".to_string(),
            destination: "Lisbon".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    let trip_id = created.resource.id;
    assert!(created.to_string().contains("Created trip with ID:"));

    let hotel = agency
        .add_hotel_result(&AddHotel {
            trip_id,
            name: "Hotel Avenida".to_string(),
            check_in: "2025-05-12".to_string(),
            check_out: "2025-05-15".to_string(),
            address: None,
        })
        .await
        .unwrap();
    assert!(hotel.to_string().contains("Created hotel stay with ID:"));

    let summaries = agency
        .list_trips_summary(&ListTrips::default())
        .await
        .unwrap();
    assert!(summaries.to_string().contains("## Ada Lovelace: Lisbon"));

    let shown = agency.show_trip(&Id { id: trip_id }).await.unwrap().unwrap();
    assert!(shown.to_string().contains("Hotel Avenida"));
}
