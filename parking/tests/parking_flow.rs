use chrono::Utc;

use inventory::types::ResourceStatus;
use parking::{SpotKind, car, motorcycle, parking_lot, truck};
use reservation::error::ReservationError;
use reservation::model::{Interval, ReservationStatus};

#[tokio::test]
async fn car_parks_and_unparks() -> anyhow::Result<()> {
    let lot = parking_lot();

    lot.register_resource("sp1", SpotKind::Car).await?;
    lot.register_requester(car("KA-1234")).await?;

    let receipt = lot
        .reserve("KA-1234", "sp1", Interval::starting_at(Utc::now()))
        .await?;
    assert_eq!(receipt.status, ReservationStatus::Active);
    assert!(receipt.interval.end.is_none());
    assert_eq!(lot.resource_status("sp1").await?, ResourceStatus::Occupied);

    let closed = lot.release_by_requester("KA-1234").await?;
    assert_eq!(closed.status, ReservationStatus::Closed);
    assert!(closed.interval.end.is_some());
    assert_eq!(lot.resource_status("sp1").await?, ResourceStatus::Available);

    Ok(())
}

#[tokio::test]
async fn vehicle_kind_must_match_spot_kind() -> anyhow::Result<()> {
    let lot = parking_lot();

    lot.register_resource("sp1", SpotKind::Car).await?;
    lot.register_requester(truck("TR-9000")).await?;

    let err = lot
        .reserve("TR-9000", "sp1", Interval::starting_at(Utc::now()))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ReservationError::CategoryMismatch {
            resource: "sp1".into(),
            required: "Truck".into(),
            actual: "Car".into(),
        }
    );
    assert_eq!(lot.resource_status("sp1").await?, ResourceStatus::Available);

    Ok(())
}

#[tokio::test]
async fn duplicate_spot_number_is_rejected() -> anyhow::Result<()> {
    let lot = parking_lot();

    lot.register_resource("sp1", SpotKind::Car).await?;

    let err = lot
        .register_resource("sp1", SpotKind::Motorcycle)
        .await
        .unwrap_err();
    assert_eq!(err, ReservationError::DuplicateResource("sp1".into()));
    assert_eq!(lot.get_resource("sp1").await.unwrap().category, SpotKind::Car);

    Ok(())
}

#[tokio::test]
async fn available_spot_listing_tracks_occupancy() -> anyhow::Result<()> {
    let lot = parking_lot();

    lot.register_resource("sp1", SpotKind::Car).await?;
    lot.register_resource("sp2", SpotKind::Car).await?;
    lot.register_resource("sp3", SpotKind::Motorcycle).await?;
    lot.register_requester(car("KA-1234")).await?;
    lot.register_requester(motorcycle("MH-0001")).await?;

    lot.reserve("KA-1234", "sp1", Interval::starting_at(Utc::now()))
        .await?;

    assert_eq!(
        lot.list_available_resources().await,
        vec!["sp2".to_string(), "sp3".to_string()]
    );

    lot.release_by_requester("KA-1234").await?;
    assert_eq!(
        lot.list_available_resources().await,
        vec!["sp1".to_string(), "sp2".to_string(), "sp3".to_string()]
    );

    Ok(())
}

#[tokio::test]
async fn spot_rates_follow_the_kind() -> anyhow::Result<()> {
    let lot = parking_lot();

    lot.register_resource("sp1", SpotKind::Car).await?;
    lot.register_resource("sp2", SpotKind::Motorcycle).await?;
    lot.register_resource("sp3", SpotKind::Truck).await?;

    assert_eq!(lot.get_resource("sp1").await.unwrap().rate, 50);
    assert_eq!(lot.get_resource("sp2").await.unwrap().rate, 20);
    assert_eq!(lot.get_resource("sp3").await.unwrap().rate, 100);

    Ok(())
}
