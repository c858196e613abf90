pub mod cli;

use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use futures::future::join_all;
use tokio::sync::Barrier;

use cli::{Cli, Scenario};
use common::logger::init_logger;
use hotel::{RoomClass, front_desk, guest};
use parking::{SpotKind, car, parking_lot, truck};
use reservation::model::Interval;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger("reservation-demo");

    let cli = Cli::parse();

    for scenario in &cli.scenarios {
        match scenario {
            Scenario::Hotel => run_hotel_demo().await?,
            Scenario::Parking => run_parking_demo().await?,
            Scenario::Race => run_race_demo(cli.claimants).await?,
        }
    }

    Ok(())
}

/// Two guests race for the same room; the loser gets it after the
/// winner cancels.
async fn run_hotel_demo() -> anyhow::Result<()> {
    println!("--- hotel demo ---");

    let desk = Arc::new(front_desk());

    desk.register_requester(guest("g1", "alice", "alice@example.com"))
        .await?;
    desk.register_requester(guest("g2", "bob", "bob@example.com"))
        .await?;
    desk.register_resource("room-101", RoomClass::Basic).await?;
    desk.register_resource("room-201", RoomClass::Deluxe).await?;

    let stay = Interval::between(
        "2024-02-20T15:00:00Z".parse()?,
        "2024-02-23T12:00:00Z".parse()?,
    );

    let barrier = Arc::new(Barrier::new(2));
    let mut attempts = Vec::new();

    for gid in ["g1", "g2"] {
        let desk = desk.clone();
        let barrier = barrier.clone();

        attempts.push(tokio::spawn(async move {
            barrier.wait().await;
            (gid, desk.reserve(gid, "room-101", stay).await)
        }));
    }

    let mut winner = None;
    for attempt in join_all(attempts).await {
        let (gid, outcome) = attempt?;
        match outcome {
            Ok(booking) => {
                println!("{gid} booked room-101 (reservation {})", booking.id);
                winner = Some(booking);
            }
            Err(e) => println!("{gid} was turned away: {e}"),
        }
    }

    let winner = winner.ok_or_else(|| anyhow::anyhow!("no booking won the race"))?;

    desk.cancel(winner.id).await?;
    println!("booking {} canceled, room-101 is open again", winner.id);

    let rebooked = desk.reserve("g2", "room-101", stay).await?;
    println!("room-101 rebooked by {}", rebooked.requester_id);

    let history = desk.list_reservations_for(&winner.requester_id).await?;
    println!(
        "history for {}:\n{}",
        winner.requester_id,
        serde_json::to_string_pretty(&history)?
    );

    Ok(())
}

/// Spots, vehicles, one wrong-kind rejection, one unpark.
async fn run_parking_demo() -> anyhow::Result<()> {
    println!("--- parking demo ---");

    let lot = parking_lot();

    for (id, kind) in [
        ("sp1", SpotKind::Car),
        ("sp2", SpotKind::Car),
        ("sp3", SpotKind::Truck),
    ] {
        lot.register_resource(id, kind).await?;
    }
    if let Err(e) = lot.register_resource("sp1", SpotKind::Car).await {
        println!("re-adding sp1 failed: {e}");
    }

    lot.register_requester(car("KA-1234")).await?;
    lot.register_requester(truck("TR-9000")).await?;

    lot.reserve("KA-1234", "sp1", Interval::starting_at(Utc::now()))
        .await?;
    println!("KA-1234 parked at sp1");

    for spot in ["sp1", "sp2"] {
        if let Err(e) = lot
            .reserve("TR-9000", spot, Interval::starting_at(Utc::now()))
            .await
        {
            println!("TR-9000 rejected at {spot}: {e}");
        }
    }

    let receipt = lot
        .reserve("TR-9000", "sp3", Interval::starting_at(Utc::now()))
        .await?;
    println!("TR-9000 parked at sp3 (receipt {})", receipt.id);

    let exited = lot.release_by_requester("KA-1234").await?;
    println!("KA-1234 left, receipt closed at {:?}", exited.interval.end);

    println!("available spots: {:?}", lot.list_available_resources().await);

    Ok(())
}

/// N vehicles race for a single spot; exactly one should win.
async fn run_race_demo(claimants: usize) -> anyhow::Result<()> {
    println!("--- race demo: {claimants} claimants, one spot ---");

    let lot = Arc::new(parking_lot());

    lot.register_resource("sp1", SpotKind::Car).await?;
    for i in 0..claimants {
        lot.register_requester(car(&format!("KA-{i:04}"))).await?;
    }

    let barrier = Arc::new(Barrier::new(claimants));
    let mut handles = Vec::with_capacity(claimants);

    for i in 0..claimants {
        let lot = lot.clone();
        let barrier = barrier.clone();

        handles.push(tokio::spawn(async move {
            let plate = format!("KA-{i:04}");
            barrier.wait().await;
            let out = lot
                .reserve(&plate, "sp1", Interval::starting_at(Utc::now()))
                .await;
            (plate, out)
        }));
    }

    let mut wins = 0;
    for handle in join_all(handles).await {
        let (plate, outcome) = handle?;
        match outcome {
            Ok(receipt) => {
                wins += 1;
                println!("{plate} won sp1 (receipt {})", receipt.id);
            }
            Err(e) => println!("{plate}: {e}"),
        }
    }

    println!("winners: {wins} of {claimants}");

    Ok(())
}
