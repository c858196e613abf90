//! The property the single coarse lock exists for: of N concurrent
//! claims on one resource, exactly one wins.

use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Barrier;

use inventory::types::{Category, Requester, ResourceStatus};
use reservation::audit::TracingAudit;
use reservation::error::ReservationError;
use reservation::model::{Interval, Reservation};
use reservation::service::{ClaimPolicy, ReservationService};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Spot;

impl fmt::Display for Spot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Spot")
    }
}

impl Category for Spot {
    fn rate(&self) -> u64 {
        50
    }
}

fn stay() -> Interval {
    Interval::between(
        "2024-02-20T15:00:00Z".parse().unwrap(),
        "2024-02-23T12:00:00Z".parse().unwrap(),
    )
}

async fn racing_service(
    claimants: usize,
) -> anyhow::Result<Arc<ReservationService<Spot, TracingAudit>>> {
    let svc = Arc::new(ReservationService::new(
        ClaimPolicy::two_phase(),
        Arc::new(TracingAudit),
    ));

    svc.register_resource("r1", Spot).await?;
    for i in 0..claimants {
        svc.register_requester(Requester::new(format!("u{i}"), format!("claimant {i}")))
            .await?;
    }

    Ok(svc)
}

/// Fire one `reserve` per claimant, all released by a barrier at once.
async fn race(
    svc: &Arc<ReservationService<Spot, TracingAudit>>,
    claimants: usize,
) -> anyhow::Result<Vec<(String, Result<Reservation, ReservationError>)>> {
    let barrier = Arc::new(Barrier::new(claimants));
    let mut handles = Vec::with_capacity(claimants);

    for i in 0..claimants {
        let svc = svc.clone();
        let barrier = barrier.clone();

        handles.push(tokio::spawn(async move {
            let uid = format!("u{i}");
            barrier.wait().await;
            let out = svc.reserve(&uid, "r1", stay()).await;
            (uid, out)
        }));
    }

    let mut results = Vec::with_capacity(claimants);
    for joined in join_all(handles).await {
        results.push(joined?);
    }
    Ok(results)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn exactly_one_concurrent_claim_wins() -> anyhow::Result<()> {
    const CLAIMANTS: usize = 8;

    let svc = racing_service(CLAIMANTS).await?;
    let results = race(&svc, CLAIMANTS).await?;

    let mut wins = 0;
    let mut rejections = 0;

    for (_, outcome) in &results {
        match outcome {
            Ok(_) => wins += 1,
            Err(ReservationError::ResourceUnavailable { .. }) => rejections += 1,
            Err(other) => panic!("unexpected rejection: {other}"),
        }
    }

    assert_eq!(wins, 1);
    assert_eq!(rejections, CLAIMANTS - 1);
    assert_eq!(svc.resource_status("r1").await?, ResourceStatus::Booked);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn losing_claimant_succeeds_once_the_winner_cancels() -> anyhow::Result<()> {
    let svc = racing_service(2).await?;
    let results = race(&svc, 2).await?;

    let winner = results
        .iter()
        .find_map(|(_, out)| out.as_ref().ok())
        .expect("one claim must win")
        .clone();
    let (loser_id, _) = results
        .iter()
        .find(|(_, out)| out.is_err())
        .expect("one claim must lose");

    assert_eq!(svc.resource_status("r1").await?, ResourceStatus::Booked);

    // Winner backs out; the loser can now take the resource
    svc.cancel(winner.id).await?;
    assert_eq!(svc.resource_status("r1").await?, ResourceStatus::Available);

    let retry = svc.reserve(loser_id, "r1", stay()).await?;
    assert_eq!(retry.requester_id, *loser_id);
    assert_eq!(svc.resource_status("r1").await?, ResourceStatus::Booked);

    Ok(())
}
