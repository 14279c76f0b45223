//! Live timeline view
//!
//! Re-renders one trip's timeline on every tick of a [`GlobalClock`] and
//! runs a lifecycle refresh on a slower interval, until the process receives
//! SIGINT or SIGTERM. Status writes are drained from one [`StatusSession`]
//! held for the whole watch.

use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use nexstep_core::{params::Id, Agency, GlobalClock, StatusSession, TimelineView};
use tokio::{
    signal::unix::{signal, SignalKind},
    sync::mpsc,
    time::{self, MissedTickBehavior},
};

use crate::renderer::TerminalRenderer;

pub async fn run(
    agency: Agency,
    renderer: TerminalRenderer,
    trip_id: u64,
    tick_interval: Duration,
    refresh_interval: Duration,
) -> Result<()> {
    let params = Id { id: trip_id };
    let mut view = agency
        .trip_timeline(&params)
        .await
        .context("Failed to build timeline")?;

    let clock = GlobalClock::new(agency.time_source(), tick_interval);
    let (tick_tx, mut ticks) = mpsc::unbounded_channel();
    let _subscription = clock.subscribe(move |now| {
        if tick_tx.send(now).is_err() {
            debug!("Tick dropped; watch loop has exited");
        }
    });
    clock.start().context("Failed to start clock")?;

    let mut session = agency.status_session();
    let mut refresh = time::interval(refresh_interval);
    refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    info!("Watching trip {trip_id} (tick {tick_interval:?}, refresh {refresh_interval:?})");

    loop {
        tokio::select! {
            Some(now) = ticks.recv() => {
                view.set_now(now);
                renderer.redraw(&view.to_string())?;
            }
            _ = refresh.tick() => {
                match session.refresh().await {
                    Ok(queued) if !queued.is_empty() => {
                        debug!("Queued {} status write(s)", queued.len());
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Status refresh failed: {e}"),
                }
                reload(&agency, &params, &mut view).await;
                view.set_now(clock.current());
                renderer.redraw(&view.to_string())?;
            }
            Some(outcome) = session.next_outcome() => {
                if outcome.transition.trip_id == trip_id {
                    reload(&agency, &params, &mut view).await;
                    view.set_now(clock.current());
                    renderer.redraw(&view.to_string())?;
                }
                log_pending(&session);
            }
            _ = sigint.recv() => {
                info!("Received SIGINT, stopping watch");
                break;
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, stopping watch");
                break;
            }
        }
    }

    clock.stop();
    Ok(())
}

async fn reload(agency: &Agency, params: &Id, view: &mut TimelineView) {
    match agency.trip_timeline(params).await {
        Ok(fresh) => *view = fresh,
        Err(e) => warn!("Failed to reload trip {}: {e}", params.id),
    }
}

fn log_pending(session: &StatusSession) {
    if session.in_flight() > 0 {
        debug!("{} status write(s) still in flight", session.in_flight());
    }
}
