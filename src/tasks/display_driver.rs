//! Foreground polling task that publishes timer snapshots

use std::{sync::Arc, time::Duration};

use tokio::{sync::watch, time::sleep};
use tracing::{debug, error, info, warn};

use crate::{
    state::TimerSnapshot,
    timer::{Clock, SharedEngine},
};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Poll the engine every `interval` and publish what it reports.
///
/// Once progress reaches 100 the session is over: the engine is stopped and
/// the idle snapshot published. The task also exits, without touching the
/// engine, if it finds the timer no longer running.
pub async fn display_driver_task<C>(
    engine: SharedEngine<C>,
    snapshots: Arc<watch::Sender<TimerSnapshot>>,
    interval: Duration,
) where
    C: Clock + 'static,
{
    debug!("Display driver started, polling every {:?}", interval);

    loop {
        let snapshot = match engine.lock() {
            Ok(engine) => TimerSnapshot::capture(&engine),
            Err(e) => {
                error!("Failed to lock timer engine: {}", e);
                return;
            }
        };

        if !snapshot.is_running() {
            debug!("Timer is {}, display driver exiting", snapshot.phase);
            return;
        }

        let complete = snapshot.is_complete();
        publish(&snapshots, snapshot);
        if complete {
            break;
        }

        sleep(interval).await;
    }

    let snapshot = match engine.lock() {
        Ok(mut engine) => {
            engine.stop();
            TimerSnapshot::capture(&engine)
        }
        Err(e) => {
            error!("Failed to lock timer engine: {}", e);
            return;
        }
    };

    info!("Timer finished");
    publish(&snapshots, snapshot);
}

fn publish(snapshots: &watch::Sender<TimerSnapshot>, snapshot: TimerSnapshot) {
    debug!(
        "{} ({}%)",
        snapshot.formatted, snapshot.progress_percent
    );
    if let Err(e) = snapshots.send(snapshot) {
        warn!("Failed to publish timer snapshot: {}", e);
    }
}
