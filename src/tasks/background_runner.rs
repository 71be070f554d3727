//! Background countdown task re-hosting a handed-off timer

use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::{
    error::HandoffError,
    services::Notifier,
    timer::{MonotonicClock, TimerEngine},
};

/// Terminal notification once the countdown reaches zero
pub const FINISHED_MESSAGE: &str = "Timer is finished!";

pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// The single value passed from a foreground host to a background one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handoff {
    pub remaining_ms: u64,
}

impl Handoff {
    pub fn new(remaining_ms: u64) -> Self {
        Self { remaining_ms }
    }
}

/// Outcome of the most recent background run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundStatus {
    #[default]
    Idle,
    Running,
    Finished,
    Declined,
    Cancelled,
}

/// Count a handed-off timer down to zero, posting the remaining time every
/// tick and [`FINISHED_MESSAGE`] at the end.
///
/// A zero payload means the timer already finished: the run is declined with
/// [`HandoffError::NothingToTrack`] and nothing is posted.
pub async fn background_runner_task<N>(
    handoff: Handoff,
    notifier: Arc<N>,
    tick: Duration,
) -> Result<(), HandoffError>
where
    N: Notifier + ?Sized,
{
    if handoff.remaining_ms == 0 {
        warn!("Declining background run: timer already finished");
        return Err(HandoffError::NothingToTrack);
    }

    info!("Starting background timer with {}ms remaining", handoff.remaining_ms);

    let mut engine = TimerEngine::new(MonotonicClock::new());
    engine.start_millis(handoff.remaining_ms);

    while engine.is_running() {
        notifier.notify(&engine.formatted_remaining());

        sleep(tick).await;

        let remaining = engine.remaining_ms();
        debug!("Background tick: {}ms remaining", remaining);
        if remaining == 0 {
            engine.stop();
            notifier.notify(FINISHED_MESSAGE);
        }
    }

    info!("Background timer finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        texts: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        fn texts(&self) -> Vec<String> {
            self.texts.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, text: &str) {
            self.texts.lock().unwrap().push(text.to_string());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_counts_down_and_finishes() {
        let notifier = Arc::new(RecordingNotifier::default());
        let started = tokio::time::Instant::now();

        background_runner_task(Handoff::new(3_000), Arc::clone(&notifier), DEFAULT_TICK)
            .await
            .unwrap();

        assert_eq!(
            notifier.texts(),
            vec!["00:00:03", "00:00:02", "00:00:01", FINISHED_MESSAGE]
        );
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_second_rounds_down() {
        let notifier = Arc::new(RecordingNotifier::default());

        background_runner_task(Handoff::new(2_500), Arc::clone(&notifier), DEFAULT_TICK)
            .await
            .unwrap();

        assert_eq!(
            notifier.texts(),
            vec!["00:00:02", "00:00:01", "00:00:00", FINISHED_MESSAGE]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_payload_is_declined_silently() {
        let notifier = Arc::new(RecordingNotifier::default());

        let result =
            background_runner_task(Handoff::new(0), Arc::clone(&notifier), DEFAULT_TICK).await;

        assert_eq!(result, Err(HandoffError::NothingToTrack));
        assert!(notifier.texts().is_empty());
    }

    #[test]
    fn test_handoff_payload_shape() {
        let json = serde_json::to_string(&Handoff::new(42_000)).unwrap();
        assert_eq!(json, r#"{"remaining_ms":42000}"#);

        let parsed: Handoff = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.remaining_ms, 42_000);
    }
}
