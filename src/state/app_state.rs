//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::{watch, Mutex as AsyncMutex};
use tracing::{error, info, warn};

use super::TimerSnapshot;
use crate::{
    error::{ControlError, HandoffError},
    services::NotificationCenter,
    tasks::{
        background_runner_task, display_driver_task, BackgroundStatus, Handoff, TaskSlot,
    },
    timer::{MonotonicClock, SharedEngine, StartRequest, TimerEngine},
};

/// Main application state: the one foreground timer and the tasks hosting it
#[derive(Debug)]
pub struct AppState {
    /// The foreground timer engine
    pub engine: SharedEngine,
    /// Foreground polling task, at most one per engine
    pub display_driver: AsyncMutex<TaskSlot>,
    pub poll_interval: Duration,
    /// Background run that took over a handed-off timer
    pub background: AsyncMutex<TaskSlot>,
    pub background_status: Arc<Mutex<BackgroundStatus>>,
    pub tick: Duration,
    pub notifications: Arc<NotificationCenter>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for timer updates
    pub timer_update_tx: Arc<watch::Sender<TimerSnapshot>>,
    /// Keep the receiver alive to prevent channel closure
    pub _timer_update_rx: watch::Receiver<TimerSnapshot>,
}

impl AppState {
    /// Create a new AppState with an idle timer
    pub fn new(port: u16, host: String, poll_interval: Duration, tick: Duration) -> Self {
        let (timer_update_tx, timer_update_rx) = watch::channel(TimerSnapshot::new());

        Self {
            engine: Arc::new(Mutex::new(TimerEngine::new(MonotonicClock::new()))),
            display_driver: AsyncMutex::new(TaskSlot::new("display driver")),
            poll_interval,
            background: AsyncMutex::new(TaskSlot::new("background runner")),
            background_status: Arc::new(Mutex::new(BackgroundStatus::Idle)),
            tick,
            notifications: Arc::new(NotificationCenter::new()),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            timer_update_tx: Arc::new(timer_update_tx),
            _timer_update_rx: timer_update_rx,
        }
    }

    fn lock_engine(&self) -> Result<MutexGuard<'_, TimerEngine<MonotonicClock>>, ControlError> {
        self.engine
            .lock()
            .map_err(|e| ControlError::Lock(format!("Failed to lock timer engine: {}", e)))
    }

    /// Start a new session, taking the timer back from any background run
    pub async fn start(&self, request: StartRequest) -> Result<TimerSnapshot, ControlError> {
        let mut driver = self.display_driver.lock().await;
        driver.cancel().await;
        self.cancel_background().await;

        let snapshot = {
            let mut engine = self.lock_engine()?;
            engine.start(request);
            TimerSnapshot::capture(&engine)
        };
        info!("Timer started for {}ms", snapshot.total_duration_ms);

        driver.replace(self.driver_task()).await;
        Ok(self.record("start", snapshot))
    }

    /// Pause the running timer and stop polling it
    pub async fn pause(&self) -> Result<TimerSnapshot, ControlError> {
        let mut driver = self.display_driver.lock().await;
        driver.cancel().await;

        let snapshot = {
            let mut engine = self.lock_engine()?;
            engine.try_pause().inspect_err(|e| warn!("Rejected transition: {}", e))?;
            TimerSnapshot::capture(&engine)
        };
        info!("Timer paused with {} remaining", snapshot.formatted);

        Ok(self.record("pause", snapshot))
    }

    /// Resume the paused timer and poll it again
    pub async fn resume(&self) -> Result<TimerSnapshot, ControlError> {
        let mut driver = self.display_driver.lock().await;

        let snapshot = {
            let mut engine = self.lock_engine()?;
            engine.try_resume().inspect_err(|e| warn!("Rejected transition: {}", e))?;
            TimerSnapshot::capture(&engine)
        };
        info!("Timer resumed");

        driver.replace(self.driver_task()).await;
        Ok(self.record("resume", snapshot))
    }

    /// Cancel the timer wherever it is hosted
    pub async fn cancel(&self) -> Result<TimerSnapshot, ControlError> {
        let mut driver = self.display_driver.lock().await;
        driver.cancel().await;
        self.cancel_background().await;

        let snapshot = {
            let mut engine = self.lock_engine()?;
            engine.stop();
            TimerSnapshot::capture(&engine)
        };
        info!("Timer cancelled");

        Ok(self.record("cancel", snapshot))
    }

    /// Take the running timer out of the foreground.
    ///
    /// The remaining time is read and the engine stopped under one lock, so
    /// the returned handoff is the only live copy of the timer. A timer that
    /// already reached zero is stopped and reported as nothing to track.
    pub async fn detach(&self) -> Result<Handoff, ControlError> {
        let mut driver = self.display_driver.lock().await;
        driver.cancel().await;

        let (handoff, snapshot) = {
            let mut engine = self.lock_engine()?;
            if !engine.is_running() {
                return Err(HandoffError::NotRunning(engine.timer_phase()).into());
            }
            let handoff = Handoff::new(engine.remaining_ms());
            engine.stop();
            (handoff, TimerSnapshot::capture(&engine))
        };

        // Expired but not yet stopped by the driver: the session is over and
        // a background host would only decline it
        if handoff.remaining_ms == 0 {
            info!("Timer finished before it could be detached");
            self.record("finish", snapshot);
            return Err(HandoffError::NothingToTrack.into());
        }
        info!("Timer detached with {}ms remaining", handoff.remaining_ms);

        self.record("handoff", snapshot);
        Ok(handoff)
    }

    /// Detach the running timer and let the background runner host it
    pub async fn handoff(&self) -> Result<Handoff, ControlError> {
        let handoff = self.detach().await?;
        self.spawn_background(handoff).await;
        Ok(handoff)
    }

    /// Hand a remaining-time payload to the background runner, replacing any
    /// run in progress
    pub async fn spawn_background(&self, handoff: Handoff) {
        let mut background = self.background.lock().await;
        if background.cancel().await {
            self.set_background_status(BackgroundStatus::Cancelled);
        }
        self.set_background_status(BackgroundStatus::Running);

        let notifications = Arc::clone(&self.notifications);
        let status = Arc::clone(&self.background_status);
        let tick = self.tick;
        background
            .replace(async move {
                let outcome = match background_runner_task(handoff, notifications, tick).await {
                    Ok(()) => BackgroundStatus::Finished,
                    Err(e) => {
                        warn!("Background run declined: {}", e);
                        BackgroundStatus::Declined
                    }
                };
                match status.lock() {
                    Ok(mut status) => *status = outcome,
                    Err(e) => error!("Failed to lock background status: {}", e),
                }
            })
            .await;
    }

    async fn cancel_background(&self) {
        let mut background = self.background.lock().await;
        if background.cancel().await {
            info!("Background run cancelled, foreground owns the timer");
            self.set_background_status(BackgroundStatus::Cancelled);
            self.notifications.dismiss();
        }
    }

    fn set_background_status(&self, status: BackgroundStatus) {
        match self.background_status.lock() {
            Ok(mut current) => *current = status,
            Err(e) => error!("Failed to lock background status: {}", e),
        }
    }

    fn driver_task(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        display_driver_task(
            Arc::clone(&self.engine),
            Arc::clone(&self.timer_update_tx),
            self.poll_interval,
        )
    }

    /// Track the action and publish the snapshot it produced
    fn record(&self, action: &str, snapshot: TimerSnapshot) -> TimerSnapshot {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        if let Err(e) = self.timer_update_tx.send(snapshot.clone()) {
            warn!("Failed to send timer update: {}", e);
        }
        snapshot
    }

    /// Get current timer snapshot
    pub fn get_snapshot(&self) -> Result<TimerSnapshot, String> {
        self.engine
            .lock()
            .map(|engine| TimerSnapshot::capture(&engine))
            .map_err(|e| format!("Failed to lock timer engine: {}", e))
    }

    pub fn get_background_status(&self) -> BackgroundStatus {
        self.background_status
            .lock()
            .map(|status| *status)
            .unwrap_or_default()
    }

    /// Watch the snapshots published by transitions and the display driver
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.timer_update_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::TransitionError,
        tasks::FINISHED_MESSAGE,
        timer::TimerPhase,
    };

    fn state() -> AppState {
        AppState::new(
            0,
            "127.0.0.1".to_string(),
            Duration::from_millis(100),
            Duration::from_secs(1),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_pause_resume_cancel() {
        let state = state();

        let snapshot = state.start(StartRequest::hms(0, 1, 0)).await.unwrap();
        assert_eq!(snapshot.phase, TimerPhase::Running);
        assert_eq!(snapshot.total_duration_ms, 61_000);
        assert!(state.display_driver.lock().await.is_active());

        tokio::time::sleep(Duration::from_secs(30)).await;
        let snapshot = state.pause().await.unwrap();
        assert_eq!(snapshot.phase, TimerPhase::Paused);
        assert_eq!(state.engine.lock().unwrap().saved_remaining_ms(), Some(31_000));
        assert!(!state.display_driver.lock().await.is_active());

        tokio::time::sleep(Duration::from_secs(300)).await;
        let snapshot = state.resume().await.unwrap();
        assert_eq!(snapshot.remaining_ms, 31_000);

        let snapshot = state.cancel().await.unwrap();
        assert_eq!(snapshot.phase, TimerPhase::Idle);
        assert_eq!(state.get_last_action().0.as_deref(), Some("cancel"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_transitions() {
        let state = state();

        let err = state.pause().await.unwrap_err();
        assert!(matches!(
            err,
            ControlError::Transition(TransitionError { from: TimerPhase::Idle, .. })
        ));

        state.start(StartRequest::millis(5_000)).await.unwrap();
        assert!(matches!(
            state.resume().await,
            Err(ControlError::Transition(_))
        ));
        assert_eq!(state.get_last_action().0.as_deref(), Some("start"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_display_driver_completes_session() {
        let state = state();
        let mut rx = state.subscribe();
        state.start(StartRequest::hms(0, 0, 3)).await.unwrap();

        tokio::time::sleep(Duration::from_millis(3_100)).await;

        assert_eq!(state.get_snapshot().unwrap().phase, TimerPhase::Idle);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().phase, TimerPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handoff_moves_timer_to_background() {
        let state = state();
        state.start(StartRequest::hms(0, 0, 2)).await.unwrap();

        let handoff = state.handoff().await.unwrap();
        assert_eq!(handoff.remaining_ms, 3_000);
        assert_eq!(state.get_snapshot().unwrap().phase, TimerPhase::Idle);
        assert_eq!(state.get_background_status(), BackgroundStatus::Running);

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        assert_eq!(state.get_background_status(), BackgroundStatus::Finished);
        assert_eq!(
            state.notifications.current().map(|n| n.text).as_deref(),
            Some(FINISHED_MESSAGE)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_handoff_requires_running_timer() {
        let state = state();
        state.start(StartRequest::millis(10_000)).await.unwrap();
        state.pause().await.unwrap();

        let err = state.handoff().await.unwrap_err();
        assert!(matches!(
            err,
            ControlError::Handoff(HandoffError::NotRunning(TimerPhase::Paused))
        ));
        assert_eq!(state.get_background_status(), BackgroundStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handoff_of_expired_timer_is_refused() {
        let state = state();
        // Expired, with no display driver around to stop it yet
        state.engine.lock().unwrap().start_millis(500);
        tokio::time::sleep(Duration::from_millis(600)).await;

        let err = state.handoff().await.unwrap_err();
        assert!(matches!(
            err,
            ControlError::Handoff(HandoffError::NothingToTrack)
        ));
        assert_eq!(state.get_snapshot().unwrap().phase, TimerPhase::Idle);
        assert_eq!(state.get_background_status(), BackgroundStatus::Idle);
        assert!(!state.background.lock().await.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_payload_is_declined() {
        let state = state();
        state.spawn_background(Handoff::new(0)).await;
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(state.get_background_status(), BackgroundStatus::Declined);
        assert!(state.notifications.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_reclaims_from_background() {
        let state = state();
        state.spawn_background(Handoff::new(60_000)).await;
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert!(state.notifications.current().is_some());

        state.start(StartRequest::hms(0, 0, 10)).await.unwrap();

        assert_eq!(state.get_background_status(), BackgroundStatus::Cancelled);
        assert!(state.notifications.current().is_none());
        assert!(!state.background.lock().await.is_active());
    }
}
