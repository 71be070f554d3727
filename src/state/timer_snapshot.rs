//! Point-in-time view of the timer engine

use serde::{Deserialize, Serialize};

use crate::timer::{Clock, TimerEngine, TimerPhase};

/// Everything a display needs to render the timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub remaining_ms: u64,
    /// Remaining time as `HH:MM:SS`
    pub formatted: String,
    pub progress_percent: u8,
    pub total_duration_ms: u64,
}

impl TimerSnapshot {
    /// Create the snapshot of an engine that was never started
    pub fn new() -> Self {
        Self {
            phase: TimerPhase::Idle,
            remaining_ms: 0,
            formatted: "00:00:00".to_string(),
            progress_percent: 0,
            total_duration_ms: 0,
        }
    }

    /// Read every query of the engine at once
    pub fn capture<C: Clock>(engine: &TimerEngine<C>) -> Self {
        let remaining_ms = engine.remaining_ms();
        Self {
            phase: engine.timer_phase(),
            remaining_ms,
            formatted: crate::timer::engine::format_hms(remaining_ms),
            progress_percent: engine.progress_percent(),
            total_duration_ms: engine.total_duration_ms(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    pub fn is_complete(&self) -> bool {
        self.progress_percent >= 100
    }
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualClock;

    #[test]
    fn test_capture_running_engine() {
        let clock = ManualClock::new();
        let mut engine = TimerEngine::new(clock.clone());
        engine.start_hms(0, 0, 10);
        clock.advance(5_000);

        let snapshot = TimerSnapshot::capture(&engine);
        assert!(snapshot.is_running());
        assert_eq!(snapshot.remaining_ms, 6_000);
        assert_eq!(snapshot.formatted, "00:00:06");
        assert_eq!(snapshot.progress_percent, 50);
        assert_eq!(snapshot.total_duration_ms, 11_000);
        assert!(!snapshot.is_complete());
    }

    #[test]
    fn test_idle_snapshot_matches_fresh_engine() {
        let engine = TimerEngine::new(ManualClock::new());
        assert_eq!(TimerSnapshot::capture(&engine), TimerSnapshot::new());
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(TimerSnapshot::new()).unwrap();
        assert_eq!(value["phase"], "idle");
        assert_eq!(value["formatted"], "00:00:00");
        assert_eq!(value["progress_percent"], 0);
    }
}
