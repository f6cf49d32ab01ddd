//! Display payload sent to the status line and the detail panel

use serde::{Deserialize, Serialize};

use super::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPayload {
    pub time_left: u64,
    pub total_time: u64,
    pub session_type: Phase,
}

impl DisplayPayload {
    pub fn new(time_left: u64, total_time: u64, session_type: Phase) -> Self {
        Self {
            time_left,
            total_time,
            session_type,
        }
    }

    /// Fraction of the phase still left, in `0.0..=1.0`.
    pub fn fraction_left(&self) -> f64 {
        if self.total_time == 0 {
            return 0.0;
        }
        (self.time_left as f64 / self.total_time as f64).clamp(0.0, 1.0)
    }

    pub fn clock(&self) -> String {
        format_clock(self.time_left)
    }

    pub fn status_text(&self) -> String {
        status_text(self.session_type, self.time_left)
    }
}

/// `MM:SS`; minutes are not folded into hours.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub fn status_text(phase: Phase, seconds: u64) -> String {
    format!("{} Session: {}", phase, format_clock(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(2700), "45:00");
        assert_eq!(format_clock(2699), "44:59");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(7200), "120:00");
    }

    #[test]
    fn test_status_text() {
        assert_eq!(status_text(Phase::Work, 2700), "Work Session: 45:00");
        assert_eq!(status_text(Phase::Break, 900), "Break Session: 15:00");
    }

    #[test]
    fn test_payload_wire_shape() {
        let payload = DisplayPayload::new(30, 60, Phase::Break);
        let value = serde_json::to_value(payload).unwrap();

        assert_eq!(
            value,
            serde_json::json!({"timeLeft": 30, "totalTime": 60, "sessionType": "Break"})
        );
        assert!((payload.fraction_left() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fraction_left_with_zero_total() {
        let payload = DisplayPayload::new(0, 0, Phase::Work);
        assert_eq!(payload.fraction_left(), 0.0);
    }
}
