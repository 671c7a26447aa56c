//! Summary printed after a scenario run.

use anyhow::Result;
use dia_mascot::{ActivationState, MascotSnapshot};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// The assertion step that stopped a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepFailure {
    pub step_index: usize,
    pub step: &'static str,
    pub message: String,
}

/// Outcome of a run plus the mascot's state when it stopped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<StepFailure>,
    pub elapsed_frames: u64,
    pub elapsed_ms: u64,
    /// Change notifications delivered to subscribers
    pub notifications: usize,
    /// Snapshots captured by `snapshot` steps
    pub snapshots_taken: usize,
    pub final_state: ActivationState,
    pub visible: bool,
    pub eye_transform: String,
}

impl RunReport {
    pub fn new(
        failure: Option<StepFailure>,
        (elapsed_frames, elapsed_ms): (u64, u64),
        last: &MascotSnapshot,
        notifications: usize,
        snapshots_taken: usize,
    ) -> Self {
        let status = if failure.is_some() {
            ReportStatus::Failed
        } else {
            ReportStatus::Passed
        };
        Self {
            status,
            failure,
            elapsed_frames,
            elapsed_ms,
            notifications,
            snapshots_taken,
            final_state: last.activation_state,
            visible: last.visible,
            eye_transform: last.eye_transform(),
        }
    }

    pub fn write_json<W: Write>(&self, writer: &mut W, compact: bool) -> Result<()> {
        if compact {
            serde_json::to_writer(&mut *writer, self)?;
        } else {
            serde_json::to_writer_pretty(&mut *writer, self)?;
        }
        writer.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dia_core::{Rect, Scheduler};
    use dia_mascot::{MascotController, MascotOptions};
    use dia_theme::AmbientPreference;

    fn snapshot() -> MascotSnapshot {
        let preference = AmbientPreference::default();
        let mascot = MascotController::new(
            Scheduler::new(),
            MascotOptions::default(),
            &preference,
            || Some(Rect::at(0.0, 0.0)),
        );
        mascot.snapshot()
    }

    #[test]
    fn test_status_follows_failure() {
        let last = snapshot();
        let passed = RunReport::new(None, (3, 48), &last, 2, 1);
        assert_eq!(passed.status, ReportStatus::Passed);
        assert_eq!(passed.final_state, ActivationState::Uninitialized);
        assert_eq!(passed.eye_transform, "translateY(0) translateX(0)");

        let failure = StepFailure {
            step_index: 4,
            step: "assert_visible",
            message: "expected visible = true, got false".into(),
        };
        let failed = RunReport::new(Some(failure), (3, 48), &last, 2, 1);
        assert_eq!(failed.status, ReportStatus::Failed);
        assert_eq!(failed.failure.map(|f| f.step_index), Some(4));
    }

    #[test]
    fn test_compact_json_is_one_line() {
        let report = RunReport::new(None, (0, 0), &snapshot(), 0, 0);
        let mut out = Vec::new();
        report.write_json(&mut out, true).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains(r#""status":"passed""#));
        assert!(text.contains(r#""final_state":"uninitialized""#));
        assert!(!text.contains("failure"));
    }
}
