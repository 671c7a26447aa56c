//! Drives a [`Scenario`] against a headless mascot.

use crate::report::{RunReport, StepFailure};
use crate::scenario::{Scenario, Step};
use dia_core::{Scheduler, DEFAULT_FRAME_MS};
use dia_mascot::{DiaConfig, MascotController, MascotOptions, MascotSnapshot, PointerOffset};
use dia_theme::AmbientPreference;
use std::cell::Cell;
use std::rc::Rc;

/// Offsets closer than this compare equal in `assert_offset`
const OFFSET_EPSILON: f64 = 1e-9;

/// Final outcome of a scenario run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: RunReport,
    /// Snapshots captured by `snapshot` steps, in order
    pub snapshots: Vec<MascotSnapshot>,
}

/// Execute a loaded scenario against a fresh mascot.
pub fn run_scenario(scenario: &Scenario, options: MascotOptions) -> RunOutcome {
    let scheduler = Scheduler::new();
    let preference = AmbientPreference::new(scenario.initial_scheme);
    let anchor = scenario.anchor.map(|a| a.rect());
    let mascot = MascotController::new(scheduler.clone(), options, &preference, move || anchor);

    let notifications = Rc::new(Cell::new(0usize));
    let counter = notifications.clone();
    let _changes = mascot.subscribe(move |_| counter.set(counter.get() + 1));

    let start_frames = scheduler.frame_count();
    let mut snapshots = Vec::new();
    let mut failure = None;

    for (step_index, step) in scenario.steps.iter().enumerate() {
        tracing::debug!("step {}: {}", step_index, step.name());
        if let Err(message) = apply_step(step, &mascot, &scheduler, &preference, &mut snapshots) {
            tracing::debug!("step {} failed: {}", step_index, message);
            failure = Some(StepFailure {
                step_index,
                step: step.name(),
                message,
            });
            break;
        }
    }

    let elapsed = (scheduler.frame_count() - start_frames, scheduler.now_ms());
    let report = RunReport::new(
        failure,
        elapsed,
        &mascot.snapshot(),
        notifications.get(),
        snapshots.len(),
    );
    RunOutcome { report, snapshots }
}

/// Run one step; assertion steps return the mismatch as `Err`
fn apply_step(
    step: &Step,
    mascot: &MascotController,
    scheduler: &Scheduler,
    preference: &AmbientPreference,
    snapshots: &mut Vec<MascotSnapshot>,
) -> Result<(), String> {
    match step {
        Step::Install { locale } => mascot.install_config(DiaConfig::new(locale.clone())),
        Step::Activate => {
            // NotConfigured is logged by the controller and leaves state untouched
            let _ = mascot.activate();
        }
        Step::Initialize => mascot.initialize(),
        Step::PointerMove { x, y } => mascot.handle_pointer_move(*x, *y),
        Step::Frame { count } => {
            for _ in 0..*count {
                scheduler.run_frame();
            }
        }
        Step::Wait { ms } => scheduler.advance_with_frames(*ms, DEFAULT_FRAME_MS),
        Step::SetScheme { scheme } => preference.set(*scheme),
        Step::SetTheme { theme } => mascot.set_theme_config(theme.clone()),
        Step::Snapshot => snapshots.push(mascot.snapshot()),
        Step::AssertVisible { visible } => {
            let actual = mascot.is_visible();
            if actual != *visible {
                return Err(format!("expected visible = {visible}, got {actual}"));
            }
        }
        Step::AssertOffset { x, y } => {
            let expected = PointerOffset::new(*x, *y);
            let actual = mascot.snapshot().pointer_offset;
            if !offsets_match(expected, actual) {
                return Err(format!(
                    "expected offset ({}, {}), got ({}, {})",
                    expected.x, expected.y, actual.x, actual.y
                ));
            }
        }
    }
    Ok(())
}

fn offsets_match(expected: PointerOffset, actual: PointerOffset) -> bool {
    (expected.x - actual.x).abs() < OFFSET_EPSILON && (expected.y - actual.y).abs() < OFFSET_EPSILON
}
