//! Frame-stepped scenario harness.
//!
//! A scenario steps a small interaction setup for a fixed number of frames and
//! records a snapshot after each one. The recording is either returned for
//! direct assertions or compared against a golden JSON file.

use crate::snapshot::assert_json_snapshot;
use anyhow::Result;
use hoverkit_core::FrameTick;
use serde::Serialize;
use std::path::PathBuf;

/// Single snapshot captured after a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioFrame<S> {
    /// Frame number (0 is the state before any step).
    pub tick: u64,
    /// Snapshot payload.
    pub snapshot: S,
}

/// Ordered recording of a scenario run.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioRecording<S> {
    /// Human-readable name.
    pub name: String,
    /// Frames in order; `frames.len() == steps + 1`.
    pub frames: Vec<ScenarioFrame<S>>,
}

impl<S> ScenarioRecording<S> {
    /// Snapshots without their frame numbers.
    pub fn snapshots(&self) -> impl Iterator<Item = &S> {
        self.frames.iter().map(|frame| &frame.snapshot)
    }
}

/// Step `state` `steps` times, snapshotting before the first step and after each.
pub fn record_frames<State, Snapshot, StepFn, SnapFn>(
    name: impl Into<String>,
    steps: u64,
    mut state: State,
    mut step: StepFn,
    mut snapshot: SnapFn,
) -> ScenarioRecording<Snapshot>
where
    StepFn: FnMut(FrameTick, &mut State),
    SnapFn: FnMut(FrameTick, &State) -> Snapshot,
{
    let mut frames = Vec::with_capacity(steps as usize + 1);

    let mut tick = FrameTick::ZERO;
    frames.push(ScenarioFrame {
        tick: tick.0,
        snapshot: snapshot(tick, &state),
    });

    for _ in 0..steps {
        step(tick, &mut state);
        tick = tick.advance(1);
        frames.push(ScenarioFrame {
            tick: tick.0,
            snapshot: snapshot(tick, &state),
        });
    }

    ScenarioRecording {
        name: name.into(),
        frames,
    }
}

/// Record a scenario and assert (or update) its golden file at `golden`.
pub fn run_snapshot_scenario<State, Snapshot, StepFn, SnapFn>(
    name: impl Into<String>,
    steps: u64,
    golden: PathBuf,
    state: State,
    step: StepFn,
    snapshot: SnapFn,
) -> Result<()>
where
    Snapshot: Serialize,
    StepFn: FnMut(FrameTick, &mut State),
    SnapFn: FnMut(FrameTick, &State) -> Snapshot,
{
    let recording = record_frames(name, steps, state, step, snapshot);
    assert_json_snapshot(golden, &recording)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_initial_frame_plus_each_step() {
        let recording = record_frames(
            "counter",
            3,
            0u32,
            |_, count| *count += 2,
            |tick, count| (tick.0, *count),
        );

        assert_eq!(recording.frames.len(), 4);
        let snaps: Vec<_> = recording.snapshots().copied().collect();
        assert_eq!(snaps, vec![(0, 0), (1, 2), (2, 4), (3, 6)]);
    }
}
