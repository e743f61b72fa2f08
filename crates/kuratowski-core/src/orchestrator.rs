use crate::error::Result;
use crate::geometry::{CircleLayout, MarkerPoint};
use crate::history::{DEFAULT_SWEEP_STEPS, MAX_SWEEP_STEPS, TrajectoryHistory, TrajectoryPoint};
use crate::marker::{MARKER_COUNT, Marker};
use crate::state::{AngleState, ArcDescriptor, Deltas};
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumString};

/// What the trajectory holds right after a reset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ResetPolicy {
    /// Nothing until the next angle change.
    #[default]
    Empty,
    /// The current delta triple, as if a render cycle ran after clearing.
    KeepCurrent,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub sweep_steps: usize,
    pub reset_policy: ResetPolicy,
    pub layout: CircleLayout,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sweep_steps: DEFAULT_SWEEP_STEPS,
            reset_policy: ResetPolicy::default(),
            layout: CircleLayout::default(),
        }
    }
}

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPayload<'a> {
    pub deltas: Deltas,
    pub arcs: Vec<ArcDescriptor>,
    pub points: [MarkerPoint; MARKER_COUNT],
    pub trajectory: &'a [TrajectoryPoint],
}

/// Owns the marker angles and the trajectory, and turns UI events into frames.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    state: AngleState,
    history: TrajectoryHistory,
    settings: Settings,
}

impl Orchestrator {
    pub fn new(state: AngleState, settings: Settings) -> Self {
        Self {
            state,
            history: TrajectoryHistory::new(),
            settings,
        }
    }

    pub fn state(&self) -> &AngleState {
        &self.state
    }

    pub fn history(&self) -> &TrajectoryHistory {
        &self.history
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn set_layout(&mut self, layout: CircleLayout) {
        self.settings.layout = layout;
    }

    /// Raw index entry point used by widget callbacks.
    pub fn on_angle_changed(&mut self, index: usize, angle: f64) -> Result<RenderPayload<'_>> {
        let marker = Marker::from_index(index)?;
        self.on_marker_moved(marker, angle)
    }

    pub fn on_marker_moved(&mut self, marker: Marker, angle: f64) -> Result<RenderPayload<'_>> {
        self.state.set_angle(marker, angle)?;
        log::trace!("{} moved to {:.4}", marker, angle);
        Ok(self.render())
    }

    /// Records the locus traced by a full turn of the reference marker, then
    /// renders. The reference marker itself does not move.
    pub fn on_cycle_triggered(&mut self) -> RenderPayload<'_> {
        let fixed = self.state.comparison_angles();
        if self.settings.sweep_steps > MAX_SWEEP_STEPS {
            log::warn!(
                "Sweep of {} steps capped at {}",
                self.settings.sweep_steps,
                MAX_SWEEP_STEPS
            );
        }
        let added = self
            .history
            .append_sweep(fixed, self.settings.sweep_steps);
        log::debug!("Sweep appended {} points ({} total)", added, self.history.len());
        self.render()
    }

    pub fn on_reset_triggered(&mut self) -> RenderPayload<'_> {
        self.history.clear();
        log::debug!("Trajectory reset ({})", self.settings.reset_policy);
        match self.settings.reset_policy {
            ResetPolicy::Empty => self.payload(),
            ResetPolicy::KeepCurrent => self.render(),
        }
    }

    /// One render cycle: records the current deltas and returns the frame.
    pub fn render(&mut self) -> RenderPayload<'_> {
        let deltas = self.state.compute_deltas();
        self.history.append(deltas.into());
        self.frame(deltas)
    }

    /// The current frame without touching the history.
    pub fn payload(&self) -> RenderPayload<'_> {
        self.frame(self.state.compute_deltas())
    }

    fn frame(&self, deltas: Deltas) -> RenderPayload<'_> {
        RenderPayload {
            deltas,
            arcs: self.state.compute_arcs(),
            points: self.state.compute_points(&self.settings.layout),
            trajectory: self.history.snapshot(),
        }
    }
}
