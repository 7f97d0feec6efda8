//! Per-frame render/impact tick
//!
//! One call per host animation frame. `now` is sampled once by the caller and
//! shared by every arc and every drawing computation in the frame. All impacts
//! found in a frame are applied in a single store mutation before the tick
//! returns, so the next frame always sees them.

use std::f32::consts::{PI, TAU};

use super::arc::{ImpactState, impact_intensity};
use super::state::Snapshot;
use super::timeline::Clock;
use crate::audio::NoteEvent;
use crate::consts::*;
use crate::renderer::{Color, Layout, LineCap, LineStyle, Surface, arc_color, marker_color};
use crate::store::Store;

/// One fired impact
#[derive(Debug, Clone, PartialEq)]
pub struct Impact {
    pub index: u32,
    /// Instant the impact was scheduled for
    pub scheduled: f64,
    /// Frame time at which it fired (>= scheduled)
    pub fired: f64,
}

/// What a tick did, for the caller's logging and for tests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub impacts: Vec<Impact>,
    pub notes_dispatched: usize,
}

/// Whether the driver should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// Arcs due at `now`, in index order
pub fn detect_impacts(snapshot: &Snapshot, now: f64) -> Vec<Impact> {
    snapshot
        .arcs
        .iter()
        .filter(|arc| arc.impact_state(now) == ImpactState::Firing)
        .map(|arc| Impact {
            index: arc.index,
            scheduled: arc.next_impact_time,
            fired: now,
        })
        .collect()
}

/// Re-arm every impacted arc on a draft snapshot
pub fn apply_impacts(draft: &mut Snapshot, impacts: &[Impact], now: f64) {
    for impact in impacts {
        if let Some(arc) = draft.arcs.get_mut(impact.index as usize) {
            arc.rearm(now);
        }
    }
}

/// Send one note per impact to the instrument, if one is loaded
pub fn dispatch_notes(snapshot: &Snapshot, impacts: &[Impact]) -> usize {
    let Some(instrument) = &snapshot.instrument else {
        return 0;
    };
    let settings = &snapshot.settings;

    let mut dispatched = 0;
    for impact in impacts {
        let note = snapshot
            .arcs
            .get(impact.index as usize)
            .and_then(|arc| arc.note.clone())
            .unwrap_or_else(|| DEFAULT_NOTE.to_string());
        instrument.start(&NoteEvent {
            note,
            time: impact.fired,
            duration_ms: settings.note_duration_ms,
            decay_ms: settings.note_decay_ms,
        });
        dispatched += 1;
    }
    dispatched
}

/// Draw the current frame
pub fn draw<S: Surface + ?Sized>(surface: &mut S, snapshot: &Snapshot, now: f64) {
    surface.fit_viewport();
    surface.clear();

    let (width, height) = surface.size();
    let settings = &snapshot.settings;
    let layout = Layout::new(width, height, settings.number_of_arcs);

    surface.line(
        layout.start,
        layout.end,
        &LineStyle {
            cap: LineCap::Round,
            color: Color::WHITE,
            width: BASELINE_WIDTH,
        },
    );

    for arc in &snapshot.arcs {
        let intensity = impact_intensity(now, arc.last_impact_time, settings.decay_window_ms);
        let radius = layout.arc_radius(arc.index);

        surface.stroke_arc(
            layout.center,
            radius,
            PI,
            TAU,
            &LineStyle {
                cap: LineCap::Round,
                color: arc_color(arc.hue, intensity),
                width: ARC_WIDTH,
            },
        );

        let angle = arc.angle_at(now, settings.start_time) as f32;
        let position = layout.marker_position(arc.index, angle);
        surface.fill_disc(position, MARKER_RADIUS, &marker_color(arc.hue, intensity));
    }
}

/// Run one frame against the store
pub fn tick<S: Surface + ?Sized>(store: &Store<Snapshot>, surface: &mut S, now: f64) -> TickReport {
    let snapshot = store.read();
    draw(surface, &snapshot, now);

    let impacts = detect_impacts(&snapshot, now);
    if impacts.is_empty() {
        return TickReport::default();
    }
    drop(snapshot);

    if let Err(e) = store.mutate(|draft| apply_impacts(draft, &impacts, now)) {
        log::warn!("Impacts at {:.0} not applied: {}", now, e);
        return TickReport::default();
    }

    // Fresh read: the instrument may have arrived since the frame started
    let snapshot = store.read();
    let notes_dispatched = dispatch_notes(&snapshot, &impacts);
    for impact in &impacts {
        log::debug!(
            "Arc {} impact at {:.0} (scheduled {:.0})",
            impact.index,
            impact.fired,
            impact.scheduled
        );
    }

    TickReport {
        impacts,
        notes_dispatched,
    }
}

/// One host frame: sample the clock once, tick if there is a surface.
///
/// A missing surface stops the loop quietly.
pub fn run_frame<S, C>(store: &Store<Snapshot>, surface: Option<&mut S>, clock: &C) -> LoopControl
where
    S: Surface + ?Sized,
    C: Clock + ?Sized,
{
    let Some(surface) = surface else {
        log::warn!("Drawing surface unavailable, stopping");
        return LoopControl::Stop;
    };
    let now = clock.now_ms();
    tick(store, surface, now);
    LoopControl::Continue
}
