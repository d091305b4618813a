//! Reporting curves for a finished plan.
//!
//! This pass replays the placed blocks with its own accumulator, started
//! from scratch. It does not reuse the fatigue tracked while placing tasks,
//! so the reported curve can differ from the snapshots stored on blocks.

use super::block::{BlockKind, ScheduledBlock};
use crate::config::PlannerConfig;
use crate::energy::curve::{sample_times, CurvePoint};
use crate::energy::model;
use crate::task::UserContext;

/// Energy and fatigue curves over the whole availability window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanCurves {
    pub energy: Vec<CurvePoint>,
    pub fatigue: Vec<CurvePoint>,
}

/// Walk `available_from..=available_to` one quantum at a time.
///
/// `blocks` must be sorted by start.
pub fn build_curves(
    blocks: &[ScheduledBlock],
    context: &UserContext,
    cfg: &PlannerConfig,
) -> PlanCurves {
    let q = cfg.quantum_min;
    let mut consecutive = 0u32;
    let mut total = 0u32;
    let mut curves = PlanCurves::default();

    for t in sample_times(context, q) {
        match blocks.iter().find(|b| b.contains(t)).map(|b| (b.kind, b.cognitive_load)) {
            Some((BlockKind::Task, load)) if cfg.is_deep(load) => {
                consecutive += q;
                total += q;
            }
            // Fatigue is recomputed from the counters every tick, so a break
            // recovers exactly the consecutive term.
            Some((BlockKind::Break, _)) => consecutive = 0,
            _ => {}
        }

        let fatigue = model::fatigue(consecutive as f64, total as f64, cfg);
        let energy = model::energy(
            t.hour_f64(),
            context.sleep_hours,
            context.stress_level,
            context.lectures_today,
            fatigue,
            context.chronotype,
            cfg,
        );

        curves.energy.push(CurvePoint::new(t, energy));
        curves.fatigue.push(CurvePoint::new(t, fatigue));
    }

    curves
}
