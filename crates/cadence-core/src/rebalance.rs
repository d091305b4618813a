//! Task rebalancing between scheduling attempts.
//!
//! Under high stress every load is capped; any task longer than the
//! consecutive deep-work limit is split into equal parts. The planner runs
//! this when the engine reports overload and tries again.

use tracing::debug;

use crate::config::PlannerConfig;
use crate::task::Task;

/// Cap loads under stress and split long tasks.
///
/// Order is preserved; a split task's parts take its place in sequence.
/// Part `i` of `n` is titled `"{title} (Part {i})"` and lasts
/// `ceil(duration / n)` minutes, so the parts together may run slightly
/// longer than the original.
pub fn rebalance_tasks(tasks: &[Task], stress_level: u8, cfg: &PlannerConfig) -> Vec<Task> {
    let cap_loads = stress_level >= cfg.stress_cap_threshold;
    let limit = cfg.consec_threshold_min;
    let mut out = Vec::with_capacity(tasks.len());

    for task in tasks {
        let load = if cap_loads {
            task.cognitive_load.min(cfg.max_load_under_stress)
        } else {
            task.cognitive_load
        };

        if task.duration_minutes > limit {
            let parts = task.duration_minutes.div_ceil(limit);
            let part_minutes = task.duration_minutes.div_ceil(parts);
            debug!(task = %task.title, parts, part_minutes, "splitting long task");
            out.extend((1..=parts).map(|i| {
                task.derive(format!("{} (Part {i})", task.title), part_minutes, load)
            }));
        } else {
            out.push(task.derive(task.title.clone(), task.duration_minutes, load));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_tasks_pass_through() {
        let cfg = PlannerConfig::default();
        let tasks = vec![Task::new("Email", 30, 3.0), Task::new("Essay", 90, 8.0)];
        assert_eq!(rebalance_tasks(&tasks, 2, &cfg), tasks);
    }

    #[test]
    fn long_task_is_split_into_equal_parts() {
        let cfg = PlannerConfig::default();
        let tasks = vec![Task::new("Thesis", 200, 8.0).with_category("research")];
        let out = rebalance_tasks(&tasks, 2, &cfg);

        assert_eq!(out.len(), 3);
        let titles: Vec<&str> = out.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Thesis (Part 1)", "Thesis (Part 2)", "Thesis (Part 3)"]);
        assert!(out.iter().all(|t| t.duration_minutes == 67));
        assert!(out.iter().all(|t| t.category == "research"));
        assert!(out.iter().all(|t| t.cognitive_load == 8.0));
    }

    #[test]
    fn high_stress_caps_every_load() {
        let cfg = PlannerConfig::default();
        let tasks = vec![Task::new("Proof", 60, 9.0), Task::new("Email", 15, 2.0)];
        let out = rebalance_tasks(&tasks, 4, &cfg);
        assert_eq!(out[0].cognitive_load, 5.0);
        assert_eq!(out[1].cognitive_load, 2.0);
    }

    #[test]
    fn split_keeps_position_in_sequence() {
        let cfg = PlannerConfig::default();
        let tasks = vec![
            Task::new("A", 30, 3.0),
            Task::new("B", 180, 7.0),
            Task::new("C", 30, 3.0),
        ];
        let out = rebalance_tasks(&tasks, 1, &cfg);
        let titles: Vec<&str> = out.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["A", "B (Part 1)", "B (Part 2)", "C"]);
        assert_eq!(out[1].duration_minutes, 90);
    }
}
