use std::rc::Rc;

use crate::activity::{Activity, GroupSet};
use crate::charging::charge_profile;
use crate::config::Config;
use crate::errors::SchedulerDefect;
use crate::feasibility::is_feasible;
use crate::geometry::travel_intervals;
use crate::label::{dominates, Label};
use crate::utility::evaluate_transition;

/// `bucket[t][i]` holds the non-dominated labels whose `time == t` and
/// `act_id == i`. Indexed `t` in `[0, horizon)`, `i` in `[0, num_activities)`.
pub struct Bucket {
    cells: Vec<Vec<Vec<Rc<Label>>>>,
    horizon: usize,
    num_activities: usize,
}

impl Bucket {
    fn new(horizon: usize, num_activities: usize) -> Bucket {
        Bucket {
            cells: vec![vec![Vec::new(); num_activities]; horizon],
            horizon,
            num_activities,
        }
    }

    fn cell(&self, t: i64, i: usize) -> &[Rc<Label>] {
        &self.cells[t as usize][i]
    }

    /// Inserts `candidate` into `cells[t][i]`, applying the dominance rule:
    /// every label there that `candidate` dominates is removed; if any
    /// label there dominates `candidate`, it is discarded instead. Ties
    /// (equal utility, time, mem) keep the earlier-inserted label, which
    /// falls out naturally here since a tie means neither side's
    /// `dominates` check is strict enough to evict the other — we only
    /// decline insertion, never evict on a tie.
    fn insert(&mut self, t: i64, i: usize, candidate: Label) {
        let cell = &mut self.cells[t as usize][i];

        for existing in cell.iter() {
            if dominates(existing, Some(&candidate)) {
                return;
            }
        }

        cell.retain(|existing| !dominates(&candidate, Some(existing)));
        cell.push(Rc::new(candidate));
    }
}

/// Runs the label-setting DP to completion and returns the best label in
/// the final bucket cell (dusk, at the last time-slot), or `None` if the
/// bucket cell is empty (infeasible).
///
/// `activities` must have its `forbidden_groups` already populated by any
/// prior DSSR iterations; this function does not reset them.
pub fn run(activities: &[Activity], config: &Config, initial_soc: f64) -> Result<Option<Rc<Label>>, SchedulerDefect> {
    let num_activities = activities.len();
    let horizon = config.general.horizon as usize;
    let dawn = &activities[0];
    let dusk_id = num_activities - 1;

    let mut bucket = Bucket::new(horizon, num_activities);

    let seed = Label {
        act_id: 0,
        time: dawn.min_duration,
        start_time: 0,
        duration: dawn.min_duration,
        current_soc: initial_soc,
        soc_at_activity_start: initial_soc,
        charge_duration: 0,
        charge_cost: 0.0,
        charge_cost_at_activity_start: 0.0,
        utility: 0.0,
        mem: GroupSet::singleton(dawn.group),
        charge_mode: dawn.charge_mode,
        deviation_start: 0.0,
        deviation_dur: 0.0,
        previous: None,
    };

    if seed.time < 0 || seed.time as usize >= horizon {
        return Err(SchedulerDefect::new("seed label falls outside horizon"));
    }
    bucket.insert(seed.time, 0, seed);

    for t in 0..(horizon as i64 - 1) {
        for i in 0..num_activities {
            // Labels already in the cell when we started processing it; new
            // labels this scan produces land at strictly later times and
            // are visited in a later iteration of the outer loop, so a
            // snapshot clone here is sufficient and avoids aliasing the
            // bucket while we mutate it.
            let labels: Vec<Rc<Label>> = bucket.cell(t, i).to_vec();

            for l in labels {
                let l_act = &activities[l.act_id];

                for a in activities.iter() {
                    if !is_feasible(&l, l_act, a, activities, config, num_activities) {
                        continue;
                    }

                    let new_label = extend_label(&l, l_act, a, activities, config, dusk_id)?;

                    if new_label.current_soc < -1e-9 || new_label.current_soc > 1.0 + 1e-9 {
                        return Err(SchedulerDefect::with_label(
                            format!("SOC out of range: {}", new_label.current_soc),
                            &new_label,
                        ));
                    }

                    let t_prime = new_label.time;
                    if t_prime < 0 || t_prime as usize >= horizon {
                        return Err(SchedulerDefect::with_label("label time fell outside horizon", &new_label));
                    }

                    bucket.insert(t_prime, a.id, new_label);
                }
            }
        }
    }

    let final_cell = bucket.cell(horizon as i64 - 1, dusk_id);
    let best = final_cell.iter().max_by(|a, b| a.utility.partial_cmp(&b.utility).unwrap());
    Ok(best.cloned())
}

/// Applies the label-transition rule (spec.md §4.5) to produce the label
/// reached by extending `l` (at activity `l_act`) onto candidate `a`.
fn extend_label(
    l: &Label,
    l_act: &Activity,
    a: &Activity,
    activities: &[Activity],
    config: &Config,
    _dusk_id: usize,
) -> Result<Label, SchedulerDefect> {
    if a.id == l.act_id {
        return Ok(extend_continuation(l, a, config));
    }

    let tt = travel_intervals(l_act, a, &config.general);
    let start_time = l.time + tt;
    let is_dusk = a.id == activities.len() - 1;

    let (time, duration) = if is_dusk {
        let time = config.general.horizon - 1;
        (time, time - start_time)
    } else {
        (start_time + a.min_duration, a.min_duration)
    };

    let soc_at_activity_start = l.current_soc - crate::geometry::travel_soc(l_act, a, &config.battery);

    let mut new_label = Label {
        act_id: a.id,
        time,
        start_time,
        duration,
        current_soc: soc_at_activity_start,
        soc_at_activity_start,
        charge_duration: 0,
        charge_cost: l.charge_cost,
        charge_cost_at_activity_start: l.charge_cost,
        utility: l.utility,
        // `mem` does not accumulate the predecessor's full history: a fresh
        // label's memory is just its own group plus whatever DSSR has
        // already forbidden this activity from carrying (original_source's
        // `unionLinkedLists` discards `head1` whenever `a->memory` hasn't
        // been tainted yet, which is the common case before the first DSSR
        // iteration). This is what lets a first DP pass legitimately visit
        // two activities of the same group for DSSR to then catch and
        // forbid; see dssr.rs.
        mem: GroupSet::singleton(a.group).union(a.forbidden_groups),
        charge_mode: a.charge_mode,
        deviation_start: l.deviation_start,
        deviation_dur: l.deviation_dur,
        previous: Some(Rc::new(l.clone())),
    };

    if a.is_charging {
        apply_one_charging_interval(&mut new_label, a, config);
    }

    evaluate_transition(&mut new_label, l, l_act, a, config);

    Ok(new_label)
}

fn extend_continuation(l: &Label, a: &Activity, config: &Config) -> Label {
    let mut new_label = l.clone();
    new_label.time += 1;
    new_label.duration += 1;

    if a.is_charging && new_label.current_soc < 1.0 {
        apply_one_charging_interval(&mut new_label, a, config);
    }

    new_label
}

/// Performs one interval of charging on `label`, updating `current_soc`,
/// `charge_duration` and `charge_cost` in place (spec.md §4.2, §4.5).
fn apply_one_charging_interval(label: &mut Label, a: &Activity, config: &Config) {
    let (rate, price) = charge_profile(a.charge_mode, a.group, config.battery.battery_capacity, &config.charging, &config.general);
    let (delta_soc, cost) = crate::charging::interval_charge_cost(
        label.current_soc,
        rate,
        price,
        label.time,
        &config.charging,
        &config.general,
        config.battery.battery_capacity,
    );

    label.current_soc += delta_soc;
    label.charge_duration += config.general.time_interval;
    label.charge_cost += cost;
}
