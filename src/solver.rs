use std::rc::Rc;
use std::time::Instant;

use log::{debug, info, warn};

use crate::activity::Activity;
use crate::config::Config;
use crate::dp;
use crate::dssr::{self, DssrOutcome};
use crate::errors::SchedulerDefect;
use crate::label::{chain_tail_to_head, Label};
use crate::rng::SocSampler;

/// Hard cap on DSSR outer-loop iterations. The loop is guaranteed to
/// terminate because each iteration strictly enlarges at least one
/// activity's `forbidden_groups` set and those sets are bounded by the
/// number of groups (spec.md §4.6); this cap only guards against the
/// programming-defect case named in spec.md §7.
const MAX_DSSR_ITERATIONS: usize = crate::activity::NUM_GROUPS * 16;

/// Result of a completed `Scheduler::solve()` call, matching spec.md §7's
/// tagged-result design note in place of the original's null-return
/// convention.
pub enum SolveOutcome {
    /// A cycle-free schedule was found; the final label's chain (tail to
    /// head) is the schedule.
    Converged(Rc<Label>),
    /// The DP's final bucket cell was empty on every DSSR iteration up to
    /// convergence: no feasible dawn-to-dusk schedule exists.
    Infeasible,
}

/// One entry of the rendered schedule, suitable for a caller to print or
/// serialise without reaching into `Label`/`Activity` internals.
#[derive(Debug, Clone)]
pub struct ScheduleEntry {
    pub activity_id: usize,
    pub start_time: i64,
    pub end_time: i64,
    pub duration: i64,
    pub soc_at_start: f64,
    pub soc_at_end: f64,
    pub charge_cost: f64,
}

/// Public facade binding the Initialisation API and Solve API of spec.md §6
/// together. A `Scheduler` owns one `Config`, an optional fixed initial SOC
/// override, a seedable SOC sampler, and (after `set_activities`) the
/// candidate activity array it borrows for the duration of a solve.
pub struct Scheduler {
    config: Config,
    activities: Vec<Activity>,
    fixed_initial_soc: Option<f64>,
    sampler: SocSampler,
    final_schedule: Option<Rc<Label>>,
    total_time: f64,
    dssr_count: usize,
}

impl Scheduler {
    pub fn new(config: Config) -> Scheduler {
        Scheduler {
            config,
            activities: Vec::new(),
            fixed_initial_soc: None,
            sampler: SocSampler::from_entropy(),
            final_schedule: None,
            total_time: 0.0,
            dssr_count: 0,
        }
    }

    /// Supplies the candidate activity array for the next solve (spec.md §6
    /// `set_activities`). The previous array, if any, is dropped.
    pub fn set_activities(&mut self, activities: Vec<Activity>) {
        self.activities = activities;
    }

    pub fn set_fixed_initial_soc(&mut self, soc: f64) {
        self.fixed_initial_soc = Some(soc);
    }

    pub fn clear_fixed_initial_soc(&mut self) {
        self.fixed_initial_soc = None;
    }

    pub fn set_random_seed(&mut self, seed: u64) {
        self.sampler = SocSampler::from_seed(seed);
    }

    /// Runs `solve()`: the `do { DP(); best = argmax(...); } while(DSSR(best))`
    /// loop of spec.md §2, restarting the DP from scratch on every DSSR
    /// cycle detection and returning the first cycle-free best label, or
    /// `Infeasible` if no dawn-to-dusk label ever survives.
    pub fn solve(&mut self) -> Result<SolveOutcome, SchedulerDefect> {
        let started = Instant::now();
        self.dssr_count = 0;

        for a in self.activities.iter_mut() {
            a.reset_forbidden_groups();
        }

        let initial_soc = match self.fixed_initial_soc {
            Some(soc) => soc,
            None => self.sampler.sample_initial_soc(&self.config.battery),
        };

        let outcome = loop {
            let best = dp::run(&self.activities, &self.config, initial_soc)?;

            let best = match best {
                Some(b) => b,
                None => break SolveOutcome::Infeasible,
            };

            match dssr::inspect(&best, &mut self.activities, self.activities.len()) {
                DssrOutcome::Converged => break SolveOutcome::Converged(best),
                DssrOutcome::CycleFound => {
                    self.dssr_count += 1;
                    if self.dssr_count > MAX_DSSR_ITERATIONS {
                        return Err(SchedulerDefect::new(format!(
                            "DSSR did not converge within {} iterations",
                            MAX_DSSR_ITERATIONS
                        )));
                    }
                    debug!("DSSR cycle found, restarting DP (iteration {})", self.dssr_count);
                }
            }
        };

        self.total_time = started.elapsed().as_secs_f64();

        match &outcome {
            SolveOutcome::Converged(best) => {
                info!(
                    "solve converged: utility={:.3} dssr_count={} wall_clock={:.3}s",
                    best.utility, self.dssr_count, self.total_time
                );
                self.final_schedule = Some(Rc::clone(best));
            }
            SolveOutcome::Infeasible => {
                warn!("solve returned infeasible after {} DSSR iterations", self.dssr_count);
                self.final_schedule = None;
            }
        }

        Ok(outcome)
    }

    /// Returns the final schedule as an ordered list of activity visits
    /// (head to tail), or `None` if the last solve was infeasible or has not
    /// run yet.
    pub fn get_final_schedule(&self) -> Option<Vec<ScheduleEntry>> {
        let tail = self.final_schedule.as_ref()?;
        let mut chain = chain_tail_to_head(tail);
        chain.reverse();

        let mut entries = Vec::with_capacity(chain.len());
        if let Some(dawn) = start_entry_for_dawn(&chain) {
            entries.push(dawn);
        }
        entries.extend(chain.windows(2).map(|w| {
            let end = &w[1];
            ScheduleEntry {
                activity_id: end.act_id,
                start_time: end.start_time,
                end_time: end.time,
                duration: end.duration,
                soc_at_start: end.soc_at_activity_start,
                soc_at_end: end.current_soc,
                charge_cost: end.charge_cost,
            }
        }));

        Some(entries)
    }

    pub fn get_total_time(&self) -> f64 {
        self.total_time
    }

    pub fn get_count(&self) -> usize {
        self.dssr_count
    }
}

/// Dawn never appears as a transition target so it has no entry of its own
/// in `get_final_schedule`'s sliding-window pass; this reconstructs it for
/// callers who want the full head-to-tail listing including dawn.
fn start_entry_for_dawn(chain: &[Rc<Label>]) -> Option<ScheduleEntry> {
    let dawn = chain.first()?;
    Some(ScheduleEntry {
        activity_id: dawn.act_id,
        start_time: dawn.start_time,
        end_time: dawn.time,
        duration: dawn.duration,
        soc_at_start: dawn.soc_at_activity_start,
        soc_at_end: dawn.current_soc,
        charge_cost: dawn.charge_cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityGroup, ChargeMode, GroupSet};
    use crate::config::{BatteryParameters, ChargingParameters, ChargingUtilityParameters, General, UtilityParameters};

    fn test_config(horizon: i64) -> Config {
        Config {
            general: General {
                log_path: "x".into(),
                log_level: log::LevelFilter::Info,
                log_to_stdout: false,
                time_interval: 5,
                horizon,
                speed: 500.0,
                travel_time_penalty: -0.01,
            },
            utility: UtilityParameters::default(),
            battery: BatteryParameters::default(),
            charging: ChargingParameters::default(),
            charging_utility: ChargingUtilityParameters::default(),
        }
    }

    fn act(id: usize, group: ActivityGroup, earliest: i64, latest: i64, min_dur: i64, max_dur: i64) -> Activity {
        Activity {
            id,
            x: 0.0,
            y: 0.0,
            group,
            earliest_start: earliest,
            latest_start: latest,
            min_duration: min_dur,
            max_duration: max_dur,
            des_start_time: 0,
            des_duration: 0,
            charge_mode: ChargeMode::None,
            is_charging: false,
            is_service_station: false,
            forbidden_groups: GroupSet::empty(),
        }
    }

    #[test]
    fn minimal_schedule_has_zero_utility() {
        let mut scheduler = Scheduler::new(test_config(288));
        scheduler.set_fixed_initial_soc(1.0);
        scheduler.set_activities(vec![
            act(0, ActivityGroup::Home, 0, 0, 1, 286),
            act(1, ActivityGroup::Home, 0, 287, 1, 288),
        ]);

        match scheduler.solve().unwrap() {
            SolveOutcome::Converged(best) => assert_eq!(best.utility, 0.0),
            SolveOutcome::Infeasible => panic!("expected a converged minimal schedule"),
        }
        assert_eq!(scheduler.get_count(), 0);
    }

    #[test]
    fn infeasible_window_yields_infeasible_outcome() {
        let mut scheduler = Scheduler::new(test_config(288));
        scheduler.set_fixed_initial_soc(1.0);
        scheduler.set_activities(vec![
            act(0, ActivityGroup::Home, 0, 0, 1, 286),
            act(1, ActivityGroup::Work, 280, 281, 50, 144),
            act(2, ActivityGroup::Home, 0, 287, 1, 288),
        ]);

        match scheduler.solve().unwrap() {
            SolveOutcome::Converged(_) => panic!("expected infeasible"),
            SolveOutcome::Infeasible => {}
        }
    }
}
