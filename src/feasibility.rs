use crate::activity::Activity;
use crate::charging::charge_profile;
use crate::config::Config;
use crate::geometry::{travel_intervals, travel_soc};
use crate::label::Label;

/// Returns whether a label `l` (currently at activity `l.act_id`) may be
/// extended onto candidate activity `a`. `dawn` and `dusk` are the first and
/// last activities in the candidate set. `num_activities` is the size of
/// that set.
pub fn is_feasible(
    l: &Label,
    l_act: &Activity,
    a: &Activity,
    activities: &[Activity],
    config: &Config,
    num_activities: usize,
) -> bool {
    if a.id == l.act_id {
        return feasible_continuation(l, a, config);
    }
    feasible_transition(l, l_act, a, activities, config, num_activities)
}

fn feasible_continuation(l: &Label, a: &Activity, config: &Config) -> bool {
    if l.duration + 1 > a.max_duration {
        return false;
    }

    if a.is_service_station && !a.is_charging {
        return false;
    }

    if a.is_charging {
        use crate::activity::ChargeMode;
        if a.charge_mode == ChargeMode::None {
            return false;
        }
        // charge-mode continuity: compared against the *label's* charging
        // history, not the (shared) activity record (spec.md §9).
        if l.charge_duration > 0 && l.charge_mode != a.charge_mode {
            return false;
        }
        let (rate, _price) = charge_profile(a.charge_mode, a.group, config.battery.battery_capacity, &config.charging, &config.general);
        if l.current_soc + rate > 1.0 {
            return false;
        }
    }

    true
}

fn feasible_transition(
    l: &Label,
    l_act: &Activity,
    a: &Activity,
    activities: &[Activity],
    config: &Config,
    num_activities: usize,
) -> bool {
    if a.id == 0 {
        // cannot return to dawn
        return false;
    }

    if let Some(prev) = &l.previous {
        if prev.act_id == a.id {
            // no immediate A -> B -> A ping-pong
            return false;
        }
    }

    if l_act.id == num_activities - 1 {
        // cannot leave dusk
        return false;
    }

    if l.duration < l_act.min_duration {
        return false;
    }

    let dusk = &activities[num_activities - 1];
    let tt = travel_intervals(l_act, a, &config.general);

    if l.time + tt + a.min_duration + travel_intervals(a, dusk, &config.general) >= config.general.horizon - 1 {
        return false;
    }

    if l.time + tt < a.earliest_start || l.time + tt > a.latest_start {
        return false;
    }

    // Elementarity: `l.mem` only ever holds `l`'s own group plus whatever
    // DSSR has forbidden it from carrying (see dp.rs's `mem` construction),
    // so this blocks immediate repeats of a DSSR-tainted group without
    // making every repeated group unreachable on the first pass.
    if l.mem.contains(a.group) {
        return false;
    }

    if l.current_soc - travel_soc(l_act, a, &config.battery) < 0.0 {
        return false;
    }

    use crate::activity::ChargeMode;
    if a.is_charging && a.charge_mode == ChargeMode::None {
        return false;
    }

    if a.is_service_station && !a.is_charging {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityGroup, ChargeMode, GroupSet};
    use crate::config::{BatteryParameters, ChargingParameters, ChargingUtilityParameters, General, UtilityParameters};

    fn test_config() -> Config {
        Config {
            general: General {
                log_path: "x".into(),
                log_level: log::LevelFilter::Info,
                log_to_stdout: false,
                time_interval: 5,
                horizon: 288,
                speed: 500.0,
                travel_time_penalty: 1.0,
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

    fn seed_label(act_id: usize, time: i64) -> Label {
        Label {
            act_id,
            time,
            start_time: 0,
            duration: time,
            current_soc: 1.0,
            soc_at_activity_start: 1.0,
            charge_duration: 0,
            charge_cost: 0.0,
            charge_cost_at_activity_start: 0.0,
            utility: 0.0,
            mem: GroupSet::singleton(ActivityGroup::Home),
            charge_mode: ChargeMode::None,
            deviation_start: 0.0,
            deviation_dur: 0.0,
            previous: None,
        }
    }

    #[test]
    fn cannot_transition_back_to_dawn() {
        let config = test_config();
        let dawn = act(0, ActivityGroup::Home, 0, 0, 1, 286);
        let dusk = act(2, ActivityGroup::Home, 0, 287, 1, 288);
        let work = act(1, ActivityGroup::Work, 60, 276, 10, 144);
        let activities = vec![dawn.clone(), work, dusk];
        let l = seed_label(1, 50);
        assert!(!is_feasible(&l, &activities[1], &activities[0], &activities, &config, 3));
    }

    #[test]
    fn elementarity_blocks_repeated_group() {
        let config = test_config();
        let mut l = seed_label(0, 1);
        l.mem = GroupSet::singleton(ActivityGroup::Work);
        let dawn = act(0, ActivityGroup::Home, 0, 0, 1, 286);
        let work2 = act(2, ActivityGroup::Work, 10, 280, 10, 144);
        let activities = vec![dawn, act(1, ActivityGroup::Work, 10, 280, 10, 144), work2, act(3, ActivityGroup::Home, 0, 287, 1, 288)];
        assert!(!is_feasible(&l, &activities[0], &activities[2], &activities, &config, 4));
    }

    #[test]
    fn negative_arrival_soc_is_infeasible() {
        let config = test_config();
        let mut l = seed_label(0, 1);
        l.current_soc = 0.0;
        let dawn = act(0, ActivityGroup::Home, 0, 0, 1, 286);
        let mut far = act(1, ActivityGroup::Work, 0, 280, 10, 144);
        far.x = 1_000_000.0;
        let activities = vec![dawn, far.clone(), act(2, ActivityGroup::Home, 0, 287, 1, 288)];
        assert!(!is_feasible(&l, &activities[0], &activities[1], &activities, &config, 3));
    }
}
