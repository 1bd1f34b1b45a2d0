use crate::activity::{Activity, ActivityGroup};
use crate::config::Config;
use crate::geometry::travel_intervals;
use crate::label::Label;

/// Computes the incremental utility contribution when a label transitions
/// from the activity `prev` finished onto the activity `new_act` just
/// entered. `new_label` already holds every other field updated by the
/// label-transition rule (spec.md §4.5); this function only adds utility.
pub fn evaluate_transition(new_label: &mut Label, prev: &Label, prev_act: &Activity, new_act: &Activity, config: &Config) {
    let interval = config.general.time_interval as f64;
    let u = &config.utility;

    // 1. Attraction.
    new_label.utility += u.asc[new_act.group.index()];

    // 2. Travel.
    let tt = travel_intervals(prev_act, new_act, &config.general);
    new_label.utility += config.general.travel_time_penalty * tt as f64;

    // 3. Duration penalty for the activity that just finished, skipped for
    //    home and service-station activities.
    if !is_home_or_service_station(prev_act) {
        let short_dev = (prev_act.des_duration - prev.duration).max(0) as f64;
        let long_dev = (prev.duration - prev_act.des_duration).max(0) as f64;
        new_label.utility += u.short[prev_act.group.index()] * interval * short_dev;
        new_label.utility += u.long[prev_act.group.index()] * interval * long_dev;
    }

    // 4. Start-time penalty for the new activity, skipped for home and
    //    service-station activities.
    if !is_home_or_service_station(new_act) {
        let early_dev = (new_act.des_start_time - new_label.start_time).max(0) as f64;
        let late_dev = (new_label.start_time - new_act.des_start_time).max(0) as f64;
        new_label.utility += u.early[new_act.group.index()] * interval * early_dev;
        new_label.utility += u.late[new_act.group.index()] * interval * late_dev;
    }

    // 5. Charging terms for the activity that just finished.
    if prev_act.is_charging {
        let cu = &config.charging_utility;
        let gamma = match prev_act.group {
            ActivityGroup::Work => cu.gamma_charge_work,
            ActivityGroup::Home => cu.gamma_charge_home,
            _ => cu.gamma_charge_non_work,
        };
        new_label.utility += gamma;

        let low_soc_term = (config.battery.soc_threshold - prev.soc_at_activity_start).max(0.0);
        new_label.utility += cu.theta_soc * low_soc_term;

        let gained_soc = prev.current_soc - prev.soc_at_activity_start;
        new_label.utility += cu.beta_delta_soc * gained_soc;

        let charge_cost_during_activity = prev.charge_cost - prev.charge_cost_at_activity_start;
        new_label.utility += cu.beta_charge_cost * charge_cost_during_activity;
    }

    new_label.deviation_start = prev.deviation_start
        + if !is_home_or_service_station(new_act) {
            (new_label.start_time - new_act.des_start_time).abs() as f64
        } else {
            0.0
        };
    new_label.deviation_dur = prev.deviation_dur
        + if !is_home_or_service_station(prev_act) {
            (prev.duration - prev_act.des_duration).abs() as f64
        } else {
            0.0
        };
}

fn is_home_or_service_station(act: &Activity) -> bool {
    act.group == ActivityGroup::Home || act.is_service_station
}
