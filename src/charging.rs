use crate::activity::{ActivityGroup, ChargeMode};
use crate::config::{ChargingParameters, General};

/// Per-interval SOC delta rate and per-kWh price (before time-of-use
/// multiplier) for a given charging mode at a given activity group.
/// `battery_capacity` comes from `BatteryParameters` since the source's
/// "capacity" constant belongs to the battery sub-model, not the charging
/// rate table.
pub fn charge_profile(
    mode: ChargeMode,
    group: ActivityGroup,
    battery_capacity: f64,
    charging: &ChargingParameters,
    general: &General,
) -> (f64, f64) {
    let fraction_of_hour = general.time_interval as f64 / 60.0;

    match mode {
        ChargeMode::None => (0.0, 0.0),
        ChargeMode::Slow => {
            let rate = (charging.slow_charge_power / battery_capacity) * fraction_of_hour;
            let price = if group == ActivityGroup::Home {
                charging.home_slow_charge_price
            } else {
                charging.ac_charge_price
            };
            (rate, price)
        }
        ChargeMode::Fast => {
            let rate = (charging.fast_charge_power / battery_capacity) * fraction_of_hour;
            (rate, charging.ac_charge_price)
        }
        ChargeMode::Rapid => {
            let rate = (charging.rapid_charge_power / battery_capacity) * fraction_of_hour;
            (rate, charging.public_dc_charge_price)
        }
    }
}

/// Time-of-use multiplier for the given time-slot. Peak window is
/// `hour in [peak_start, peak_end)`; midpeak is either configured midpeak
/// band; otherwise off-peak. `hour` and the configured bounds are both
/// hour-of-day units — the source's historical bug of comparing `hour`
/// against one bound and raw `time` against another is not replicated here
/// (spec.md §9).
pub fn tou_factor(time: i64, charging: &ChargingParameters, general: &General) -> f64 {
    let hour = (time * general.time_interval) / 60;

    if hour >= charging.peak_start && hour < charging.peak_end {
        charging.tou_peak_factor
    } else if (hour >= charging.midpeak1_start && hour < charging.midpeak1_end)
        || (hour >= charging.midpeak2_start && hour < charging.midpeak2_end)
    {
        charging.tou_midpeak_factor
    } else {
        charging.tou_offpeak_factor
    }
}

/// Monetary cost of charging for one interval, given the rate/price pair for
/// the active mode and the SOC before the interval starts.
pub fn interval_charge_cost(
    current_soc: f64,
    rate: f64,
    price: f64,
    time: i64,
    charging: &ChargingParameters,
    general: &General,
    battery_capacity: f64,
) -> (f64, f64) {
    let delta_soc = (1.0 - current_soc).min(rate);
    let cost = delta_soc * battery_capacity * price * tou_factor(time, charging, general);
    (delta_soc, cost)
}
