use std::fs;
use log::LevelFilter;
use serde::Deserialize;

use crate::errors::ConfigError;

#[derive(Deserialize, Clone, Debug)]
pub struct General {
    pub log_path: String,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
    pub time_interval: i64,
    pub horizon: i64,
    pub speed: f64,
    pub travel_time_penalty: f64,
}

/// Activity-group-indexed utility coefficients, one entry per `ActivityGroup`.
#[derive(Deserialize, Clone, Debug)]
pub struct UtilityParameters {
    pub asc: [f64; 8],
    pub early: [f64; 8],
    pub late: [f64; 8],
    pub long: [f64; 8],
    pub short: [f64; 8],
}

#[derive(Deserialize, Clone, Debug)]
pub struct BatteryParameters {
    pub battery_capacity: f64,
    pub soc_threshold: f64,
    pub energy_consumption_rate: f64,
    pub initial_soc_mean: f64,
    pub initial_soc_std: f64,
    pub initial_soc_min: f64,
    pub initial_soc_max: f64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ChargingParameters {
    pub slow_charge_power: f64,
    pub fast_charge_power: f64,
    pub rapid_charge_power: f64,
    pub home_off_peak_price: f64,
    pub home_slow_charge_price: f64,
    pub ac_charge_price: f64,
    pub public_dc_charge_price: f64,
    pub tou_peak_factor: f64,
    pub tou_midpeak_factor: f64,
    pub tou_offpeak_factor: f64,
    pub peak_start: i64,
    pub peak_end: i64,
    pub midpeak1_start: i64,
    pub midpeak1_end: i64,
    pub midpeak2_start: i64,
    pub midpeak2_end: i64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ChargingUtilityParameters {
    pub gamma_charge_work: f64,
    pub gamma_charge_non_work: f64,
    pub gamma_charge_home: f64,
    pub theta_soc: f64,
    pub beta_delta_soc: f64,
    pub beta_charge_cost: f64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub general: General,
    pub utility: UtilityParameters,
    pub battery: BatteryParameters,
    pub charging: ChargingParameters,
    pub charging_utility: ChargingUtilityParameters,
}

impl Default for UtilityParameters {
    fn default() -> Self {
        UtilityParameters {
            asc: [0.0; 8],
            early: [0.0; 8],
            late: [0.0; 8],
            long: [0.0; 8],
            short: [0.0; 8],
        }
    }
}

impl Default for BatteryParameters {
    fn default() -> Self {
        BatteryParameters {
            battery_capacity: 60.0,
            soc_threshold: 0.3,
            energy_consumption_rate: 0.2,
            initial_soc_mean: 0.7,
            initial_soc_std: 0.15,
            initial_soc_min: 0.3,
            initial_soc_max: 1.0,
        }
    }
}

impl Default for ChargingParameters {
    fn default() -> Self {
        ChargingParameters {
            slow_charge_power: 7.0,
            fast_charge_power: 22.0,
            rapid_charge_power: 50.0,
            home_off_peak_price: 0.07,
            home_slow_charge_price: 0.26,
            ac_charge_price: 0.52,
            public_dc_charge_price: 0.79,
            tou_peak_factor: 1.5,
            tou_midpeak_factor: 2.5,
            tou_offpeak_factor: 1.0,
            peak_start: 12,
            peak_end: 18,
            midpeak1_start: 8,
            midpeak1_end: 12,
            midpeak2_start: 18,
            midpeak2_end: 21,
        }
    }
}

impl Default for ChargingUtilityParameters {
    fn default() -> Self {
        ChargingUtilityParameters {
            gamma_charge_work: -3.59,
            gamma_charge_non_work: -4.34,
            gamma_charge_home: -3.34,
            theta_soc: -80.0,
            beta_delta_soc: 25.0,
            beta_charge_cost: -0.3,
        }
    }
}

/// Loads the configuration file and returns a struct with all configuration items
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, ConfigError> {
    let toml = fs::read_to_string(config_path)?;
    let config: Config = toml::from_str(&toml)?;

    Ok(config)
}
