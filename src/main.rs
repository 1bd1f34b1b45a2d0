use std::env;
use std::fs;

use anyhow::{anyhow, Result};
use log::{error, info};

use ev_day_scheduler::config::load_config;
use ev_day_scheduler::{Activity, ScheduleEntry, Scheduler, SolveOutcome};

fn main() -> Result<()> {
    let (config_path, activities_path) = parse_args()?;

    let config = load_config(&config_path)?;
    let _logger_handle = ev_day_scheduler::logging::setup_logger(
        &config.general.log_path,
        config.general.log_level,
        config.general.log_to_stdout,
    )?;

    info!("starting ev_day_scheduler version: {}", env!("CARGO_PKG_VERSION"));

    let activities: Vec<Activity> = serde_json::from_str(&fs::read_to_string(&activities_path)?)?;

    let mut scheduler = Scheduler::new(config);
    scheduler.set_activities(activities);

    match scheduler.solve() {
        Ok(SolveOutcome::Converged(_)) => {
            let schedule = scheduler.get_final_schedule().expect("converged solve must yield a schedule");
            print_schedule(&schedule);
            info!(
                "solve finished: dssr_count={} wall_clock={:.3}s",
                scheduler.get_count(),
                scheduler.get_total_time()
            );
            Ok(())
        }
        Ok(SolveOutcome::Infeasible) => {
            println!("no feasible schedule found for the supplied activities");
            Ok(())
        }
        Err(defect) => {
            error!("scheduler defect: {}", defect);
            Err(anyhow!(defect.to_string()))
        }
    }
}

fn parse_args() -> Result<(String, String)> {
    let args: Vec<String> = env::args().collect();
    let config_path = args
        .iter()
        .find(|p| p.starts_with("--config="))
        .ok_or_else(|| anyhow!("missing required --config=<path> argument"))?
        .split_once('=')
        .ok_or_else(|| anyhow!("malformed --config= argument"))?
        .1
        .to_string();

    let activities_path = args
        .iter()
        .skip(1)
        .find(|p| !p.starts_with("--"))
        .cloned()
        .ok_or_else(|| anyhow!("missing required <activities.json> argument"))?;

    Ok((config_path, activities_path))
}

fn print_schedule(schedule: &[ScheduleEntry]) {
    for entry in schedule {
        println!(
            "activity {:>3}  t=[{:>4},{:>4}]  dur={:>4}  soc {:.3} -> {:.3}  charge_cost={:.2}",
            entry.activity_id, entry.start_time, entry.end_time, entry.duration, entry.soc_at_start, entry.soc_at_end, entry.charge_cost
        );
    }
}
