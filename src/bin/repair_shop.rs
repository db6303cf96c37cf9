use repairsim::core::execution::{ConcurrencyMode, ExecutionConfig};
use repairsim::factory::config::FactoryConfig;
use repairsim::factory::replication::{run_replications, seeds_from, ReplicationSummary};
use repairsim::factory::scenario::run_scenario;

const USAGE: &str = "usage: repair_shop [CONFIG.toml] [--replications N]";

struct Args {
    config_path: Option<String>,
    replications: Option<usize>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config_path: None,
        replications: None,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--replications" | "-n" => {
                let value = iter.next().ok_or_else(|| USAGE.to_string())?;
                let count = value
                    .parse::<usize>()
                    .map_err(|e| format!("invalid replication count '{}': {}", value, e))?;
                args.replications = Some(count);
            }
            "--help" | "-h" => return Err(USAGE.to_string()),
            path if args.config_path.is_none() => args.config_path = Some(path.to_string()),
            other => return Err(format!("unexpected argument '{}'\n{}", other, USAGE)),
        }
    }

    Ok(args)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args = parse_args()?;
    let config = match &args.config_path {
        Some(path) => FactoryConfig::load(path)?,
        None => FactoryConfig::default(),
    };

    println!("Configuration:");
    println!(
        "  machines={}, technicians={}, spares={}/{}",
        config.machine_count, config.technicians, config.initial_spares, config.spares_capacity
    );
    println!(
        "  horizon={}, accrual period={}, seed={}",
        config.horizon, config.accrual_period, config.seed
    );
    println!(
        "  failure interval: {:?}\n  repair duration: {:?}",
        config.failure_interval, config.repair_duration
    );
    println!();

    match args.replications {
        Some(count) => {
            let execution = ExecutionConfig::new().with_concurrency(ConcurrencyMode::Rayon);
            let reports = run_replications(&config, &seeds_from(config.seed, count), &execution)?;
            match ReplicationSummary::from_reports(&reports) {
                Some(summary) => println!("{}", summary),
                None => println!("No replications requested"),
            }
        }
        None => {
            let report = run_scenario(&config)?;
            println!("{}", report.summary());
        }
    }

    Ok(())
}
