use clap::Parser;
use vehicle_hire::app::EventOutcome;
use vehicle_hire::utils::error::ErrorCategory;
use vehicle_hire::utils::{logger, validation::Validate};
use vehicle_hire::{
    run_scenario, CliConfig, FixedClock, HireError, ScenarioConfig, ScenarioReport, SystemClock,
};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::info!("Loading scenario from: {}", cli.config.display());

    let config = match ScenarioConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load '{}': {}", cli.config.display(), e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e));
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("Scenario validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(exit_code(&e));
    }

    if cli.dry_run {
        display_summary(&config);
        return Ok(());
    }

    let result = match cli.today {
        Some(today) => run_scenario(&config, FixedClock(today)),
        None => run_scenario(&config, SystemClock),
    };

    match result {
        Ok(report) if cli.json => println!("{}", serde_json::to_string_pretty(&report)?),
        Ok(report) => print_report(&report),
        Err(e) => {
            tracing::error!("Scenario failed: {} ({:?})", e, e.category());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e));
        }
    }

    Ok(())
}

fn exit_code(e: &HireError) -> i32 {
    match e.category() {
        ErrorCategory::InvalidInput | ErrorCategory::Duplicate => 2,
        ErrorCategory::State => 3,
        ErrorCategory::Configuration => 4,
        ErrorCategory::System => 1,
    }
}

fn display_summary(config: &ScenarioConfig) {
    println!("Fleet: {} car(s), {} van(s)", config.fleet.cars, config.fleet.vans);
    println!("Customers: {}", config.customers.len());
    println!("Events: {}", config.events.len());
    println!(
        "Policy: max {} rentals, car age {}+, van age {}+, inspection after {} day(s)",
        config.policy.max_active_rentals,
        config.policy.min_car_age,
        config.policy.min_van_age,
        config.policy.van_inspection_days
    );
}

fn print_report(report: &ScenarioReport) {
    for record in &report.events {
        let line = match &record.outcome {
            EventOutcome::Hired { vehicle } => format!("hired {}", vehicle),
            EventOutcome::Rejected { reason } => format!("rejected: {}", reason),
            EventOutcome::Returned { vehicle, mileage } => {
                format!("returned {} (mileage now {})", vehicle, mileage)
            }
            EventOutcome::NothingToReturn => "nothing to return".to_string(),
            EventOutcome::Inspected { vehicles } => format!("inspected {} vehicle(s)", vehicles.len()),
        };
        println!("#{:<3} {}", record.index + 1, line);
    }

    println!();
    for vehicle in &report.fleet {
        println!(
            "{} {} mileage {:>6}{}{}",
            vehicle.kind,
            vehicle.id,
            vehicle.mileage,
            if vehicle.hired { "  on hire" } else { "" },
            if vehicle.inspection_required {
                "  needs inspection"
            } else {
                ""
            }
        );
    }
    println!(
        "\n{} hired, {} rejected; available: {} car(s), {} van(s)",
        report.hired_count(),
        report.rejected_count(),
        report.available_cars,
        report.available_vans
    );
}
