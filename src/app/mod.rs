pub mod scenario;

pub use scenario::{run_scenario, EventOutcome, ScenarioReport, ScenarioRunner};
