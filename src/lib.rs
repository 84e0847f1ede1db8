pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::ScenarioConfig;

pub use crate::app::{run_scenario, ScenarioReport};
pub use crate::core::manager::{HireOutcome, Rejection, VehicleManager};
pub use crate::core::{
    Clock, CustomerRecord, FixedClock, HirePolicy, IdAllocator, Name, SystemClock, Vehicle,
    VehicleId, VehicleKind,
};
pub use crate::utils::error::{HireError, Result};
