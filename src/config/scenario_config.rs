use crate::domain::ids::IdAllocator;
use crate::domain::model::VehicleKind;
use crate::domain::policy::HirePolicy;
use crate::utils::error::{HireError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub fleet: FleetConfig,
    #[serde(default)]
    pub policy: HirePolicy,
    #[serde(default)]
    pub customers: Vec<CustomerConfig>,
    #[serde(default)]
    pub events: Vec<ScenarioEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetConfig {
    #[serde(default)]
    pub cars: usize,
    #[serde(default)]
    pub vans: usize,
    pub id_seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerConfig {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub commercial_license: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ScenarioEvent {
    Hire {
        customer: String,
        kind: VehicleKind,
        days: u32,
    },
    /// Returns the customer's first held vehicle of `kind`.
    Return {
        customer: String,
        kind: VehicleKind,
        mileage: i64,
    },
    /// Clears the inspection flag on every flagged vehicle of `kind`.
    Inspect { kind: VehicleKind },
}

impl ScenarioConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| HireError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown names are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| HireError::ConfigError {
            message: format!("placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn allocator(&self) -> IdAllocator {
        match self.fleet.id_seed {
            Some(seed) => IdAllocator::with_seed(seed),
            None => IdAllocator::new(),
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        let fleet_cap = 10_000;
        validate_range("fleet.cars", self.fleet.cars, 0, fleet_cap)?;
        validate_range("fleet.vans", self.fleet.vans, 0, fleet_cap)?;

        self.policy.validate()?;

        for (i, customer) in self.customers.iter().enumerate() {
            validate_non_empty_string(&format!("customers[{}].first_name", i), &customer.first_name)?;
            validate_non_empty_string(&format!("customers[{}].last_name", i), &customer.last_name)?;
        }

        for (i, event) in self.events.iter().enumerate() {
            match event {
                ScenarioEvent::Hire { customer, .. } => {
                    validate_non_empty_string(&format!("events[{}].customer", i), customer)?;
                }
                ScenarioEvent::Return {
                    customer, mileage, ..
                } => {
                    validate_non_empty_string(&format!("events[{}].customer", i), customer)?;
                    if *mileage < 0 {
                        return Err(HireError::validation(
                            &format!("events[{}].mileage", i),
                            format!("Mileage {} cannot be negative", mileage),
                        ));
                    }
                }
                ScenarioEvent::Inspect { .. } => {}
            }
        }

        Ok(())
    }
}

impl Validate for ScenarioConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
