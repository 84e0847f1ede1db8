use crate::config::{ScenarioConfig, ScenarioEvent};
use crate::core::manager::{HireOutcome, VehicleManager};
use crate::core::{Clock, CustomerRecord, Vehicle, VehicleId, VehicleKind};
use crate::utils::error::{HireError, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// What happened to a single scripted event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum EventOutcome {
    Hired { vehicle: VehicleId },
    Rejected { reason: String },
    Returned { vehicle: VehicleId, mileage: u64 },
    NothingToReturn,
    Inspected { vehicles: Vec<VehicleId> },
}

#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    pub index: usize,
    pub event: ScenarioEvent,
    pub outcome: EventOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleSnapshot {
    pub id: VehicleId,
    pub kind: VehicleKind,
    pub mileage: u64,
    pub hired: bool,
    pub inspection_required: bool,
}

impl From<&Vehicle> for VehicleSnapshot {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id(),
            kind: vehicle.kind(),
            mileage: vehicle.current_mileage(),
            hired: vehicle.is_hired(),
            inspection_required: vehicle.requires_inspection(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub events: Vec<EventRecord>,
    pub fleet: Vec<VehicleSnapshot>,
    pub customers: Vec<CustomerRecord>,
    /// Customer id to the vehicles they still hold.
    pub rentals: BTreeMap<String, Vec<VehicleId>>,
    pub available_cars: usize,
    pub available_vans: usize,
}

impl ScenarioReport {
    pub fn hired_count(&self) -> usize {
        self.events
            .iter()
            .filter(|r| matches!(r.outcome, EventOutcome::Hired { .. }))
            .count()
    }

    pub fn rejected_count(&self) -> usize {
        self.events
            .iter()
            .filter(|r| matches!(r.outcome, EventOutcome::Rejected { .. }))
            .count()
    }
}

/// Builds a manager from the scenario, replays its events in order and
/// reports the final state. Rule rejections are recorded; errors abort.
pub struct ScenarioRunner<C: Clock> {
    manager: VehicleManager<C>,
}

impl<C: Clock> ScenarioRunner<C> {
    pub fn new(config: &ScenarioConfig, clock: C) -> Result<Self> {
        let mut manager =
            VehicleManager::with_parts(config.allocator(), config.policy.clone(), clock);

        for _ in 0..config.fleet.cars {
            manager.register_vehicle("car")?;
        }
        for _ in 0..config.fleet.vans {
            manager.register_vehicle("van")?;
        }
        for c in &config.customers {
            manager.register_customer(
                &c.first_name,
                &c.last_name,
                c.birth_date,
                c.commercial_license,
            )?;
        }
        tracing::info!(
            vehicles = manager.vehicles().len(),
            customers = manager.customers().len(),
            "scenario fleet ready"
        );

        Ok(Self { manager })
    }

    pub fn manager(&self) -> &VehicleManager<C> {
        &self.manager
    }

    pub fn run(mut self, events: &[ScenarioEvent]) -> Result<ScenarioReport> {
        let mut records = Vec::with_capacity(events.len());

        for (index, event) in events.iter().enumerate() {
            let outcome = self.apply(event)?;
            tracing::debug!(index, ?outcome, "event applied");
            records.push(EventRecord {
                index,
                event: event.clone(),
                outcome,
            });
        }

        self.report(records)
    }

    fn apply(&mut self, event: &ScenarioEvent) -> Result<EventOutcome> {
        match event {
            ScenarioEvent::Hire {
                customer,
                kind,
                days,
            } => {
                let record = self.lookup_customer(customer)?;
                let outcome = self.manager.hire(&record, kind.label(), *days)?;
                Ok(match outcome {
                    HireOutcome::Hired(vehicle) => EventOutcome::Hired { vehicle },
                    HireOutcome::Rejected(rejection) => EventOutcome::Rejected {
                        reason: rejection.to_string(),
                    },
                })
            }
            ScenarioEvent::Return {
                customer,
                kind,
                mileage,
            } => {
                let record = self.lookup_customer(customer)?;
                let held = self
                    .manager
                    .vehicles_by_customer(&record)
                    .into_iter()
                    .find(|v| v.kind() == *kind)
                    .map(Vehicle::id);

                let Some(vehicle) = held else {
                    return Ok(EventOutcome::NothingToReturn);
                };
                self.manager.return_vehicle(&vehicle, &record, *mileage)?;

                let mileage = self
                    .manager
                    .vehicle(&vehicle)
                    .map_or(0, Vehicle::current_mileage);
                Ok(EventOutcome::Returned { vehicle, mileage })
            }
            ScenarioEvent::Inspect { kind } => {
                let flagged: Vec<VehicleId> = self
                    .manager
                    .vehicles()
                    .iter()
                    .filter(|v| v.kind() == *kind && v.requires_inspection())
                    .map(Vehicle::id)
                    .collect();

                for id in &flagged {
                    self.manager.clear_inspection(id)?;
                }
                Ok(EventOutcome::Inspected { vehicles: flagged })
            }
        }
    }

    fn lookup_customer(&self, customer_id: &str) -> Result<CustomerRecord> {
        self.manager
            .customer(customer_id)
            .cloned()
            .ok_or_else(|| HireError::UnknownCustomer {
                customer_id: customer_id.to_string(),
            })
    }

    fn report(&self, events: Vec<EventRecord>) -> Result<ScenarioReport> {
        let rentals: BTreeMap<String, Vec<VehicleId>> = self
            .manager
            .hired_vehicles()
            .iter()
            .map(|(customer, ids)| (customer.clone(), ids.iter().copied().collect()))
            .collect();

        Ok(ScenarioReport {
            events,
            fleet: self.manager.vehicles().iter().map(VehicleSnapshot::from).collect(),
            customers: self.manager.customers().to_vec(),
            rentals,
            available_cars: self.manager.available_count(VehicleKind::Car.label())?,
            available_vans: self.manager.available_count(VehicleKind::Van.label())?,
        })
    }
}

/// Convenience wrapper: build, replay and report in one call.
pub fn run_scenario<C: Clock>(config: &ScenarioConfig, clock: C) -> Result<ScenarioReport> {
    ScenarioRunner::new(config, clock)?.run(&config.events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedClock;
    use chrono::NaiveDate;

    fn clock() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2025, 2, 20).unwrap())
    }

    #[test]
    fn test_return_without_holding_reports_nothing() {
        let config = ScenarioConfig::from_toml_str(
            r#"
[fleet]
cars = 1

[[customers]]
first_name = "Ann"
last_name = "Lee"
birth_date = "1990-04-04"

[[events]]
action = "return"
customer = "Customer1"
kind = "car"
mileage = 10
"#,
        )
        .unwrap();

        let report = run_scenario(&config, clock()).unwrap();
        assert_eq!(report.events[0].outcome, EventOutcome::NothingToReturn);
        assert_eq!(report.fleet[0].mileage, 0);
    }

    #[test]
    fn test_unknown_customer_aborts() {
        let config = ScenarioConfig::from_toml_str(
            r#"
[fleet]
cars = 1

[[events]]
action = "hire"
customer = "Customer5"
kind = "car"
days = 1
"#,
        )
        .unwrap();

        assert!(matches!(
            run_scenario(&config, clock()),
            Err(HireError::UnknownCustomer { .. })
        ));
    }

    #[test]
    fn test_duplicate_customers_abort_setup() {
        let config = ScenarioConfig::from_toml_str(
            r#"
[fleet]
cars = 1

[[customers]]
first_name = "Ann"
last_name = "Lee"
birth_date = "1990-04-04"

[[customers]]
first_name = "Ann"
last_name = "Lee"
birth_date = "1990-04-04"
"#,
        )
        .unwrap();

        assert!(matches!(
            ScenarioRunner::new(&config, clock()),
            Err(HireError::DuplicateCustomer { .. })
        ));
    }
}
