use crate::core::{Clock, SystemClock};
use crate::domain::ids::{IdAllocator, VehicleId};
use crate::domain::model::{CustomerRecord, Name, Vehicle, VehicleKind};
use crate::domain::policy::HirePolicy;
use crate::utils::error::{HireError, Result};
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Why a hire request was turned down. These are ordinary outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    RentalLimitReached,
    Underage,
    MissingCommercialLicence,
    NoVehicleAvailable,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rejection::RentalLimitReached => "rental limit reached",
            Rejection::Underage => "underage for this vehicle type",
            Rejection::MissingCommercialLicence => "commercial licence required",
            Rejection::NoVehicleAvailable => "no vehicle available",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HireOutcome {
    Hired(VehicleId),
    Rejected(Rejection),
}

impl HireOutcome {
    pub fn is_hired(&self) -> bool {
        matches!(self, HireOutcome::Hired(_))
    }
}

/// Owns the fleet, the customer register and the active rentals.
///
/// Fleet and customers are kept in registration order; hire selection scans
/// the fleet in that order. The rental index refers to vehicles by id.
pub struct VehicleManager<C: Clock = SystemClock> {
    fleet: Vec<Vehicle>,
    fleet_index: HashMap<VehicleId, usize>,
    customers: Vec<CustomerRecord>,
    customer_index: HashMap<String, usize>,
    rentals: HashMap<String, BTreeSet<VehicleId>>,
    allocator: IdAllocator,
    policy: HirePolicy,
    clock: C,
}

impl VehicleManager<SystemClock> {
    pub fn new() -> Self {
        Self::with_parts(IdAllocator::new(), HirePolicy::default(), SystemClock)
    }
}

impl Default for VehicleManager<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> VehicleManager<C> {
    pub fn with_clock(clock: C) -> Self {
        Self::with_parts(IdAllocator::new(), HirePolicy::default(), clock)
    }

    pub fn with_parts(allocator: IdAllocator, policy: HirePolicy, clock: C) -> Self {
        Self {
            fleet: Vec::new(),
            fleet_index: HashMap::new(),
            customers: Vec::new(),
            customer_index: HashMap::new(),
            rentals: HashMap::new(),
            allocator,
            policy,
            clock,
        }
    }

    pub fn policy(&self) -> &HirePolicy {
        &self.policy
    }

    pub fn register_vehicle(&mut self, kind: &str) -> Result<&Vehicle> {
        let id = self.allocator.allocate(kind)?;
        let position = self.fleet.len();

        self.fleet.push(Vehicle::new(id));
        self.fleet_index.insert(id, position);
        tracing::debug!(vehicle = %id, "registered vehicle");

        Ok(&self.fleet[position])
    }

    /// Vehicles of `kind` not currently on hire. Vans awaiting inspection
    /// and vehicles due a service are still counted.
    pub fn available_count(&self, kind: &str) -> Result<usize> {
        let kind: VehicleKind = kind.parse()?;
        Ok(self
            .fleet
            .iter()
            .filter(|v| v.kind() == kind && !v.is_hired())
            .count())
    }

    pub fn register_customer(
        &mut self,
        first_name: &str,
        last_name: &str,
        birth_date: NaiveDate,
        commercial_license: bool,
    ) -> Result<CustomerRecord> {
        let name = Name::new(first_name, last_name)?;

        if self
            .customers
            .iter()
            .any(|c| c.name() == &name && c.birth_date() == birth_date)
        {
            tracing::warn!(%name, %birth_date, "duplicate customer registration");
            return Err(HireError::DuplicateCustomer {
                name: name.to_string(),
                birth_date: birth_date.to_string(),
            });
        }

        // Ids are never reused: customers are never removed.
        let customer_id = format!("Customer{}", self.customers.len() + 1);
        let record = CustomerRecord::new(name, birth_date, commercial_license, &customer_id)?;

        self.customer_index
            .insert(customer_id.clone(), self.customers.len());
        self.customers.push(record.clone());
        tracing::debug!(customer = %record, "registered customer");

        Ok(record)
    }

    /// Hire and report only whether it went through.
    pub fn hire_vehicle(
        &mut self,
        customer: &CustomerRecord,
        kind: &str,
        duration_days: u32,
    ) -> Result<bool> {
        Ok(self.hire(customer, kind, duration_days)?.is_hired())
    }

    /// Applies the hire rules in order: rental limit, eligibility, selection.
    /// The first failing rule decides the rejection and nothing is mutated.
    pub fn hire(
        &mut self,
        customer: &CustomerRecord,
        kind: &str,
        duration_days: u32,
    ) -> Result<HireOutcome> {
        let kind: VehicleKind = kind.parse()?;
        self.ensure_registered(customer)?;
        let customer_id = customer.customer_id();

        if let Some(rejection) = self.check_rules(customer, kind) {
            tracing::info!(customer = customer_id, %kind, %rejection, "hire rejected");
            return Ok(HireOutcome::Rejected(rejection));
        }

        let Some(position) = self.fleet.iter().position(|v| v.kind() == kind && v.is_hireable())
        else {
            tracing::info!(
                customer = customer_id,
                %kind,
                rejection = %Rejection::NoVehicleAvailable,
                "hire rejected"
            );
            return Ok(HireOutcome::Rejected(Rejection::NoVehicleAvailable));
        };

        let vehicle = &mut self.fleet[position];
        vehicle.set_hired(true);
        if kind == VehicleKind::Van && duration_days >= self.policy.van_inspection_days {
            vehicle.flag_inspection();
        }
        let id = vehicle.id();

        self.rentals
            .entry(customer_id.to_string())
            .or_default()
            .insert(id);
        tracing::info!(customer = customer_id, vehicle = %id, duration_days, "vehicle hired");

        Ok(HireOutcome::Hired(id))
    }

    /// Returns a hired vehicle. Unknown ids and vehicles not on hire are
    /// ignored. The customer must be the one currently holding the vehicle.
    pub fn return_vehicle(
        &mut self,
        vehicle_id: &VehicleId,
        customer: &CustomerRecord,
        mileage_driven: i64,
    ) -> Result<()> {
        let Some(&position) = self.fleet_index.get(vehicle_id) else {
            tracing::debug!(vehicle = %vehicle_id, "return ignored: unknown vehicle");
            return Ok(());
        };
        if !self.fleet[position].is_hired() {
            tracing::debug!(vehicle = %vehicle_id, "return ignored: not on hire");
            return Ok(());
        }

        let customer_id = customer.customer_id();
        let holds_vehicle = self
            .rentals
            .get(customer_id)
            .is_some_and(|set| set.contains(vehicle_id));
        if !holds_vehicle {
            tracing::warn!(vehicle = %vehicle_id, customer = customer_id, "return by non-holder");
            return Err(HireError::NotRentedBy {
                vehicle_id: vehicle_id.to_string(),
                customer_id: customer_id.to_string(),
            });
        }

        let vehicle = &mut self.fleet[position];
        // fails before anything is touched
        let total = vehicle.add_mileage(mileage_driven)?;
        vehicle.set_hired(false);
        let serviced = vehicle.perform_service_if_due();

        if let Some(set) = self.rentals.get_mut(customer_id) {
            set.remove(vehicle_id);
            if set.is_empty() {
                self.rentals.remove(customer_id);
            }
        }
        tracing::info!(
            vehicle = %vehicle_id,
            customer = customer_id,
            mileage = total,
            serviced,
            "vehicle returned"
        );

        Ok(())
    }

    /// Vehicles the customer currently has on hire, ordered by id.
    pub fn vehicles_by_customer(&self, customer: &CustomerRecord) -> Vec<&Vehicle> {
        self.rentals
            .get(customer.customer_id())
            .map(|set| set.iter().filter_map(|id| self.vehicle(id)).collect())
            .unwrap_or_default()
    }

    /// Marks a van as inspected so it can be hired again.
    pub fn clear_inspection(&mut self, vehicle_id: &VehicleId) -> Result<bool> {
        let position =
            *self
                .fleet_index
                .get(vehicle_id)
                .ok_or_else(|| HireError::UnknownVehicle {
                    vehicle_id: vehicle_id.to_string(),
                })?;

        let cleared = self.fleet[position].clear_inspection();
        if cleared {
            tracing::info!(vehicle = %vehicle_id, "inspection cleared");
        }
        Ok(cleared)
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.fleet
    }

    pub fn vehicle(&self, vehicle_id: &VehicleId) -> Option<&Vehicle> {
        self.fleet_index.get(vehicle_id).map(|&i| &self.fleet[i])
    }

    pub fn customers(&self) -> &[CustomerRecord] {
        &self.customers
    }

    pub fn customer(&self, customer_id: &str) -> Option<&CustomerRecord> {
        self.customer_index
            .get(customer_id)
            .map(|&i| &self.customers[i])
    }

    /// Active rentals keyed by customer id.
    pub fn hired_vehicles(&self) -> &HashMap<String, BTreeSet<VehicleId>> {
        &self.rentals
    }

    fn ensure_registered(&self, customer: &CustomerRecord) -> Result<()> {
        match self.customer(customer.customer_id()) {
            Some(known) if known == customer => Ok(()),
            _ => Err(HireError::UnknownCustomer {
                customer_id: customer.customer_id().to_string(),
            }),
        }
    }

    fn check_rules(&self, customer: &CustomerRecord, kind: VehicleKind) -> Option<Rejection> {
        let active = self
            .rentals
            .get(customer.customer_id())
            .map_or(0, BTreeSet::len);
        if active >= self.policy.max_active_rentals {
            return Some(Rejection::RentalLimitReached);
        }

        let age = customer.age_in_year(self.clock.today().year());
        match kind {
            VehicleKind::Car if age < self.policy.min_car_age => Some(Rejection::Underage),
            VehicleKind::Van if age < self.policy.min_van_age => Some(Rejection::Underage),
            VehicleKind::Van if !customer.has_commercial_license() => {
                Some(Rejection::MissingCommercialLicence)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedClock;

    fn manager() -> VehicleManager<FixedClock> {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        VehicleManager::with_parts(
            IdAllocator::with_seed(42),
            HirePolicy::default(),
            FixedClock(today),
        )
    }

    fn dob(year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, 12, 31).unwrap()
    }

    #[test]
    fn test_register_vehicle_by_tag() {
        let mut m = manager();
        assert_eq!(m.register_vehicle(" CAR ").unwrap().kind(), VehicleKind::Car);
        assert_eq!(m.register_vehicle("van").unwrap().kind(), VehicleKind::Van);
        assert!(m.register_vehicle("bike").is_err());
        assert_eq!(m.vehicles().len(), 2);
    }

    #[test]
    fn test_customer_ids_are_sequential() {
        let mut m = manager();
        let a = m.register_customer("Ann", "Lee", dob(1990), false).unwrap();
        let b = m.register_customer("Bo", "Lee", dob(1990), false).unwrap();

        assert_eq!(a.customer_id(), "Customer1");
        assert_eq!(b.customer_id(), "Customer2");
        assert_eq!(m.customer("Customer2"), Some(&b));
    }

    #[test]
    fn test_rule_order_limit_before_age() {
        let mut m = manager();
        for _ in 0..4 {
            m.register_vehicle("car").unwrap();
        }
        let adult = m.register_customer("Ann", "Lee", dob(1990), false).unwrap();
        for _ in 0..3 {
            assert!(m.hire_vehicle(&adult, "car", 1).unwrap());
        }

        // limit wins even when the van would also fail eligibility
        assert_eq!(
            m.hire(&adult, "van", 1).unwrap(),
            HireOutcome::Rejected(Rejection::RentalLimitReached)
        );
    }

    #[test]
    fn test_van_rejections_are_distinguished() {
        let mut m = manager();
        m.register_vehicle("van").unwrap();
        let young = m.register_customer("Al", "Young", dob(2002), true).unwrap();
        let unlicensed = m.register_customer("Ed", "Old", dob(1970), false).unwrap();

        assert_eq!(
            m.hire(&young, "van", 1).unwrap(),
            HireOutcome::Rejected(Rejection::Underage)
        );
        assert_eq!(
            m.hire(&unlicensed, "van", 1).unwrap(),
            HireOutcome::Rejected(Rejection::MissingCommercialLicence)
        );
    }

    #[test]
    fn test_selection_follows_registration_order() {
        let mut m = manager();
        let first = m.register_vehicle("car").unwrap().id();
        m.register_vehicle("car").unwrap();
        let customer = m.register_customer("Ann", "Lee", dob(1990), false).unwrap();

        assert_eq!(
            m.hire(&customer, "car", 2).unwrap(),
            HireOutcome::Hired(first)
        );
    }

    #[test]
    fn test_unregistered_customer_is_an_error() {
        let mut m = manager();
        m.register_vehicle("car").unwrap();
        let stranger = CustomerRecord::new(
            Name::new("No", "Body").unwrap(),
            dob(1980),
            false,
            "Customer9",
        )
        .unwrap();

        assert!(matches!(
            m.hire_vehicle(&stranger, "car", 1),
            Err(HireError::UnknownCustomer { .. })
        ));
        assert_eq!(m.available_count("car").unwrap(), 1);
    }

    #[test]
    fn test_return_with_negative_mileage_leaves_state() {
        let mut m = manager();
        let id = m.register_vehicle("car").unwrap().id();
        let customer = m.register_customer("Ann", "Lee", dob(1990), false).unwrap();
        assert!(m.hire_vehicle(&customer, "car", 1).unwrap());

        assert!(matches!(
            m.return_vehicle(&id, &customer, -5),
            Err(HireError::NegativeMileage { value: -5 })
        ));
        assert!(m.vehicle(&id).unwrap().is_hired());
        assert_eq!(m.vehicles_by_customer(&customer).len(), 1);
    }

    #[test]
    fn test_clear_inspection_unknown_vehicle() {
        let mut m = manager();
        let id = IdAllocator::with_seed(1).allocate("van").unwrap();
        assert!(matches!(
            m.clear_inspection(&id),
            Err(HireError::UnknownVehicle { .. })
        ));
    }
}
