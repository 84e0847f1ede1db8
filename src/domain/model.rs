use crate::domain::ids::VehicleId;
use crate::utils::error::{HireError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_non_negative};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VehicleKind {
    Car,
    Van,
}

impl VehicleKind {
    pub fn label(self) -> &'static str {
        match self {
            VehicleKind::Car => "Car",
            VehicleKind::Van => "Van",
        }
    }

    /// Miles allowed between services.
    pub fn service_threshold(self) -> u64 {
        match self {
            VehicleKind::Car => 10_000,
            VehicleKind::Van => 5_000,
        }
    }

    pub(crate) fn prefix(self) -> char {
        match self {
            VehicleKind::Car => 'C',
            VehicleKind::Van => 'V',
        }
    }

    pub(crate) fn parity(self) -> u16 {
        match self {
            VehicleKind::Car => 0,
            VehicleKind::Van => 1,
        }
    }
}

impl FromStr for VehicleKind {
    type Err = HireError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "car" => Ok(VehicleKind::Car),
            "van" => Ok(VehicleKind::Van),
            _ => Err(HireError::InvalidVehicleKind {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for VehicleKind {
    type Error = HireError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<VehicleKind> for String {
    fn from(kind: VehicleKind) -> Self {
        kind.label().to_ascii_lowercase()
    }
}

impl fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind-specific state of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleSpec {
    Car,
    Van { inspection_required: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    id: VehicleId,
    mileage: u64,
    hired: bool,
    spec: VehicleSpec,
}

impl Vehicle {
    pub fn new(id: VehicleId) -> Self {
        let spec = match id.kind() {
            VehicleKind::Car => VehicleSpec::Car,
            VehicleKind::Van => VehicleSpec::Van {
                inspection_required: false,
            },
        };

        Self {
            id,
            mileage: 0,
            hired: false,
            spec,
        }
    }

    pub fn id(&self) -> VehicleId {
        self.id
    }

    pub fn kind(&self) -> VehicleKind {
        match self.spec {
            VehicleSpec::Car => VehicleKind::Car,
            VehicleSpec::Van { .. } => VehicleKind::Van,
        }
    }

    pub fn spec(&self) -> VehicleSpec {
        self.spec
    }

    pub fn vehicle_type(&self) -> &'static str {
        self.kind().label()
    }

    pub fn service_threshold(&self) -> u64 {
        self.kind().service_threshold()
    }

    /// Miles driven since the last service.
    pub fn current_mileage(&self) -> u64 {
        self.mileage
    }

    pub fn set_current_mileage(&mut self, mileage: i64) -> Result<()> {
        self.mileage = validate_non_negative("current_mileage", mileage)?;
        Ok(())
    }

    /// Adds a trip to the running total and returns the new total.
    pub fn add_mileage(&mut self, delta: i64) -> Result<u64> {
        let total = self.mileage_after(delta)?;
        self.mileage = total;
        Ok(total)
    }

    /// Total the odometer would show after `delta`, without applying it.
    pub fn mileage_after(&self, delta: i64) -> Result<u64> {
        let delta = validate_non_negative("mileage_driven", delta)?;
        self.mileage
            .checked_add(delta)
            .ok_or(HireError::MileageOverflow {
                current: self.mileage,
                delta,
            })
    }

    pub fn is_hired(&self) -> bool {
        self.hired
    }

    pub(crate) fn set_hired(&mut self, hired: bool) {
        self.hired = hired;
    }

    pub fn requires_inspection(&self) -> bool {
        matches!(
            self.spec,
            VehicleSpec::Van {
                inspection_required: true
            }
        )
    }

    pub(crate) fn flag_inspection(&mut self) {
        if let VehicleSpec::Van {
            inspection_required,
        } = &mut self.spec
        {
            *inspection_required = true;
        }
    }

    /// Clears a van's inspection flag. Returns whether it was set.
    pub fn clear_inspection(&mut self) -> bool {
        match &mut self.spec {
            VehicleSpec::Van {
                inspection_required,
            } => std::mem::replace(inspection_required, false),
            VehicleSpec::Car => false,
        }
    }

    pub fn is_service_due(&self) -> bool {
        self.mileage >= self.service_threshold()
    }

    /// Resets the mileage once it reaches the service threshold.
    pub fn perform_service_if_due(&mut self) -> bool {
        if self.is_service_due() {
            self.mileage = 0;
            true
        } else {
            false
        }
    }

    /// Free, not awaiting inspection, and not over its service mileage.
    pub fn is_hireable(&self) -> bool {
        !self.hired && !self.requires_inspection() && !self.is_service_due()
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.vehicle_type(), self.id)?;
        if self.requires_inspection() {
            write!(f, " (requires inspection)")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Name {
    first_name: String,
    last_name: String,
}

impl Name {
    pub fn new(first_name: &str, last_name: &str) -> Result<Self> {
        validate_non_empty_string("first_name", first_name)?;
        validate_non_empty_string("last_name", last_name)?;

        Ok(Self {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerRecord {
    name: Name,
    birth_date: NaiveDate,
    commercial_license: bool,
    customer_id: String,
}

impl CustomerRecord {
    pub fn new(
        name: Name,
        birth_date: NaiveDate,
        commercial_license: bool,
        customer_id: &str,
    ) -> Result<Self> {
        validate_non_empty_string("customer_id", customer_id)?;

        Ok(Self {
            name,
            birth_date,
            commercial_license,
            customer_id: customer_id.to_string(),
        })
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn has_commercial_license(&self) -> bool {
        self.commercial_license
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    /// Age by calendar-year subtraction: birthdays later in the year are
    /// not taken into account.
    pub fn age_in_year(&self, year: i32) -> i32 {
        year - self.birth_date.year()
    }
}

impl fmt::Display for CustomerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.customer_id)
    }
}
