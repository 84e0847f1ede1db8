use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, validate_range, Validate};
use serde::{Deserialize, Serialize};

/// Business-rule parameters consulted by every hire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HirePolicy {
    pub max_active_rentals: usize,
    pub min_car_age: i32,
    pub min_van_age: i32,
    /// Van hires at least this long flag the van for inspection.
    pub van_inspection_days: u32,
}

impl Default for HirePolicy {
    fn default() -> Self {
        Self {
            max_active_rentals: 3,
            min_car_age: 18,
            min_van_age: 23,
            van_inspection_days: 10,
        }
    }
}

impl Validate for HirePolicy {
    fn validate(&self) -> Result<()> {
        validate_positive_number("policy.max_active_rentals", self.max_active_rentals, 1)?;
        validate_range("policy.min_car_age", self.min_car_age, 0, 150)?;
        validate_range("policy.min_van_age", self.min_van_age, 0, 150)?;
        validate_range("policy.van_inspection_days", self.van_inspection_days, 1, 365)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = HirePolicy::default();
        assert_eq!(policy.max_active_rentals, 3);
        assert_eq!(policy.min_car_age, 18);
        assert_eq!(policy.min_van_age, 23);
        assert_eq!(policy.van_inspection_days, 10);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_zero_rental_limit_rejected() {
        let policy = HirePolicy {
            max_active_rentals: 0,
            ..HirePolicy::default()
        };
        assert!(policy.validate().is_err());
    }
}
