use thiserror::Error;

#[derive(Error, Debug)]
pub enum HireError {
    #[error("Invalid vehicle type: {value}")]
    InvalidVehicleKind { value: String },

    #[error("Validation error on {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error("Mileage cannot be negative: {value}")]
    NegativeMileage { value: i64 },

    #[error("Mileage overflow: {current} + {delta}")]
    MileageOverflow { current: u64, delta: u64 },

    #[error("Customer record already exists: {name} born {birth_date}")]
    DuplicateCustomer { name: String, birth_date: String },

    #[error("Unknown customer: {customer_id}")]
    UnknownCustomer { customer_id: String },

    #[error("Unknown vehicle: {vehicle_id}")]
    UnknownVehicle { vehicle_id: String },

    #[error("Vehicle {vehicle_id} is not rented by {customer_id}")]
    NotRentedBy {
        vehicle_id: String,
        customer_id: String,
    },

    #[error("No unused {kind} identifiers remain")]
    IdSpaceExhausted { kind: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidInput,
    Duplicate,
    State,
    Configuration,
    System,
}

impl HireError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        HireError::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            HireError::InvalidVehicleKind { .. }
            | HireError::ValidationError { .. }
            | HireError::NegativeMileage { .. }
            | HireError::MileageOverflow { .. }
            | HireError::UnknownCustomer { .. }
            | HireError::UnknownVehicle { .. } => ErrorCategory::InvalidInput,
            HireError::DuplicateCustomer { .. } => ErrorCategory::Duplicate,
            HireError::NotRentedBy { .. } | HireError::IdSpaceExhausted { .. } => {
                ErrorCategory::State
            }
            HireError::ConfigError { .. } => ErrorCategory::Configuration,
            HireError::IoError(_) | HireError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::InvalidInput => format!("Rejected input: {}", self),
            ErrorCategory::Duplicate => format!("Already registered: {}", self),
            ErrorCategory::State => format!("Operation not allowed: {}", self),
            ErrorCategory::Configuration => format!("Bad configuration: {}", self),
            ErrorCategory::System => format!("System failure: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            HireError::InvalidVehicleKind { .. } => "Use \"car\" or \"van\" as the vehicle type",
            HireError::ValidationError { .. } => "Fill in every required field",
            HireError::NegativeMileage { .. } | HireError::MileageOverflow { .. } => {
                "Report the distance driven as a non-negative number of miles"
            }
            HireError::DuplicateCustomer { .. } => "Look up the existing customer record instead",
            HireError::UnknownCustomer { .. } => "Register the customer before hiring",
            HireError::UnknownVehicle { .. } => "Check the vehicle identifier",
            HireError::NotRentedBy { .. } => "Return the vehicle against the customer holding it",
            HireError::IdSpaceExhausted { .. } => "The fleet cannot grow further for this type",
            HireError::ConfigError { .. } => "Check the scenario file against the documented layout",
            HireError::IoError(_) => "Check that the file exists and is readable",
            HireError::SerializationError(_) => "Retry without --json",
        }
    }
}

pub type Result<T> = std::result::Result<T, HireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_is_distinct_from_invalid_input() {
        let dup = HireError::DuplicateCustomer {
            name: "Ann Lee".to_string(),
            birth_date: "1990-01-01".to_string(),
        };
        let invalid = HireError::InvalidVehicleKind {
            value: "bus".to_string(),
        };

        assert_eq!(dup.category(), ErrorCategory::Duplicate);
        assert_eq!(invalid.category(), ErrorCategory::InvalidInput);
    }

    #[test]
    fn test_user_friendly_message_includes_detail() {
        let err = HireError::NegativeMileage { value: -5 };
        assert!(err.user_friendly_message().contains("-5"));
    }
}
