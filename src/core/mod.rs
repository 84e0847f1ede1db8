pub mod manager;

pub use crate::domain::ids::{IdAllocator, VehicleId};
pub use crate::domain::model::{CustomerRecord, Name, Vehicle, VehicleKind, VehicleSpec};
pub use crate::domain::policy::HirePolicy;
pub use crate::domain::ports::{Clock, FixedClock, SystemClock};
pub use crate::utils::error::Result;
