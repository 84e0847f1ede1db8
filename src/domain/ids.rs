//! Vehicle identifiers and the allocator that hands them out.
//!
//! An identifier reads `C`/`V`, one letter, one digit, `-`, then a
//! three-digit number: even for cars, odd for vans (`CK4-318`, `VB0-227`).

use crate::domain::model::VehicleKind;
use crate::utils::error::{HireError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// Unique vehicle identity. Field order matches the printed form, so the
/// derived ordering is the lexical ordering of the string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId {
    kind: VehicleKind,
    letter: u8,
    digit: u8,
    number: u16,
}

impl VehicleId {
    /// Distinct identifiers available per vehicle kind.
    pub const CAPACITY_PER_KIND: usize = 26 * 10 * 450;

    pub fn kind(&self) -> VehicleKind {
        self.kind
    }

    pub fn number(&self) -> u16 {
        self.number
    }

    /// Part before the separator, e.g. `CK4`.
    pub fn first_component(&self) -> String {
        format!(
            "{}{}{}",
            self.kind.prefix(),
            self.letter as char,
            self.digit
        )
    }

    /// Part after the separator, e.g. `318`.
    pub fn second_component(&self) -> String {
        format!("{:03}", self.number)
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first_component(), self.second_component())
    }
}

impl Serialize for VehicleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Issues vehicle identifiers and remembers every one it has issued.
pub struct IdAllocator {
    issued: HashSet<VehicleId>,
    rng: StdRng,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            issued: HashSet::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence of identifiers for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            issued: HashSet::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Parses a free-form type tag (`" Car "`, `"VAN"`) and allocates for it.
    pub fn allocate(&mut self, kind_tag: &str) -> Result<VehicleId> {
        let kind: VehicleKind = kind_tag.parse()?;
        self.allocate_kind(kind)
    }

    pub fn allocate_kind(&mut self, kind: VehicleKind) -> Result<VehicleId> {
        if self.issued_count(kind) >= VehicleId::CAPACITY_PER_KIND {
            return Err(HireError::IdSpaceExhausted {
                kind: kind.label().to_string(),
            });
        }

        loop {
            let candidate = self.sample(kind);
            if self.issued.insert(candidate) {
                tracing::trace!(id = %candidate, "allocated vehicle id");
                return Ok(candidate);
            }
        }
    }

    pub fn is_issued(&self, id: &VehicleId) -> bool {
        self.issued.contains(id)
    }

    pub fn issued_count(&self, kind: VehicleKind) -> usize {
        self.issued.iter().filter(|id| id.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }

    fn sample(&mut self, kind: VehicleKind) -> VehicleId {
        let letter = b'A' + self.rng.gen_range(0..26u8);
        let digit = self.rng.gen_range(0..10u8);
        // 100..=998 even for cars, 101..=999 odd for vans
        let number = self.rng.gen_range(50..500u16) * 2 + kind.parity();

        VehicleId {
            kind,
            letter,
            digit,
            number,
        }
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
