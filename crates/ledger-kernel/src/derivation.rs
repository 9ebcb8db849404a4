//! Derivation units: the computation modules that feed the registry.
//!
//! A unit reads inputs from `&Registry`, computes, and writes outputs back.
//! Independent units may run in parallel; the registry serializes writes.

use crate::error::RegistryError;
use crate::registry::Registry;
use std::thread;

pub trait Derivation: Sync {
    /// Producer id written as the source of this unit's outputs.
    fn id(&self) -> &str;

    fn run(&self, registry: &Registry) -> Result<(), RegistryError>;
}

/// A [`Derivation`] backed by a closure.
pub struct FnDerivation<F> {
    id: String,
    body: F,
}

impl<F> Derivation for FnDerivation<F>
where
    F: Fn(&str, &Registry) -> Result<(), RegistryError> + Sync,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn run(&self, registry: &Registry) -> Result<(), RegistryError> {
        (self.body)(&self.id, registry)
    }
}

/// Wrap `body` as a unit; the closure receives the unit id and the registry.
pub fn derivation<F>(id: impl Into<String>, body: F) -> FnDerivation<F>
where
    F: Fn(&str, &Registry) -> Result<(), RegistryError> + Sync,
{
    FnDerivation {
        id: id.into(),
        body,
    }
}

#[derive(Debug)]
pub struct UnitOutcome {
    pub unit: String,
    pub result: Result<(), RegistryError>,
}

impl UnitOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Run units in order, stopping at the first failure.
pub fn run_sequential(registry: &Registry, units: &[&dyn Derivation]) -> Result<(), RegistryError> {
    for unit in units {
        tracing::debug!(unit = unit.id(), "running derivation");
        unit.run(registry).map_err(|e| RegistryError::Derivation {
            unit: unit.id().to_string(),
            source: Box::new(e),
        })?;
    }
    Ok(())
}

/// Run every unit on its own scoped thread.
///
/// Outcomes are returned in input order. Units must not depend on each
/// other's outputs; ordering between them is unspecified.
pub fn run_parallel(registry: &Registry, units: &[&dyn Derivation]) -> Vec<UnitOutcome> {
    thread::scope(|scope| {
        let handles: Vec<_> = units
            .iter()
            .map(|unit| {
                let unit = *unit;
                (unit.id().to_string(), scope.spawn(move || unit.run(registry)))
            })
            .collect();

        handles
            .into_iter()
            .map(|(unit, handle)| {
                let result = match handle.join() {
                    Ok(result) => result,
                    Err(_) => {
                        tracing::error!(%unit, "derivation panicked");
                        Err(RegistryError::Panicked { unit: unit.clone() })
                    }
                };
                UnitOutcome { unit, result }
            })
            .collect()
    })
}
