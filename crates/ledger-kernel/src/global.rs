//! Process-wide registry instance for top-level wiring.
//!
//! Library code takes `&Registry` explicitly. Only binaries and other
//! wiring points should reach for [`instance`].

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::registry::Registry;
use std::sync::OnceLock;

static INSTANCE: OnceLock<Registry> = OnceLock::new();

/// The shared instance, created with the default config on first access.
pub fn instance() -> &'static Registry {
    INSTANCE.get_or_init(Registry::default)
}

/// Install a configured shared instance.
///
/// Fails with `AlreadyInitialized` if [`instance`] or this function already
/// ran in this process.
pub fn init_instance(config: RegistryConfig) -> Result<&'static Registry, RegistryError> {
    let configured = Registry::new(config)?;
    let mut installed = false;
    let registry = INSTANCE.get_or_init(|| {
        installed = true;
        configured
    });
    if installed {
        Ok(registry)
    } else {
        Err(RegistryError::AlreadyInitialized)
    }
}

/// Clear the shared instance's entries, catalogs, and logs.
///
/// Meant for test setup. A no-op before first access.
pub fn reset_instance() {
    if let Some(registry) = INSTANCE.get() {
        registry.reset();
    }
}
