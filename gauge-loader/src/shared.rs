//! Process-wide registry built from the bundled data

use std::sync::LazyLock;

use gauge_units::UnitManager;
use tracing::error;

use crate::Loader;

static SHARED: LazyLock<UnitManager> = LazyLock::new(|| match Loader::bundled().load() {
    Ok(loaded) => {
        loaded.report.log();
        loaded.manager
    }
    Err(e) => {
        error!(error = %e, "bundled unit definitions failed to load");
        UnitManager::new()
    }
});

/// Shared registry over the bundled definitions, initialized on first use.
///
/// Applications that load their own definitions should own a
/// [`UnitManager`] built with [`Loader`] instead.
pub fn shared() -> &'static UnitManager {
    &SHARED
}
