use std::sync::{Arc, RwLock};

use crate::config::{Config, PresentationConfig, ReferenceSources};
use crate::models::reference::ReferenceSummary;
use crate::services::reference_data::ReferenceTables;
use crate::services::roi_estimator::RoiEstimator;

#[derive(Clone, Debug)]
pub struct AppState {
    /// Current reference tables. Swapped as a whole on reload; never edited
    /// in place.
    tables: Arc<RwLock<Arc<ReferenceTables>>>,
    sources: Arc<ReferenceSources>,
    pub estimator: Arc<RoiEstimator>,
    pub presentation: Arc<PresentationConfig>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self::with_tables(config, ReferenceTables::load(&config.reference))
    }

    pub fn with_tables(config: &Config, tables: ReferenceTables) -> Self {
        Self {
            tables: Arc::new(RwLock::new(Arc::new(tables))),
            sources: Arc::new(config.reference.clone()),
            estimator: Arc::new(RoiEstimator::new(config.estimator)),
            presentation: Arc::new(config.presentation.clone()),
        }
    }

    /// Snapshot of the tables in use; stays valid across a reload.
    pub fn tables(&self) -> Arc<ReferenceTables> {
        match self.tables.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    /// Rebuilds every table from the configured sources, then publishes the
    /// new set in a single swap.
    pub fn reload_tables(&self) -> ReferenceSummary {
        let fresh = Arc::new(ReferenceTables::load(&self.sources));
        let summary = fresh.summary();
        match self.tables.write() {
            Ok(mut guard) => *guard = fresh,
            Err(poisoned) => *poisoned.into_inner() = fresh,
        }
        summary
    }
}
