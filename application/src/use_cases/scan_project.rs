//! Scan project use case
//!
//! Fills every configured [`ModuleSpace`] with the modules found under its
//! source patterns.

use std::path::Path;
use std::sync::Arc;

use modbuild_domain::{ModuleSpace, ModuleSpaces};
use tracing::{debug, info};

use crate::ports::module_scanner::{ModuleScanner, ScanError};

pub struct ScanProjectUseCase {
    scanner: Arc<dyn ModuleScanner>,
}

impl ScanProjectUseCase {
    pub fn new(scanner: Arc<dyn ModuleScanner>) -> Self {
        Self { scanner }
    }

    /// Scan `root` for each space's patterns; spaces keep their order
    pub fn execute(&self, root: &Path, spaces: &ModuleSpaces) -> Result<ModuleSpaces, ScanError> {
        let mut scanned = Vec::with_capacity(spaces.len());
        for space in spaces.iter() {
            let modules = self.scanner.scan(root, &space.patterns)?;
            debug!(space = %space.name, modules = ?modules.names(), "Scanned space");
            scanned.push(ModuleSpace {
                modules,
                ..space.clone()
            });
        }
        let total: usize = scanned.iter().map(|s| s.modules.len()).sum();
        info!("Found {} module(s) in {} space(s)", total, scanned.len());
        Ok(ModuleSpaces::new(scanned))
    }
}
