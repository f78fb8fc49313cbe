use std::path::Path;

use retrobox_core::{CatalogEntry, Status, is_none_like};
use retrobox_lib::list_sub_directories;

use super::Verifier;
use crate::layout::known_key;
use crate::source::Item;
use crate::EngineError;

/// True when the catalog and PinUP agree on a version. Either side unknown
/// means they do not.
pub fn verify_csv_bdd_version(csv: Option<&str>, installed: Option<&str>) -> bool {
    if is_none_like(csv) || is_none_like(installed) {
        return false;
    }
    csv == installed
}

impl Verifier<'_> {
    /// The catalog row and PinUP record the same version of `item`.
    pub(super) fn version_agreement(&self, item: &Item) -> Status {
        let catalog = item.catalog_version.as_deref();
        let installed = item.installed_version();
        let agree = verify_csv_bdd_version(catalog, installed);
        if !agree {
            log::warn!(
                "{}: catalog version {} but PinUP has {}",
                item.name(),
                catalog.unwrap_or("none"),
                installed.unwrap_or("none")
            );
        }
        Status::from(agree)
    }

    /// Exactly one version folder is archived under `root`.
    pub(super) fn unique_version(&self, root: &Path) -> Result<Status, EngineError> {
        let versions = list_sub_directories(root)?;
        if versions.len() != 1 {
            log::warn!(
                "{} versions archived in {}, expected one",
                versions.len(),
                root.display()
            );
        }
        Ok(Status::from(versions.len() == 1))
    }

    /// The latest published version is archived under `root`.
    ///
    /// Not applicable without a download page or when the page yields no
    /// version; a failed lookup is logged and treated the same way.
    pub(super) fn latest_version(
        &self,
        entry: &CatalogEntry,
        root: &Path,
    ) -> Result<Status, EngineError> {
        let Some(url) = known_key(entry.weblink_url.as_deref()) else {
            return Ok(Status::NotApplicable);
        };
        let latest = match self.services.lookup.latest_version(url) {
            Ok(Some(version)) => version,
            Ok(None) => return Ok(Status::NotApplicable),
            Err(e) => {
                log::warn!("{}: {}", entry.name, e);
                return Ok(Status::NotApplicable);
            }
        };
        let archived = list_sub_directories(root)?;
        if !archived.contains(&latest) {
            log::warn!(
                "Latest version {} of {} is not archived ({})",
                latest,
                entry.name,
                archived.join(", ")
            );
            return Ok(Status::Absent);
        }
        Ok(Status::Present)
    }
}
