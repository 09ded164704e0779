//! Anonymous owner id kept in the work dir

use std::fs;
use std::path::Path;

use anyhow::Result;
use bloom::garden::OwnerId;

const OWNER_FILE: &str = "owner_id";

/// Owner id stored in `work_dir`, created on first use
pub fn anonymous_owner(work_dir: &Path) -> Result<OwnerId> {
    let path = work_dir.join(OWNER_FILE);

    if let Ok(owner) = fs::read_to_string(&path) {
        let owner = owner.trim();
        if !owner.is_empty() {
            return Ok(OwnerId::new(owner));
        }
    }

    let owner = format!("anon-{}", uuid::Uuid::new_v4());
    fs::write(&path, &owner)?;
    tracing::info!("Created anonymous owner {}", owner);

    Ok(OwnerId::new(owner))
}
