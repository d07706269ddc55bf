//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Dashboard;

/// Delete the generated output
pub fn run(dashboard: &Dashboard) -> Result<()> {
    if dashboard.public_dir.exists() {
        fs::remove_dir_all(&dashboard.public_dir)?;
        tracing::info!("Deleted: {:?}", dashboard.public_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_removes_public_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("public/data")).unwrap();
        fs::write(dir.path().join("public/index.html"), "<html></html>").unwrap();

        let dashboard = Dashboard::new(dir.path()).unwrap();
        run(&dashboard).unwrap();
        assert!(!dir.path().join("public").exists());

        // Nothing to delete is fine
        run(&dashboard).unwrap();
    }
}
