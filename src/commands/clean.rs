//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Site;

/// Delete the generated home page and pagination state
pub fn run(site: &Site) -> Result<()> {
    if site.public_dir.exists() {
        fs::remove_dir_all(&site.public_dir)?;
        tracing::info!("Deleted: {:?}", site.public_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    #[test]
    fn test_clean_removes_public_dir() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::with_config(dir.path().to_path_buf(), SiteConfig::default());
        fs::create_dir_all(&site.public_dir).unwrap();
        fs::write(site.index_path(), "<html></html>").unwrap();

        run(&site).unwrap();
        assert!(!site.public_dir.exists());

        // nothing to delete
        run(&site).unwrap();
    }
}
