//! System utilities

pub mod environment;
pub mod release;

use std::path::Path;

/// Check if the VM was provisioned from an Ubuntu cloud image (Multipass,
/// cloud-init); those ship an sshd drop-in that disables password login
pub fn is_cloud_image(sshd_config_dir: &Path, conf_name: &str) -> bool {
    sshd_config_dir.join(conf_name).exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_cloud_image() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_cloud_image(dir.path(), "60-cloudimg-settings.conf"));
        std::fs::write(dir.path().join("60-cloudimg-settings.conf"), "").unwrap();
        assert!(is_cloud_image(dir.path(), "60-cloudimg-settings.conf"));
    }
}
