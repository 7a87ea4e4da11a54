// platform.rs
use std::path::PathBuf;
use thiserror::Error;

/// Name of the folder converted images are written to, under the storage root.
pub const OUTPUT_DIR_NAME: &str = "ConvertedImages";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permission {
    ReadExternalStorage,
    WriteExternalStorage,
}

impl Permission {
    pub const STORAGE: [Permission; 2] = [
        Permission::ReadExternalStorage,
        Permission::WriteExternalStorage,
    ];

    pub fn identifier(self) -> &'static str {
        match self {
            Permission::ReadExternalStorage => "android.permission.READ_EXTERNAL_STORAGE",
            Permission::WriteExternalStorage => "android.permission.WRITE_EXTERNAL_STORAGE",
        }
    }
}

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("unable to locate the shared storage directory")]
    NoStorageRoot,
}

/// Capabilities the converter needs from the host operating system.
pub trait HostPlatform {
    fn check_permission(&self, permission: Permission) -> bool;
    fn request_permissions(&self, permissions: &[Permission]);
    fn storage_root(&self) -> Result<PathBuf, PlatformError>;
}

/// Requests every storage permission that is not granted yet, in one batch.
/// Returns the permissions that were requested.
pub fn ensure_storage_permissions(platform: &dyn HostPlatform) -> Vec<Permission> {
    let missing: Vec<Permission> = Permission::STORAGE
        .iter()
        .copied()
        .filter(|permission| !platform.check_permission(*permission))
        .collect();

    if !missing.is_empty() {
        platform.request_permissions(&missing);
    }
    missing
}

pub fn output_directory(platform: &dyn HostPlatform) -> Result<PathBuf, PlatformError> {
    Ok(platform.storage_root()?.join(OUTPUT_DIR_NAME))
}

pub struct DesktopPlatform;

impl HostPlatform for DesktopPlatform {
    fn check_permission(&self, _permission: Permission) -> bool {
        true
    }

    fn request_permissions(&self, _permissions: &[Permission]) {}

    fn storage_root(&self) -> Result<PathBuf, PlatformError> {
        dirs::home_dir()
            .or_else(|| std::env::current_dir().ok())
            .ok_or(PlatformError::NoStorageRoot)
    }
}

#[cfg(target_os = "android")]
pub struct AndroidPlatform;

#[cfg(target_os = "android")]
impl HostPlatform for AndroidPlatform {
    fn check_permission(&self, permission: Permission) -> bool {
        let Ok(root) = self.storage_root() else {
            return false;
        };
        match permission {
            Permission::ReadExternalStorage => std::fs::read_dir(&root).is_ok(),
            Permission::WriteExternalStorage => std::fs::metadata(&root)
                .map(|metadata| !metadata.permissions().readonly())
                .unwrap_or(false),
        }
    }

    // Runtime grants need the Java activity; the caller logs what was missing.
    fn request_permissions(&self, _permissions: &[Permission]) {}

    fn storage_root(&self) -> Result<PathBuf, PlatformError> {
        Ok(std::env::var_os("EXTERNAL_STORAGE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/sdcard")))
    }
}

#[cfg(target_os = "android")]
pub fn current_platform() -> Box<dyn HostPlatform> {
    Box::new(AndroidPlatform)
}

#[cfg(not(target_os = "android"))]
pub fn current_platform() -> Box<dyn HostPlatform> {
    Box::new(DesktopPlatform)
}
