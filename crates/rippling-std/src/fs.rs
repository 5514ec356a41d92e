use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};

use anyhow::{anyhow, Context};
use camino::{Utf8Path, Utf8PathBuf};

use crate::RipplingStdError;

#[cfg(unix)]
const OWNER_ONLY_MODE: u32 = 0o600;

/// Interact with a file system
#[derive(Default, Copy, Clone)]
pub struct Fs {}

impl Fs {
    /// reads a file from disk
    pub fn read_file<P>(path: P) -> Result<String, RipplingStdError>
    where
        P: AsRef<Utf8Path>,
    {
        let path = path.as_ref();
        match fs::metadata(path) {
            Ok(metadata) => {
                if metadata.is_file() {
                    tracing::debug!("reading {} from disk", &path);
                    let contents = fs::read_to_string(path)
                        .with_context(|| format!("could not read {}", &path))?;
                    if contents.is_empty() {
                        Err(RipplingStdError::EmptyFile {
                            empty_file: path.to_string(),
                        })
                    } else {
                        Ok(contents)
                    }
                } else {
                    Err(anyhow!("'{}' is not a file", path).into())
                }
            }
            Err(e) => Err(anyhow!("could not find '{}'", path).context(e).into()),
        }
    }

    /// writes a file to disk, creating any missing parent directories
    pub fn write_file<P, C>(path: P, contents: C) -> Result<(), RipplingStdError>
    where
        P: AsRef<Utf8Path>,
        C: AsRef<[u8]>,
    {
        Self::write(path.as_ref(), contents.as_ref(), false)
    }

    /// writes a file that only its owner may read or write. On Unix the
    /// file is created with mode 0600, and an existing file is restricted
    /// before any contents are written to it.
    pub fn write_file_owner_only<P, C>(path: P, contents: C) -> Result<(), RipplingStdError>
    where
        P: AsRef<Utf8Path>,
        C: AsRef<[u8]>,
    {
        Self::write(path.as_ref(), contents.as_ref(), true)
    }

    fn write(path: &Utf8Path, contents: &[u8], owner_only: bool) -> Result<(), RipplingStdError> {
        tracing::debug!("checking existence of parent path in '{}'", path);

        let file_name = path.file_name().ok_or(anyhow!(
            "cannot write to a path without a final element {path}"
        ))?;

        let mut canonical_final_path = path
            .parent()
            .map(Self::upsert_path_exists)
            .ok_or(anyhow!("cannot write file to root or prefix {path}"))??;
        canonical_final_path.push(file_name);

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        if owner_only {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(OWNER_ONLY_MODE);
        }
        let mut file = options.open(&canonical_final_path).with_context(|| {
            format!(
                "tried to open {} but was unable to do so",
                &canonical_final_path
            )
        })?;
        // `mode` only applies to newly created files
        #[cfg(unix)]
        if owner_only {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(OWNER_ONLY_MODE))
                .with_context(|| {
                    format!("could not set permissions on {}", &canonical_final_path)
                })?;
        }
        #[cfg(not(unix))]
        let _ = owner_only;
        tracing::debug!("writing {} to disk", &canonical_final_path);
        file.write_all(contents)
            .with_context(|| format!("could not write {}", &canonical_final_path))?;
        file.sync_all()
            .with_context(|| format!("could not flush {}", &canonical_final_path))?;
        Ok(())
    }

    /// Given a path, where some elements may not exist, it will return the canonical
    /// representation of the path, AND create any missing interim directories.
    fn upsert_path_exists(path: &Utf8Path) -> Result<Utf8PathBuf, anyhow::Error> {
        if let Err(e) = path.canonicalize_utf8() {
            match e.kind() {
                ErrorKind::NotFound => {
                    tracing::debug!(
                        "could not canonicalize parent path '{}', attempting to create interim paths",
                        path
                    );
                    Self::create_dir_all(path).with_context(|| {
                        format!("{} does not exist and it could not be created", &path)
                    })?;
                }
                ErrorKind::PermissionDenied => {
                    return Err(anyhow!(
                        "cannot write file to path {} as user does not have permissions to do so",
                        path
                    ))
                }
                _ => {}
            }
        }
        path.canonicalize_utf8().map_err(|e| anyhow!(e))
    }

    /// creates a directory
    pub fn create_dir_all<P>(path: P) -> Result<(), RipplingStdError>
    where
        P: AsRef<Utf8Path>,
    {
        let path = path.as_ref();
        tracing::debug!("creating {} directory", &path);
        fs::create_dir_all(path)
            .with_context(|| format!("could not create {} directory", &path))?;
        Ok(())
    }

    /// removes a file; a file that is already gone is not an error
    pub fn remove_file<P>(path: P) -> Result<(), RipplingStdError>
    where
        P: AsRef<Utf8Path>,
    {
        let path = path.as_ref();
        match fs::remove_file(path) {
            Ok(()) => {
                tracing::debug!("removed {}", &path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow!(e)
                .context(format!("could not remove {}", &path))
                .into()),
        }
    }

    /// checks whether a path exists and is a file
    pub fn path_is_file<P>(path: P) -> bool
    where
        P: AsRef<Utf8Path>,
    {
        fs::metadata(path.as_ref())
            .map(|m| m.is_file())
            .unwrap_or(false)
    }
}
