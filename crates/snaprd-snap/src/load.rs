//! Loading snap metadata from the system or from a snap container.
//!
//! [`read_info`] answers "what is installed as `name` at this revision" by
//! reading the mounted snap's manifest and decorating the result with
//! side-info, blob size, and implicit hooks. [`read_info_from_snap_file`]
//! does the same for a not-yet-installed container and fully validates it.

use std::io;
use std::sync::{PoisonError, RwLock};

use thiserror::Error;

use crate::container::Container;
use crate::hooks::{add_implicit_hooks, add_implicit_hooks_from_container};
use crate::info::{Info, SideInfo};
use crate::paths;
use crate::revision::Revision;
use crate::validate::{self, ValidationError};
use crate::yaml::{self, ParseError};

/// Errors from the metadata loaders.
#[derive(Error, Debug)]
pub enum InfoError {
    /// No snap with this name is installed at this revision.
    #[error("cannot find installed snap {snap:?} at revision {revision}")]
    NotFound {
        /// The snap that was asked for.
        snap: String,
        /// The revision that was asked for.
        revision: Revision,
    },
    /// Reading the manifest or the blob failed.
    #[error("cannot read snap metadata: {0}")]
    Io(#[from] io::Error),
    /// The manifest does not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The metadata fails validation.
    #[error(transparent)]
    Validate(#[from] ValidationError),
}

type SanitizeFn = Box<dyn Fn(&mut Info) + Send + Sync>;

/// The interface layer owns plug/slot sanitization; it registers the real
/// implementation here at startup.
static SANITIZE_PLUGS_SLOTS: RwLock<Option<SanitizeFn>> = RwLock::new(None);

/// Installs the process-wide plug and slot sanitizer.
///
/// Must be called once at startup, before any loader runs; loading snap
/// metadata without a sanitizer in place is a programming error and
/// panics.
pub fn set_sanitize_plugs_slots(sanitize: impl Fn(&mut Info) + Send + Sync + 'static) {
    let mut slot = SANITIZE_PLUGS_SLOTS.write().unwrap_or_else(PoisonError::into_inner);
    *slot = Some(Box::new(sanitize));
}

/// Swaps the sanitizer for the lifetime of the returned guard.
///
/// Test helper; the previous sanitizer comes back when the guard drops.
pub fn mock_sanitize_plugs_slots(
    sanitize: impl Fn(&mut Info) + Send + Sync + 'static,
) -> SanitizerGuard {
    let mut slot = SANITIZE_PLUGS_SLOTS.write().unwrap_or_else(PoisonError::into_inner);
    let prev = slot.replace(Box::new(sanitize));
    SanitizerGuard { prev }
}

/// Restores the previously installed sanitizer on drop.
pub struct SanitizerGuard {
    prev: Option<SanitizeFn>,
}

impl Drop for SanitizerGuard {
    fn drop(&mut self) {
        let mut slot = SANITIZE_PLUGS_SLOTS.write().unwrap_or_else(PoisonError::into_inner);
        *slot = self.prev.take();
    }
}

impl std::fmt::Debug for SanitizerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanitizerGuard").finish_non_exhaustive()
    }
}

fn sanitize_plugs_slots(info: &mut Info) {
    let slot = SANITIZE_PLUGS_SLOTS.read().unwrap_or_else(PoisonError::into_inner);
    match slot.as_ref() {
        Some(sanitize) => sanitize(info),
        None => panic!("plug/slot sanitizer not set"),
    }
}

/// Reads the metadata of the snap installed as `name` at the revision the
/// side-info names.
///
/// The side-info is merged into the result wholesale; its fields win over
/// the manifest's wherever both speak.
pub fn read_info(name: &str, si: &SideInfo) -> Result<Info, InfoError> {
    let yaml_path = paths::mount_dir(name, si.revision).join("meta").join("snap.yaml");
    let meta = match std::fs::read(&yaml_path) {
        Ok(meta) => meta,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(InfoError::NotFound { snap: name.to_string(), revision: si.revision });
        }
        Err(err) => return Err(err.into()),
    };
    let mut info = yaml::info_from_snap_yaml(&meta)?;
    info.side_info = si.clone();

    let blob = std::fs::metadata(paths::mount_file(name, si.revision))?;
    info.download_info.size = blob.len();

    add_implicit_hooks(&mut info)?;
    sanitize_plugs_slots(&mut info);
    tracing::debug!("loaded snap {:?} at revision {}", info.name(), info.revision());
    Ok(info)
}

/// Reads and validates the metadata inside a snap container, merging in a
/// side-info when one is already known.
pub fn read_info_from_snap_file(
    container: &dyn Container,
    si: Option<&SideInfo>,
) -> Result<Info, InfoError> {
    let meta = container.read_file("meta/snap.yaml")?;
    let mut info = yaml::info_from_snap_yaml(&meta)?;
    if let Some(si) = si {
        info.side_info = si.clone();
    }
    info.download_info.size = container.size()?;
    add_implicit_hooks_from_container(&mut info, container)?;
    validate::validate(&info)?;
    Ok(info)
}
