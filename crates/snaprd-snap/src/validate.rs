//! Validation of snap metadata.
//!
//! Loaders run [`validate`] on anything that arrives from outside the
//! system, before the metadata is acted on. Individual rules are exposed
//! for callers that validate names before they have a full [`Info`].

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::info::{AppInfo, Info};

static VALID_SNAP_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[a-z0-9]+-?)*[a-z](?:-?[a-z0-9])*$").unwrap());

static VALID_APP_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9](?:-?[a-zA-Z0-9])*$").unwrap());

static VALID_HOOK_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z](?:-?[a-z0-9])*$").unwrap());

const DAEMON_CLASSES: &[&str] = &["simple", "forking", "oneshot", "notify", "dbus"];

const VERSION_MAX_LEN: usize = 32;

/// A reason a snap's metadata is not acceptable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The snap has no name at all.
    #[error("snap name cannot be empty")]
    EmptyName,
    /// The snap name breaks the naming rules.
    #[error("invalid snap name: {0:?}")]
    InvalidName(String),
    /// The version is empty, too long, or holds forbidden characters.
    #[error("invalid snap version: {0:?}")]
    InvalidVersion(String),
    /// An app name breaks the naming rules.
    #[error("invalid app name: {0:?}")]
    InvalidAppName(String),
    /// An app declares a daemon class the system does not know.
    #[error("unknown daemon class {daemon:?} in app {app:?}")]
    InvalidDaemon {
        /// The app declaring the daemon.
        app: String,
        /// The unknown class.
        daemon: String,
    },
    /// A hook name breaks the naming rules.
    #[error("invalid hook name: {0:?}")]
    InvalidHookName(String),
    /// A plug name breaks the naming rules.
    #[error("invalid plug name: {0:?}")]
    InvalidPlugName(String),
    /// A slot name breaks the naming rules.
    #[error("invalid slot name: {0:?}")]
    InvalidSlotName(String),
    /// An interface name breaks the naming rules.
    #[error("invalid interface name: {0:?}")]
    InvalidInterface(String),
}

/// Checks that `name` is a valid snap name: lowercase alphanumerics with
/// single inner dashes, and at least one letter.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if !VALID_SNAP_NAME.is_match(name) {
        return Err(ValidationError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Checks that `version` is printable as a version: up to 32 characters
/// drawn from alphanumerics plus `.+~:-`, beginning and ending with an
/// alphanumeric.
pub fn validate_version(version: &str) -> Result<(), ValidationError> {
    let bad = || ValidationError::InvalidVersion(version.to_string());
    if version.is_empty() || version.len() > VERSION_MAX_LEN {
        return Err(bad());
    }
    let mut chars = version.chars();
    let first = chars.next().unwrap_or(' ');
    if !first.is_ascii_alphanumeric() {
        return Err(bad());
    }
    let last = version.chars().next_back().unwrap_or(' ');
    if !last.is_ascii_alphanumeric() {
        return Err(bad());
    }
    for c in version.chars() {
        if !c.is_ascii_alphanumeric() && !".+~:-".contains(c) {
            return Err(bad());
        }
    }
    Ok(())
}

/// Checks that an app's name and daemon class are acceptable.
pub fn validate_app(app: &AppInfo) -> Result<(), ValidationError> {
    if !VALID_APP_NAME.is_match(&app.name) {
        return Err(ValidationError::InvalidAppName(app.name.clone()));
    }
    if !app.daemon.is_empty() && !DAEMON_CLASSES.contains(&app.daemon.as_str()) {
        return Err(ValidationError::InvalidDaemon {
            app: app.name.clone(),
            daemon: app.daemon.clone(),
        });
    }
    Ok(())
}

/// Checks that `name` is a valid hook name.
pub fn validate_hook_name(name: &str) -> Result<(), ValidationError> {
    if !VALID_HOOK_NAME.is_match(name) {
        return Err(ValidationError::InvalidHookName(name.to_string()));
    }
    Ok(())
}

/// Checks that `name` is a valid interface name. Interface names follow
/// the same rule as hook names.
pub fn validate_interface(name: &str) -> Result<(), ValidationError> {
    if !VALID_HOOK_NAME.is_match(name) {
        return Err(ValidationError::InvalidInterface(name.to_string()));
    }
    Ok(())
}

fn validate_interface_name(name: &str, slot: bool) -> Result<(), ValidationError> {
    // Plug and slot names follow the hook rule.
    if !VALID_HOOK_NAME.is_match(name) {
        return Err(if slot {
            ValidationError::InvalidSlotName(name.to_string())
        } else {
            ValidationError::InvalidPlugName(name.to_string())
        });
    }
    Ok(())
}

/// Checks a whole [`Info`] for acceptability: the snap name, the version,
/// and the names of every app, hook, plug, and slot.
pub fn validate(info: &Info) -> Result<(), ValidationError> {
    let name = info.name();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    validate_name(name)?;
    validate_version(&info.version)?;
    for app in info.apps.values() {
        validate_app(app)?;
    }
    for hook_name in info.hooks.keys() {
        validate_hook_name(hook_name)?;
    }
    for plug_name in info.plugs.keys() {
        validate_interface_name(plug_name, false)?;
    }
    for slot_name in info.slots.keys() {
        validate_interface_name(slot_name, true)?;
    }
    Ok(())
}
