//! Security tags and snap/app name composition.
//!
//! The strings built here are matched verbatim by the sandbox: a tag names
//! an apparmor profile, a systemd unit prefix, a cgroup. The separators and
//! their ordering are part of the on-disk contract and must never change.

/// The security tag prefix shared by everything belonging to this snap.
pub fn security_tag(snap_name: &str) -> String {
    format!("snap.{snap_name}")
}

/// The security tag of one app: `snap.<snap>.<app>`.
pub fn app_security_tag(snap_name: &str, app_name: &str) -> String {
    format!("{}.{app_name}", security_tag(snap_name))
}

/// A scoped security tag: `snap.<snap>.<scope>.<suffix>`.
///
/// Scopes carve out tag namespaces that can never collide with app names;
/// `hook` and `none` are the scopes in use today.
pub fn scoped_security_tag(snap_name: &str, scope: &str, suffix: &str) -> String {
    format!("snap.{snap_name}.{scope}.{suffix}")
}

/// The security tag of one hook: `snap.<snap>.hook.<hook>`.
pub fn hook_security_tag(snap_name: &str, hook_name: &str) -> String {
    scoped_security_tag(snap_name, "hook", hook_name)
}

/// A security tag tied to the snap but to no app or hook.
pub fn none_security_tag(snap_name: &str, unique_name: &str) -> String {
    scoped_security_tag(snap_name, "none", unique_name)
}

/// Joins a snap name and app name into the `<snap>.<app>` form used on the
/// command line and for wrapper names.
///
/// When the app carries the same name as the snap the joined form collapses
/// to the bare snap name.
pub fn join_snap_app(snap_name: &str, app_name: &str) -> String {
    if snap_name == app_name {
        snap_name.to_string()
    } else {
        format!("{snap_name}.{app_name}")
    }
}

/// Splits a `<snap>.<app>` form back into its parts.
///
/// The bare form yields the same name for both parts, undoing the collapse
/// in [`join_snap_app`].
pub fn split_snap_app(snap_app: &str) -> (&str, &str) {
    match snap_app.split_once('.') {
        Some((snap_name, app_name)) => (snap_name, app_name),
        None => (snap_app, snap_app),
    }
}
