//! Hook discovery.
//!
//! A snap may ship hook executables under `meta/hooks` without declaring
//! them in the manifest; the loaders pick those up as implicit hooks.
//! Unknown file names are skipped so that a snap built for a newer system
//! still loads on this one.

use std::io;

use crate::container::Container;
use crate::info::{HookInfo, Info, PlaceInfo as _};

/// The hooks the runtime knows how to dispatch.
pub const SUPPORTED_HOOKS: &[&str] = &[
    "configure",
    "install",
    "post-refresh",
    "pre-refresh",
    "prepare-device",
    "remove",
];

/// Whether `name` is a hook the runtime dispatches.
pub fn is_hook_supported(name: &str) -> bool {
    SUPPORTED_HOOKS.contains(&name)
}

/// Adds hooks found in the installed snap's `meta/hooks` directory.
///
/// A missing directory just means the snap has no hooks.
pub(crate) fn add_implicit_hooks(info: &mut Info) -> io::Result<()> {
    let hooks_dir = info.hooks_dir();
    let entries = match std::fs::read_dir(&hooks_dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };
    let mut names: Vec<String> = Vec::new();
    for entry in entries {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    names.sort_unstable();
    for name in names {
        add_hook_if_supported(info, &name);
    }
    Ok(())
}

/// Adds hooks found under `meta/hooks` in a not-yet-installed container.
pub(crate) fn add_implicit_hooks_from_container(
    info: &mut Info,
    container: &dyn Container,
) -> io::Result<()> {
    let names = match container.list_dir("meta/hooks") {
        Ok(names) => names,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };
    for name in names {
        add_hook_if_supported(info, &name);
    }
    Ok(())
}

fn add_hook_if_supported(info: &mut Info, name: &str) {
    if !is_hook_supported(name) {
        tracing::debug!("ignoring unsupported hook {name:?}");
        return;
    }
    // Hooks declared in the manifest keep their bindings.
    if info.hooks.contains_key(name) {
        return;
    }
    info.hooks
        .insert(name.to_string(), HookInfo { name: name.to_string(), ..HookInfo::default() });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_hook_names() {
        assert!(is_hook_supported("configure"));
        assert!(is_hook_supported("prepare-device"));
        assert!(!is_hook_supported("deploy"));
        assert!(!is_hook_supported(""));
    }

    #[test]
    fn implicit_hook_does_not_replace_declared_one() {
        let mut info = Info::default();
        let mut declared = HookInfo { name: "configure".to_string(), ..HookInfo::default() };
        declared.plugs.insert("network".to_string());
        info.hooks.insert("configure".to_string(), declared);

        add_hook_if_supported(&mut info, "configure");
        add_hook_if_supported(&mut info, "install");
        add_hook_if_supported(&mut info, "nonsense");

        assert!(info.hooks["configure"].plugs.contains("network"));
        assert!(info.hooks.contains_key("install"));
        assert!(!info.hooks.contains_key("nonsense"));
    }
}
