//! Inspect command

use std::path::Path;

use anyhow::{Context, Result};
use crossterm::style::Stylize;
use serde::Serialize;

use snaprd_snap::{Info, SnapDir, read_info_from_snap_file, validate_interface};

/// Drops plugs and slots whose interface name is malformed, recording the
/// reason under the snap's bad interfaces.
///
/// Stands in for the interface registry the daemon consults; the shape of
/// a rejection is the same: the entry is removed everywhere and the reason
/// is kept for reporting.
pub fn sanitize_interfaces(info: &mut Info) {
    let bad_plugs: Vec<(String, String)> = info
        .plugs
        .values()
        .filter_map(|plug| {
            validate_interface(&plug.interface)
                .err()
                .map(|err| (plug.name.clone(), err.to_string()))
        })
        .collect();
    for (name, reason) in bad_plugs {
        info.plugs.shift_remove(&name);
        for app in info.apps.values_mut() {
            app.plugs.remove(&name);
        }
        for hook in info.hooks.values_mut() {
            hook.plugs.remove(&name);
        }
        info.bad_interfaces.insert(name, reason);
    }

    let bad_slots: Vec<(String, String)> = info
        .slots
        .values()
        .filter_map(|slot| {
            validate_interface(&slot.interface)
                .err()
                .map(|err| (slot.name.clone(), err.to_string()))
        })
        .collect();
    for (name, reason) in bad_slots {
        info.slots.shift_remove(&name);
        for app in info.apps.values_mut() {
            app.slots.remove(&name);
        }
        for hook in info.hooks.values_mut() {
            hook.slots.remove(&name);
        }
        info.bad_interfaces.insert(name, reason);
    }
}

/// Load an unpacked snap directory and report what the daemon would see.
pub fn inspect(dir: &Path, json: bool) -> Result<()> {
    let container = SnapDir::new(dir);
    let mut info = read_info_from_snap_file(&container, None)
        .with_context(|| format!("cannot inspect {}", dir.display()))?;
    // Container loads skip sanitization; the report should still show
    // what the daemon would reject.
    sanitize_interfaces(&mut info);

    if json {
        println!("{}", serde_json::to_string_pretty(&Report::new(&info))?);
        return Ok(());
    }

    print_report(&info);
    Ok(())
}

#[derive(Serialize)]
struct Report<'a> {
    name: &'a str,
    version: &'a str,
    #[serde(rename = "type")]
    snap_type: &'a str,
    confinement: &'a str,
    epoch: String,
    #[serde(skip_serializing_if = "str::is_empty")]
    base: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    title: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    summary: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'a str,
    apps: Vec<AppReport<'a>>,
    hooks: Vec<HookReport<'a>>,
    plugs: Vec<InterfaceReport<'a>>,
    slots: Vec<InterfaceReport<'a>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    bad_interfaces: String,
}

#[derive(Serialize)]
struct AppReport<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    command: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    daemon: &'a str,
    security_tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    service_name: Option<String>,
}

#[derive(Serialize)]
struct HookReport<'a> {
    name: &'a str,
    security_tag: String,
}

#[derive(Serialize)]
struct InterfaceReport<'a> {
    name: &'a str,
    interface: &'a str,
    security_tags: Vec<String>,
}

impl<'a> Report<'a> {
    fn new(info: &'a Info) -> Self {
        Report {
            name: info.name(),
            version: &info.version,
            snap_type: info.snap_type.as_str(),
            confinement: info.confinement.as_str(),
            epoch: info.epoch.to_string(),
            base: &info.base,
            title: info.title(),
            summary: info.summary(),
            description: info.description(),
            apps: info
                .apps
                .values()
                .map(|app| AppReport {
                    name: &app.name,
                    command: &app.command,
                    daemon: &app.daemon,
                    security_tag: app.security_tag(info),
                    service_name: app.is_service().then(|| app.service_name(info)),
                })
                .collect(),
            hooks: info
                .hooks
                .values()
                .map(|hook| HookReport {
                    name: &hook.name,
                    security_tag: hook.security_tag(info),
                })
                .collect(),
            plugs: info
                .plugs
                .values()
                .map(|plug| InterfaceReport {
                    name: &plug.name,
                    interface: &plug.interface,
                    security_tags: plug.security_tags(info),
                })
                .collect(),
            slots: info
                .slots
                .values()
                .map(|slot| InterfaceReport {
                    name: &slot.name,
                    interface: &slot.interface,
                    security_tags: slot.security_tags(info),
                })
                .collect(),
            bad_interfaces: info.bad_interfaces_summary(),
        }
    }
}

fn print_report(info: &Info) {
    let lw = 14;

    println!();
    println!(
        "  {} {}",
        info.name().white().bold(),
        info.version.as_str().dark_grey()
    );
    if !info.summary().is_empty() {
        println!("  {}", info.summary());
    }
    println!();

    println!("  {:<lw$}{}", "type", info.snap_type);
    println!("  {:<lw$}{}", "confinement", info.confinement);
    println!("  {:<lw$}{}", "epoch", info.epoch);
    if !info.base.is_empty() {
        println!("  {:<lw$}{}", "base", info.base);
    }
    if !info.license.is_empty() {
        println!("  {:<lw$}{}", "license", info.license);
    }

    if !info.apps.is_empty() {
        println!();
        println!("  apps");
        let width = info.apps.keys().map(String::len).max().unwrap_or(0) + 2;
        for app in info.apps.values() {
            let tag = app.security_tag(info);
            if app.is_service() {
                println!(
                    "    {:<width$}{tag}  {}",
                    app.name,
                    format!("{} daemon, {}", app.daemon, app.service_name(info)).dark_grey()
                );
            } else {
                println!("    {:<width$}{tag}", app.name);
            }
        }
    }

    if !info.hooks.is_empty() {
        println!();
        println!("  hooks");
        let width = info.hooks.keys().map(String::len).max().unwrap_or(0) + 2;
        for hook in info.hooks.values() {
            println!("    {:<width$}{}", hook.name, hook.security_tag(info));
        }
    }

    if !info.plugs.is_empty() {
        println!();
        println!("  plugs");
        let width = info.plugs.keys().map(String::len).max().unwrap_or(0) + 2;
        for plug in info.plugs.values() {
            println!(
                "    {:<width$}{:<18}{}",
                plug.name,
                plug.interface,
                plug.security_tags(info).join(" ").dark_grey()
            );
        }
    }

    if !info.slots.is_empty() {
        println!();
        println!("  slots");
        let width = info.slots.keys().map(String::len).max().unwrap_or(0) + 2;
        for slot in info.slots.values() {
            println!(
                "    {:<width$}{:<18}{}",
                slot.name,
                slot.interface,
                slot.security_tags(info).join(" ").dark_grey()
            );
        }
    }

    if !info.bad_interfaces.is_empty() {
        println!();
        println!("  {}", info.bad_interfaces_summary().red());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snaprd_snap::info_from_snap_yaml;

    #[test]
    fn sanitizer_drops_malformed_interfaces() {
        let mut info = info_from_snap_yaml(
            b"name: foo\nversion: 1.0\napps:\n  cli:\n    plugs: [net]\nplugs:\n  net:\n    interface: NETWORK\n  home:\nslots:\n  bus:\n    interface: d_bus\n",
        )
        .unwrap();
        sanitize_interfaces(&mut info);

        assert!(!info.plugs.contains_key("net"));
        assert!(info.plugs.contains_key("home"));
        assert!(info.slots.is_empty());
        assert!(!info.apps["cli"].plugs.contains("net"));
        assert!(info.apps["cli"].plugs.contains("home"));
        assert_eq!(
            info.bad_interfaces_summary(),
            r#"snap "foo" has bad plugs or slots: net (invalid interface name: "NETWORK"); bus (invalid interface name: "d_bus")"#
        );
    }

    #[test]
    fn sanitizer_keeps_good_interfaces() {
        let mut info = info_from_snap_yaml(
            b"name: foo\nversion: 1.0\nplugs:\n  network:\nslots:\n  serial:\n    interface: serial-port\n",
        )
        .unwrap();
        sanitize_interfaces(&mut info);

        assert!(info.bad_interfaces.is_empty());
        assert_eq!(info.plugs.len(), 1);
        assert_eq!(info.slots.len(), 1);
    }

    #[test]
    fn inspect_reports_an_unpacked_snap() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("meta")).unwrap();
        std::fs::write(
            dir.path().join("meta/snap.yaml"),
            "name: probe\nversion: 1.0\napps:\n  probe:\n    command: bin/probe\n",
        )
        .unwrap();

        inspect(dir.path(), true).unwrap();
        inspect(dir.path(), false).unwrap();
    }

    #[test]
    fn inspect_fails_when_the_manifest_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = inspect(dir.path(), false).unwrap_err();
        assert!(err.to_string().contains("cannot inspect"));
    }
}
