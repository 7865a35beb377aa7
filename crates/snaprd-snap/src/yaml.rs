//! Parsing `meta/snap.yaml` into an [`Info`].
//!
//! Parsing happens in two stages: serde decodes the manifest into private
//! schema structs, then the binding pass wires apps, hooks, plugs, and
//! slots together by name. Plug and slot declarations are polymorphic
//! enough (string shorthand, mapping, implicit creation from app lists)
//! that they are decoded from raw YAML values by hand.

use indexmap::IndexMap;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::attrs::AttrValue;
use crate::epoch::Epoch;
use crate::info::{AppInfo, HookInfo, Info, Layout, PlugInfo, SlotInfo, SocketInfo};
use crate::timeout::Timeout;
use crate::types::{Confinement, RestartCondition, SnapType};

/// Errors from parsing a snap manifest.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The YAML is malformed or a field has the wrong shape.
    #[error("cannot parse snap.yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// A plug or slot declaration is neither empty, a string, nor a mapping.
    #[error("{kind} {name:?} has malformed definition")]
    MalformedInterface {
        /// `"plug"` or `"slot"`.
        kind: &'static str,
        /// The declaration's name.
        name: String,
    },
    /// The `interface` entry of a plug or slot is not a string.
    #[error("interface name on {kind} {name:?} is not a string")]
    InterfaceNotString {
        /// `"plug"` or `"slot"`.
        kind: &'static str,
        /// The declaration's name.
        name: String,
    },
    /// The `label` entry of a plug or slot is not a string.
    #[error("label of {kind} {name:?} is not a string")]
    LabelNotString {
        /// `"plug"` or `"slot"`.
        kind: &'static str,
        /// The declaration's name.
        name: String,
    },
    /// An attribute key of a plug or slot is not a string.
    #[error("{kind} {name:?} has attribute key that is not a string")]
    AttrKeyNotString {
        /// `"plug"` or `"slot"`.
        kind: &'static str,
        /// The declaration's name.
        name: String,
    },
    /// An attribute name starting with `$` is reserved for the system.
    #[error("{kind} {name:?} uses reserved attribute {attr:?}")]
    ReservedAttr {
        /// `"plug"` or `"slot"`.
        kind: &'static str,
        /// The declaration's name.
        name: String,
        /// The reserved attribute.
        attr: String,
    },
    /// An attribute holds a value outside the supported tree of scalars,
    /// lists, and string-keyed mappings.
    #[error("attribute {attr:?} of {kind} {name:?} contains an unsupported value")]
    BadAttrValue {
        /// `"plug"` or `"slot"`.
        kind: &'static str,
        /// The declaration's name.
        name: String,
        /// The attribute holding the value.
        attr: String,
    },
    /// Two apps claim the same alias.
    #[error("cannot set {alias:?} as alias for both {first:?} and {second:?}")]
    DuplicateAlias {
        /// The contested alias.
        alias: String,
        /// The app that claimed it first.
        first: String,
        /// The app that claimed it second.
        second: String,
    },
}

#[derive(Debug, Deserialize)]
struct SnapYaml {
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: String,
    #[serde(rename = "type", default)]
    snap_type: SnapType,
    #[serde(default)]
    architectures: Vec<String>,
    #[serde(default)]
    assumes: Vec<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    license: String,
    #[serde(rename = "license-agreement", default)]
    license_agreement: String,
    #[serde(rename = "license-version", default)]
    license_version: String,
    #[serde(default)]
    epoch: Epoch,
    #[serde(default)]
    base: String,
    #[serde(default)]
    confinement: Confinement,
    #[serde(default, deserialize_with = "de_env")]
    environment: IndexMap<String, String>,
    #[serde(default)]
    plugs: IndexMap<String, Value>,
    #[serde(default)]
    slots: IndexMap<String, Value>,
    // Entries may be bare names with no body, hence the Options.
    #[serde(default)]
    apps: IndexMap<String, Option<AppYaml>>,
    #[serde(default)]
    hooks: IndexMap<String, Option<HookYaml>>,
    #[serde(default)]
    layout: IndexMap<String, Option<LayoutYaml>>,
}

#[derive(Debug, Default, Deserialize)]
struct AppYaml {
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    command: String,
    #[serde(default)]
    daemon: String,
    #[serde(rename = "stop-command", default)]
    stop_command: String,
    #[serde(rename = "reload-command", default)]
    reload_command: String,
    #[serde(rename = "post-stop-command", default)]
    post_stop_command: String,
    #[serde(rename = "stop-timeout", default)]
    stop_timeout: Timeout,
    #[serde(rename = "restart-condition", default)]
    restart_condition: RestartCondition,
    #[serde(default)]
    completer: String,
    #[serde(rename = "bus-name", default)]
    bus_name: String,
    #[serde(default)]
    plugs: Vec<String>,
    #[serde(default)]
    slots: Vec<String>,
    #[serde(default, deserialize_with = "de_env")]
    environment: IndexMap<String, String>,
    #[serde(default)]
    sockets: IndexMap<String, Option<SocketYaml>>,
}

#[derive(Debug, Default, Deserialize)]
struct HookYaml {
    #[serde(default)]
    plugs: Vec<String>,
    #[serde(default)]
    slots: Vec<String>,
    #[serde(default, deserialize_with = "de_env")]
    environment: IndexMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct SocketYaml {
    #[serde(rename = "listen-stream", default)]
    listen_stream: String,
    // Modes are plain integers and must be declared in decimal: a leading
    // zero does not read as octal, so `socket-mode: 0660` is 660.
    #[serde(rename = "socket-mode", default)]
    socket_mode: u32,
}

#[derive(Debug, Default, Deserialize)]
struct LayoutYaml {
    #[serde(default)]
    bind: String,
    #[serde(rename = "type", default)]
    type_: String,
    #[serde(default)]
    user: String,
    #[serde(default)]
    group: String,
    // Decimal, like socket-mode.
    #[serde(default)]
    mode: u32,
    #[serde(default)]
    symlink: String,
}

/// Environment mappings keep manifest order and reject duplicate keys.
fn de_env<'de, D>(deserializer: D) -> Result<IndexMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EnvVisitor;

    impl<'de> Visitor<'de> for EnvVisitor {
        type Value = IndexMap<String, String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a mapping of environment variables")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut env = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, value)) = access.next_entry::<String, String>()? {
                if env.contains_key(&key) {
                    return Err(de::Error::custom(format!("found duplicate key {key:?}")));
                }
                env.insert(key, value);
            }
            Ok(env)
        }
    }

    deserializer.deserialize_map(EnvVisitor)
}

/// Parses the content of a `meta/snap.yaml` into an [`Info`].
///
/// The result carries everything the manifest says but has not been
/// validated; callers that accept snaps from outside run
/// [`validate`](crate::validate::validate) on it.
pub fn info_from_snap_yaml(yaml: &[u8]) -> Result<Info, ParseError> {
    let y: SnapYaml = serde_yaml::from_slice(yaml)?;
    let mut info = skeleton(&y);

    set_plugs(&y, &mut info)?;
    set_slots(&y, &mut info)?;
    set_apps(&y, &mut info)?;
    set_hooks(&y, &mut info);

    bind_unscoped_plugs(&mut info);
    bind_unscoped_slots(&mut info);

    Ok(info)
}

fn skeleton(y: &SnapYaml) -> Info {
    let architectures = if y.architectures.is_empty() {
        vec!["all".to_string()]
    } else {
        y.architectures.clone()
    };
    let mut info = Info {
        suggested_name: y.name.clone(),
        version: y.version.clone(),
        snap_type: y.snap_type,
        architectures,
        assumes: y.assumes.clone(),
        original_title: y.title.clone(),
        original_summary: y.summary.clone(),
        original_description: y.description.clone(),
        license: y.license.clone(),
        license_agreement: y.license_agreement.clone(),
        license_version: y.license_version.clone(),
        epoch: y.epoch.clone(),
        base: y.base.clone(),
        confinement: y.confinement,
        environment: y.environment.clone(),
        ..Info::default()
    };
    let empty = LayoutYaml::default();
    for (path, l) in &y.layout {
        let l = l.as_ref().unwrap_or(&empty);
        info.layout.insert(
            path.clone(),
            Layout {
                path: path.clone(),
                bind: l.bind.clone(),
                type_: l.type_.clone(),
                user: l.user.clone(),
                group: l.group.clone(),
                mode: l.mode,
                symlink: l.symlink.clone(),
            },
        );
    }
    info
}

fn set_plugs(y: &SnapYaml, info: &mut Info) -> Result<(), ParseError> {
    for (name, value) in &y.plugs {
        let (interface, label, attrs) = convert_interface_decl("plug", name, value)?;
        info.plugs.insert(
            name.clone(),
            PlugInfo { name: name.clone(), interface, label, attrs, ..PlugInfo::default() },
        );
    }
    Ok(())
}

fn set_slots(y: &SnapYaml, info: &mut Info) -> Result<(), ParseError> {
    for (name, value) in &y.slots {
        let (interface, label, attrs) = convert_interface_decl("slot", name, value)?;
        info.slots.insert(
            name.clone(),
            SlotInfo { name: name.clone(), interface, label, attrs, ..SlotInfo::default() },
        );
    }
    Ok(())
}

fn set_apps(y: &SnapYaml, info: &mut Info) -> Result<(), ParseError> {
    let empty = AppYaml::default();
    for (name, ya) in &y.apps {
        let ya = ya.as_ref().unwrap_or(&empty);
        let mut app = AppInfo {
            name: name.clone(),
            legacy_aliases: ya.aliases.clone(),
            command: ya.command.clone(),
            daemon: ya.daemon.clone(),
            stop_command: ya.stop_command.clone(),
            reload_command: ya.reload_command.clone(),
            post_stop_command: ya.post_stop_command.clone(),
            stop_timeout: ya.stop_timeout,
            restart_cond: ya.restart_condition,
            completer: ya.completer.clone(),
            bus_name: ya.bus_name.clone(),
            environment: ya.environment.clone(),
            ..AppInfo::default()
        };
        let bare_socket = SocketYaml::default();
        for (socket_name, ys) in &ya.sockets {
            let ys = ys.as_ref().unwrap_or(&bare_socket);
            app.sockets.insert(
                socket_name.clone(),
                SocketInfo {
                    name: socket_name.clone(),
                    listen_stream: ys.listen_stream.clone(),
                    socket_mode: ys.socket_mode,
                },
            );
        }
        for alias in &ya.aliases {
            if let Some(first) = info.legacy_aliases.get(alias) {
                return Err(ParseError::DuplicateAlias {
                    alias: alias.clone(),
                    first: first.clone(),
                    second: name.clone(),
                });
            }
            info.legacy_aliases.insert(alias.clone(), name.clone());
        }
        info.apps.insert(name.clone(), app);

        for plug_name in &ya.plugs {
            let plug = info
                .plugs
                .entry(plug_name.clone())
                .or_insert_with(|| implicit_plug(plug_name));
            plug.apps.insert(name.clone());
            if let Some(app) = info.apps.get_mut(name) {
                app.plugs.insert(plug_name.clone());
            }
        }
        for slot_name in &ya.slots {
            let slot = info
                .slots
                .entry(slot_name.clone())
                .or_insert_with(|| implicit_slot(slot_name));
            slot.apps.insert(name.clone());
            if let Some(app) = info.apps.get_mut(name) {
                app.slots.insert(slot_name.clone());
            }
        }
    }
    Ok(())
}

fn set_hooks(y: &SnapYaml, info: &mut Info) {
    let empty = HookYaml::default();
    for (name, yh) in &y.hooks {
        let yh = yh.as_ref().unwrap_or(&empty);
        info.hooks.insert(
            name.clone(),
            HookInfo {
                name: name.clone(),
                environment: yh.environment.clone(),
                ..HookInfo::default()
            },
        );

        for plug_name in &yh.plugs {
            let plug = info
                .plugs
                .entry(plug_name.clone())
                .or_insert_with(|| implicit_plug(plug_name));
            plug.hooks.insert(name.clone());
            if let Some(hook) = info.hooks.get_mut(name) {
                hook.plugs.insert(plug_name.clone());
            }
        }
        for slot_name in &yh.slots {
            let slot = info
                .slots
                .entry(slot_name.clone())
                .or_insert_with(|| implicit_slot(slot_name));
            slot.hooks.insert(name.clone());
            if let Some(hook) = info.hooks.get_mut(name) {
                hook.slots.insert(slot_name.clone());
            }
        }
    }
}

fn implicit_plug(name: &str) -> PlugInfo {
    PlugInfo {
        name: name.to_string(),
        interface: name.to_string(),
        ..PlugInfo::default()
    }
}

fn implicit_slot(name: &str) -> SlotInfo {
    SlotInfo {
        name: name.to_string(),
        interface: name.to_string(),
        ..SlotInfo::default()
    }
}

/// A plug mentioned by no app and no hook belongs to all of them.
fn bind_unscoped_plugs(info: &mut Info) {
    let app_names: Vec<String> = info.apps.keys().cloned().collect();
    let hook_names: Vec<String> = info.hooks.keys().cloned().collect();
    let mut unscoped: Vec<String> = Vec::new();
    for (name, plug) in &mut info.plugs {
        if !plug.apps.is_empty() || !plug.hooks.is_empty() {
            continue;
        }
        plug.apps.extend(app_names.iter().cloned());
        plug.hooks.extend(hook_names.iter().cloned());
        unscoped.push(name.clone());
    }
    for app in info.apps.values_mut() {
        app.plugs.extend(unscoped.iter().cloned());
    }
    for hook in info.hooks.values_mut() {
        hook.plugs.extend(unscoped.iter().cloned());
    }
}

fn bind_unscoped_slots(info: &mut Info) {
    let app_names: Vec<String> = info.apps.keys().cloned().collect();
    let hook_names: Vec<String> = info.hooks.keys().cloned().collect();
    let mut unscoped: Vec<String> = Vec::new();
    for (name, slot) in &mut info.slots {
        if !slot.apps.is_empty() || !slot.hooks.is_empty() {
            continue;
        }
        slot.apps.extend(app_names.iter().cloned());
        slot.hooks.extend(hook_names.iter().cloned());
        unscoped.push(name.clone());
    }
    for app in info.apps.values_mut() {
        app.slots.extend(unscoped.iter().cloned());
    }
    for hook in info.hooks.values_mut() {
        hook.slots.extend(unscoped.iter().cloned());
    }
}

fn convert_interface_decl(
    kind: &'static str,
    name: &str,
    value: &Value,
) -> Result<(String, String, BTreeMap<String, AttrValue>), ParseError> {
    match value {
        // Bare name: the interface is the declaration's name.
        Value::Null => Ok((name.to_string(), String::new(), BTreeMap::new())),
        // String shorthand: the string is the interface.
        Value::String(interface) => Ok((interface.clone(), String::new(), BTreeMap::new())),
        Value::Mapping(mapping) => {
            let mut interface = name.to_string();
            let mut label = String::new();
            let mut attrs = BTreeMap::new();
            for (key, entry) in mapping {
                let key = key.as_str().ok_or_else(|| ParseError::AttrKeyNotString {
                    kind,
                    name: name.to_string(),
                })?;
                if key.starts_with('$') {
                    return Err(ParseError::ReservedAttr {
                        kind,
                        name: name.to_string(),
                        attr: key.to_string(),
                    });
                }
                match key {
                    "interface" => {
                        interface = entry
                            .as_str()
                            .ok_or_else(|| ParseError::InterfaceNotString {
                                kind,
                                name: name.to_string(),
                            })?
                            .to_string();
                    }
                    "label" => {
                        label = entry
                            .as_str()
                            .ok_or_else(|| ParseError::LabelNotString {
                                kind,
                                name: name.to_string(),
                            })?
                            .to_string();
                    }
                    _ => {
                        let converted = attr_from_yaml(entry).ok_or_else(|| {
                            ParseError::BadAttrValue {
                                kind,
                                name: name.to_string(),
                                attr: key.to_string(),
                            }
                        })?;
                        attrs.insert(key.to_string(), converted);
                    }
                }
            }
            Ok((interface, label, attrs))
        }
        _ => Err(ParseError::MalformedInterface { kind, name: name.to_string() }),
    }
}

/// Converts a YAML value into an attribute tree, or `None` for values the
/// tree cannot hold (floats, nulls, non-string mapping keys).
fn attr_from_yaml(value: &Value) -> Option<AttrValue> {
    match value {
        Value::Bool(b) => Some(AttrValue::Bool(*b)),
        Value::Number(n) => n.as_i64().map(AttrValue::Int),
        Value::String(s) => Some(AttrValue::Str(s.clone())),
        Value::Sequence(seq) => seq
            .iter()
            .map(attr_from_yaml)
            .collect::<Option<Vec<_>>>()
            .map(AttrValue::List),
        Value::Mapping(mapping) => {
            let mut entries = BTreeMap::new();
            for (key, entry) in mapping {
                let key = key.as_str()?;
                entries.insert(key.to_string(), attr_from_yaml(entry)?);
            }
            Some(AttrValue::Map(entries))
        }
        Value::Null => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeout::DEFAULT_TIMEOUT;
    use std::time::Duration;

    fn parse(yaml: &str) -> Info {
        info_from_snap_yaml(yaml.as_bytes()).unwrap()
    }

    #[test]
    fn minimal_manifest() {
        let info = parse("name: hello\nversion: 1.0\n");
        assert_eq!(info.suggested_name, "hello");
        assert_eq!(info.name(), "hello");
        assert_eq!(info.version, "1.0");
        assert_eq!(info.snap_type, SnapType::App);
        assert_eq!(info.confinement, Confinement::Strict);
        assert_eq!(info.epoch, Epoch::default());
        assert_eq!(info.architectures, vec!["all"]);
        assert!(info.apps.is_empty());
        assert!(info.plugs.is_empty());
    }

    #[test]
    fn scalar_fields() {
        let info = parse(
            r"
name: foo
version: 2.3
type: gadget
title: Foo
summary: provides foo
description: |
  Long form.
license: GPL-3.0
license-agreement: explicit
license-version: 12
base: core18
confinement: devmode
epoch: 1*
assumes: [common-data-dir]
architectures: [amd64, armhf]
",
        );
        assert_eq!(info.snap_type, SnapType::Gadget);
        assert_eq!(info.original_title, "Foo");
        assert_eq!(info.original_summary, "provides foo");
        assert_eq!(info.original_description, "Long form.\n");
        assert_eq!(info.license, "GPL-3.0");
        assert_eq!(info.license_agreement, "explicit");
        assert_eq!(info.license_version, "12");
        assert_eq!(info.base, "core18");
        assert_eq!(info.confinement, Confinement::Devmode);
        assert_eq!(info.epoch, Epoch::star(1).unwrap());
        assert_eq!(info.assumes, vec!["common-data-dir"]);
        assert_eq!(info.architectures, vec!["amd64", "armhf"]);
    }

    #[test]
    fn apps_with_service_fields() {
        let info = parse(
            r"
name: foo
version: 1.0
apps:
  web:
    command: bin/web
    daemon: simple
    stop-command: bin/web --stop
    reload-command: bin/web --reload
    post-stop-command: bin/web --cleanup
    stop-timeout: 20s
    restart-condition: on-abnormal
    bus-name: org.example.web
  cli:
    command: bin/cli
    completer: etc/cli.sh
",
        );
        let web = &info.apps["web"];
        assert!(web.is_service());
        assert_eq!(web.command, "bin/web");
        assert_eq!(web.daemon, "simple");
        assert_eq!(web.stop_command, "bin/web --stop");
        assert_eq!(web.reload_command, "bin/web --reload");
        assert_eq!(web.post_stop_command, "bin/web --cleanup");
        assert_eq!(web.stop_timeout.duration(), Duration::from_secs(20));
        assert_eq!(web.restart_cond, RestartCondition::OnAbnormal);
        assert_eq!(web.bus_name, "org.example.web");

        let cli = &info.apps["cli"];
        assert!(!cli.is_service());
        assert_eq!(cli.stop_timeout, DEFAULT_TIMEOUT);
        assert_eq!(cli.completer, "etc/cli.sh");
    }

    #[test]
    fn app_sockets() {
        let info = parse(
            r"
name: foo
version: 1.0
apps:
  srv:
    command: bin/srv
    daemon: simple
    sockets:
      http:
        listen-stream: '[::]:8080'
      unix:
        listen-stream: $SNAP_COMMON/lp.socket
        socket-mode: 384
",
        );
        let srv = &info.apps["srv"];
        assert_eq!(srv.sockets.len(), 2);
        assert_eq!(srv.sockets["http"].listen_stream, "[::]:8080");
        assert_eq!(srv.sockets["http"].socket_mode, 0);
        assert_eq!(srv.sockets["unix"].listen_stream, "$SNAP_COMMON/lp.socket");
        assert_eq!(srv.sockets["unix"].socket_mode, 0o600);
    }

    #[test]
    fn modes_read_leading_zeros_as_decimal() {
        let info = parse(
            r"
name: foo
version: 1.0
apps:
  srv:
    command: bin/srv
    sockets:
      unix:
        socket-mode: 0660
layout:
  /mytmp:
    type: tmpfs
    mode: 0755
",
        );
        assert_eq!(info.apps["srv"].sockets["unix"].socket_mode, 660);
        assert_eq!(info.layout["/mytmp"].mode, 755);
    }

    #[test]
    fn aliases_collect_per_snap() {
        let info = parse(
            "name: foo\nversion: 1.0\napps:\n  bar:\n    aliases: [bar1, bar2]\n  baz:\n    aliases: [baz1]\n",
        );
        assert_eq!(info.apps["bar"].legacy_aliases, vec!["bar1", "bar2"]);
        let aliases: Vec<(&str, &str)> = info
            .legacy_aliases
            .iter()
            .map(|(alias, app)| (alias.as_str(), app.as_str()))
            .collect();
        assert_eq!(aliases, vec![("bar1", "bar"), ("bar2", "bar"), ("baz1", "baz")]);
    }

    #[test]
    fn duplicate_alias_is_rejected() {
        let err = info_from_snap_yaml(
            "name: foo\nversion: 1.0\napps:\n  bar:\n    aliases: [uno]\n  baz:\n    aliases: [uno]\n"
                .as_bytes(),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"cannot set "uno" as alias for both "bar" and "baz""#
        );
    }

    #[test]
    fn snap_environment_keeps_order() {
        let info = parse(
            "name: foo\nversion: 1.0\nenvironment:\n  ZULU: z\n  ALPHA: a\n  MIKE: m\n",
        );
        let keys: Vec<&str> = info.environment.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["ZULU", "ALPHA", "MIKE"]);
    }

    #[test]
    fn duplicate_environment_key_is_rejected() {
        let err = info_from_snap_yaml(
            "name: foo\nversion: 1.0\nenvironment:\n  DUP: one\n  DUP: two\n".as_bytes(),
        )
        .unwrap_err();
        assert!(err.to_string().contains(r#"found duplicate key "DUP""#), "{err}");
    }

    #[test]
    fn bare_plug_uses_its_name_as_interface() {
        let info = parse("name: foo\nversion: 1.0\nplugs:\n  network:\n");
        let plug = &info.plugs["network"];
        assert_eq!(plug.name, "network");
        assert_eq!(plug.interface, "network");
        assert!(plug.attrs.is_empty());
        assert!(plug.label.is_empty());
    }

    #[test]
    fn string_shorthand_plug() {
        let info = parse("name: foo\nversion: 1.0\nplugs:\n  net: network-client\n");
        let plug = &info.plugs["net"];
        assert_eq!(plug.name, "net");
        assert_eq!(plug.interface, "network-client");
    }

    #[test]
    fn full_plug_with_label_and_attrs() {
        let info = parse(
            r"
name: foo
version: 1.0
plugs:
  dbus-session:
    interface: dbus
    label: Session bus
    bus: session
    count: 3
    allow: true
    names: [org.a, org.b]
",
        );
        let plug = &info.plugs["dbus-session"];
        assert_eq!(plug.interface, "dbus");
        assert_eq!(plug.label, "Session bus");
        assert_eq!(plug.attrs["bus"].as_str(), Some("session"));
        assert_eq!(plug.attrs["count"].as_int(), Some(3));
        assert_eq!(plug.attrs["allow"].as_bool(), Some(true));
        let names = plug.attrs["names"].as_list().unwrap();
        assert_eq!(names[1].as_str(), Some("org.b"));
        // interface and label are not attributes
        assert!(!plug.attrs.contains_key("interface"));
        assert!(!plug.attrs.contains_key("label"));
    }

    #[test]
    fn reserved_attribute_is_rejected() {
        let err = info_from_snap_yaml(
            "name: foo\nversion: 1.0\nplugs:\n  net:\n    $baz: true\n".as_bytes(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), r#"plug "net" uses reserved attribute "$baz""#);
    }

    #[test]
    fn malformed_plug_is_rejected() {
        let err = info_from_snap_yaml(
            "name: foo\nversion: 1.0\nplugs:\n  net:\n    - a\n    - b\n".as_bytes(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), r#"plug "net" has malformed definition"#);
    }

    #[test]
    fn non_string_interface_is_rejected() {
        let err = info_from_snap_yaml(
            "name: foo\nversion: 1.0\nslots:\n  net:\n    interface: 7\n".as_bytes(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), r#"interface name on slot "net" is not a string"#);
    }

    #[test]
    fn unscoped_plug_binds_to_every_app_and_hook() {
        let info = parse(
            r"
name: foo
version: 1.0
plugs:
  network:
apps:
  one:
  two:
hooks:
  configure:
",
        );
        let plug = &info.plugs["network"];
        assert_eq!(
            plug.apps.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["one", "two"]
        );
        assert_eq!(
            plug.hooks.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["configure"]
        );
        assert!(info.apps["one"].plugs.contains("network"));
        assert!(info.apps["two"].plugs.contains("network"));
        assert!(info.hooks["configure"].plugs.contains("network"));
    }

    #[test]
    fn app_scoped_plug_binds_only_there() {
        let info = parse(
            r"
name: foo
version: 1.0
plugs:
  network:
apps:
  one:
    plugs: [network]
  two:
",
        );
        let plug = &info.plugs["network"];
        assert_eq!(plug.apps.iter().map(String::as_str).collect::<Vec<_>>(), vec!["one"]);
        assert!(info.apps["one"].plugs.contains("network"));
        assert!(!info.apps["two"].plugs.contains("network"));
    }

    #[test]
    fn app_plug_list_creates_implicit_plug() {
        let info = parse(
            "name: foo\nversion: 1.0\napps:\n  one:\n    plugs: [home]\n",
        );
        let plug = &info.plugs["home"];
        assert_eq!(plug.interface, "home");
        assert_eq!(plug.apps.iter().map(String::as_str).collect::<Vec<_>>(), vec!["one"]);
    }

    #[test]
    fn hook_scoped_plug_binds_only_there() {
        let info = parse(
            r"
name: foo
version: 1.0
apps:
  one:
hooks:
  configure:
    plugs: [network]
",
        );
        let plug = &info.plugs["network"];
        assert!(plug.apps.is_empty());
        assert_eq!(
            plug.hooks.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["configure"]
        );
        assert!(!info.apps["one"].plugs.contains("network"));
        assert!(info.hooks["configure"].plugs.contains("network"));
    }

    #[test]
    fn hook_environment_is_parsed() {
        let info = parse(
            "name: foo\nversion: 1.0\nhooks:\n  configure:\n    environment:\n      MODE: fast\n",
        );
        assert_eq!(info.hooks["configure"].environment["MODE"], "fast");
    }

    #[test]
    fn slots_mirror_plug_binding() {
        let info = parse(
            r"
name: foo
version: 1.0
slots:
  shared-content:
    interface: content
    read: [/usr/share/foo]
apps:
  exporter:
    slots: [shared-content]
  other:
",
        );
        let slot = &info.slots["shared-content"];
        assert_eq!(slot.interface, "content");
        assert_eq!(slot.apps.iter().map(String::as_str).collect::<Vec<_>>(), vec!["exporter"]);
        assert!(info.apps["exporter"].slots.contains("shared-content"));
        assert!(!info.apps["other"].slots.contains("shared-content"));
    }

    #[test]
    fn layout_entries_keyed_by_path() {
        let info = parse(
            r"
name: foo
version: 1.0
layout:
  /var/lib/foo:
    bind: $SNAP_DATA/var/lib/foo
  /etc/foo.conf:
    symlink: $SNAP_DATA/etc/foo.conf
  /mytmp:
    type: tmpfs
    mode: 1023
",
        );
        assert_eq!(info.layout.len(), 3);
        assert_eq!(info.layout["/var/lib/foo"].path, "/var/lib/foo");
        assert_eq!(info.layout["/var/lib/foo"].bind, "$SNAP_DATA/var/lib/foo");
        assert_eq!(info.layout["/etc/foo.conf"].symlink, "$SNAP_DATA/etc/foo.conf");
        assert_eq!(info.layout["/mytmp"].type_, "tmpfs");
        assert_eq!(info.layout["/mytmp"].mode, 0o1777);
    }

    #[test]
    fn apps_keep_declaration_order() {
        let info = parse(
            "name: foo\nversion: 1.0\napps:\n  zeta:\n  alpha:\n  mike:\n",
        );
        let names: Vec<&str> = info.apps.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mike"]);
    }

    #[test]
    fn broken_yaml_reports_parse_error() {
        let err = info_from_snap_yaml(b"name: foo\nversion: [[[").unwrap_err();
        assert!(err.to_string().starts_with("cannot parse snap.yaml:"), "{err}");
    }
}
