//! The in-memory model of a snap and its derived locations.
//!
//! An [`Info`] aggregates everything known about one snap: the manifest
//! content, the store-side facts carried in a [`SideInfo`], and download
//! metadata. Apps, hooks, plugs, and slots reference each other by name
//! through their owning `Info`, so cloning an `Info` clones the whole
//! graph.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::attrs::AttrValue;
use crate::epoch::Epoch;
use crate::naming;
use crate::paths;
use crate::revision::Revision;
use crate::timeout::Timeout;
use crate::types::{Confinement, RestartCondition, SnapType};

/// The location of a snap on disk, derivable from its name and revision
/// alone.
///
/// [`Info`] implements this; [`minimal_place_info`] builds one when only
/// the name and revision are known.
pub trait PlaceInfo {
    /// The name the directories are keyed by.
    fn name(&self) -> &str;
    /// Where the snap is mounted.
    fn mount_dir(&self) -> PathBuf;
    /// Where the snap blob is kept.
    fn mount_file(&self) -> PathBuf;
    /// Where the snap's hooks live inside the mount.
    fn hooks_dir(&self) -> PathBuf;
    /// The revisioned system data directory.
    fn data_dir(&self) -> PathBuf;
    /// The cross-revision system data directory.
    fn common_data_dir(&self) -> PathBuf;
    /// The revisioned data directory under `home`.
    fn user_data_dir(&self, home: &Path) -> PathBuf;
    /// The cross-revision data directory under `home`.
    fn user_common_data_dir(&self, home: &Path) -> PathBuf;
    /// The transient runtime directory for the user with id `uid`.
    fn user_xdg_runtime_dir(&self, uid: u32) -> PathBuf;
    /// Glob over every user's revisioned data directory.
    fn data_home_dir(&self) -> PathBuf;
    /// Glob over every user's cross-revision data directory.
    fn common_data_home_dir(&self) -> PathBuf;
    /// Glob over every user's transient runtime directory.
    fn xdg_runtime_dirs(&self) -> PathBuf;
}

/// Builds a place-info for a snap that is not necessarily installed, from
/// its name and revision alone.
pub fn minimal_place_info(name: &str, revision: Revision) -> Info {
    Info {
        side_info: SideInfo {
            real_name: name.to_string(),
            revision,
            ..SideInfo::default()
        },
        ..Info::default()
    }
}

/// Store-side facts about one revision of a snap.
///
/// A side-info travels next to the snap blob rather than inside it: the
/// store sends one with every download, and sideloading fabricates one
/// with a local revision. Its fields win over the manifest's where both
/// speak.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideInfo {
    /// The snap's real name, overriding the manifest's suggested name.
    #[serde(rename = "name", default, skip_serializing_if = "String::is_empty")]
    pub real_name: String,
    /// The store's permanent id for this snap.
    #[serde(rename = "snap-id", default)]
    pub snap_id: String,
    /// The revision this side-info describes.
    #[serde(default)]
    pub revision: Revision,
    /// The channel the snap was downloaded from.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub channel: String,
    /// How to contact the publisher.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub contact: String,
    /// Store-curated title, overriding the manifest's.
    #[serde(rename = "title", default, skip_serializing_if = "String::is_empty")]
    pub edited_title: String,
    /// Store-curated summary, overriding the manifest's.
    #[serde(rename = "summary", default, skip_serializing_if = "String::is_empty")]
    pub edited_summary: String,
    /// Store-curated description, overriding the manifest's.
    #[serde(rename = "description", default, skip_serializing_if = "String::is_empty")]
    pub edited_description: String,
    /// Whether the snap is private to its publisher.
    #[serde(default)]
    pub private: bool,
}

/// Everything known about one snap.
#[derive(Debug, Clone, Default)]
pub struct Info {
    /// The name the manifest suggests; the side-info's real name wins.
    pub suggested_name: String,
    /// The snap version. Free-form, not semver.
    pub version: String,
    /// What kind of snap this is.
    pub snap_type: SnapType,
    /// Architectures the snap runs on; empty means all.
    pub architectures: Vec<String>,
    /// System features the snap assumes are present.
    pub assumes: Vec<String>,

    /// Title as written in the manifest.
    pub original_title: String,
    /// Summary as written in the manifest.
    pub original_summary: String,
    /// Description as written in the manifest.
    pub original_description: String,

    /// Snap-wide environment, in manifest order.
    pub environment: IndexMap<String, String>,

    /// License the user must agree to before install, if any.
    pub license_agreement: String,
    /// Version of that license text.
    pub license_version: String,
    /// SPDX license expression.
    pub license: String,
    /// The epochs this snap can read and write.
    pub epoch: Epoch,
    /// The base snap this snap runs on top of, if any.
    pub base: String,
    /// How strictly the snap is confined.
    pub confinement: Confinement,

    /// The snap's apps, keyed by name, in manifest order.
    pub apps: IndexMap<String, AppInfo>,
    /// Old-style alias names to the app they point at.
    pub legacy_aliases: IndexMap<String, String>,
    /// The snap's hooks, keyed by name.
    pub hooks: IndexMap<String, HookInfo>,
    /// The snap's plugs, keyed by name.
    pub plugs: IndexMap<String, PlugInfo>,
    /// The snap's slots, keyed by name.
    pub slots: IndexMap<String, SlotInfo>,
    /// Plug and slot names the sanitizer rejected, with the reason.
    /// Rejected entries are removed from `plugs` and `slots`.
    pub bad_interfaces: IndexMap<String, String>,

    /// Store-side facts about this revision.
    pub side_info: SideInfo,
    /// Download facts about this revision.
    pub download_info: DownloadInfo,

    /// Set to the failure reason when the snap is broken on disk.
    pub broken: String,

    /// URL of the snap's icon in the store.
    pub icon_url: String,
    /// Price by ISO currency code, for paid snaps.
    pub prices: HashMap<String, f64>,
    /// Whether the snap must be bought before install.
    pub must_buy: bool,

    /// The store account id of the publisher.
    pub publisher_id: String,
    /// The publisher's display name.
    pub publisher: String,

    /// Store screenshots.
    pub screenshots: Vec<ScreenshotInfo>,

    /// Per-channel refresh candidates, keyed by `<track>/<risk>`.
    pub channels: IndexMap<String, ChannelSnapInfo>,
    /// The tracks this snap publishes, ordered as the store lists them.
    pub tracks: Vec<String>,

    /// Filesystem layout elements, keyed by target path.
    pub layout: IndexMap<String, Layout>,
}

impl Info {
    /// The snap's effective name: the side-info's real name when the store
    /// has spoken, the manifest's suggestion otherwise.
    pub fn name(&self) -> &str {
        if self.side_info.real_name.is_empty() {
            &self.suggested_name
        } else {
            &self.side_info.real_name
        }
    }

    /// The effective title, preferring the store-curated one.
    pub fn title(&self) -> &str {
        if self.side_info.edited_title.is_empty() {
            &self.original_title
        } else {
            &self.side_info.edited_title
        }
    }

    /// The effective summary, preferring the store-curated one.
    pub fn summary(&self) -> &str {
        if self.side_info.edited_summary.is_empty() {
            &self.original_summary
        } else {
            &self.side_info.edited_summary
        }
    }

    /// The effective description, preferring the store-curated one.
    pub fn description(&self) -> &str {
        if self.side_info.edited_description.is_empty() {
            &self.original_description
        } else {
            &self.side_info.edited_description
        }
    }

    /// The revision this info describes.
    pub fn revision(&self) -> Revision {
        self.side_info.revision
    }

    /// Whether the snap needs devmode to run.
    pub fn needs_devmode(&self) -> bool {
        self.confinement == Confinement::Devmode
    }

    /// Whether the snap needs classic confinement to run.
    pub fn needs_classic(&self) -> bool {
        self.confinement == Confinement::Classic
    }

    /// Whether the snap is broken on disk.
    pub fn is_broken(&self) -> bool {
        !self.broken.is_empty()
    }

    /// The apps that run as services.
    ///
    /// The order is not part of the contract; callers that need a stable
    /// order across loads must sort the result themselves.
    pub fn services(&self) -> Vec<&AppInfo> {
        self.apps.values().filter(|app| app.is_service()).collect()
    }

    /// One line describing every plug and slot the sanitizer rejected,
    /// grouped by reason, names sorted within each group.
    ///
    /// Returns an empty string when nothing was rejected.
    pub fn bad_interfaces_summary(&self) -> String {
        if self.bad_interfaces.is_empty() {
            return String::new();
        }
        let mut by_reason: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (name, reason) in &self.bad_interfaces {
            by_reason.entry(reason).or_default().push(name);
        }
        let groups: Vec<String> = by_reason
            .into_iter()
            .map(|(reason, mut names)| {
                names.sort_unstable();
                format!("{} ({reason})", names.join(", "))
            })
            .collect();
        format!("snap {:?} has bad plugs or slots: {}", self.name(), groups.join("; "))
    }
}

impl PlaceInfo for Info {
    fn name(&self) -> &str {
        Info::name(self)
    }

    fn mount_dir(&self) -> PathBuf {
        paths::mount_dir(self.name(), self.revision())
    }

    fn mount_file(&self) -> PathBuf {
        paths::mount_file(self.name(), self.revision())
    }

    fn hooks_dir(&self) -> PathBuf {
        self.mount_dir().join("meta").join("hooks")
    }

    fn data_dir(&self) -> PathBuf {
        paths::data_dir(self.name(), self.revision())
    }

    fn common_data_dir(&self) -> PathBuf {
        paths::common_data_dir(self.name())
    }

    fn user_data_dir(&self, home: &Path) -> PathBuf {
        paths::user_data_dir(home, self.name(), self.revision())
    }

    fn user_common_data_dir(&self, home: &Path) -> PathBuf {
        paths::user_common_data_dir(home, self.name())
    }

    fn user_xdg_runtime_dir(&self, uid: u32) -> PathBuf {
        paths::user_xdg_runtime_dir(uid, self.name())
    }

    fn data_home_dir(&self) -> PathBuf {
        paths::data_home_dir(self.name(), self.revision())
    }

    fn common_data_home_dir(&self) -> PathBuf {
        paths::common_data_home_dir(self.name())
    }

    fn xdg_runtime_dirs(&self) -> PathBuf {
        paths::xdg_runtime_dirs(self.name())
    }
}

/// One app of a snap: a command the user can run, possibly as a service.
#[derive(Debug, Clone, Default)]
pub struct AppInfo {
    /// The app's name within its snap.
    pub name: String,
    /// Old-style aliases pointing at this app.
    pub legacy_aliases: Vec<String>,
    /// The command line, relative to the mount dir.
    pub command: String,

    /// The daemon class when the app is a service, empty otherwise.
    pub daemon: String,
    /// How long to wait for the service to stop.
    pub stop_timeout: Timeout,
    /// Command to stop the service, if stopping takes more than a signal.
    pub stop_command: String,
    /// Command to reload the service's configuration.
    pub reload_command: String,
    /// Command to run after the service stopped.
    pub post_stop_command: String,
    /// When systemd should restart the service. Defaults to on-failure.
    pub restart_cond: RestartCondition,
    /// Shell completion script, relative to the mount dir.
    pub completer: String,
    /// The D-Bus name the service claims, for dbus daemons.
    pub bus_name: String,

    /// Names of the plugs bound to this app.
    pub plugs: BTreeSet<String>,
    /// Names of the slots bound to this app.
    pub slots: BTreeSet<String>,
    /// Activation sockets, keyed by name.
    pub sockets: IndexMap<String, SocketInfo>,

    /// App-specific environment, layered over the snap's.
    pub environment: IndexMap<String, String>,
}

impl AppInfo {
    /// Whether the app runs as a service.
    pub fn is_service(&self) -> bool {
        !self.daemon.is_empty()
    }

    /// The app's security tag: `snap.<snap>.<app>`.
    pub fn security_tag(&self, snap: &Info) -> String {
        naming::app_security_tag(snap.name(), &self.name)
    }

    /// The systemd unit name of the app's service.
    pub fn service_name(&self, snap: &Info) -> String {
        format!("{}.service", self.security_tag(snap))
    }

    /// Where the app's systemd unit file lives.
    pub fn service_file(&self, snap: &Info) -> PathBuf {
        snaprd_dirs::snap_services_dir().join(self.service_name(snap))
    }

    /// Where the app's desktop entry lives.
    pub fn desktop_file(&self, snap: &Info) -> PathBuf {
        snaprd_dirs::snap_desktop_files_dir()
            .join(format!("{}_{}.desktop", snap.name(), self.name))
    }

    /// Where the app's wrapper binary lives.
    pub fn wrapper_path(&self, snap: &Info) -> PathBuf {
        snaprd_dirs::snap_binaries_dir().join(naming::join_snap_app(snap.name(), &self.name))
    }

    /// Where the app's completion snippet is installed.
    pub fn completer_path(&self, snap: &Info) -> PathBuf {
        snaprd_dirs::completers_dir().join(naming::join_snap_app(snap.name(), &self.name))
    }

    fn launcher(&self, snap: &Info, command: &str) -> String {
        let mut line = String::from("/usr/bin/snaprd run");
        if !command.is_empty() {
            line.push(' ');
            line.push_str(command);
        }
        line.push(' ');
        line.push_str(&naming::join_snap_app(snap.name(), &self.name));
        line
    }

    /// The command a wrapper or unit file uses to start the app.
    pub fn launcher_command(&self, snap: &Info) -> String {
        self.launcher(snap, "")
    }

    /// The command used to stop the app's service.
    pub fn launcher_stop_command(&self, snap: &Info) -> String {
        self.launcher(snap, "--command=stop")
    }

    /// The command used to reload the app's service.
    pub fn launcher_reload_command(&self, snap: &Info) -> String {
        self.launcher(snap, "--command=reload")
    }

    /// The command run after the app's service stopped.
    pub fn launcher_post_stop_command(&self, snap: &Info) -> String {
        self.launcher(snap, "--command=post-stop")
    }

    /// The app's environment as `K=V` entries: the snap-wide environment
    /// first, overlaid with the app's own, both in declaration order.
    pub fn env(&self, snap: &Info) -> Vec<String> {
        let mut merged = snap.environment.clone();
        for (key, value) in &self.environment {
            merged.insert(key.clone(), value.clone());
        }
        merged.iter().map(|(key, value)| format!("{key}={value}")).collect()
    }
}

/// An activation socket of a service app.
#[derive(Debug, Clone, Default)]
pub struct SocketInfo {
    /// The socket's name within its app.
    pub name: String,
    /// The systemd `ListenStream=` value.
    pub listen_stream: String,
    /// File mode for filesystem sockets, declared in decimal in the
    /// manifest (`socket-mode: 384` for `0o600`).
    pub socket_mode: u32,
}

impl SocketInfo {
    /// The systemd socket unit name: `<app security tag>.<socket>.socket`.
    pub fn unit_name(&self, snap: &Info, app: &AppInfo) -> String {
        format!("{}.{}.socket", app.security_tag(snap), self.name)
    }

    /// Where the socket's systemd unit file lives.
    pub fn file(&self, snap: &Info, app: &AppInfo) -> PathBuf {
        snaprd_dirs::snap_services_dir().join(self.unit_name(snap, app))
    }
}

/// One hook of a snap: a program run by the system at a lifecycle point.
#[derive(Debug, Clone, Default)]
pub struct HookInfo {
    /// The hook's name, which is also its file name under `meta/hooks`.
    pub name: String,
    /// Names of the plugs bound to this hook.
    pub plugs: BTreeSet<String>,
    /// Names of the slots bound to this hook.
    pub slots: BTreeSet<String>,
    /// Hook-specific environment, layered over the snap's.
    pub environment: IndexMap<String, String>,
}

impl HookInfo {
    /// The hook's security tag: `snap.<snap>.hook.<hook>`.
    pub fn security_tag(&self, snap: &Info) -> String {
        naming::hook_security_tag(snap.name(), &self.name)
    }

    /// The hook's environment as newline-terminated `K=V` entries, the
    /// snap-wide environment overlaid with the hook's own.
    pub fn env(&self, snap: &Info) -> Vec<String> {
        let mut merged = snap.environment.clone();
        for (key, value) in &self.environment {
            merged.insert(key.clone(), value.clone());
        }
        merged.iter().map(|(key, value)| format!("{key}={value}\n")).collect()
    }
}

/// A plug: the consuming end of an interface connection.
#[derive(Debug, Clone, Default)]
pub struct PlugInfo {
    /// The plug's name within its snap.
    pub name: String,
    /// The interface the plug speaks.
    pub interface: String,
    /// Interface-specific attributes.
    pub attrs: BTreeMap<String, AttrValue>,
    /// Human-readable label.
    pub label: String,

    /// Names of the apps bound to this plug.
    pub apps: BTreeSet<String>,
    /// Names of the hooks bound to this plug.
    pub hooks: BTreeSet<String>,
}

impl PlugInfo {
    /// The `<snap>:<plug>` form used when naming connections.
    pub fn reference(&self, snap: &Info) -> String {
        format!("{}:{}", snap.name(), self.name)
    }

    /// The sorted security tags of everything bound to this plug.
    pub fn security_tags(&self, snap: &Info) -> Vec<String> {
        security_tags_for(snap, &self.apps, &self.hooks)
    }
}

/// A slot: the providing end of an interface connection.
#[derive(Debug, Clone, Default)]
pub struct SlotInfo {
    /// The slot's name within its snap.
    pub name: String,
    /// The interface the slot speaks.
    pub interface: String,
    /// Interface-specific attributes.
    pub attrs: BTreeMap<String, AttrValue>,
    /// Human-readable label.
    pub label: String,

    /// Names of the apps bound to this slot.
    pub apps: BTreeSet<String>,
    /// Names of the hooks bound to this slot.
    pub hooks: BTreeSet<String>,
}

impl SlotInfo {
    /// The `<snap>:<slot>` form used when naming connections.
    pub fn reference(&self, snap: &Info) -> String {
        format!("{}:{}", snap.name(), self.name)
    }

    /// The sorted security tags of everything bound to this slot.
    pub fn security_tags(&self, snap: &Info) -> Vec<String> {
        security_tags_for(snap, &self.apps, &self.hooks)
    }
}

fn security_tags_for(
    snap: &Info,
    apps: &BTreeSet<String>,
    hooks: &BTreeSet<String>,
) -> Vec<String> {
    let mut tags: Vec<String> = apps
        .iter()
        .map(|app| naming::app_security_tag(snap.name(), app))
        .collect();
    tags.extend(hooks.iter().map(|hook| naming::hook_security_tag(snap.name(), hook)));
    tags.sort_unstable();
    tags
}

/// One element of the snap's filesystem layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// The target path inside the snap's mount namespace.
    pub path: String,
    /// Source path to bind-mount at the target, if any.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bind: String,
    /// Filesystem type to mount at the target, if any.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub type_: String,
    /// Owner of the mounted filesystem.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user: String,
    /// Group of the mounted filesystem.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,
    /// File mode of the mounted filesystem, declared in decimal in the
    /// manifest.
    #[serde(default)]
    pub mode: u32,
    /// Symlink to create at the target, if any.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub symlink: String,
}

/// Download facts about one revision of a snap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DownloadInfo {
    /// Download URL that needs no authentication.
    #[serde(rename = "anon-download-url", default, skip_serializing_if = "String::is_empty")]
    pub anon_download_url: String,
    /// Authenticated download URL.
    #[serde(rename = "download-url", default, skip_serializing_if = "String::is_empty")]
    pub download_url: String,
    /// Size of the snap blob in bytes.
    #[serde(default)]
    pub size: u64,
    /// SHA3-384 of the snap blob, hex encoded.
    #[serde(rename = "sha3-384", default, skip_serializing_if = "String::is_empty")]
    pub sha3_384: String,
    /// Available binary deltas leading to this revision.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deltas: Vec<DeltaInfo>,
}

/// A binary delta between two revisions of a snap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeltaInfo {
    /// Revision the delta applies on top of.
    #[serde(rename = "from-revision", default)]
    pub from_revision: i32,
    /// Revision the delta produces.
    #[serde(rename = "to-revision", default)]
    pub to_revision: i32,
    /// Delta format name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub format: String,
    /// Download URL that needs no authentication.
    #[serde(rename = "anon-download-url", default, skip_serializing_if = "String::is_empty")]
    pub anon_download_url: String,
    /// Authenticated download URL.
    #[serde(rename = "download-url", default, skip_serializing_if = "String::is_empty")]
    pub download_url: String,
    /// Size of the delta in bytes.
    #[serde(default)]
    pub size: u64,
    /// SHA3-384 of the delta, hex encoded.
    #[serde(rename = "sha3-384", default, skip_serializing_if = "String::is_empty")]
    pub sha3_384: String,
}

/// What one channel currently offers for a snap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelSnapInfo {
    /// The revision the channel points at.
    pub revision: Revision,
    /// Confinement of that revision.
    pub confinement: Confinement,
    /// Version of that revision.
    pub version: String,
    /// The channel's full name.
    pub channel: String,
    /// Epoch of that revision.
    #[serde(default)]
    pub epoch: Epoch,
    /// Size of that revision's blob in bytes.
    pub size: u64,
}

/// A store screenshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenshotInfo {
    /// Where the image lives.
    pub url: String,
    /// Image width in pixels, when known.
    #[serde(default)]
    pub width: i64,
    /// Image height in pixels, when known.
    #[serde(default)]
    pub height: i64,
}
