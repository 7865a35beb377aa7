//! Snap metadata.
//!
//! This crate models everything the system knows about a snap: the
//! manifest as shipped in `meta/snap.yaml`, the store-side facts that
//! travel with a revision, and every location and security tag derived
//! from them. The rest of the daemon treats [`Info`] as the single source
//! of truth for where a snap lives and what it may do.
//!
//! The derivations are pure; only the loaders in [`load`] and the
//! containers in [`container`] touch the filesystem.

pub mod attrs;
pub mod container;
pub mod epoch;
pub mod hooks;
pub mod info;
pub mod load;
pub mod naming;
pub mod paths;
pub mod revision;
pub mod timeout;
pub mod types;
pub mod validate;
pub mod yaml;

pub use attrs::AttrValue;
pub use container::{Container, SnapDir};
pub use epoch::Epoch;
pub use info::{
    AppInfo, ChannelSnapInfo, DeltaInfo, DownloadInfo, HookInfo, Info, Layout, PlaceInfo,
    PlugInfo, ScreenshotInfo, SideInfo, SlotInfo, SocketInfo, minimal_place_info,
};
pub use load::{
    InfoError, SanitizerGuard, mock_sanitize_plugs_slots, read_info, read_info_from_snap_file,
    set_sanitize_plugs_slots,
};
pub use revision::Revision;
pub use timeout::{DEFAULT_TIMEOUT, Timeout};
pub use types::{Confinement, RestartCondition, SnapType};
pub use validate::{ValidationError, validate, validate_interface};
pub use yaml::{ParseError, info_from_snap_yaml};
