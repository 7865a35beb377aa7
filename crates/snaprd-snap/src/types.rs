//! Closed vocabularies used across snap metadata.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The type of a snap, which decides how the system treats it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapType {
    /// A regular application snap. The store also spells this
    /// `application`.
    #[default]
    #[serde(alias = "application")]
    App,
    /// Device-specific configuration and hooks.
    Gadget,
    /// A kernel snap.
    Kernel,
    /// The core operating system snap.
    Os,
    /// A shared runtime other snaps build on.
    Base,
}

impl SnapType {
    /// The lowercase form used in manifests.
    pub fn as_str(self) -> &'static str {
        match self {
            SnapType::App => "app",
            SnapType::Gadget => "gadget",
            SnapType::Kernel => "kernel",
            SnapType::Os => "os",
            SnapType::Base => "base",
        }
    }
}

impl fmt::Display for SnapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How strictly a snap is sandboxed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confinement {
    /// Full sandboxing. The default.
    #[default]
    Strict,
    /// Sandbox violations are logged but allowed.
    Devmode,
    /// No sandboxing at all.
    Classic,
}

impl Confinement {
    /// The lowercase form used in manifests.
    pub fn as_str(self) -> &'static str {
        match self {
            Confinement::Strict => "strict",
            Confinement::Devmode => "devmode",
            Confinement::Classic => "classic",
        }
    }
}

impl fmt::Display for Confinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When a service should be restarted, mirroring the systemd vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestartCondition {
    /// Restart only after clean exits.
    OnSuccess,
    /// Restart after unclean exits. The default for services.
    #[default]
    OnFailure,
    /// Restart after signals and watchdog timeouts.
    OnAbnormal,
    /// Restart after watchdog timeouts only.
    OnAbort,
    /// Always restart.
    Always,
    /// Never restart.
    Never,
}

impl RestartCondition {
    /// The value to put in a systemd `Restart=` line.
    ///
    /// systemd spells "never" as "no"; everything else passes through.
    pub fn for_systemd(self) -> &'static str {
        match self {
            RestartCondition::OnSuccess => "on-success",
            RestartCondition::OnFailure => "on-failure",
            RestartCondition::OnAbnormal => "on-abnormal",
            RestartCondition::OnAbort => "on-abort",
            RestartCondition::Always => "always",
            RestartCondition::Never => "no",
        }
    }
}

impl fmt::Display for RestartCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.for_systemd())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_type_from_yaml() {
        for (raw, expected) in [
            ("app", SnapType::App),
            ("gadget", SnapType::Gadget),
            ("kernel", SnapType::Kernel),
            ("os", SnapType::Os),
            ("base", SnapType::Base),
        ] {
            let parsed: SnapType = serde_yaml::from_str(raw).unwrap();
            assert_eq!(parsed, expected);
            assert_eq!(parsed.as_str(), raw);
        }
    }

    #[test]
    fn snap_type_accepts_the_store_spelling() {
        let parsed: SnapType = serde_yaml::from_str("application").unwrap();
        assert_eq!(parsed, SnapType::App);
    }

    #[test]
    fn snap_type_rejects_unknown() {
        assert!(serde_yaml::from_str::<SnapType>("vm").is_err());
    }

    #[test]
    fn confinement_defaults_to_strict() {
        assert_eq!(Confinement::default(), Confinement::Strict);
    }

    #[test]
    fn restart_condition_from_yaml() {
        let parsed: RestartCondition = serde_yaml::from_str("on-abnormal").unwrap();
        assert_eq!(parsed, RestartCondition::OnAbnormal);
    }

    #[test]
    fn restart_condition_systemd_spelling() {
        assert_eq!(RestartCondition::Never.for_systemd(), "no");
        assert_eq!(RestartCondition::OnFailure.for_systemd(), "on-failure");
        assert_eq!(RestartCondition::default(), RestartCondition::OnFailure);
    }
}
