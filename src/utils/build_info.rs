use std::fmt;

use once_cell::sync::Lazy;

pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// What the build script recorded about this binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: &'static str,
    pub built_on: &'static str,
    pub profile: &'static str,
}

static CURRENT: Lazy<BuildInfo> = Lazy::new(|| BuildInfo {
    version: CLI_VERSION,
    commit: env!("RENTBOOK_COMMIT"),
    built_on: env!("RENTBOOK_BUILT_ON"),
    profile: env!("RENTBOOK_PROFILE"),
});

pub fn current() -> BuildInfo {
    *CURRENT
}

impl BuildInfo {
    pub fn is_release(&self) -> bool {
        self.profile == "release"
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {}", self.version, self.commit, self.built_on)?;
        if !self.is_release() {
            write!(f, ", {} build", self.profile)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(profile: &'static str) -> BuildInfo {
        BuildInfo {
            version: "1.2.0",
            commit: "a1b2c3d+",
            built_on: "2026-10-19",
            profile,
        }
    }

    #[test]
    fn release_builds_omit_the_profile() {
        assert_eq!(sample("release").to_string(), "1.2.0 (a1b2c3d+ 2026-10-19)");
    }

    #[test]
    fn other_profiles_are_named() {
        assert_eq!(
            sample("debug").to_string(),
            "1.2.0 (a1b2c3d+ 2026-10-19, debug build)"
        );
    }

    #[test]
    fn current_build_reports_the_package_version() {
        let info = current();
        assert_eq!(info.version, CLI_VERSION);
        assert!(!info.commit.is_empty());
        assert!(!info.profile.is_empty());
    }
}
