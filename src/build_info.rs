//! Version and build stamp
//!
//! build.rs exports the stamp as env vars; a build without it reports
//! build 0 at an unknown time.

use serde::Serialize;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const BUILD_NUMBER: Option<&str> = option_env!("RECIPE_MANAGER_BUILD_NUMBER");
const BUILD_TIMESTAMP: Option<&str> = option_env!("RECIPE_MANAGER_BUILD_TIMESTAMP");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self::from_stamp(BUILD_NUMBER, BUILD_TIMESTAMP)
    }

    fn from_stamp(number: Option<&str>, timestamp: Option<&'static str>) -> Self {
        Self {
            version: VERSION,
            build_number: number.and_then(|n| n.trim().parse().ok()).unwrap_or(0),
            build_timestamp: timestamp.unwrap_or("unknown"),
        }
    }

    fn banner(&self) -> String {
        let rule = "=".repeat(47);
        format!(
            "{rule}\n  Recipe Manager\n  Version: {} | Build: {}\n  Compiled: {}\n{rule}",
            self.version, self.build_number, self.build_timestamp
        )
    }
}

/// Startup banner; stderr, since stdout carries the protocol
pub fn print_startup_banner() {
    eprintln!("{}", BuildInfo::current().banner());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamp_from_build_script() {
        let info = BuildInfo::from_stamp(Some("42"), Some("2025-03-03T10:00:00Z"));
        assert_eq!(info.build_number, 42);
        assert_eq!(info.build_timestamp, "2025-03-03T10:00:00Z");
        assert_eq!(info.version, VERSION);
    }

    #[test]
    fn test_missing_or_garbled_stamp() {
        let info = BuildInfo::from_stamp(Some("12a"), None);
        assert_eq!(info.build_number, 0);
        assert_eq!(info.build_timestamp, "unknown");
        assert_eq!(BuildInfo::from_stamp(None, None).build_number, 0);
    }

    #[test]
    fn test_banner_lines() {
        let banner = BuildInfo::from_stamp(Some("7"), Some("then")).banner();
        let lines: Vec<_> = banner.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "  Recipe Manager");
        assert_eq!(lines[2], format!("  Version: {} | Build: 7", VERSION));
        assert_eq!(lines[3], "  Compiled: then");
    }
}
