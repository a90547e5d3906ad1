//! Compile-time build information.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// One-line identification for logs and CLI banners.
pub fn banner() -> String {
    format!("xiuxian {VERSION} ({BUILD_COMMIT}, {BUILD_DATE})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_commit_format() {
        assert!(BUILD_COMMIT == "unknown" || BUILD_COMMIT.len() == 7);
    }

    #[test]
    fn test_build_date_format() {
        // YYYY-MM-DD
        assert!(BUILD_DATE.len() == 10 || BUILD_DATE == "unknown");
    }

    #[test]
    fn test_banner_mentions_version_and_commit() {
        let banner = banner();
        assert!(banner.contains(VERSION));
        assert!(banner.contains(BUILD_COMMIT));
    }
}
