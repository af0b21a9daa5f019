//! Build metadata embedded by `build.rs`

/// Build number, incremented on each recompilation
pub const BUILD_NUMBER: u64 = match option_env!("RECIPE_COST_BUILD_NUMBER") {
    Some(s) => match parse_u64(s) {
        Some(n) => n,
        None => 0,
    },
    None => 0,
};

/// Build timestamp in ISO 8601 format
pub const BUILD_TIMESTAMP: &str = match option_env!("RECIPE_COST_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const fn parse_u64(s: &str) -> Option<u64> {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    let mut result: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if !b.is_ascii_digit() {
            return None;
        }
        result = result * 10 + (b - b'0') as u64;
        i += 1;
    }
    Some(result)
}

/// The build fields reported by the status tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub const fn current() -> Self {
        Self {
            version: VERSION,
            build_number: BUILD_NUMBER,
            build_timestamp: BUILD_TIMESTAMP,
        }
    }

    /// One-line form, e.g. `v1.0.0 build 12 (2026-10-19T08:00:00Z)`
    pub fn summary(&self) -> String {
        format!("v{} build {} ({})", self.version, self.build_number, self.build_timestamp)
    }
}

/// Print the startup banner to stderr
pub fn print_startup_banner() {
    eprintln!("Recipe Cost Calculator {}", BuildInfo::current().summary());
}
