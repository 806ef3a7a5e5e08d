//! `pageshell --version`.
//!
//! Prints the package name and version on one line, e.g. `pageshell 0.1.0`,
//! and exits before any logging, storage or shell startup happens.

/// Package version baked in at build time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Binary name as it appears in the version line.
pub const NAME: &str = env!("CARGO_PKG_NAME");

pub fn version_line() -> String {
    format!("{} {}", NAME, VERSION)
}

/// Short-circuits startup: nothing after argument parsing runs.
pub fn handle_version_command() -> ! {
    println!("{}", version_line());
    std::process::exit(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_line_names_package() {
        assert_eq!(NAME, "pageshell");
        assert_eq!(version_line(), format!("pageshell {}", VERSION));
    }

    #[test]
    fn test_version_is_semver_like() {
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2, "expected major.minor, got {}", VERSION);
        assert!(parts.iter().all(|p| !p.is_empty()));
    }
}
