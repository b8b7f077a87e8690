//! Small helpers for lenient version handling.
use semver::Version;

/// Parse a version string leniently, padding missing minor/patch parts so
/// two- and one-part versions ("2.5", "3") still order correctly.
pub fn parse_lenient(version: &str) -> Option<Version> {
    let version = version.trim().trim_start_matches('v');

    if let Ok(parsed) = Version::parse(version) {
        return Some(parsed);
    }

    let padded = match version.split('.').count() {
        1 => format!("{version}.0.0"),
        2 => format!("{version}.0"),
        _ => return None,
    };

    Version::parse(&padded).ok()
}
