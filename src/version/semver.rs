use semver::Version;

/// Parse a version string into a semver::Version, normalizing partial versions.
///
/// Handles partial versions like "1" or "1.2" by padding with zeros.
/// A leading 'v' is stripped.
///
/// Examples:
/// - "1" -> Version(1, 0, 0)
/// - "1.2" -> Version(1, 2, 0)
/// - "v1.2.3" -> Version(1, 2, 3)
pub fn parse_version(version: &str) -> Option<Version> {
    let version = version.trim();
    let version = version.strip_prefix('v').unwrap_or(version);
    let parts: Vec<&str> = version.split('.').collect();
    let normalized = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => version.to_string(),
    };
    Version::parse(&normalized).ok()
}

/// Convert a dotted version into a single weighted integer.
///
/// Segments are read from the least significant end and segment `i` is
/// weighted by `10^i`, so "1.2.3" becomes 123 and "2.0" becomes 20.
/// Returns None if a segment is not numeric or the value overflows.
pub fn weighted_value(version: &str) -> Option<u128> {
    version
        .trim()
        .split('.')
        .rev()
        .enumerate()
        .try_fold(0u128, |acc, (index, part)| {
            let segment: u128 = part.parse().ok()?;
            let weight = 10u128.checked_pow(u32::try_from(index).ok()?)?;
            acc.checked_add(segment.checked_mul(weight)?)
        })
}
