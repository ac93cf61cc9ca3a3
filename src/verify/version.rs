//! Documented-versus-installed version comparison.
//!
//! Documentation rarely states full semver: "React 18" should match an
//! installed 18.2.0. Comparison is semver-first at the precision the document
//! gives, with a string-prefix fallback for non-semver schemes.

use semver::Version;

/// Whether a documented version statement is satisfied by the installed one
pub(crate) fn versions_compatible(documented: &str, installed: &str) -> bool {
    let documented = normalize(documented);
    let installed = normalize(installed);

    if documented == installed {
        return true;
    }

    let doc_precision = documented.split('.').count();

    if let (Ok(doc), Ok(actual)) = (
        Version::parse(&pad_to_semver(&documented)),
        Version::parse(&pad_to_semver(&installed)),
    ) {
        return match doc_precision {
            1 => doc.major == actual.major,
            2 => doc.major == actual.major && doc.minor == actual.minor,
            _ => doc == actual,
        };
    }

    // Non-semver schemes (date versions, four-part builds) fall back to a
    // component-prefix comparison
    documented
        .split('.')
        .zip(installed.split('.'))
        .all(|(d, i)| d == i)
        && doc_precision <= installed.split('.').count()
}

fn normalize(version: &str) -> String {
    version
        .trim()
        .trim_start_matches(['v', 'V'])
        .trim_start_matches(['^', '~', '=', '>', '<'])
        .trim()
        .to_string()
}

/// Pad `18` or `18.2` out to a parseable `18.0.0` / `18.2.0`
fn pad_to_semver(version: &str) -> String {
    match version.split('.').count() {
        1 => format!("{version}.0.0"),
        2 => format!("{version}.0"),
        _ => version.to_string(),
    }
}
