//! File-system-safe names derived from agent display names.

/// Convert an agent name to a safe file-name stem.
///
/// Characters outside alphanumerics, space, hyphen and underscore become
/// `_`; surrounding spaces are trimmed; spaces become `_`; runs of `_`
/// collapse to one. Applying it twice yields the same string.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    collapse_underscores(&replaced.trim_matches(' ').replace(' ', "_"))
}

fn collapse_underscores(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out
}

/// Output file name for an agent: `Agent_<sanitized>_Dossier.html`.
///
/// A stem that starts or ends with `_` is merged into the surrounding
/// separators, so the file name never contains `__` either.
pub fn dossier_file_name(name: &str) -> String {
    collapse_underscores(&format!("Agent_{}_Dossier.html", sanitize_filename(name)))
}

/// Photo file name for an agent: `<sanitized>.<extension>`.
pub fn photo_file_name(name: &str, extension: &str) -> String {
    format!("{}.{}", sanitize_filename(name), extension)
}
