// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Produce path components that are safe for storage keys and local downloads.

/// Basenames Windows refuses to create.
const RESERVED: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Turn arbitrary user text into a single safe path component.
///
/// Unicode is transliterated with `deunicode`, anything outside ASCII
/// alphanumerics, `-`, `_` and `.` becomes `_`, runs of `_`/`.` collapse,
/// and leading/trailing separators are trimmed. Returns `fallback` when
/// nothing usable is left.
pub fn sanitize_component(value: &str, fallback: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in deunicode::deunicode(value).chars() {
        let ch = if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
            ch
        } else {
            '_'
        };
        if matches!(ch, '_' | '.') && out.ends_with(ch) {
            continue;
        }
        out.push(ch);
    }

    let out = out.replace("_.", ".");
    let out = out.trim_matches(|c| c == '.' || c == '_');
    if out.is_empty() {
        return fallback.to_string();
    }

    let stem = out.split('.').next().unwrap_or(out);
    if RESERVED.contains(&stem.to_ascii_uppercase().as_str()) {
        return format!("{stem}_{}", &out[stem.len()..]);
    }
    out.to_string()
}
