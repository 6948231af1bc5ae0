//! Mapping between tenant paths and object keys
//!
//! A folder is never stored as its own entity: a key ending in `/` marks a
//! folder placeholder, any other key is a file.

use crate::error::{DriveError, DriveResult};

pub const SEPARATOR: char = '/';

/// `tenant/` followed by each segment and a trailing separator.
pub fn build_prefix<S: AsRef<str>>(tenant: &str, segments: &[S]) -> String {
    let mut prefix = String::with_capacity(tenant.len() + 1);
    prefix.push_str(tenant);
    prefix.push(SEPARATOR);
    for segment in segments {
        prefix.push_str(segment.as_ref());
        prefix.push(SEPARATOR);
    }
    prefix
}

/// Strip `prefix` from `key`.
pub fn relative_name<'a>(key: &'a str, prefix: &str) -> DriveResult<&'a str> {
    key.strip_prefix(prefix)
        .ok_or_else(|| DriveError::MalformedKey {
            key: key.to_string(),
            prefix: prefix.to_string(),
        })
}

pub fn is_folder_key(key: &str) -> bool {
    key.ends_with(SEPARATOR)
}

/// A single path segment: non-empty, separator-free and not a dot entry.
pub fn validate_segment(segment: &str) -> DriveResult<()> {
    if segment.is_empty() || segment == "." || segment == ".." || segment.contains(SEPARATOR) {
        return Err(DriveError::InvalidName(segment.to_string()));
    }
    Ok(())
}

pub fn validate_segments<S: AsRef<str>>(segments: &[S]) -> DriveResult<()> {
    segments
        .iter()
        .try_for_each(|segment| validate_segment(segment.as_ref()))
}

/// Parse `"a/b/"` style paths into segments. Empty parts are dropped so
/// leading, trailing and doubled separators are harmless.
pub fn split_path(path: &str) -> DriveResult<Vec<String>> {
    let segments: Vec<String> = path
        .split(SEPARATOR)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect();
    validate_segments(&segments)?;
    Ok(segments)
}
