//! Qt argument markers (`%1` .. `%99`, `%L1`) and `QString::arg` substitution.
//!
//! Qt has no `%%` escape: a `%` that is not followed by a marker is literal.

use std::collections::BTreeSet;

use tracing::warn;

/// A `%N` or `%LN` marker found in a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    /// Byte offset of the `%`.
    pub start: usize,
    /// Byte offset one past the last digit.
    pub end: usize,
    pub number: u8,
    /// `%L1`: the argument should be formatted with the locale.
    pub localized: bool,
}

/// Scans `input` for argument markers in occurrence order.
pub fn find_markers(input: &str) -> Vec<Marker> {
    let bytes = input.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        let mut j = i + 1;
        let localized = bytes.get(j) == Some(&b'L');
        if localized {
            j += 1;
        }

        let digits_start = j;
        while j < bytes.len() && j - digits_start < 2 && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j == digits_start {
            i += 1;
            continue;
        }

        let number = input[digits_start..j].parse::<u8>().unwrap_or(0);
        if number == 0 {
            i += 1;
            continue;
        }
        out.push(Marker {
            start: i,
            end: j,
            number,
            localized,
        });
        i = j;
    }

    out
}

/// Marker numbers in occurrence order (duplicates kept).
pub fn extract_markers(input: &str) -> Vec<u8> {
    find_markers(input).into_iter().map(|m| m.number).collect()
}

/// Distinct marker numbers used by `input`.
pub fn marker_set(input: &str) -> BTreeSet<u8> {
    find_markers(input).into_iter().map(|m| m.number).collect()
}

/// `QString::arg`: replaces every occurrence of the lowest-numbered marker.
///
/// Without any marker the template is returned unchanged.
pub fn arg(template: &str, value: &str) -> String {
    let markers = find_markers(template);
    let Some(lowest) = markers.iter().map(|m| m.number).min() else {
        warn!(template, value, "arg() called on a string without markers");
        return template.to_string();
    };

    let mut out = String::with_capacity(template.len() + value.len());
    let mut last = 0;
    for marker in markers.iter().filter(|m| m.number == lowest) {
        out.push_str(&template[last..marker.start]);
        out.push_str(value);
        last = marker.end;
    }
    out.push_str(&template[last..]);
    out
}

/// Applies [`arg`] once per argument, in order.
pub fn arg_all<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    args.iter()
        .fold(template.to_string(), |acc, value| arg(&acc, value.as_ref()))
}

/// Substitutes the numerus count for `%n` and `%Ln`.
pub fn replace_count(input: &str, n: i64) -> String {
    input.replace("%Ln", &n.to_string()).replace("%n", &n.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_markers() {
        assert_eq!(extract_markers("JSON error: %1"), vec![1]);
        assert_eq!(extract_markers("%2 of %1, again %2"), vec![2, 1, 2]);
        assert_eq!(extract_markers("%L1 files"), vec![1]);
        assert_eq!(extract_markers("100% done, %n item(s)"), Vec::<u8>::new());
    }

    #[test]
    fn test_two_digit_markers() {
        assert_eq!(extract_markers("%12"), vec![12]);
        // Only two digits belong to the marker.
        assert_eq!(extract_markers("%123"), vec![12]);
        assert_eq!(extract_markers("%0 and %00"), Vec::<u8>::new());
    }

    #[test]
    fn test_marker_set() {
        let set = marker_set("%2 %1 %2");
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_arg_replaces_lowest_marker() {
        assert_eq!(arg("JSON error: %1", "unexpected token"), "JSON error: unexpected token");
        assert_eq!(arg("%2 before %1", "first"), "%2 before first");
        assert_eq!(arg("%1 and %1", "x"), "x and x");
        assert_eq!(arg("%L1 boxes", "1,024"), "1,024 boxes");
    }

    #[test]
    fn test_arg_without_markers_is_unchanged() {
        assert_eq!(arg("Invalid JDF", "x"), "Invalid JDF");
    }

    #[test]
    fn test_arg_all_folds_in_order() {
        assert_eq!(
            arg_all("Can't convert %1 to unsinged long long for \"%2\"", &["abc", "Content-Length"]),
            "Can't convert abc to unsinged long long for \"Content-Length\""
        );
        assert_eq!(arg_all::<&str>("Invalid header: %1", &[]), "Invalid header: %1");
    }

    #[test]
    fn test_replace_count() {
        assert_eq!(replace_count("%n job(s)", 3), "3 job(s)");
        assert_eq!(replace_count("%Ln jobs", 1200), "1200 jobs");
    }
}
