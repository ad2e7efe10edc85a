//! Pure validation rules for target URLs and slugs.

use url::Url;

/// Shortest accepted slug.
pub const MIN_SLUG_LENGTH: usize = 3;
/// Longest accepted slug.
pub const MAX_SLUG_LENGTH: usize = 64;
/// Length of system-generated slugs.
pub const GENERATED_SLUG_LENGTH: usize = 7;

/// Alphabet used for system-generated slugs.
pub const SLUG_ALPHABET: &[u8; 62] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Top-level path segments consumed by the routing layer itself:
/// `api` for the creation endpoint and `s` for static exports.
pub const RESERVED_SLUGS: &[&str] = &["api", "s"];

/// Returns `true` iff `candidate` is an absolute `http` or `https` URL.
pub fn validate_url(candidate: &str) -> bool {
    Url::parse(candidate).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

/// Returns `true` iff `candidate` satisfies the slug syntax and is not reserved.
pub fn validate_slug(candidate: &str) -> bool {
    is_slug_syntax(candidate) && !is_reserved(candidate)
}

/// Checks `^[A-Za-z0-9_-]{3,64}$` only, ignoring reservations.
pub fn is_slug_syntax(candidate: &str) -> bool {
    (MIN_SLUG_LENGTH..=MAX_SLUG_LENGTH).contains(&candidate.len())
        && candidate
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

pub fn is_reserved(candidate: &str) -> bool {
    RESERVED_SLUGS.contains(&candidate)
}
