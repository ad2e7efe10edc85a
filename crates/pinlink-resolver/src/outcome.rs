/// Cache directive sent with permanent redirects.
pub const REDIRECT_CACHE_CONTROL: &str =
    "public, max-age=31536000, s-maxage=31536000, stale-while-revalidate=86400";

/// What a slug lookup resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The link is active; redirect to the target URL.
    Redirect(String),
    /// The link existed but its expiration has passed.
    Expired,
    /// No link was ever stored under the slug.
    NotFound,
}

impl ResolveOutcome {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Redirect(_) => 301,
            Self::Expired => 410,
            Self::NotFound => 404,
        }
    }
}
