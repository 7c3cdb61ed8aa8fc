//! Route path template, kept alongside the resolved request.

/// The path template of a route before identifiers are substituted.
///
/// Carried by [`crate::Request`] so logging can group calls by route
/// (`/customers/{customer}`) instead of by resolved path (`/customers/cus_123`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathTemplate(&'static str);

impl PathTemplate {
    /// Create a new path template.
    #[must_use]
    pub const fn new(template: &'static str) -> Self {
        Self(template)
    }

    /// Get the template string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }

    /// Names of the `{placeholder}` segments, in order.
    pub fn placeholders(&self) -> impl Iterator<Item = &'static str> {
        self.0
            .split('/')
            .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
    }
}

impl std::fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PathTemplate {
    fn as_ref(&self) -> &str {
        self.0
    }
}
