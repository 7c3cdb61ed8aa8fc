//! Verbs spoken by the API.

use derive_more::Display;

/// Verb of an API call.
///
/// Reads are `GET`, creations, updates and actions are `POST` with a
/// form body, removals are `DELETE`. The API has no `PUT` or `PATCH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Method {
    /// Retrieve one object or list a collection.
    #[display("GET")]
    Get,
    /// Create, update, or run an action such as `void` or `pay`.
    #[display("POST")]
    Post,
    /// Delete an object or detach a source.
    #[display("DELETE")]
    Delete,
}

impl Method {
    /// Whether the parameters of a call travel in the body rather than in
    /// the query string.
    #[must_use]
    pub const fn has_body(self) -> bool {
        matches!(self, Self::Post)
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Delete => Self::DELETE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names() {
        let names: Vec<_> = [Method::Get, Method::Post, Method::Delete]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(names, ["GET", "POST", "DELETE"]);
    }

    #[test]
    fn only_post_has_a_body() {
        assert!(Method::Post.has_body());
        assert!(!Method::Get.has_body());
        assert!(!Method::Delete.has_body());
    }

    #[test]
    fn converts_to_http() {
        assert_eq!(http::Method::from(Method::Delete), http::Method::DELETE);
        assert_eq!(http::Method::from(Method::Post), http::Method::POST);
    }
}
