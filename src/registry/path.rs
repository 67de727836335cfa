//! Document Paths and Path Templates

use std::fmt;
use std::str::FromStr;

use super::DispatchError;

/// Marker preceding the document part of a fully qualified resource name
const DOCUMENTS_SEGMENT: &str = "documents/";

/// A concrete `collection/document` path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPath {
    pub collection: String,
    pub document_id: String,
}

impl DocumentPath {
    /// Parse `posts/p1`, `/posts/p1`, or a fully qualified name such as
    /// `projects/demo/databases/(default)/documents/posts/p1`
    pub fn parse(path: &str) -> Result<Self, DispatchError> {
        let relative = match path.rfind(DOCUMENTS_SEGMENT) {
            Some(idx) => &path[idx + DOCUMENTS_SEGMENT.len()..],
            None => path,
        };

        let mut segments = relative.trim_matches('/').split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(collection), Some(document_id), None)
                if !collection.is_empty() && !document_id.is_empty() =>
            {
                Ok(Self {
                    collection: collection.to_string(),
                    document_id: document_id.to_string(),
                })
            }
            _ => Err(DispatchError::InvalidPath(path.to_string())),
        }
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.document_id)
    }
}

/// A `collection/{param}` template with one wildcard segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    collection: String,
    param: String,
}

impl PathTemplate {
    pub fn new(collection: impl Into<String>, param: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            param: param.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    /// Document ID bound to the wildcard if the path belongs to this template
    pub fn matches<'a>(&self, path: &'a DocumentPath) -> Option<&'a str> {
        (path.collection == self.collection).then_some(path.document_id.as_str())
    }
}

impl FromStr for PathTemplate {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DispatchError::InvalidTemplate(s.to_string());

        let (collection, wildcard) = s.trim_matches('/').split_once('/').ok_or_else(invalid)?;
        let param = wildcard
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
            .ok_or_else(invalid)?;

        if collection.is_empty()
            || collection.contains(['{', '}'])
            || param.is_empty()
            || param.contains(['/', '{', '}'])
        {
            return Err(invalid());
        }

        Ok(Self::new(collection, param))
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{{{}}}", self.collection, self.param)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_path() {
        let path = DocumentPath::parse("posts/p1").unwrap();
        assert_eq!(path.collection, "posts");
        assert_eq!(path.document_id, "p1");

        let path = DocumentPath::parse("/users/u9/").unwrap();
        assert_eq!(path.to_string(), "users/u9");
    }

    #[test]
    fn test_parse_qualified_document_path() {
        let path =
            DocumentPath::parse("projects/demo/databases/(default)/documents/posts/p1").unwrap();
        assert_eq!(path.collection, "posts");
        assert_eq!(path.document_id, "p1");
    }

    #[test]
    fn test_reject_bad_document_paths() {
        for bad in ["posts", "posts/", "posts/p1/comments/c1", "", "/"] {
            assert!(
                matches!(DocumentPath::parse(bad), Err(DispatchError::InvalidPath(_))),
                "expected {:?} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parse_template() {
        let template: PathTemplate = "posts/{postId}".parse().unwrap();
        assert_eq!(template.collection(), "posts");
        assert_eq!(template.param(), "postId");
        assert_eq!(template.to_string(), "posts/{postId}");
    }

    #[test]
    fn test_reject_bad_templates() {
        for bad in ["posts", "posts/postId", "{posts}/{id}", "posts/{}", "posts/{a}/x"] {
            assert!(bad.parse::<PathTemplate>().is_err(), "expected {:?} to be rejected", bad);
        }
    }

    #[test]
    fn test_template_matches() {
        let template = PathTemplate::new("users", "userId");
        let path = DocumentPath::parse("users/u1").unwrap();
        assert_eq!(template.matches(&path), Some("u1"));

        let other = DocumentPath::parse("posts/u1").unwrap();
        assert_eq!(template.matches(&other), None);
    }
}
