//! Shared key and public reference mapping for derivatives.
//!
//! Key format: `images/original/{name}` and `images/thumbnail/{name}`.

use std::fmt;

/// Which half of a derivative pair a key addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivativeKind {
    Original,
    Thumbnail,
}

impl DerivativeKind {
    pub fn dir(&self) -> &'static str {
        match self {
            DerivativeKind::Original => "original",
            DerivativeKind::Thumbnail => "thumbnail",
        }
    }
}

impl fmt::Display for DerivativeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir())
    }
}

/// Generate the storage key for one derivative of an allocated filename.
pub fn derivative_key(kind: DerivativeKind, name: &str) -> String {
    format!("images/{}/{}", kind.dir(), name)
}

/// Public, root-relative reference for a storage key.
pub fn public_url(prefix: &str, key: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), key)
}

/// Map a public reference back to its storage key.
///
/// Returns `None` if the reference is not under `prefix`, is empty after the
/// prefix, or tries to climb out of it.
pub fn key_from_public_url(prefix: &str, url: &str) -> Option<String> {
    let prefix = prefix.trim_end_matches('/');
    let key = url.strip_prefix(prefix)?.strip_prefix('/')?;

    if key.is_empty() || key.starts_with('/') || key.split('/').any(|part| part == "..") {
        return None;
    }

    Some(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivative_keys_share_name() {
        let name = "1700000000000000000_0123456789abcdef.jpg";
        assert_eq!(
            derivative_key(DerivativeKind::Original, name),
            format!("images/original/{}", name)
        );
        assert_eq!(
            derivative_key(DerivativeKind::Thumbnail, name),
            format!("images/thumbnail/{}", name)
        );
    }

    #[test]
    fn test_public_url_ignores_trailing_slash() {
        assert_eq!(
            public_url("/uploads/", "images/original/a.png"),
            "/uploads/images/original/a.png"
        );
        assert_eq!(
            public_url("/uploads", "images/original/a.png"),
            "/uploads/images/original/a.png"
        );
    }

    #[test]
    fn test_key_from_public_url() {
        assert_eq!(
            key_from_public_url("/uploads", "/uploads/images/thumbnail/a.png").as_deref(),
            Some("images/thumbnail/a.png")
        );
        assert!(key_from_public_url("/uploads", "/static/images/original/a.png").is_none());
        assert!(key_from_public_url("/uploads", "/uploadsimages/a.png").is_none());
        assert!(key_from_public_url("/uploads", "/uploads/").is_none());
        assert!(key_from_public_url("/uploads", "/uploads/../etc/passwd").is_none());
        assert!(key_from_public_url("/uploads", "/uploads//etc/passwd").is_none());
    }
}
