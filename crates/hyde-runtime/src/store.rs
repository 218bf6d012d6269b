#![forbid(unsafe_code)]

//! Cookie storage backends.
//!
//! [`CookieStore`] is the seam between [`StateCookie`](crate::StateCookie)
//! and wherever cookies actually live (a browser jar, a response header
//! writer, a test double). [`MemoryCookieStore`] keeps them in a map and
//! enforces the usual 4096-byte limit per cookie.

use ahash::AHashMap;

use crate::cookie::CookieOptions;

/// Largest cookie (name plus value) browsers are required to keep.
pub const MAX_COOKIE_BYTES: usize = 4096;

/// Errors raised by a cookie store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CookieError {
    /// Cookies are disabled or the backing jar is gone.
    #[error("cookie store unavailable: {0}")]
    Unavailable(String),

    #[error("cookie {name:?} is {len} bytes, limit is {limit}")]
    TooLarge {
        name: String,
        len: usize,
        limit: usize,
    },
}

/// Somewhere cookies can be read from and written to.
pub trait CookieStore {
    /// Current value of the cookie called `name`.
    fn read(&self, name: &str) -> Result<Option<String>, CookieError>;

    /// Replace the cookie called `name`, with the attributes in `options`.
    fn write(&mut self, name: &str, value: &str, options: &CookieOptions)
    -> Result<(), CookieError>;
}

/// A cookie as kept by [`MemoryCookieStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCookie {
    pub value: String,
    pub path: String,
    pub domain: String,
    pub expire_days: u32,
    pub secure: bool,
}

/// In-memory cookie jar.
#[derive(Debug, Clone)]
pub struct MemoryCookieStore {
    cookies: AHashMap<String, StoredCookie>,
    limit: usize,
    enabled: bool,
}

impl Default for MemoryCookieStore {
    fn default() -> Self {
        Self {
            cookies: AHashMap::new(),
            limit: MAX_COOKIE_BYTES,
            enabled: true,
        }
    }
}

impl MemoryCookieStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the per-cookie size limit.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Simulate cookies being switched off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Stored cookie with its attributes.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&StoredCookie> {
        self.cookies.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    fn check_enabled(&self) -> Result<(), CookieError> {
        if self.enabled {
            Ok(())
        } else {
            Err(CookieError::Unavailable("cookies disabled".into()))
        }
    }
}

impl CookieStore for MemoryCookieStore {
    fn read(&self, name: &str) -> Result<Option<String>, CookieError> {
        self.check_enabled()?;
        Ok(self.cookies.get(name).map(|cookie| cookie.value.clone()))
    }

    fn write(
        &mut self,
        name: &str,
        value: &str,
        options: &CookieOptions,
    ) -> Result<(), CookieError> {
        self.check_enabled()?;
        let len = name.len() + value.len();
        if len > self.limit {
            return Err(CookieError::TooLarge {
                name: name.to_string(),
                len,
                limit: self.limit,
            });
        }
        self.cookies.insert(
            name.to_string(),
            StoredCookie {
                value: value.to_string(),
                path: options.path.clone(),
                domain: options.domain.clone(),
                expire_days: options.expire_days,
                secure: options.secure,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read() {
        let mut store = MemoryCookieStore::new();
        let options = CookieOptions::default().domain("example.org").secure(true);
        store.write("state", "a~1", &options).expect("write");
        assert_eq!(store.read("state"), Ok(Some("a~1".to_string())));
        assert_eq!(store.read("other"), Ok(None));

        let stored = store.cookie("state").expect("stored");
        assert_eq!(stored.path, "/");
        assert_eq!(stored.domain, "example.org");
        assert_eq!(stored.expire_days, 90);
        assert!(stored.secure);
    }

    #[test]
    fn oversized_cookie_is_rejected() {
        let mut store = MemoryCookieStore::new().with_limit(8);
        let err = store
            .write("state", "abcdef", &CookieOptions::default())
            .expect_err("too large");
        assert_eq!(
            err,
            CookieError::TooLarge {
                name: "state".into(),
                len: 11,
                limit: 8
            }
        );
        assert!(store.is_empty());
    }

    #[test]
    fn disabled_store_fails() {
        let mut store = MemoryCookieStore::new();
        store.set_enabled(false);
        assert!(matches!(
            store.read("state"),
            Err(CookieError::Unavailable(_))
        ));
        assert!(store.write("state", "", &CookieOptions::default()).is_err());
    }
}
