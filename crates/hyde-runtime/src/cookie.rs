#![forbid(unsafe_code)]

//! The state cookie.
//!
//! Small pieces of page state (which sections are expanded, which accordion
//! panel is open, which image variant is showing) are kept in one cookie as
//! a list of key/value pairs:
//!
//! ```text
//! sidebar~true+navPanel~2+themeImg~%2Fimg%2Fdark.png
//! ```
//!
//! Pairs are joined by `+`, key and value are separated by `~`, and both are
//! `%XX`-escaped so neither separator can appear inside them. Everything
//! outside `A-Z a-z 0-9 @ * _ - . /` is escaped, bytewise over UTF-8.

use std::fmt::Write as _;

use crate::store::{CookieError, CookieStore};

/// Separator between pairs.
pub const PAIR_SEPARATOR: char = '+';
/// Separator between key and value.
pub const KEY_SEPARATOR: char = '~';

/// Values read back as "no value".
const NULL_SENTINEL: &str = "null";
const FALSE_SENTINEL: &str = "false";

/// Name and attributes of the state cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CookieOptions {
    pub name: String,
    /// Prepended to the name as `<prefix>_<name>` when non-empty.
    pub prefix: String,
    pub path: String,
    pub domain: String,
    /// Lifetime in days.
    pub expire_days: u32,
    pub secure: bool,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            name: "state".into(),
            prefix: String::new(),
            path: "/".into(),
            domain: String::new(),
            expire_days: 90,
            secure: false,
        }
    }
}

impl CookieOptions {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    #[must_use]
    pub fn expire_days(mut self, days: u32) -> Self {
        self.expire_days = days;
        self
    }

    #[must_use]
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Full cookie name.
    #[must_use]
    pub fn cookie_name(&self) -> String {
        if self.prefix.is_empty() {
            self.name.clone()
        } else {
            format!("{}_{}", self.prefix, self.name)
        }
    }

    /// `Set-Cookie` header value for `value`.
    #[must_use]
    pub fn set_cookie_header(&self, value: &str) -> String {
        let mut header = format!("{}={}", self.cookie_name(), value);
        if !self.path.is_empty() {
            let _ = write!(header, "; Path={}", self.path);
        }
        if !self.domain.is_empty() {
            let _ = write!(header, "; Domain={}", self.domain);
        }
        let max_age = u64::from(self.expire_days) * 24 * 60 * 60;
        let _ = write!(header, "; Max-Age={max_age}");
        if self.secure {
            header.push_str("; Secure");
        }
        header
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

const HEX: &[u8; 16] = b"0123456789ABCDEF";

const fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'@' | b'*' | b'_' | b'-' | b'.' | b'/')
}

fn hex_value(byte: u8) -> Option<u8> {
    char::from(byte).to_digit(16).map(|digit| digit as u8)
}

/// Escape a key or value.
#[must_use]
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &byte in input.as_bytes() {
        if is_unreserved(byte) {
            out.push(char::from(byte));
        } else {
            out.push('%');
            out.push(char::from(HEX[usize::from(byte >> 4)]));
            out.push(char::from(HEX[usize::from(byte & 0x0f)]));
        }
    }
    out
}

/// Undo [`escape`]. Malformed escapes are kept verbatim.
#[must_use]
pub fn unescape(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && let (Some(hi), Some(lo)) = (
                bytes.get(i + 1).copied().and_then(hex_value),
                bytes.get(i + 2).copied().and_then(hex_value),
            )
        {
            out.push(hi << 4 | lo);
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    match String::from_utf8(out) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}

/// Encode pairs into a cookie value.
#[must_use]
pub fn encode<K: AsRef<str>, V: AsRef<str>>(pairs: &[(K, V)]) -> String {
    let mut out = String::new();
    for (index, (key, value)) in pairs.iter().enumerate() {
        if index > 0 {
            out.push(PAIR_SEPARATOR);
        }
        out.push_str(&escape(key.as_ref()));
        out.push(KEY_SEPARATOR);
        out.push_str(&escape(value.as_ref()));
    }
    out
}

/// Decode a cookie value into pairs. Empty segments are skipped; a segment
/// without a `~` is a key with an empty value.
#[must_use]
pub fn decode(cookie: &str) -> Vec<(String, String)> {
    cookie
        .split(PAIR_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once(KEY_SEPARATOR) {
            Some((key, value)) => (unescape(key), unescape(value)),
            None => (unescape(segment), String::new()),
        })
        .collect()
}

/// Whether a stored value counts as "on": present and not `"false"`,
/// `"null"`, or empty.
#[must_use]
pub fn is_truthy(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty() && v != FALSE_SENTINEL && v != NULL_SENTINEL)
}

// ---------------------------------------------------------------------------
// StateCookie
// ---------------------------------------------------------------------------

/// Key/value page state persisted in a single cookie.
#[derive(Debug, Clone)]
pub struct StateCookie<S> {
    options: CookieOptions,
    store: S,
}

impl<S: CookieStore> StateCookie<S> {
    #[must_use]
    pub fn new(options: CookieOptions, store: S) -> Self {
        Self { options, store }
    }

    #[must_use]
    pub fn options(&self) -> &CookieOptions {
        &self.options
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// The whole encoded cookie, `None` when absent or empty.
    pub fn raw(&self) -> Result<Option<String>, CookieError> {
        let raw = self.store.read(&self.options.cookie_name())?;
        Ok(raw.filter(|value| !value.is_empty()))
    }

    /// Every pair, in stored order.
    pub fn entries(&self) -> Result<Vec<(String, String)>, CookieError> {
        Ok(self.raw()?.as_deref().map(decode).unwrap_or_default())
    }

    /// Value stored under `key`, exactly as written.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, CookieError> {
        Ok(self
            .entries()?
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value))
    }

    /// Value stored under `key`; a stored `"null"` reads as `None`.
    pub fn get(&self, key: &str) -> Result<Option<String>, CookieError> {
        Ok(self.get_raw(key)?.filter(|value| value != NULL_SENTINEL))
    }

    /// Whether `key` holds an "on" value (see [`is_truthy`]).
    pub fn get_flag(&self, key: &str) -> Result<bool, CookieError> {
        Ok(is_truthy(self.get_raw(key)?.as_deref()))
    }

    /// Store `value` under `key`, replacing an existing pair in place.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CookieError> {
        let mut entries = self.entries()?;
        match entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => entries.push((key.to_string(), value.to_string())),
        }
        self.write(&entries)?;
        tracing::debug!(message = "cookie.set", cookie = %self.options.cookie_name(), key, value);
        Ok(())
    }

    /// Drop `key`. Returns whether it was present.
    pub fn remove(&mut self, key: &str) -> Result<bool, CookieError> {
        let mut entries = self.entries()?;
        let before = entries.len();
        entries.retain(|(k, _)| k != key);
        if entries.len() == before {
            return Ok(false);
        }
        self.write(&entries)?;
        tracing::debug!(message = "cookie.remove", cookie = %self.options.cookie_name(), key);
        Ok(true)
    }

    /// Flip `key` between `"true"` and `"false"`; anything other than
    /// `"true"` (including absence) becomes `"true"`. Returns the new state.
    pub fn toggle(&mut self, key: &str) -> Result<bool, CookieError> {
        let on = self.get_raw(key)?.as_deref() != Some("true");
        self.set(key, if on { "true" } else { "false" })?;
        Ok(on)
    }

    /// Remove every pair.
    pub fn clear(&mut self) -> Result<(), CookieError> {
        self.write::<String, String>(&[])
    }

    fn write<K: AsRef<str>, V: AsRef<str>>(&mut self, entries: &[(K, V)]) -> Result<(), CookieError> {
        let name = self.options.cookie_name();
        let value = encode(entries);
        self.store.write(&name, &value, &self.options).inspect_err(|err| {
            tracing::warn!(message = "cookie.write_failed", cookie = %name, error = %err);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCookieStore;
    use tracing_test::traced_test;

    fn cookie() -> StateCookie<MemoryCookieStore> {
        StateCookie::new(CookieOptions::default(), MemoryCookieStore::new())
    }

    #[test]
    fn cookie_name_uses_prefix() {
        assert_eq!(CookieOptions::default().cookie_name(), "state");
        assert_eq!(
            CookieOptions::default().prefix("behaviour").cookie_name(),
            "behaviour_state"
        );
    }

    #[test]
    fn set_cookie_header_lists_attributes() {
        let options = CookieOptions::default()
            .prefix("app")
            .domain("example.org")
            .expire_days(1)
            .secure(true);
        assert_eq!(
            options.set_cookie_header("a~1"),
            "app_state=a~1; Path=/; Domain=example.org; Max-Age=86400; Secure"
        );
    }

    #[test]
    fn escape_reserved_characters() {
        assert_eq!(escape("a+b~c%d"), "a%2Bb%7Ec%25d");
        assert_eq!(escape("/img/x.png"), "/img/x.png");
        assert_eq!(escape("a b"), "a%20b");
        assert_eq!(escape("é"), "%C3%A9");
        assert_eq!(unescape("%C3%A9"), "é");
    }

    #[test]
    fn malformed_escapes_are_kept() {
        assert_eq!(unescape("100%"), "100%");
        assert_eq!(unescape("%zz%4"), "%zz%4");
        assert_eq!(unescape("%41%42"), "AB");
    }

    #[test]
    fn decode_skips_empty_segments() {
        assert_eq!(
            decode("+a~1++b~+c"),
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), String::new()),
                ("c".to_string(), String::new()),
            ]
        );
        assert!(decode("").is_empty());
    }

    #[test]
    fn encode_joins_pairs() {
        assert_eq!(encode(&[("a", "1"), ("b+", "x~y")]), "a~1+b%2B~x%7Ey");
    }

    #[test]
    fn truthy_values() {
        assert!(is_truthy(Some("true")));
        assert!(is_truthy(Some("2")));
        assert!(!is_truthy(Some("false")));
        assert!(!is_truthy(Some("null")));
        assert!(!is_truthy(Some("")));
        assert!(!is_truthy(None));
    }

    #[test]
    fn set_replaces_in_place() {
        let mut state = cookie();
        state.set("a", "1").expect("set");
        state.set("b", "2").expect("set");
        state.set("a", "3").expect("set");
        assert_eq!(state.raw().expect("raw").as_deref(), Some("a~3+b~2"));
        assert_eq!(state.get("a").expect("get").as_deref(), Some("3"));
    }

    #[test]
    fn null_reads_as_none() {
        let mut state = cookie();
        state.set("panel", "null").expect("set");
        assert_eq!(state.get("panel").expect("get"), None);
        assert_eq!(state.get_raw("panel").expect("get").as_deref(), Some("null"));
        assert_eq!(state.get("missing").expect("get"), None);
    }

    #[test]
    fn remove_reports_presence() {
        let mut state = cookie();
        state.set("a", "1").expect("set");
        state.set("b", "2").expect("set");
        assert!(state.remove("a").expect("remove"));
        assert!(!state.remove("a").expect("remove"));
        assert_eq!(state.raw().expect("raw").as_deref(), Some("b~2"));
        assert!(state.remove("b").expect("remove"));
        assert_eq!(state.raw().expect("raw"), None);
    }

    #[test]
    fn toggle_flips_between_true_and_false() {
        let mut state = cookie();
        assert!(state.toggle("sidebar").expect("toggle"));
        assert!(state.get_flag("sidebar").expect("flag"));
        assert!(!state.toggle("sidebar").expect("toggle"));
        assert_eq!(state.get("sidebar").expect("get").as_deref(), Some("false"));
        assert!(!state.get_flag("sidebar").expect("flag"));
    }

    #[test]
    fn clear_empties_cookie() {
        let mut state = cookie();
        state.set("a", "1").expect("set");
        state.clear().expect("clear");
        assert!(state.entries().expect("entries").is_empty());
    }

    #[test]
    fn prefixed_cookie_is_separate() {
        let mut state = StateCookie::new(
            CookieOptions::default().prefix("behaviour"),
            MemoryCookieStore::new(),
        );
        state.set("a", "1").expect("set");
        let store = state.into_store();
        assert!(store.cookie("behaviour_state").is_some());
        assert!(store.cookie("state").is_none());
    }

    #[traced_test]
    #[test]
    fn set_logs_key() {
        let mut state = cookie();
        state.set("navPanel", "2").expect("set");
        assert!(logs_contain("cookie.set"));
        assert!(logs_contain("navPanel"));
    }

    #[traced_test]
    #[test]
    fn failed_write_is_logged_and_returned() {
        let mut state = StateCookie::new(
            CookieOptions::default(),
            MemoryCookieStore::new().with_limit(4),
        );
        let err = state.set("key", "value").expect_err("too large");
        assert!(matches!(err, CookieError::TooLarge { .. }));
        assert!(logs_contain("cookie.write_failed"));
    }
}
