#![forbid(unsafe_code)]

//! Restoring page state from the state cookie.
//!
//! Each stored pair `key -> value` may drive up to three elements, found by
//! id suffix:
//!
//! - `<key>Disp` is shown unless the value is `"false"`.
//! - `<key>Icon` gets class `true` (or `false` when the value is `"false"`).
//! - `<key>Img` gets the value as its image source when the value is
//!   non-empty.
//!
//! The directives are plain data; applying them to a document is the
//! caller's job, and ids with no matching element are simply skipped there.

use crate::cookie::StateCookie;
use crate::store::{CookieError, CookieStore};

/// Id suffix of elements whose visibility follows a key.
pub const DISPLAY_SUFFIX: &str = "Disp";
/// Id suffix of elements whose `true`/`false` class follows a key.
pub const ICON_SUFFIX: &str = "Icon";
/// Id suffix of images whose source is stored under a key.
pub const IMAGE_SUFFIX: &str = "Img";
/// Key suffix under which accordion panels remember their open panel.
pub const PANEL_SUFFIX: &str = "Panel";

/// One change to apply to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum RestoreDirective {
    Display { id: String, visible: bool },
    /// Add class `true` and remove `false` when `on`, the reverse otherwise.
    Icon { id: String, on: bool },
    Image { id: String, src: String },
}

impl RestoreDirective {
    /// Target element id.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Display { id, .. } | Self::Icon { id, .. } | Self::Image { id, .. } => id,
        }
    }
}

/// Directives for every stored pair, in cookie order.
#[must_use]
pub fn restore_directives<K: AsRef<str>, V: AsRef<str>>(pairs: &[(K, V)]) -> Vec<RestoreDirective> {
    let mut directives = Vec::with_capacity(pairs.len() * 3);
    for (key, value) in pairs {
        let (key, value) = (key.as_ref(), value.as_ref());
        let on = value != "false";
        directives.push(RestoreDirective::Display {
            id: format!("{key}{DISPLAY_SUFFIX}"),
            visible: on,
        });
        directives.push(RestoreDirective::Icon {
            id: format!("{key}{ICON_SUFFIX}"),
            on,
        });
        if !value.is_empty() {
            directives.push(RestoreDirective::Image {
                id: format!("{key}{IMAGE_SUFFIX}"),
                src: value.to_string(),
            });
        }
    }
    directives
}

impl<S: CookieStore> StateCookie<S> {
    /// Directives restoring the page from the stored pairs.
    pub fn restore_directives(&self) -> Result<Vec<RestoreDirective>, CookieError> {
        let entries = self.entries()?;
        let directives = restore_directives(&entries);
        tracing::debug!(
            message = "page_state.restore",
            pairs = entries.len(),
            directives = directives.len()
        );
        Ok(directives)
    }
}

/// Remembers the open panel of an accordion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationPanel {
    selector: String,
    default_panel: usize,
    reset_on_load: bool,
}

impl NavigationPanel {
    #[must_use]
    pub fn new(selector: impl Into<String>, default_panel: usize) -> Self {
        Self {
            selector: selector.into(),
            default_panel,
            reset_on_load: false,
        }
    }

    /// Ignore the stored panel and always start on the default.
    #[must_use]
    pub fn reset_on_load(mut self, reset: bool) -> Self {
        self.reset_on_load = reset;
        self
    }

    /// Cookie key holding the panel index.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}{PANEL_SUFFIX}", self.selector)
    }

    #[must_use]
    pub const fn default_panel(&self) -> usize {
        self.default_panel
    }

    /// Panel to open: the stored index, or the default when absent,
    /// unparsable, or reset on load.
    pub fn active<S: CookieStore>(&self, cookie: &StateCookie<S>) -> Result<usize, CookieError> {
        if self.reset_on_load {
            return Ok(self.default_panel);
        }
        Ok(cookie
            .get(&self.key())?
            .and_then(|value| value.parse().ok())
            .unwrap_or(self.default_panel))
    }

    /// Remember `index` as the open panel.
    pub fn activate<S: CookieStore>(
        &self,
        cookie: &mut StateCookie<S>,
        index: usize,
    ) -> Result<(), CookieError> {
        cookie.set(&self.key(), &index.to_string())
    }

    /// Store the default panel.
    pub fn reset<S: CookieStore>(&self, cookie: &mut StateCookie<S>) -> Result<(), CookieError> {
        self.activate(cookie, self.default_panel)
    }
}
