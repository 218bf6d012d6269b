#![forbid(unsafe_code)]

//! Page-state persistence for Hyde UI.
//!
//! # Role in Hyde UI
//! `hyde-runtime` keeps small bits of UI state (expanded sections, open
//! accordion panels, chosen images) across page loads in a single cookie, and
//! turns that cookie back into directives for restoring the page.
//!
//! # Primary responsibilities
//! - **StateCookie**: get/set/remove/toggle over one encoded cookie.
//! - **CookieStore**: the storage seam, with an in-memory implementation.
//! - **Page restore**: `Disp`/`Icon`/`Img` directives and accordion panels.

pub mod cookie;
pub mod page_state;
pub mod store;

pub use cookie::{CookieOptions, StateCookie, decode, encode, escape, is_truthy, unescape};
pub use page_state::{NavigationPanel, RestoreDirective, restore_directives};
pub use store::{CookieError, CookieStore, MAX_COOKIE_BYTES, MemoryCookieStore, StoredCookie};
