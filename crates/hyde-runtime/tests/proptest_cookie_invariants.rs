//! Property-based invariant tests for the state cookie.
//!
//! 1. Decoding an encoded list of pairs gives the same pairs back.
//! 2. Escaped text never contains a separator.
//! 3. `set` then `get` returns the value; other keys are untouched.
//! 4. `remove` then `get` is `None`.
//! 5. Toggling twice restores the flag.
//! 6. Restore directives cover every pair.

use hyde_runtime::{
    CookieOptions, MemoryCookieStore, StateCookie, decode, encode, escape, restore_directives,
};
use proptest::prelude::*;

// ── Strategies ────────────────────────────────────────────────────────────

/// Arbitrary text, including separators, escapes, and non-ASCII.
fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 +~%@*_./é€-]{0,12}"
}

fn key() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9+~%]{0,8}"
}

fn cookie() -> StateCookie<MemoryCookieStore> {
    StateCookie::new(CookieOptions::default(), MemoryCookieStore::new())
}

proptest! {
    #[test]
    fn codec_round_trips(pairs in proptest::collection::vec((text(), text()), 0..8)) {
        prop_assert_eq!(decode(&encode(&pairs)), pairs);
    }

    #[test]
    fn escaped_text_has_no_separators(value in text()) {
        let escaped = escape(&value);
        prop_assert!(!escaped.contains('+'));
        prop_assert!(!escaped.contains('~'));
        prop_assert!(escaped.is_ascii());
    }

    #[test]
    fn set_then_get(
        existing in proptest::collection::vec((key(), text()), 0..5),
        k in key(),
        v in text(),
    ) {
        let mut state = cookie();
        for (ek, ev) in &existing {
            state.set(ek, ev).expect("set existing");
        }
        let others: Vec<(String, Option<String>)> = existing
            .iter()
            .filter(|(ek, _)| ek != &k)
            .map(|(ek, _)| (ek.clone(), state.get_raw(ek).expect("get")))
            .collect();

        state.set(&k, &v).expect("set");
        prop_assert_eq!(state.get_raw(&k).expect("get"), Some(v.clone()));
        for (ek, before) in others {
            prop_assert_eq!(state.get_raw(&ek).expect("get"), before);
        }
    }

    #[test]
    fn remove_then_get(pairs in proptest::collection::vec((key(), text()), 1..6), pick in any::<prop::sample::Index>()) {
        let mut state = cookie();
        for (k, v) in &pairs {
            state.set(k, v).expect("set");
        }
        let (k, _) = &pairs[pick.index(pairs.len())];
        prop_assert!(state.remove(k).expect("remove"));
        prop_assert_eq!(state.get_raw(k).expect("get"), None);
        prop_assert!(state.entries().expect("entries").iter().all(|(ek, _)| ek != k));
    }

    #[test]
    fn double_toggle_restores(k in key(), start in any::<bool>()) {
        let mut state = cookie();
        state.set(&k, if start { "true" } else { "false" }).expect("set");
        let first = state.toggle(&k).expect("toggle");
        prop_assert_eq!(first, !start);
        let second = state.toggle(&k).expect("toggle");
        prop_assert_eq!(second, start);
    }

    #[test]
    fn directives_cover_every_pair(pairs in proptest::collection::vec((key(), text()), 0..6)) {
        let directives = restore_directives(&pairs);
        let images = pairs.iter().filter(|(_, v)| !v.is_empty()).count();
        prop_assert_eq!(directives.len(), pairs.len() * 2 + images);
    }
}
