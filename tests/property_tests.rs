//! Property tests for request-locale.
//!
//! These tests validate store and resolution invariants across arbitrary
//! keys, values and headers.

use std::collections::BTreeMap;

use proptest::prelude::*;
use request_locale::source::accept_language;
use request_locale::web::LocalePlug;
use request_locale::{
    is_private, resolve, store, Attrs, Config, Conn, Field, FieldConfig, Source, PRIVATE_MARKER,
};
use serde_json::Value;

// Strategy: attribute keys, some of them private
fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[a-z]{1,8}").unwrap(),
        prop::string::string_regex("__[a-z]{1,6}").unwrap(),
    ]
}

// Strategy: language tags like `fr`, `de-CH`, `zh-Hant`
fn arb_tag() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{2,3}(-[A-Z][a-z]{1,3}|-[A-Z]{2})?").unwrap()
}

fn arb_pairs() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((arb_key(), "[a-zA-Z-]{0,10}"), 0..8)
}

proptest! {
    /// Property: merging a list and merging the equivalent map agree
    ///
    /// When keys repeat, the last pair in the list is the one kept, which is
    /// also what collecting into a map does.
    #[test]
    fn proptest_merge_list_equals_merge_map(pairs in arb_pairs()) {
        let map: BTreeMap<String, Value> = pairs
            .iter()
            .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
            .collect();

        let from_list = store::merge(Conn::new("req-1"), pairs);
        let from_map = store::merge(Conn::new("req-1"), map);

        prop_assert_eq!(store::get(&from_list), store::get(&from_map));
    }

    /// Property: put then get returns the value and leaves other keys alone
    #[test]
    fn proptest_put_preserves_other_keys(
        pairs in arb_pairs(),
        key in arb_key(),
        value in "[a-z]{0,6}",
    ) {
        let before = store::merge(Conn::new("req-1"), pairs);
        let snapshot = store::get(&before).clone();

        let after = store::put(before, key.clone(), value.clone());

        prop_assert_eq!(store::get_key(&after, &key), Some(&Value::from(value)));
        for (k, v) in snapshot.iter().filter(|(k, _)| *k != key) {
            prop_assert_eq!(store::get_key(&after, k), Some(v));
        }
    }

    /// Property: privacy depends only on the key prefix
    #[test]
    fn proptest_privacy_is_prefix_based(suffix in "[a-z_]{0,10}") {
        let private_key = format!("{PRIVATE_MARKER}{suffix}");
        prop_assert!(is_private(&private_key));
        let prefixed_key = format!("x{}", private_key);
        prop_assert!(!is_private(prefixed_key));
    }

    /// Property: split partitions the map without losing entries
    #[test]
    fn proptest_split_partitions(pairs in arb_pairs()) {
        let attrs: Attrs = pairs.into_iter().collect();
        let total = attrs.len();

        let (internal, visible) = attrs.split();

        prop_assert_eq!(internal.len() + visible.len(), total);
        prop_assert!(internal.iter().all(|(k, _)| is_private(k)));
        prop_assert!(visible.iter().all(|(k, _)| !is_private(k)));
    }

    /// Property: Accept-Language yields the first listed tag regardless of weights
    #[test]
    fn proptest_accept_language_first_listed(
        tags in prop::collection::vec(arb_tag(), 1..6),
        weights in prop::collection::vec(0u8..=10, 6),
    ) {
        let header = tags
            .iter()
            .zip(&weights)
            .map(|(tag, w)| format!("{tag};q={:.1}", f32::from(*w) / 10.0))
            .collect::<Vec<_>>()
            .join(", ");

        prop_assert_eq!(accept_language::select(&header, None), Some(tags[0].as_str()));
    }

    /// Property: applying the plug twice changes nothing
    #[test]
    fn proptest_plug_is_idempotent(
        query in prop::option::of(arb_tag()),
        cookie in prop::option::of(arb_tag()),
        header in prop::option::of(arb_tag()),
        region in prop::option::of("[A-Z]{2}"),
    ) {
        let mut conn = Conn::new("req-prop");
        if let Some(tag) = &query {
            conn.add_query_param("locale", tag.as_str());
        }
        if let Some(tag) = &cookie {
            conn.add_cookie("language", tag.as_str());
        }
        if let Some(tag) = &header {
            conn.add_header("Accept-Language", tag.as_str());
        }
        let extra: Attrs = region.iter().map(|r| ("region", r.as_str())).collect();

        let plug = LocalePlug::new(Config::default()).with_extra(extra);
        let once = plug.apply(conn);
        let twice = plug.apply(once.clone());

        prop_assert_eq!(store::get(&once), store::get(&twice));
    }

    /// Property: the earlier of two configured sources always wins
    #[test]
    fn proptest_first_source_wins(query in arb_tag(), cookie in arb_tag()) {
        let config = Config::default().with_field(
            Field::Locale,
            FieldConfig::for_field(Field::Locale).with_sources([Source::Cookie, Source::Query]),
        );
        let mut conn = Conn::new("req-prop");
        conn.add_query_param("locale", query);
        conn.add_cookie("locale", cookie.clone());

        let resolved = resolve(&conn, &config, &Attrs::new(), &Attrs::new());

        prop_assert_eq!(resolved.get(Field::Locale), Some(cookie.as_str()));
    }
}
