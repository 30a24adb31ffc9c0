mod prop_tests {
    use crate::{Config, MultiLangMap, TaggedText, convert};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn one(text: &str) -> HashSet<String> {
        [text.to_string()].into()
    }

    proptest! {
        #[test]
        fn merge_with_self_is_idempotent(
            entries in proptest::collection::hash_map(
                "[a-z]{1,3}",
                proptest::collection::hash_set(".{0,8}", 0..4),
                0..4,
            )
        ) {
            let cfg = Config::default();
            let map = MultiLangMap::from_entries(&cfg, entries).unwrap();
            let merged = MultiLangMap::merge(&[map.clone(), map.clone()]);
            prop_assert_eq!(merged.to_entries(), map.to_entries());
        }

        #[test]
        fn case_variants_share_one_key(
            tag in "[a-zA-Z]{1,6}",
            texts in proptest::collection::vec(".{0,8}", 1..6),
        ) {
            let cfg = Config::default();
            let mut map = MultiLangMap::new();
            for (i, text) in texts.iter().enumerate() {
                let variant = if i % 2 == 0 {
                    tag.to_uppercase()
                } else {
                    tag.to_lowercase()
                };
                map.add_entry(&cfg, text, &variant).unwrap();
            }
            prop_assert_eq!(map.len_langs(), 1);
            let stored = map.get(&tag).unwrap();
            for text in &texts {
                prop_assert!(stored.contains(text.as_str()));
            }
        }

        #[test]
        fn single_casing_kept_divergent_folds(tag in "[a-z]{1,5}") {
            let upper = tag.to_uppercase();

            let kept = MultiLangMap::merge_language_entries([
                (upper.clone(), one("a")),
                (upper.clone(), one("b")),
            ]);
            prop_assert!(kept.contains_key(&upper));

            let folded = MultiLangMap::merge_language_entries([
                (upper.clone(), one("a")),
                (tag.clone(), one("b")),
            ]);
            prop_assert_eq!(folded.len(), 1);
            prop_assert!(folded.contains_key(&tag));
        }

        #[test]
        fn text_round_trips_through_set(
            text in ".{0,20}",
            tag in proptest::option::of("[a-zA-Z]{1,4}"),
        ) {
            let cfg = Config::default();
            let tagged = TaggedText::new(&cfg, &text, tag.as_deref()).unwrap();
            let set = convert::text_to_set(&tagged);
            prop_assert_eq!(convert::set_to_texts(&set), vec![tagged]);
        }

        #[test]
        fn remove_after_add_restores_prior_set(
            texts in proptest::collection::hash_set(".{1,8}", 1..5),
            extra in ".{1,8}",
            tag in "[a-z]{1,3}",
        ) {
            prop_assume!(!texts.contains(&extra));
            let cfg = Config::default();
            let mut map = MultiLangMap::new();
            for text in &texts {
                map.add_entry(&cfg, text, &tag).unwrap();
            }
            let before = map.get(&tag).cloned().unwrap();
            map.add_entry(&cfg, &extra, &tag).unwrap();
            map.remove_entry(&cfg, &extra, &tag, false).unwrap();
            prop_assert_eq!(map.get(&tag), Some(&before));
        }
    }
}
