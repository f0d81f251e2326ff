use proptest::prelude::*;
use shelf_core::codec;
use shelf_core::list::{BACKLOG_CAPACITY, BoundedList, COMPLETED_CAPACITY, SortKey};

use generators::*;

fn is_sorted(list: &BoundedList) -> bool {
    list.items()
        .windows(2)
        .all(|pair| list.compare(&pair[0], &pair[1]).is_le())
}

fn arb_key() -> impl Strategy<Value = SortKey> {
    prop::sample::select(SortKey::ALL.to_vec())
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn construction_is_sorted_and_bounded(items in arb_items(80)) {
        let backlog = BoundedList::backlog(items.clone());
        prop_assert!(backlog.len() <= BACKLOG_CAPACITY);
        prop_assert!(is_sorted(&backlog));

        let done = BoundedList::completions(items);
        prop_assert!(done.len() <= COMPLETED_CAPACITY);
        prop_assert!(is_sorted(&done));
    }

    #[test]
    fn inserts_keep_order_under_any_key(
        items in arb_items(60),
        key in arb_key(),
    ) {
        let mut list = BoundedList::backlog(Vec::new());
        list.set_sort_key(key);
        for item in items {
            let was_full = list.is_full();
            let expected = item.clone();
            let result = list.insert(item);
            prop_assert_eq!(result.is_err(), was_full);
            if let Ok(placed) = result {
                prop_assert!(same_fields(&list.items()[placed.index], &expected));
            }
            prop_assert!(list.len() <= BACKLOG_CAPACITY);
            prop_assert!(is_sorted(&list));
        }
    }

    #[test]
    fn completions_never_exceed_capacity(
        items in prop::collection::vec(arb_completed_item(), 0..12),
        key in arb_key(),
    ) {
        let mut list = BoundedList::completions(Vec::new());
        list.set_sort_key(key);
        for item in items {
            let was_full = list.is_full();
            let placed = list.insert(item).unwrap();
            prop_assert_eq!(placed.evicted.is_some(), was_full);
            prop_assert!(list.len() <= COMPLETED_CAPACITY);
            prop_assert!(is_sorted(&list));
        }
    }

    #[test]
    fn resorting_is_idempotent(items in arb_items(50), key in arb_key()) {
        let mut list = BoundedList::backlog(items);
        list.set_sort_key(key);
        let once: Vec<_> = list.items().to_vec();
        list.set_sort_key(key);
        prop_assert!(once.iter().zip(list.items()).all(|(a, b)| same_fields(a, b)));
    }

    #[test]
    fn encoded_list_round_trips(items in arb_items(6)) {
        let list = BoundedList::backlog(items);
        let encoded = codec::encode_list(list.items());
        let decoded = codec::decode_list(&encoded).unwrap();
        prop_assert_eq!(decoded.len(), list.len());
        prop_assert!(decoded.iter().zip(list.items()).all(|(a, b)| same_fields(a, b)));
    }

    #[test]
    fn encoded_completions_round_trip(
        items in prop::collection::vec(arb_completed_item(), 0..6),
    ) {
        let list = BoundedList::completions(items);
        let decoded = codec::decode_list(&codec::encode_list(list.items())).unwrap();
        let rebuilt = BoundedList::completions(decoded);
        prop_assert!(rebuilt.items().iter().zip(list.items()).all(|(a, b)| same_fields(a, b)));
    }
}
