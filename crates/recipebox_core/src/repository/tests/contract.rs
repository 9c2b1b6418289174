//! The repository contract, run once per store.

use super::*;

fn create_assigns_fresh_ids(store: &RecipeStore) {
    let stored = seed_samples(store);
    let mut ids: Vec<i64> = stored.iter().map(|r| r.id).collect();
    ids.dedup();
    assert_eq!(ids.len(), 3);
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));

    // Deleting the newest record must not free its id for reuse.
    let newest = *ids.last().expect("ids");
    assert!(store.delete(newest).expect("delete"));
    let next = store
        .create(new_recipe("Pho", "Vietnamese", Difficulty::Medium))
        .expect("create");
    assert!(!ids.contains(&next.id), "id {} was reused", next.id);
}

fn round_trip_preserves_fields(store: &RecipeStore) {
    let input = new_recipe("Shakshuka", "Moroccan", Difficulty::Easy);
    let created = store.create(input.clone()).expect("create");
    let fetched = store
        .find_by_id(created.id)
        .expect("find")
        .expect("recipe should exist");
    assert_eq!(fetched, input.with_id(created.id));
}

fn find_by_unknown_id_is_absent(store: &RecipeStore) {
    seed_samples(store);
    assert!(store.find_by_id(999).expect("find").is_none());
}

fn find_all_without_arguments_returns_everything_in_order(store: &RecipeStore) {
    let stored = seed_samples(store);
    let all = store
        .find_all(&RecipeFilter::default(), None)
        .expect("find_all");
    assert_eq!(all, stored);
}

fn filters_are_case_insensitive_substrings(store: &RecipeStore) {
    seed_samples(store);
    let italian = store
        .find_all(&RecipeFilter::cuisine("ital"), None)
        .expect("find_all");
    assert_eq!(italian.len(), 2);
    assert!(italian.iter().all(|r| r.cuisine == "Italian"));

    let hard = store
        .find_all(&RecipeFilter::difficulty("HAR"), None)
        .expect("find_all");
    assert_eq!(hard.len(), 1);
    assert_eq!(hard[0].title, "Chicken Tikka Masala");

    let both = store
        .find_all(
            &RecipeFilter::new(Some("italian".into()), Some("easy".into())),
            None,
        )
        .expect("find_all");
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].title, "Spaghetti Carbonara");

    let literal = store
        .find_all(&RecipeFilter::cuisine("%"), None)
        .expect("find_all");
    assert!(literal.is_empty());
}

fn pagination_selects_the_requested_window(store: &RecipeStore) {
    let stored = seed_samples(store);
    let second = store
        .find_all(&RecipeFilter::default(), Some(Pagination::new(Some(2), Some(1))))
        .expect("find_all");
    assert_eq!(second, vec![stored[1].clone()]);

    let unbounded = store
        .find_all(&RecipeFilter::default(), Some(Pagination::default()))
        .expect("find_all");
    assert_eq!(unbounded.len(), 3);

    let past_end = store
        .find_all(&RecipeFilter::default(), Some(Pagination::new(Some(2), None)))
        .expect("find_all");
    assert!(past_end.is_empty());

    let filtered_page = store
        .find_all(
            &RecipeFilter::cuisine("italian"),
            Some(Pagination::new(Some(2), Some(1))),
        )
        .expect("find_all");
    assert_eq!(filtered_page, vec![stored[2].clone()]);
}

fn update_merges_and_keeps_id(store: &RecipeStore) {
    let stored = seed_samples(store);
    let target = &stored[0];
    let patch = RecipePatch {
        title: Some("Pizza Bianca".to_string()),
        rating: Some(3.5),
        ingredients: Some(vec!["dough".to_string(), "olive oil".to_string()]),
        ..RecipePatch::default()
    };
    let updated = store
        .update(target.id, patch)
        .expect("update")
        .expect("recipe should exist");

    assert_eq!(updated.id, target.id);
    assert_eq!(updated.title, "Pizza Bianca");
    assert_eq!(updated.rating, 3.5);
    assert_eq!(updated.ingredients, vec!["dough", "olive oil"]);
    assert_eq!(updated.cuisine, target.cuisine);
    assert_eq!(updated.difficulty, target.difficulty);

    let fetched = store.find_by_id(target.id).expect("find").expect("exists");
    assert_eq!(fetched, updated);
}

fn empty_update_is_a_no_op(store: &RecipeStore) {
    let stored = seed_samples(store);
    let unchanged = store
        .update(stored[1].id, RecipePatch::default())
        .expect("update")
        .expect("recipe should exist");
    assert_eq!(unchanged, stored[1]);
}

fn update_of_unknown_id_is_absent(store: &RecipeStore) {
    seed_samples(store);
    let patch = RecipePatch {
        servings: Some(2),
        ..RecipePatch::default()
    };
    assert!(store.update(404, patch).expect("update").is_none());
    assert!(store
        .update(404, RecipePatch::default())
        .expect("update")
        .is_none());
    assert_eq!(store.count().expect("count"), 3);
}

fn delete_is_reported_once(store: &RecipeStore) {
    let stored = seed_samples(store);
    let id = stored[0].id;
    assert!(store.delete(id).expect("delete"));
    assert!(store.find_by_id(id).expect("find").is_none());
    assert!(!store.delete(id).expect("second delete"));
    assert_eq!(store.count().expect("count"), 2);
}

fn filters_fold_non_ascii_case(store: &RecipeStore) {
    seed_samples(store);
    let stored = store
        .create(new_recipe("Doro Wat", "Éthiopienne", Difficulty::Hard))
        .expect("create");

    for needle in ["éthio", "ÉTHIOP", "pienne"] {
        let hits = store
            .find_all(&RecipeFilter::cuisine(needle), None)
            .expect("find_all");
        assert_eq!(hits, vec![stored.clone()], "needle {:?}", needle);
    }
    assert!(store
        .find_all(&RecipeFilter::cuisine("ethio"), None)
        .expect("find_all")
        .is_empty());
}

fn empty_store_behaves(store: &RecipeStore) {
    assert_eq!(store.count().expect("count"), 0);
    assert!(store
        .find_all(&RecipeFilter::default(), None)
        .expect("find_all")
        .is_empty());
    assert!(!store.delete(1).expect("delete"));
}

macro_rules! contract_suite {
    ($module:ident, $open:path) => {
        mod $module {
            contract_suite!(@cases $open;
                create_assigns_fresh_ids,
                round_trip_preserves_fields,
                find_by_unknown_id_is_absent,
                find_all_without_arguments_returns_everything_in_order,
                filters_are_case_insensitive_substrings,
                filters_fold_non_ascii_case,
                pagination_selects_the_requested_window,
                update_merges_and_keeps_id,
                empty_update_is_a_no_op,
                update_of_unknown_id_is_absent,
                delete_is_reported_once,
                empty_store_behaves,
            );
        }
    };
    (@cases $open:path; $($case:ident),* $(,)?) => {
        $(
            #[test]
            fn $case() {
                let (store, _temp) = $open();
                super::$case(&store);
            }
        )*
    };
}

contract_suite!(file, super::file_store);
contract_suite!(sqlite, super::sqlite_store);
