//! Tests for the ListService mutation path end to end.

use tandem::access::Actor;
use tandem::list::{ItemId, Permission, UserId};
use tandem::service::ItemPatch;

use crate::helpers::{as_user, test_bed};

#[tokio::test]
async fn anonymous_callers_can_read_but_not_create() {
    let bed = test_bed();
    let err = bed
        .service
        .create_list(&Actor::Anonymous, "Groceries")
        .await
        .unwrap_err();
    assert!(err.is_authentication_error());

    let list = bed
        .service
        .create_list(&as_user("alice"), "Groceries")
        .await
        .unwrap();
    // The single-list read requires no credential at all.
    let fetched = bed.service.fetch_list(&list.list_id).await.unwrap();
    assert_eq!(fetched.name, "Groceries");
}

#[tokio::test]
async fn view_collaborator_must_be_upgraded_before_editing() {
    // Owner creates a list and shares it with default (view) permission;
    // the collaborator can only add items after an explicit upgrade.
    let bed = test_bed();
    let alice = as_user("alice");
    let bob = as_user("bob");

    let list = bed.service.create_list(&alice, "Groceries").await.unwrap();
    let shared = bed
        .service
        .add_collaborator(&alice, &list.list_id, "bob@example.com", None)
        .await
        .unwrap();
    assert_eq!(
        shared.permission_of(&UserId::from("bob")),
        Some(Permission::View)
    );

    let err = bed
        .service
        .add_item(&bob, &list.list_id, "Milk")
        .await
        .unwrap_err();
    assert!(err.is_permission_denied());

    bed.service
        .set_collaborator_permission(&alice, &list.list_id, &UserId::from("bob"), Permission::Edit)
        .await
        .unwrap();

    let item = bed
        .service
        .add_item(&bob, &list.list_id, "Milk")
        .await
        .unwrap();
    assert_eq!(item.text, "Milk");
    assert!(!item.completed);
    assert_eq!(item.sort_order, 0);

    let fetched = bed.service.fetch_list(&list.list_id).await.unwrap();
    assert_eq!(fetched.items, vec![item]);
}

#[tokio::test]
async fn reversing_three_items_renumbers_them_densely() {
    let bed = test_bed();
    let alice = as_user("alice");
    let list = bed.service.create_list(&alice, "Groceries").await.unwrap();

    let mut ids = Vec::new();
    for text in ["Milk", "Eggs", "Bread"] {
        let item = bed.service.add_item(&alice, &list.list_id, text).await.unwrap();
        ids.push(String::from(item.item_id));
    }
    ids.reverse();

    let reordered = bed
        .service
        .reorder_items(&alice, &list.list_id, ids)
        .await
        .unwrap();

    let texts: Vec<&str> = reordered.items.iter().map(|i| i.text.as_str()).collect();
    assert_eq!(texts, ["Bread", "Eggs", "Milk"]);
    let orders: Vec<i64> = reordered.items.iter().map(|i| i.sort_order).collect();
    assert_eq!(orders, [0, 1, 2]);
}

#[tokio::test]
async fn partial_item_reorder_leaves_the_rest_in_place() {
    let bed = test_bed();
    let alice = as_user("alice");
    let list = bed.service.create_list(&alice, "Groceries").await.unwrap();

    let mut ids = Vec::new();
    for text in ["a", "b", "c", "d"] {
        let item = bed.service.add_item(&alice, &list.list_id, text).await.unwrap();
        ids.push(String::from(item.item_id));
    }

    // Name only the last item; the other three keep their relative order.
    let reordered = bed
        .service
        .reorder_items(&alice, &list.list_id, vec![ids[3].clone()])
        .await
        .unwrap();

    let texts: Vec<&str> = reordered.items.iter().map(|i| i.text.as_str()).collect();
    let unnamed: Vec<&str> = texts.iter().copied().filter(|t| *t != "d").collect();
    assert_eq!(unnamed, ["a", "b", "c"]);
}

#[tokio::test]
async fn reorder_rejects_ids_outside_the_list() {
    let bed = test_bed();
    let alice = as_user("alice");
    let list = bed.service.create_list(&alice, "Groceries").await.unwrap();
    bed.service
        .add_item(&alice, &list.list_id, "Milk")
        .await
        .unwrap();

    let err = bed
        .service
        .reorder_items(&alice, &list.list_id, vec!["not-an-item".to_string()])
        .await
        .unwrap_err();
    assert!(err.is_validation_error());
}

#[tokio::test]
async fn archiving_evicts_collaborators_for_good() {
    let bed = test_bed();
    let alice = as_user("alice");
    let list = bed.service.create_list(&alice, "Groceries").await.unwrap();
    bed.service
        .add_collaborator(&alice, &list.list_id, "bob", None)
        .await
        .unwrap();
    bed.service
        .add_collaborator(&alice, &list.list_id, "carol", Some(Permission::Edit))
        .await
        .unwrap();

    let archived = bed
        .service
        .set_archived(&alice, &list.list_id, Some(true))
        .await
        .unwrap();
    assert!(archived.archived);
    assert!(archived.collaborators().is_empty());

    let unarchived = bed
        .service
        .set_archived(&alice, &list.list_id, Some(false))
        .await
        .unwrap();
    assert!(!unarchived.archived);
    assert!(unarchived.collaborators().is_empty());
}

#[tokio::test]
async fn flag_routes_toggle_when_no_value_is_given() {
    let bed = test_bed();
    let alice = as_user("alice");
    let list = bed.service.create_list(&alice, "Groceries").await.unwrap();

    let toggled = bed
        .service
        .set_pinned(&alice, &list.list_id, None)
        .await
        .unwrap();
    assert!(toggled.pinned);

    let toggled_back = bed
        .service
        .set_pinned(&alice, &list.list_id, None)
        .await
        .unwrap();
    assert!(!toggled_back.pinned);

    // An explicit value is authoritative, not a toggle.
    let set = bed
        .service
        .set_archived(&alice, &list.list_id, Some(true))
        .await
        .unwrap();
    assert!(set.archived);
    let still_set = bed
        .service
        .set_archived(&alice, &list.list_id, Some(true))
        .await
        .unwrap();
    assert!(still_set.archived);
}

#[tokio::test]
async fn strangers_cannot_delete_and_the_list_survives() {
    let bed = test_bed();
    let alice = as_user("alice");
    let list = bed.service.create_list(&alice, "Groceries").await.unwrap();

    let err = bed
        .service
        .delete_list(&as_user("carol"), &list.list_id)
        .await
        .unwrap_err();
    assert!(err.is_permission_denied());

    assert!(bed.service.fetch_list(&list.list_id).await.is_ok());

    // The owner can, and a second delete reports the absence.
    bed.service.delete_list(&alice, &list.list_id).await.unwrap();
    let err = bed.service.delete_list(&alice, &list.list_id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn removing_a_collaborator_twice_reports_not_found() {
    let bed = test_bed();
    let alice = as_user("alice");
    let list = bed.service.create_list(&alice, "Groceries").await.unwrap();
    bed.service
        .add_collaborator(&alice, &list.list_id, "bob", None)
        .await
        .unwrap();

    bed.service
        .remove_collaborator(&alice, &list.list_id, &UserId::from("bob"))
        .await
        .unwrap();
    let err = bed
        .service
        .remove_collaborator(&alice, &list.list_id, &UserId::from("bob"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn collaborator_management_is_owner_only() {
    let bed = test_bed();
    let alice = as_user("alice");
    let list = bed.service.create_list(&alice, "Groceries").await.unwrap();
    bed.service
        .add_collaborator(&alice, &list.list_id, "bob", Some(Permission::Edit))
        .await
        .unwrap();

    // Even an edit collaborator cannot grow the registry.
    let err = bed
        .service
        .add_collaborator(&as_user("bob"), &list.list_id, "carol", None)
        .await
        .unwrap_err();
    assert!(err.is_permission_denied());
}

#[tokio::test]
async fn unknown_handles_and_duplicate_entries_are_rejected() {
    let bed = test_bed();
    let alice = as_user("alice");
    let list = bed.service.create_list(&alice, "Groceries").await.unwrap();

    let err = bed
        .service
        .add_collaborator(&alice, &list.list_id, "nobody@example.com", None)
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    bed.service
        .add_collaborator(&alice, &list.list_id, "bob", None)
        .await
        .unwrap();
    let err = bed
        .service
        .add_collaborator(&alice, &list.list_id, "bob@example.com", None)
        .await
        .unwrap_err();
    assert!(err.is_conflict());

    // The owner cannot appear in their own registry.
    let err = bed
        .service
        .add_collaborator(&alice, &list.list_id, "alice", None)
        .await
        .unwrap_err();
    assert!(err.is_validation_error());
}

#[tokio::test]
async fn items_can_be_patched_and_deleted() {
    let bed = test_bed();
    let alice = as_user("alice");
    let list = bed.service.create_list(&alice, "Groceries").await.unwrap();
    let item = bed
        .service
        .add_item(&alice, &list.list_id, "Milk")
        .await
        .unwrap();

    let patched = bed
        .service
        .update_item(
            &alice,
            &list.list_id,
            &item.item_id,
            ItemPatch {
                text: Some("Oat milk".to_string()),
                completed: Some(true),
            },
        )
        .await
        .unwrap();
    assert_eq!(patched.text, "Oat milk");
    assert!(patched.completed);

    let after_delete = bed
        .service
        .delete_item(&alice, &list.list_id, &item.item_id)
        .await
        .unwrap();
    assert!(after_delete.items.is_empty());

    let err = bed
        .service
        .update_item(&alice, &list.list_id, &item.item_id, ItemPatch::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn phantom_items_surface_as_not_found() {
    let bed = test_bed();
    let alice = as_user("alice");
    let list = bed.service.create_list(&alice, "Groceries").await.unwrap();

    let err = bed
        .service
        .delete_item(&alice, &list.list_id, &ItemId::from("phantom"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn visible_lists_order_by_position_then_recency() {
    let bed = test_bed();
    let alice = as_user("alice");

    let first = bed.service.create_list(&alice, "First").await.unwrap();
    bed.clock.advance(60);
    let second = bed.service.create_list(&alice, "Second").await.unwrap();
    bed.clock.advance(60);
    let third = bed.service.create_list(&alice, "Third").await.unwrap();

    // All three share sort_order 0, so recency decides: newest first.
    let names: Vec<String> = bed
        .service
        .visible_lists(&alice)
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.name)
        .collect();
    assert_eq!(names, ["Third", "Second", "First"]);

    // An explicit reorder beats recency.
    bed.service
        .reorder_lists(
            &alice,
            &[
                String::from(first.list_id.clone()),
                String::from(second.list_id),
                String::from(third.list_id),
            ],
        )
        .await
        .unwrap();

    let names: Vec<String> = bed
        .service
        .visible_lists(&alice)
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.name)
        .collect();
    assert_eq!(names, ["First", "Second", "Third"]);

    // Touching a list does not jump it past an explicit position.
    bed.clock.advance(60);
    bed.service
        .rename_list(&alice, &first.list_id, "First again")
        .await
        .unwrap();
    let names: Vec<String> = bed
        .service
        .visible_lists(&alice)
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.name)
        .collect();
    assert_eq!(names, ["First again", "Second", "Third"]);
}

#[tokio::test]
async fn list_reorder_scope_is_the_actors_visible_lists() {
    let bed = test_bed();
    let alice = as_user("alice");
    let bob = as_user("bob");

    bed.service.create_list(&alice, "Mine").await.unwrap();
    let bobs = bed.service.create_list(&bob, "Theirs").await.unwrap();

    // Naming a list outside the caller's visible scope is a validation error.
    let err = bed
        .service
        .reorder_lists(&alice, &[String::from(bobs.list_id.clone())])
        .await
        .unwrap_err();
    assert!(err.is_validation_error());

    // Once shared, the same id becomes reorderable for the collaborator.
    bed.service
        .add_collaborator(&bob, &bobs.list_id, "alice", None)
        .await
        .unwrap();
    bed.service
        .reorder_lists(&alice, &[String::from(bobs.list_id)])
        .await
        .unwrap();
}
