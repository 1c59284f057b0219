use std::sync::Once;

use pretty_assertions::assert_eq;
use reel_core::{
    CollectionManager, DragItem, MemoryStore, UserCollections, VideoRef, ALL_VIDEOS,
    COLLECTIONS_KEY,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(reel_logging::initialize_for_tests);
}

fn video(n: u32) -> VideoRef {
    VideoRef::new(format!("https://cdn.example.com/{n}.mp4"), format!("Template_{n}"))
        .with_created_at("2024-05-01T12:00:00Z")
}

fn media() -> Vec<VideoRef> {
    vec![video(1), video(2), video(3)]
}

fn manager() -> CollectionManager<MemoryStore> {
    init_logging();
    CollectionManager::new(MemoryStore::new(), media())
}

fn stored(manager: &CollectionManager<MemoryStore>) -> UserCollections {
    let raw = manager.store().raw(COLLECTIONS_KEY).expect("collections persisted");
    serde_json::from_str(raw).expect("valid json")
}

#[test]
fn reserved_collection_comes_from_media_source() {
    let manager = manager();
    let views = manager.collections();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].name, ALL_VIDEOS);
    assert!(views[0].is_reserved());
    assert_eq!(views[0].videos, media().as_slice());
}

#[test]
fn create_rejects_blank_and_reserved_names() {
    let mut manager = manager();
    assert!(!manager.create_collection(""));
    assert!(!manager.create_collection("   "));
    assert!(!manager.create_collection(ALL_VIDEOS));
    assert!(manager.user_collections().is_empty());
    assert_eq!(manager.store().raw(COLLECTIONS_KEY), None);
}

#[test]
fn create_then_delete_restores_prior_mapping() {
    let mut manager = manager();
    manager.create_collection("Work");
    let before = manager.user_collections().clone();

    assert!(manager.create_collection("Favorites"));
    assert_eq!(manager.collection("Favorites"), Some(&[] as &[VideoRef]));
    assert!(stored(&manager).contains_key("Favorites"));

    assert!(manager.delete_collection("Favorites"));
    assert_eq!(manager.user_collections(), &before);
    assert_eq!(stored(&manager), before);
}

#[test]
fn create_with_existing_name_resets_it() {
    let mut manager = manager();
    manager.create_collection("Favorites");
    manager.move_into(&DragItem::from_video(video(1)), "Favorites");
    assert_eq!(manager.collection("Favorites").map(<[_]>::len), Some(1));

    assert!(manager.create_collection("Favorites"));
    assert_eq!(manager.collection("Favorites"), Some(&[] as &[VideoRef]));
}

#[test]
fn reserved_collection_cannot_be_deleted() {
    let mut manager = manager();
    assert!(!manager.delete_collection(ALL_VIDEOS));
    assert_eq!(manager.collection(ALL_VIDEOS), Some(media().as_slice()));
}

#[test]
fn move_into_appends_and_persists() {
    let mut manager = manager();
    manager.create_collection("Favorites");

    assert!(manager.move_into(&DragItem::from_video(video(2)), "Favorites"));
    assert!(manager.move_into(&DragItem::from_video(video(1)), "Favorites"));

    let expected = vec![video(2), video(1)];
    assert_eq!(manager.collection("Favorites"), Some(expected.as_slice()));
    assert_eq!(stored(&manager).get("Favorites"), Some(&expected));
}

#[test]
fn move_into_is_idempotent_by_url() {
    let mut manager = manager();
    manager.create_collection("Favorites");
    let item = DragItem::from_video(video(1));

    assert!(manager.move_into(&item, "Favorites"));
    assert!(!manager.move_into(&item, "Favorites"));

    // Same url with a different label is still a duplicate.
    let relabelled = DragItem::from_video(VideoRef::new(video(1).url, "Other"));
    assert!(!manager.move_into(&relabelled, "Favorites"));

    assert_eq!(manager.collection("Favorites"), Some(&[video(1)][..]));
}

#[test]
fn move_into_reserved_or_empty_target_is_noop() {
    let mut manager = manager();
    manager.create_collection("Favorites");
    let before = manager.user_collections().clone();
    let item = DragItem::from_video(VideoRef::new("https://cdn.example.com/new.mp4", "New"));

    assert!(!manager.move_into(&item, ALL_VIDEOS));
    assert!(!manager.move_into(&item, ""));

    assert_eq!(manager.user_collections(), &before);
    assert_eq!(manager.collection(ALL_VIDEOS), Some(media().as_slice()));
}

#[test]
fn move_into_keeps_item_in_source_collection() {
    let mut manager = manager();
    manager.create_collection("A");
    manager.create_collection("B");
    manager.move_into(&DragItem::from_video(video(1)), "A");

    let item = DragItem {
        source_collection: Some("A".to_string()),
        index: Some(0),
        ..DragItem::from_video(video(1))
    };
    assert!(manager.move_into(&item, "B"));

    assert_eq!(manager.collection("A"), Some(&[video(1)][..]));
    assert_eq!(manager.collection("B"), Some(&[video(1)][..]));
}

#[test]
fn move_into_rebuilds_minimal_video_from_identifier() {
    let mut manager = manager();
    manager.create_collection("Favorites");
    let item = DragItem {
        video_id: Some("https://cdn.example.com/9.mp4".to_string()),
        label: Some("Template_9".to_string()),
        ..DragItem::default()
    };

    assert!(manager.move_into(&item, "Favorites"));
    assert_eq!(
        manager.collection("Favorites"),
        Some(&[VideoRef::new("https://cdn.example.com/9.mp4", "Template_9")][..])
    );

    assert!(!manager.move_into(&DragItem::default(), "Favorites"));
}

#[test]
fn move_into_unknown_target_creates_it() {
    let mut manager = manager();
    assert!(manager.move_into(&DragItem::from_video(video(3)), "Later"));
    assert_eq!(manager.collection("Later"), Some(&[video(3)][..]));
}

#[test]
fn reorder_returns_new_order_without_committing() {
    let mut manager = manager();
    manager.create_collection("Favorites");
    for n in 1..=3 {
        manager.move_into(&DragItem::from_video(video(n)), "Favorites");
    }
    let persisted = stored(&manager);

    let reordered = manager.reorder("Favorites", 0, 2).unwrap();
    assert_eq!(reordered, vec![video(2), video(3), video(1)]);
    let reordered = manager.reorder("Favorites", 2, 0).unwrap();
    assert_eq!(reordered, vec![video(3), video(1), video(2)]);

    assert_eq!(
        manager.collection("Favorites"),
        Some(&[video(1), video(2), video(3)][..])
    );
    assert_eq!(stored(&manager), persisted);
}

#[test]
fn reorder_rejects_out_of_bounds_and_unknown_collection() {
    let mut manager = manager();
    manager.create_collection("Favorites");
    manager.move_into(&DragItem::from_video(video(1)), "Favorites");

    assert_eq!(manager.reorder("Favorites", 0, 1), None);
    assert_eq!(manager.reorder("Favorites", 1, 0), None);
    assert_eq!(manager.reorder("Missing", 0, 0), None);
    assert_eq!(manager.reorder("Favorites", 0, 0), Some(vec![video(1)]));
}

#[test]
fn media_sync_overwrites_reserved_only() {
    let mut manager = manager();
    manager.create_collection("Favorites");
    manager.move_into(&DragItem::from_video(video(1)), "Favorites");

    manager.sync_media(vec![video(7)]);

    assert_eq!(manager.collection(ALL_VIDEOS), Some(&[video(7)][..]));
    assert_eq!(manager.collection("Favorites"), Some(&[video(1)][..]));
    assert!(!stored(&manager).contains_key(ALL_VIDEOS));
}

#[test]
fn collections_are_listed_reserved_first_then_in_creation_order() {
    let mut manager = manager();
    manager.create_collection("Zebra");
    manager.create_collection("Apple");
    manager.create_collection("Mango");
    // Recreating resets the contents but keeps the slot.
    manager.move_into(&DragItem::from_video(video(1)), "Zebra");
    manager.create_collection("Zebra");

    let names: Vec<_> = manager.collections().iter().map(|view| view.name).collect();
    assert_eq!(names, vec![ALL_VIDEOS, "Zebra", "Apple", "Mango"]);
    assert_eq!(manager.collection("Zebra"), Some(&[] as &[VideoRef]));

    manager.delete_collection("Apple");
    let names: Vec<_> = manager.collections().iter().map(|view| view.name).collect();
    assert_eq!(names, vec![ALL_VIDEOS, "Zebra", "Mango"]);

    let stored_names: Vec<_> = stored(&manager).keys().cloned().collect();
    assert_eq!(stored_names, vec!["Zebra", "Mango"]);
}

#[test]
fn reorder_follows_drag_source_and_index() {
    let mut manager = manager();
    manager.create_collection("Favorites");
    for n in 1..=3 {
        manager.move_into(&DragItem::from_video(video(n)), "Favorites");
    }

    let dragged = DragItem {
        source_collection: Some("Favorites".to_string()),
        index: Some(0),
        ..DragItem::from_video(video(1))
    };
    assert_eq!(
        manager.reorder_dragged(&dragged, 2),
        Some(vec![video(2), video(3), video(1)])
    );

    let by_position = DragItem {
        source_collection: Some(ALL_VIDEOS.to_string()),
        index: Some(2),
        ..DragItem::default()
    };
    assert_eq!(
        manager.reorder_dragged(&by_position, 0),
        Some(vec![video(3), video(1), video(2)])
    );

    // Stale payloads and payloads without a source are rejected.
    let stale = DragItem {
        index: Some(1),
        ..dragged.clone()
    };
    assert_eq!(manager.reorder_dragged(&stale, 0), None);
    assert_eq!(manager.reorder_dragged(&DragItem::from_video(video(1)), 0), None);
    assert_eq!(
        manager.collection("Favorites"),
        Some(&[video(1), video(2), video(3)][..])
    );
}
