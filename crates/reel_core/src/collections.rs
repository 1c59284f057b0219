//! Named, ordered collections of videos over an externally supplied full set.
//!
//! The reserved [`ALL_VIDEOS`] collection is owned by the media source and is
//! only ever replaced wholesale. Every other collection belongs to the user and
//! is written to the injected store after each mutation. The two are kept in
//! separate maps and only merged when read.

use indexmap::IndexMap;
use reel_logging::{reel_debug, reel_error, reel_info, reel_warn};
use thiserror::Error;

use crate::storage::{KeyValueStore, COLLECTIONS_KEY};
use crate::video::{DragItem, VideoRef};

/// Name of the externally owned collection holding every video.
pub const ALL_VIDEOS: &str = "All Videos";

/// User collections in creation order. Recreating a name keeps its slot.
pub type UserCollections = IndexMap<String, Vec<VideoRef>>;

#[derive(Debug, Error)]
pub enum PersistenceCorrupt {
    #[error("stored collections could not be read: {0}")]
    Unreadable(String),
    #[error("stored collections are not valid: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Read-only view of one collection, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionView<'a> {
    pub name: &'a str,
    pub videos: &'a [VideoRef],
}

impl CollectionView<'_> {
    pub fn is_reserved(&self) -> bool {
        self.name == ALL_VIDEOS
    }
}

pub struct CollectionManager<S: KeyValueStore> {
    store: S,
    all_videos: Vec<VideoRef>,
    user: UserCollections,
}

impl<S: KeyValueStore> CollectionManager<S> {
    /// Hydrates user collections from `store`; unreadable data starts empty.
    pub fn new(store: S, media: Vec<VideoRef>) -> Self {
        let user = match load_user_collections(&store) {
            Ok(user) => user,
            Err(err) => {
                reel_warn!("Ignoring stored collections: {}", err);
                UserCollections::new()
            }
        };
        reel_info!(
            "Loaded {} user collections, {} videos in {:?}",
            user.len(),
            media.len(),
            ALL_VIDEOS
        );
        Self {
            store,
            all_videos: media,
            user,
        }
    }

    /// Replaces the reserved collection with a fresh copy of the source.
    pub fn sync_media(&mut self, media: Vec<VideoRef>) {
        reel_debug!("Media source updated: {} videos", media.len());
        self.all_videos = media;
    }

    /// Creates an empty collection. An existing user collection with the
    /// same name is reset to empty.
    pub fn create_collection(&mut self, name: &str) -> bool {
        if name.trim().is_empty() || name == ALL_VIDEOS {
            return false;
        }
        self.user.insert(name.to_string(), Vec::new());
        self.persist();
        true
    }

    pub fn delete_collection(&mut self, name: &str) -> bool {
        if name == ALL_VIDEOS {
            return false;
        }
        let removed = self.user.shift_remove(name).is_some();
        self.persist();
        removed
    }

    /// Appends the dragged video to `target`. The source collection keeps
    /// its copy. Videos already present (by url) are skipped.
    pub fn move_into(&mut self, item: &DragItem, target: &str) -> bool {
        if target.is_empty() || target == ALL_VIDEOS {
            return false;
        }
        let Some(video) = item.resolve() else {
            return false;
        };

        let videos = self.user.entry(target.to_string()).or_default();
        if videos.iter().any(|existing| existing.url == video.url) {
            return false;
        }
        reel_debug!("Adding {} to collection {:?}", video.url, target);
        videos.push(video);
        self.persist();
        true
    }

    /// Order of `name` with the element at `from` moved to `to`.
    ///
    /// The result is not written back to the collection or the store.
    pub fn reorder(&self, name: &str, from: usize, to: usize) -> Option<Vec<VideoRef>> {
        let videos = self.collection(name)?;
        if from >= videos.len() || to >= videos.len() {
            return None;
        }
        let mut reordered = videos.to_vec();
        let moved = reordered.remove(from);
        reordered.insert(to, moved);
        Some(reordered)
    }

    /// [`Self::reorder`] driven by a drag payload: the item leaves its
    /// `source_collection` at `index` and lands at `to` in the same collection.
    pub fn reorder_dragged(&self, item: &DragItem, to: usize) -> Option<Vec<VideoRef>> {
        let source = item.source_collection.as_deref()?;
        let from = item.index?;
        if let Some(video) = item.resolve() {
            // A payload that names a video must match what sits at `index`.
            if self.collection(source)?.get(from)?.url != video.url {
                return None;
            }
        }
        self.reorder(source, from, to)
    }

    pub fn collection(&self, name: &str) -> Option<&[VideoRef]> {
        if name == ALL_VIDEOS {
            return Some(&self.all_videos);
        }
        self.user.get(name).map(Vec::as_slice)
    }

    /// All collections, reserved one first, then user collections in creation order.
    pub fn collections(&self) -> Vec<CollectionView<'_>> {
        let mut views = Vec::with_capacity(self.user.len() + 1);
        views.push(CollectionView {
            name: ALL_VIDEOS,
            videos: &self.all_videos,
        });
        views.extend(self.user.iter().map(|(name, videos)| CollectionView {
            name,
            videos,
        }));
        views
    }

    pub fn user_collections(&self) -> &UserCollections {
        &self.user
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn persist(&mut self) {
        let content = match serde_json::to_string(&self.user) {
            Ok(content) => content,
            Err(err) => {
                reel_error!("Failed to serialize collections: {}", err);
                return;
            }
        };
        match self.store.set(COLLECTIONS_KEY, &content) {
            Ok(()) => reel_debug!("Persisted {} user collections", self.user.len()),
            Err(err) => reel_error!("Failed to persist collections: {}", err),
        }
    }
}

/// Reads the persisted user collections. A missing entry is an empty mapping.
pub fn load_user_collections(
    store: &dyn KeyValueStore,
) -> Result<UserCollections, PersistenceCorrupt> {
    let raw = store
        .get(COLLECTIONS_KEY)
        .map_err(|err| PersistenceCorrupt::Unreadable(err.to_string()))?;
    let Some(raw) = raw else {
        return Ok(UserCollections::new());
    };
    if raw.trim().is_empty() {
        return Ok(UserCollections::new());
    }
    let mut user: UserCollections = serde_json::from_str(&raw)?;
    // The reserved collection never comes from storage.
    user.shift_remove(ALL_VIDEOS);
    Ok(user)
}
