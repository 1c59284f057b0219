//! Reel core: collection bookkeeping, render models, and the pure state
//! machine behind the create/download control.
mod collections;
mod effect;
mod msg;
mod render;
mod state;
mod storage;
mod update;
mod video;
mod view_model;

pub use collections::{
    load_user_collections, CollectionManager, CollectionView, PersistenceCorrupt,
    UserCollections, ALL_VIDEOS,
};
pub use effect::Effect;
pub use msg::{DownloadSlot, Msg};
pub use render::{format_from_key, AdditionalRender, RenderJob, RenderProgress, RenderStatus};
pub use state::{AppState, SessionState};
pub use storage::{
    load_user_id, KeyValueStore, MemoryStore, StoreError, COLLECTIONS_KEY, USER_ID_KEY,
};
pub use update::update;
pub use video::{DragItem, VideoRef};
pub use view_model::{AppViewModel, DownloadButtonView};
