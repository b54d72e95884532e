use crate::domain::{Item, ItemDraft, ItemId};
use crate::ports::ItemRepository;
use async_trait::async_trait;
use shared::{Error, Result};
use std::path::Path;

const ITEMS_TREE: &str = "items";
const META_TREE: &str = "meta";
const ITEM_SEQUENCE_KEY: &[u8] = b"item_seq";

/// Sled-backed persistent store for items.
/// Ids come from a contiguous sequence starting at 1 and are stored big-endian,
/// so iteration yields items in id order.
#[derive(Clone)]
pub struct SledItemRepository {
    db: sled::Db,
}

impl SledItemRepository {
    /// Open (or create) a database at `path`, creating the parent directory if needed
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Persistence(format!("Failed to create directory: {}", e)))?;
        }

        let db = sled::open(path)
            .map_err(|e| Error::Persistence(format!("Failed to open Sled database: {}", e)))?;

        Ok(Self { db })
    }

    /// In-memory database, discarded on drop
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| Error::Persistence(format!("Failed to open Sled database: {}", e)))?;

        Ok(Self { db })
    }

    fn items_tree(&self) -> Result<sled::Tree> {
        self.db
            .open_tree(ITEMS_TREE)
            .map_err(|e| Error::Persistence(format!("Failed to open items tree: {}", e)))
    }

    fn next_id(&self) -> Result<ItemId> {
        let meta = self
            .db
            .open_tree(META_TREE)
            .map_err(|e| Error::Persistence(format!("Failed to open meta tree: {}", e)))?;

        let next = meta
            .update_and_fetch(ITEM_SEQUENCE_KEY, |current| {
                let last = current.map(decode_id).unwrap_or(0);
                Some((last + 1).to_be_bytes().to_vec())
            })
            .map_err(|e| Error::Persistence(format!("Failed to advance id sequence: {}", e)))?;

        next.as_deref()
            .map(decode_id)
            .ok_or_else(|| Error::Persistence("Id sequence is empty".to_string()))
    }
}

fn decode_id(bytes: &[u8]) -> ItemId {
    let mut buf = [0u8; 8];
    let len = bytes.len().min(8);
    buf[8 - len..].copy_from_slice(&bytes[bytes.len() - len..]);
    u64::from_be_bytes(buf)
}

fn decode_item(bytes: &[u8]) -> Result<Item> {
    serde_json::from_slice(bytes)
        .map_err(|e| Error::Persistence(format!("Failed to deserialize item: {}", e)))
}

#[async_trait]
impl ItemRepository for SledItemRepository {
    async fn insert(&self, draft: ItemDraft) -> Result<Item> {
        let id = self.next_id()?;
        let item = draft.into_item(id);

        let value = serde_json::to_vec(&item)
            .map_err(|e| Error::Persistence(format!("Failed to serialize item: {}", e)))?;

        let items = self.items_tree()?;
        items
            .insert(id.to_be_bytes(), value)
            .map_err(|e| Error::Persistence(format!("Failed to save item: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| Error::Persistence(format!("Failed to flush database: {}", e)))?;

        Ok(item)
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>> {
        let value = self
            .items_tree()?
            .get(id.to_be_bytes())
            .map_err(|e| Error::Persistence(format!("Failed to get item: {}", e)))?;

        value.as_deref().map(decode_item).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Item>> {
        let mut items = Vec::new();

        for result in self.items_tree()?.iter() {
            let (_, value) = result
                .map_err(|e| Error::Persistence(format!("Failed to iterate database: {}", e)))?;
            items.push(decode_item(&value)?);
        }

        Ok(items)
    }
}

impl std::fmt::Debug for SledItemRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledItemRepository")
            .field("size_on_disk", &self.db.size_on_disk().ok())
            .finish()
    }
}
