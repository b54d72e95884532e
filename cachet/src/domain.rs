use serde::{Deserialize, Serialize};
use std::fmt;

pub type ItemId = u64;

/// Persisted entity. Owned by the `ItemRepository`; the id is assigned on insert.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub price: u32,
    pub stock: u32,
}

/// An item that has not been stored yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: u32,
    #[serde(default)]
    pub stock: u32,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: u32, stock: u32) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
            stock,
        }
    }

    pub fn into_item(self, id: ItemId) -> Item {
        Item {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
        }
    }
}

/// Transfer shape of an `Item`. The only shape ever placed in a cache store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDto {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub price: u32,
    pub stock: u32,
}

impl From<&Item> for ItemDto {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            description: item.description.clone(),
            price: item.price,
            stock: item.stock,
        }
    }
}

impl From<Item> for ItemDto {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            price: item.price,
            stock: item.stock,
        }
    }
}

impl From<ItemDto> for Item {
    fn from(dto: ItemDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            description: dto.description,
            price: dto.price,
            stock: dto.stock,
        }
    }
}

/// Logical key space of a cache entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Single items, keyed by id. Shared by every policy that caches one item.
    Item,
    /// The list snapshot returned by `read_all`.
    ItemList,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Item => "item",
            Namespace::ItemList => "item-list",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub namespace: Namespace,
    pub id: String,
}

impl CacheKey {
    const ALL: &'static str = "all";

    pub fn item(id: ItemId) -> Self {
        Self {
            namespace: Namespace::Item,
            id: id.to_string(),
        }
    }

    pub fn item_list() -> Self {
        Self {
            namespace: Namespace::ItemList,
            id: Self::ALL.to_string(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.namespace.as_str(), self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dto_copies_every_field() {
        let item = ItemDraft::new("pen", "blue", 500, 10).into_item(1);
        let dto = ItemDto::from(&item);
        assert_eq!(dto.id, 1);
        assert_eq!(dto.name, "pen");
        assert_eq!(dto.description, "blue");
        assert_eq!(dto.price, 500);
        assert_eq!(dto.stock, 10);
        assert_eq!(Item::from(dto), item);
    }

    #[test]
    fn keys_are_namespaced() {
        assert_eq!(CacheKey::item(7).to_string(), "item::7");
        assert_eq!(CacheKey::item_list().to_string(), "item-list::all");
        assert_ne!(CacheKey::item(1), CacheKey::item_list());
    }

    #[test]
    fn draft_defaults_optional_fields() {
        let draft: ItemDraft = serde_json::from_str(r#"{"name":"pen"}"#).unwrap();
        assert_eq!(draft, ItemDraft::new("pen", "", 0, 0));
    }
}
