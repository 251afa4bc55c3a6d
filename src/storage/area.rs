use anyhow::Result;
use std::sync::Arc;

/// Object-safe key/value storage area (DOM's Storage).
pub trait StorageArea: Send + Sync {
    /// Retrieves the value associated with the given key, or `None` if not found.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Sets the value for the given key, overwriting any existing value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the item with the given key.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Clears all items in the storage area.
    fn clear(&self) -> Result<()>;

    /// Returns the number of items in the storage area.
    fn len(&self) -> usize;

    /// Returns true when the area holds no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a vector of all keys in the storage area.
    fn keys(&self) -> Vec<String>;
}

/// Store for localStorage-like areas (one area per origin).
pub trait LocalStore: Send + Sync {
    /// Retrieves the storage area for the given origin.
    fn area(&self, origin: &url::Origin) -> Result<Arc<dyn StorageArea>>;
}

/// Checks the basic [`StorageArea`] contract against any backend.
#[cfg(test)]
pub(crate) fn assert_area_contract(area: &Arc<dyn StorageArea>) {
    // starts empty
    assert_eq!(area.len(), 0);
    assert!(area.is_empty());
    assert!(area.get_item("missing").is_none());

    // set + get
    area.set_item("a", "1").unwrap();
    area.set_item("b", "2").unwrap();
    assert_eq!(area.len(), 2);
    assert_eq!(area.get_item("a").as_deref(), Some("1"));
    assert_eq!(area.get_item("b").as_deref(), Some("2"));

    // overwrite keeps len()
    area.set_item("a", "ONE").unwrap();
    assert_eq!(area.len(), 2);
    assert_eq!(area.get_item("a").as_deref(), Some("ONE"));

    let mut keys = area.keys();
    keys.sort();
    assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);

    // remove
    area.remove_item("b").unwrap();
    assert_eq!(area.len(), 1);
    assert!(area.get_item("b").is_none());

    // removing a missing key is fine
    area.remove_item("nope").unwrap();

    // clear
    area.clear().unwrap();
    assert_eq!(area.len(), 0);
    assert!(area.keys().is_empty());
}
