use std::collections::HashMap;

/// Field-to-value map. Insertion order is not observable.
#[derive(Debug, Clone, Default)]
pub struct Hash {
    fields: HashMap<String, Vec<u8>>,
}

impl Hash {
    pub fn new() -> Self {
        Hash::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&Vec<u8>> {
        self.fields.get(field)
    }

    /// Set a field. Returns true if the field did not exist before.
    pub fn set(&mut self, field: String, value: Vec<u8>) -> bool {
        self.fields.insert(field, value).is_none()
    }

    /// Remove a field. Returns true if it existed.
    pub fn remove(&mut self, field: &str) -> bool {
        self.fields.remove(field).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<u8>)> {
        self.fields.iter()
    }
}
