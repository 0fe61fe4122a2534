use crate::objects::Object;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dictionary {
    entries: HashMap<String, Object>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Object>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Builder form of [`Dictionary::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Object>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Object> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Object> {
        self.entries.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Object> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Object)> {
        self.entries.iter()
    }

    pub fn get_dict(&self, key: &str) -> Option<&Dictionary> {
        self.get(key).and_then(Object::as_dict)
    }

    pub fn get_name(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Object::as_name)
    }
}

impl FromIterator<(String, Object)> for Dictionary {
    fn from_iter<T: IntoIterator<Item = (String, Object)>>(iter: T) -> Self {
        let mut dict = Dictionary::new();
        for (key, value) in iter {
            dict.set(key, value);
        }
        dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dictionary() {
        let dict = Dictionary::new();
        assert!(dict.is_empty());
        assert_eq!(dict.len(), 0);
    }

    #[test]
    fn test_set_and_get() {
        let mut dict = Dictionary::new();
        dict.set("Title", "Intro");
        dict.set("Count", 3);

        assert_eq!(dict.get("Title"), Some(&Object::String("Intro".to_string())));
        assert_eq!(dict.get("Count"), Some(&Object::Integer(3)));
        assert_eq!(dict.get("Missing"), None);
    }

    #[test]
    fn test_builder_and_typed_getters() {
        let action = Dictionary::new()
            .with("S", Object::name("GoTo"))
            .with("D", "section.2");
        let annot = Dictionary::new().with("A", action.clone());

        assert_eq!(annot.get_dict("A"), Some(&action));
        assert_eq!(action.get_name("S"), Some("GoTo"));
        assert_eq!(action.get_name("D"), None);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut dict = Dictionary::new();
        dict.set("Annots", Object::Array(vec![]));
        dict.set("Contents", Object::Null);

        assert_eq!(dict.remove("Annots"), Some(Object::Array(vec![])));
        assert!(!dict.contains_key("Annots"));
        dict.clear();
        assert!(dict.is_empty());
    }

    #[test]
    fn test_from_iterator() {
        let dict: Dictionary = vec![
            ("Type".to_string(), Object::name("Page")),
            ("Rotate".to_string(), Object::Integer(90)),
        ]
        .into_iter()
        .collect();

        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get_name("Type"), Some("Page"));
    }
}
