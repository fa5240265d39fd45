use crate::error::Result;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Layout configuration as a JSON object.
///
/// The top-level `algorithm` key names the layout; every layout reads its options from the
/// section of the same name, e.g. `{"algorithm": "radial", "radial": {"layerThickness": 80}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig(Value);

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl LayoutConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(Self(serde_json::from_str(text)?))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn as_value_mut(&mut self) -> &mut Value {
        &mut self.0
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get(dotted_path)?.as_str()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.get(dotted_path)?.as_bool()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.get(dotted_path)?.as_f64()
    }

    /// Deserializes the object at `dotted_path` into an options struct.
    ///
    /// A missing or `null` section yields `T::default()`; keys absent from the section keep
    /// their defaults because every options struct is `#[serde(default)]`.
    pub fn section<T>(&self, dotted_path: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        match self.get(dotted_path) {
            None | Some(Value::Null) => Ok(T::default()),
            Some(value) => Ok(T::deserialize(value)?),
        }
    }

    /// Sets the value at `dotted_path`, creating (or replacing non-object) intermediate
    /// sections.
    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        let segments: Vec<&str> = dotted_path.split('.').collect();
        insert_at(&mut self.0, &segments, value);
    }

    /// Merges `other` into this config; objects merge key by key, anything else replaces.
    pub fn deep_merge(&mut self, other: &Value) {
        merge_into(&mut self.0, other);
    }
}

fn insert_at(target: &mut Value, segments: &[&str], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        *target = value;
        return;
    };
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    let Value::Object(map) = target else {
        return;
    };
    if rest.is_empty() {
        map.insert((*first).to_string(), value);
    } else {
        let section = map.entry(*first).or_insert(Value::Null);
        insert_at(section, rest, value);
    }
}

fn merge_into(base: &mut Value, incoming: &Value) {
    if let (Some(base_map), Some(in_map)) = (base.as_object_mut(), incoming.as_object()) {
        for (key, in_value) in in_map {
            match base_map.get_mut(key) {
                Some(slot) => merge_into(slot, in_value),
                None => {
                    base_map.insert(key.clone(), in_value.clone());
                }
            }
        }
        return;
    }
    *base = incoming.clone();
}
