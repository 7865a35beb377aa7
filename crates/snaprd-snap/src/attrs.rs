//! Attribute values carried by plugs and slots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A value attached to a plug or slot attribute.
///
/// Attributes are free-form trees of scalars, lists, and string-keyed
/// mappings. Floats are deliberately not representable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// A boolean scalar.
    Bool(bool),
    /// An integer scalar.
    Int(i64),
    /// A string scalar.
    Str(String),
    /// A list of values.
    List(Vec<AttrValue>),
    /// A string-keyed mapping of values.
    Map(BTreeMap<String, AttrValue>),
}

impl AttrValue {
    /// The boolean value, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer value, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The list elements, if this is a list.
    pub fn as_list(&self) -> Option<&[AttrValue]> {
        match self {
            AttrValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// The mapping entries, if this is a mapping.
    pub fn as_map(&self) -> Option<&BTreeMap<String, AttrValue>> {
        match self {
            AttrValue::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        AttrValue::Int(n)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Str(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_variant() {
        assert_eq!(AttrValue::from(true).as_bool(), Some(true));
        assert_eq!(AttrValue::from(7).as_int(), Some(7));
        assert_eq!(AttrValue::from("tmp").as_str(), Some("tmp"));
        assert_eq!(AttrValue::from("tmp").as_int(), None);
    }

    #[test]
    fn yaml_scalars_keep_their_type() {
        let v: AttrValue = serde_yaml::from_str("true").unwrap();
        assert_eq!(v, AttrValue::Bool(true));
        let v: AttrValue = serde_yaml::from_str("42").unwrap();
        assert_eq!(v, AttrValue::Int(42));
        let v: AttrValue = serde_yaml::from_str("hello").unwrap();
        assert_eq!(v, AttrValue::Str("hello".into()));
    }

    #[test]
    fn yaml_nested_tree() {
        let v: AttrValue = serde_yaml::from_str("{paths: [/usr, /lib], count: 2}").unwrap();
        let map = v.as_map().unwrap();
        assert_eq!(map["count"].as_int(), Some(2));
        let paths = map["paths"].as_list().unwrap();
        assert_eq!(paths[0].as_str(), Some("/usr"));
    }
}
