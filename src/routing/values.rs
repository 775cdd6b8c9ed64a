//! Route value sets.
//!
//! # Responsibilities
//! - Hold matched or target route parameters in insertion order
//! - Tag a value set with a logical route name
//! - Merge two value sets with defined precedence
//!
//! # Design Decisions
//! - The route name lives under a reserved key, apart from ordinary parameters
//! - Merging and name stripping always produce a new set; inputs are untouched
//! - Absent sets are modelled as `Option<RouteValues>`; the free functions
//!   below give them the null-safe semantics call sites rely on

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::routing::error::RouteError;

/// Reserved key carrying the route-name tag.
pub const ROUTE_NAME_KEY: &str = "__RouteName";

/// Ordered mapping from parameter names to values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteValues(Map<String, Value>);

impl RouteValues {
    /// Create an empty value set.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a value set from any serializable map-like value.
    ///
    /// Structs and maps become one entry per field; anything else is rejected.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, RouteError> {
        match serde_json::to_value(value) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(Value::Null) => Ok(Self::new()),
            Ok(other) => Err(RouteError::InvalidValues(format!("got {other}"))),
            Err(e) => Err(RouteError::InvalidValues(e.to_string())),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Value of `key` rendered as a URL parameter.
    ///
    /// Strings are returned verbatim, numbers and booleans in their display
    /// form. Nulls, arrays and objects have no parameter form.
    pub fn param(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// The route-name tag, if present and string-typed.
    pub fn route_name(&self) -> Option<&str> {
        self.0.get(ROUTE_NAME_KEY)?.as_str()
    }

    /// Set the route-name tag in place. Repeated calls with the same name
    /// leave the set unchanged.
    pub fn set_route_name(&mut self, name: &str) {
        self.0
            .insert(ROUTE_NAME_KEY.to_string(), Value::String(name.to_string()));
    }

    /// A copy of this set without the route-name tag.
    pub fn without_route_name(&self) -> Self {
        self.0
            .iter()
            .filter(|(key, _)| key.as_str() != ROUTE_NAME_KEY)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// A new set holding every entry of `self`, overwritten by `overrides`
    /// on key collision.
    pub fn merged_with(&self, overrides: &RouteValues) -> Self {
        let mut merged = self.clone();
        for (key, value) in overrides.iter() {
            merged.0.insert(key.clone(), value.clone());
        }
        merged
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RouteValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a RouteValues {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Set the route-name tag on a possibly absent set. An absent set stays absent.
pub fn set_route_name(values: Option<RouteValues>, name: &str) -> Option<RouteValues> {
    values.map(|mut values| {
        values.set_route_name(name);
        values
    })
}

/// The route-name tag of a possibly absent set.
pub fn route_name(values: Option<&RouteValues>) -> Option<&str> {
    values?.route_name()
}

/// A new set equal to `values` minus the route-name tag.
pub fn without_route_name(values: &RouteValues) -> RouteValues {
    values.without_route_name()
}

/// Merge `overrides` over `base`. An absent base yields a copy of `overrides`.
pub fn merge(base: Option<&RouteValues>, overrides: &RouteValues) -> RouteValues {
    match base {
        Some(base) => base.merged_with(overrides),
        None => overrides.clone(),
    }
}

/// Conversion of key/value-bearing shapes into [`RouteValues`].
pub trait IntoRouteValues {
    fn into_route_values(self) -> RouteValues;
}

impl IntoRouteValues for RouteValues {
    fn into_route_values(self) -> RouteValues {
        self
    }
}

impl IntoRouteValues for Map<String, Value> {
    fn into_route_values(self) -> RouteValues {
        RouteValues(self)
    }
}

impl<K, V, S> IntoRouteValues for HashMap<K, V, S>
where
    K: Into<String>,
    V: Into<Value>,
    S: BuildHasher,
{
    fn into_route_values(self) -> RouteValues {
        self.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Value>> IntoRouteValues for BTreeMap<K, V> {
    fn into_route_values(self) -> RouteValues {
        self.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Value>> IntoRouteValues for Vec<(K, V)> {
    fn into_route_values(self) -> RouteValues {
        self.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> IntoRouteValues for [(K, V); N] {
    fn into_route_values(self) -> RouteValues {
        self.into_iter().collect()
    }
}

/// Normalize an optional shape into route values. `None` stays `None` and a
/// `RouteValues` passes through unchanged.
pub fn to_route_values<T: IntoRouteValues>(values: Option<T>) -> Option<RouteValues> {
    values.map(IntoRouteValues::into_route_values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_overrides_win() {
        let base = RouteValues::new().with("id", "1").with("lang", "en");
        let overrides = RouteValues::new().with("id", "5").with("page", 2);

        let merged = merge(Some(&base), &overrides);

        assert_eq!(merged.get("id"), Some(&json!("5")));
        assert_eq!(merged.get("lang"), Some(&json!("en")));
        assert_eq!(merged.get("page"), Some(&json!(2)));
        assert_eq!(merged.len(), 3);

        // Inputs untouched
        assert_eq!(base.get("id"), Some(&json!("1")));
        assert!(!base.contains_key("page"));
        assert_eq!(overrides.len(), 2);
    }

    #[test]
    fn test_merge_absent_base_copies_overrides() {
        let overrides = RouteValues::new().with("id", "5");
        let merged = merge(None, &overrides);
        assert_eq!(merged, overrides);
    }

    #[test]
    fn test_merge_keeps_base_order() {
        let base = RouteValues::new().with("a", 1).with("b", 2);
        let overrides = RouteValues::new().with("c", 3).with("a", 9);
        let keys: Vec<_> = base.merged_with(&overrides).iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_route_name_roundtrip() {
        let values = RouteValues::new().with("id", "5");
        let tagged = set_route_name(Some(values.clone()), "item").unwrap();
        assert_eq!(route_name(Some(&tagged)), Some("item"));

        let again = set_route_name(Some(tagged.clone()), "item").unwrap();
        assert_eq!(again, tagged);

        let stripped = without_route_name(&tagged);
        assert!(!stripped.contains_key(ROUTE_NAME_KEY));
        assert_eq!(stripped, values);
        // The tagged set still carries its name.
        assert_eq!(tagged.route_name(), Some("item"));
    }

    #[test]
    fn test_route_name_absent_store() {
        assert_eq!(set_route_name(None, "n"), None);
        assert_eq!(route_name(set_route_name(None, "n").as_ref()), None);
        assert_eq!(route_name(Some(&RouteValues::new())), None);
    }

    #[test]
    fn test_route_name_non_string_value() {
        let values = RouteValues::new().with(ROUTE_NAME_KEY, 42);
        assert_eq!(values.route_name(), None);
    }

    #[test]
    fn test_to_route_values() {
        assert_eq!(to_route_values::<RouteValues>(None), None);

        let canonical = RouteValues::new().with("id", "5");
        assert_eq!(to_route_values(Some(canonical.clone())), Some(canonical));

        let from_pairs = to_route_values(Some([("lang", "en")])).unwrap();
        assert_eq!(from_pairs.param("lang").as_deref(), Some("en"));

        let mut map = HashMap::new();
        map.insert("page".to_string(), 3);
        let from_map = to_route_values(Some(map)).unwrap();
        assert_eq!(from_map.param("page").as_deref(), Some("3"));
    }

    #[test]
    fn test_from_serialize() {
        #[derive(Serialize)]
        struct Target {
            category: &'static str,
            page: u32,
        }

        let values = RouteValues::from_serialize(&Target { category: "books", page: 2 }).unwrap();
        assert_eq!(values.param("category").as_deref(), Some("books"));
        assert_eq!(values.param("page").as_deref(), Some("2"));

        assert!(RouteValues::from_serialize(&"plain").is_err());
        assert!(RouteValues::from_serialize(&()).unwrap().is_empty());
    }

    #[test]
    fn test_param_forms() {
        let values = RouteValues::new()
            .with("s", "x")
            .with("b", true)
            .with("n", Value::Null)
            .with("arr", json!([1, 2]));
        assert_eq!(values.param("s").as_deref(), Some("x"));
        assert_eq!(values.param("b").as_deref(), Some("true"));
        assert_eq!(values.param("n"), None);
        assert_eq!(values.param("arr"), None);
        assert_eq!(values.param("missing"), None);
    }
}
