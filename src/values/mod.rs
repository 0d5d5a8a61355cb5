//! Shared values bag, attribute values, and the well-known attribute keys
//! seeded into every dependency graph.

mod ambient;

pub use ambient::{PdfConfig, RequestHeaders, Template};

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

/// Reserved input name signalling that a processor consumes the whole bag.
pub const VALUES_KEY: &str = "values";
/// Working directory for the current print task.
pub const TASK_DIRECTORY_KEY: &str = "taskDirectory";
/// Handle to the config-resolving request factory.
pub const CLIENT_HTTP_REQUEST_FACTORY_KEY: &str = "clientHttpRequestFactory";
/// The active report template.
pub const TEMPLATE_KEY: &str = "template";
/// PDF metadata configuration.
pub const PDF_CONFIG_KEY: &str = "pdfConfig";
/// Directory holding compiled sub-reports.
pub const SUBREPORT_DIR_KEY: &str = "subReportDir";
/// Requested output format (pdf, png, ...).
pub const OUTPUT_FORMAT_KEY: &str = "outputFormat";
/// Headers forwarded from the originating print request.
pub const REQUEST_HEADERS_KEY: &str = "requestHeaders";

/// Type tag for a named value flowing between processors.
///
/// Two tags are compatible when they identify the same Rust type. The
/// builder phrases compatibility as `is_assignable_from` so the dependency
/// rules read the same way they are documented.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueKind {
    id: TypeId,
    name: &'static str,
}

impl ValueKind {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Full type path, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Short type name without the module path.
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }

    pub fn is_assignable_from(&self, other: &ValueKind) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueKind({})", self.short_name())
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// A named, typed value supplied externally and visible to processors.
#[derive(Clone)]
pub struct Attribute {
    kind: ValueKind,
    value: Arc<dyn Any + Send + Sync>,
}

impl Attribute {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            kind: ValueKind::of::<T>(),
            value: Arc::new(value),
        }
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.value).downcast::<T>().ok()
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute").field("kind", &self.kind).finish()
    }
}

/// The values bag shared by all processors of one print task.
///
/// Backed by a concurrent map so processors running on different workers can
/// read their inputs and publish their outputs without an outer lock.
#[derive(Default)]
pub struct Values {
    entries: DashMap<String, Attribute>,
}

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_attributes(attributes: HashMap<String, Attribute>) -> Self {
        let values = Self::new();
        for (name, attribute) in attributes {
            values.entries.insert(name, attribute);
        }
        values
    }

    pub fn put<T: Any + Send + Sync>(&self, name: &str, value: T) {
        self.entries.insert(name.to_string(), Attribute::new(value));
    }

    pub fn put_attribute(&self, name: &str, attribute: Attribute) {
        self.entries.insert(name.to_string(), attribute);
    }

    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.entries.get(name).and_then(|entry| entry.value().downcast::<T>())
    }

    pub fn get_attribute(&self, name: &str) -> Option<Attribute> {
        self.entries.get(name).map(|entry| entry.value().clone())
    }

    pub fn kind_of(&self, name: &str) -> Option<ValueKind> {
        self.entries.get(name).map(|entry| entry.value().kind())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Values {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys = self.keys();
        keys.sort();
        f.debug_struct("Values").field("keys", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_kind_equality_is_assignability() {
        let a = ValueKind::of::<String>();
        let b = ValueKind::of::<String>();
        let c = ValueKind::of::<i32>();

        assert!(a.is_assignable_from(&b));
        assert!(!a.is_assignable_from(&c));
    }

    #[test]
    fn value_kind_short_name_strips_path() {
        assert_eq!(ValueKind::of::<String>().short_name(), "String");
    }

    #[test]
    fn attribute_downcast_roundtrip() {
        let attribute = Attribute::new("hello".to_string());
        assert_eq!(attribute.kind(), ValueKind::of::<String>());
        assert_eq!(*attribute.downcast::<String>().unwrap(), "hello");
        assert!(attribute.downcast::<i32>().is_none());
    }

    #[test]
    fn values_typed_access() {
        let values = Values::new();
        values.put("width", 640_i32);
        values.put("title", "overview map".to_string());

        assert_eq!(*values.get::<i32>("width").unwrap(), 640);
        assert_eq!(*values.get::<String>("title").unwrap(), "overview map");
        assert!(values.get::<String>("width").is_none());
        assert_eq!(values.kind_of("width"), Some(ValueKind::of::<i32>()));
        assert!(values.kind_of("missing").is_none());
    }
}
