//! Case-insensitive, visit-tracking reader over one parameter section.

use std::collections::HashSet;

use indexmap::IndexMap;
use rupture_core::ConfigurationError;
use toml::{Table, Value};
use tracing::{debug, warn};

/// Conversion from a raw parameter value.
pub trait FromParameter: Sized {
    /// Human-readable description of the accepted form, for diagnostics.
    const EXPECTED: &'static str;

    /// Convert, or `None` if the value has the wrong shape.
    fn from_parameter(value: &Value) -> Option<Self>;
}

impl FromParameter for f64 {
    const EXPECTED: &'static str = "a number";

    fn from_parameter(value: &Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl FromParameter for i64 {
    const EXPECTED: &'static str = "an integer";

    fn from_parameter(value: &Value) -> Option<Self> {
        value.as_integer()
    }
}

impl FromParameter for u32 {
    const EXPECTED: &'static str = "a non-negative integer";

    fn from_parameter(value: &Value) -> Option<Self> {
        value.as_integer().and_then(|v| u32::try_from(v).ok())
    }
}

impl FromParameter for bool {
    const EXPECTED: &'static str = "a boolean or an integer";

    // Booleans are commonly written as integers in parameter files.
    fn from_parameter(value: &Value) -> Option<Self> {
        match value {
            Value::Boolean(b) => Some(*b),
            Value::Integer(v) => Some(*v > 0),
            _ => None,
        }
    }
}

impl FromParameter for String {
    const EXPECTED: &'static str = "a string";

    fn from_parameter(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl FromParameter for [f64; 3] {
    const EXPECTED: &'static str = "an array of three numbers";

    fn from_parameter(value: &Value) -> Option<Self> {
        let items = value.as_array()?;
        if items.len() != 3 {
            return None;
        }
        let mut out = [0.0; 3];
        for (slot, item) in out.iter_mut().zip(items) {
            *slot = f64::from_parameter(item)?;
        }
        Some(out)
    }
}

/// Reader over a single section of a parameter document.
///
/// Keys are lower-cased on construction and every lookup lower-cases its
/// argument, so matching is case-insensitive. Every key read, marked
/// unused or warned as deprecated counts as visited;
/// [`warn_leftover`](Self::warn_leftover) reports the rest.
#[derive(Debug)]
pub struct ParameterReader {
    section: String,
    node: Table,
    empty: bool,
    visited: HashSet<String>,
}

impl ParameterReader {
    /// Reader over the root of a document.
    pub fn new(root: Table) -> Self {
        Self::with_section("<root>", root, false)
    }

    /// Parse a TOML document and return a reader over its root.
    pub fn parse(document: &str) -> Result<Self, ConfigurationError> {
        let root: Table = document
            .parse()
            .map_err(|e: toml::de::Error| ConfigurationError::Malformed {
                reason: e.to_string(),
            })?;
        Ok(Self::new(root))
    }

    fn with_section(section: &str, node: Table, empty: bool) -> Self {
        let node = node
            .into_iter()
            .map(|(key, value)| (key.to_ascii_lowercase(), value))
            .collect();
        Self {
            section: section.to_owned(),
            node,
            empty,
            visited: HashSet::new(),
        }
    }

    /// Name of the section this reader walks.
    pub fn section(&self) -> &str {
        &self.section
    }

    /// Whether `field` is present.
    pub fn has_field(&self, field: &str) -> bool {
        !self.empty && self.node.contains_key(&field.to_ascii_lowercase())
    }

    /// Raw value of `field`, marking it visited.
    pub fn raw(&mut self, field: &str) -> Option<&Value> {
        let key = field.to_ascii_lowercase();
        if self.empty {
            return None;
        }
        self.visited.insert(key.clone());
        self.node.get(&key)
    }

    /// Read `field`, or fall back to `default` if absent.
    pub fn read_with_default<T: FromParameter>(
        &mut self,
        field: &str,
        default: T,
    ) -> Result<T, ConfigurationError> {
        if self.has_field(field) {
            self.read_unchecked(field)
        } else {
            debug!(
                section = %self.section,
                field,
                "field was not specified, using fallback"
            );
            Ok(default)
        }
    }

    /// Read a required `field`.
    pub fn read_or_fail<T: FromParameter>(
        &mut self,
        field: &str,
        message: &str,
    ) -> Result<T, ConfigurationError> {
        if self.has_field(field) {
            self.read_unchecked(field)
        } else {
            Err(ConfigurationError::MissingField {
                field: field.to_ascii_lowercase(),
                message: message.to_owned(),
            })
        }
    }

    /// Read an integer-coded enumeration and check it against `valid`.
    pub fn read_with_default_code(
        &mut self,
        field: &str,
        default: i64,
        valid: &[i64],
    ) -> Result<i64, ConfigurationError> {
        let value = self.read_with_default(field, default)?;
        if !valid.contains(&value) {
            return Err(ConfigurationError::InvalidEnumValue {
                field: field.to_ascii_lowercase(),
                value: value.to_string(),
            });
        }
        Ok(value)
    }

    /// Read a string-keyed enumeration; the string is matched lower-cased.
    pub fn read_with_default_string_enum<T: Copy>(
        &mut self,
        field: &str,
        default: &str,
        valid: &IndexMap<&'static str, T>,
    ) -> Result<T, ConfigurationError> {
        let value = self
            .read_with_default(field, default.to_owned())?
            .trim()
            .to_ascii_lowercase();
        valid
            .get(value.as_str())
            .copied()
            .ok_or_else(|| ConfigurationError::InvalidEnumValue {
                field: field.to_ascii_lowercase(),
                value,
            })
    }

    /// Mark `field` as consumed elsewhere, whether or not it exists.
    pub fn mark_unused(&mut self, field: &str) {
        debug!(section = %self.section, field, "field is ignored");
        self.visited.insert(field.to_ascii_lowercase());
    }

    /// Mark several fields as consumed elsewhere.
    pub fn mark_unused_all(&mut self, fields: &[&str]) {
        for field in fields {
            self.mark_unused(field);
        }
    }

    /// Warn about each of `fields` that is still present.
    pub fn warn_deprecated(&mut self, fields: &[&str]) {
        for field in fields {
            if self.has_field(field) {
                self.visited.insert(field.to_ascii_lowercase());
                warn!(
                    section = %self.section,
                    field,
                    "field is no longer in use; it may safely be removed"
                );
            }
        }
    }

    /// Keys present in the section that nothing visited.
    pub fn leftover(&self) -> Vec<String> {
        if self.empty {
            return Vec::new();
        }
        self.node
            .keys()
            .filter(|key| !self.visited.contains(*key))
            .cloned()
            .collect()
    }

    /// Warn about every unvisited key and return them.
    pub fn warn_leftover(&self) -> Vec<String> {
        let leftover = self.leftover();
        for field in &leftover {
            warn!(section = %self.section, field = %field, "field is not known");
        }
        leftover
    }

    /// Reader over a nested section; an absent section yields an empty reader.
    pub fn subreader(&mut self, name: &str) -> Result<Self, ConfigurationError> {
        let key = name.to_ascii_lowercase();
        self.visited.insert(key.clone());
        debug!(section = %key, "entering section");
        match self.node.get(&key) {
            Some(Value::Table(table)) if !self.empty => {
                Ok(Self::with_section(&key, table.clone(), false))
            }
            Some(_) if !self.empty => Err(ConfigurationError::InvalidValue {
                field: key,
                reason: "expected a section".to_owned(),
            }),
            _ => {
                debug!(section = %key, "section not found, using an empty reader");
                Ok(Self::with_section(&key, Table::new(), true))
            }
        }
    }

    fn read_unchecked<T: FromParameter>(&mut self, field: &str) -> Result<T, ConfigurationError> {
        let key = field.to_ascii_lowercase();
        self.visited.insert(key.clone());
        debug!(section = %self.section, field = %key, "field was read");
        let value = self
            .node
            .get(&key)
            .ok_or_else(|| ConfigurationError::MissingField {
                field: key.clone(),
                message: "field vanished while reading".to_owned(),
            })?;
        T::from_parameter(value).ok_or_else(|| ConfigurationError::InvalidValue {
            field: key,
            reason: format!("expected {}, got {value}", T::EXPECTED),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(doc: &str) -> ParameterReader {
        ParameterReader::parse(doc).unwrap()
    }

    #[test]
    fn keys_are_case_insensitive() {
        let mut r = reader("EndTime = 3.5\n");
        assert_eq!(r.read_with_default("endtime", 15.0).unwrap(), 3.5);
        let mut r = reader("endtime = 3.5\n");
        assert_eq!(r.read_with_default("EndTime", 15.0).unwrap(), 3.5);
    }

    #[test]
    fn missing_field_uses_default() {
        let mut r = reader("");
        assert_eq!(r.read_with_default("cfl", 0.5).unwrap(), 0.5);
    }

    #[test]
    fn integers_widen_to_floats() {
        let mut r = reader("cfl = 1\n");
        assert_eq!(r.read_with_default("cfl", 0.5).unwrap(), 1.0);
    }

    #[test]
    fn booleans_accept_integers() {
        let mut r = reader("a = 1\nb = 0\nc = true\n");
        assert!(r.read_with_default("a", false).unwrap());
        assert!(!r.read_with_default("b", true).unwrap());
        assert!(r.read_with_default("c", false).unwrap());
    }

    #[test]
    fn wrong_type_is_invalid_value() {
        let mut r = reader("cfl = \"fast\"\n");
        let err = r.read_with_default("cfl", 0.5).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidValue { field, .. } if field == "cfl"));
    }

    #[test]
    fn read_or_fail_reports_missing() {
        let mut r = reader("");
        let err = r.read_or_fail::<String>("meshfile", "No mesh file given.").unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MissingField {
                field: "meshfile".into(),
                message: "No mesh file given.".into()
            }
        );
    }

    #[test]
    fn code_enum_validated() {
        let mut r = reader("format = 7\n");
        let err = r.read_with_default_code("format", 0, &[0, 1]).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidEnumValue { .. }));
        let mut r = reader("format = 1\n");
        assert_eq!(r.read_with_default_code("format", 0, &[0, 1]).unwrap(), 1);
    }

    #[test]
    fn string_enum_is_lowercased() {
        let valid: IndexMap<&'static str, u8> = [("posix", 0), ("hdf5", 1)].into_iter().collect();
        let mut r = reader("backend = \"HDF5\"\n");
        assert_eq!(
            r.read_with_default_string_enum("backend", "posix", &valid)
                .unwrap(),
            1
        );
        let mut r = reader("backend = \"tape\"\n");
        assert!(r
            .read_with_default_string_enum("backend", "posix", &valid)
            .is_err());
    }

    #[test]
    fn vector_parameters() {
        let mut r = reader("origin = [1, 2.5, -3]\nbad = [1, 2]\n");
        assert_eq!(
            r.read_with_default("origin", [0.0; 3]).unwrap(),
            [1.0, 2.5, -3.0]
        );
        assert!(r.read_with_default("bad", [0.0; 3]).is_err());
    }

    #[test]
    fn leftover_tracks_visits() {
        let mut r = reader("used = 1\nunused = 2\nold = 3\nignored = 4\n");
        let _ = r.read_with_default("used", 0i64).unwrap();
        r.warn_deprecated(&["old", "never_present"]);
        r.mark_unused("ignored");
        assert_eq!(r.warn_leftover(), vec!["unused".to_string()]);
    }

    #[test]
    fn absent_subsection_is_empty() {
        let mut r = reader("[output]\nprefix = \"x\"\n");
        let mut sub = r.subreader("equations").unwrap();
        assert!(!sub.has_field("prefix"));
        assert_eq!(sub.read_with_default("tv", 0.1).unwrap(), 0.1);
        assert!(sub.leftover().is_empty());
        let mut out = r.subreader("OUTPUT").unwrap();
        assert_eq!(
            out.read_or_fail::<String>("Prefix", "needed").unwrap(),
            "x"
        );
        assert!(r.leftover().is_empty());
    }

    #[test]
    fn scalar_in_place_of_section_rejected() {
        let mut r = reader("output = 3\n");
        assert!(r.subreader("output").is_err());
    }

    #[test]
    fn malformed_document_rejected() {
        assert!(matches!(
            ParameterReader::parse("this is = = not toml"),
            Err(ConfigurationError::Malformed { .. })
        ));
    }
}
