//! Type-directed merge of a YAML document onto the current state of a value.
//!
//! The destination's serialized form and the incoming document are walked
//! side by side while the destination type's `Deserialize` impl drives the
//! traversal, so a `null` in the document can mean "clear" for options,
//! sequences and maps while leaving plain scalars and structs alone.

use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, Visitor};
use serde_yaml::{Error, Mapping, Value};

/// One node of the merge: what the document says, and what was there before.
///
/// `None` means the key does not appear on that side at all.
pub(crate) struct Overlay {
    document: Option<Value>,
    current: Option<Value>,
}

impl Overlay {
    pub(crate) fn new(document: Value, current: Value) -> Self {
        Self {
            document: Some(document),
            current: Some(current),
        }
    }

    /// The document's value unless it is missing or null, else the current one.
    fn resolved(self) -> Value {
        match self.document {
            Some(value) if !value.is_null() => value,
            _ => self.current.unwrap_or(Value::Null),
        }
    }
}

/// Mapping entries of `current` updated key by key from `document`, followed
/// by the keys only the document has.
fn merged_entries(mut document: Mapping, current: Option<Value>) -> OverlayMap {
    let mut entries = Vec::with_capacity(document.len());
    if let Some(Value::Mapping(current)) = current {
        for (key, value) in current {
            let incoming = document.remove(&key);
            entries.push((
                key,
                Overlay {
                    document: incoming,
                    current: Some(value),
                },
            ));
        }
    }
    for (key, value) in document {
        entries.push((
            key,
            Overlay {
                document: Some(value),
                current: None,
            },
        ));
    }
    OverlayMap {
        entries: entries.into_iter(),
        value: None,
    }
}

macro_rules! deserialize_resolved {
    ($($method:ident)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
                self.resolved().$method(visitor)
            }
        )*
    };
}

impl<'de> Deserializer<'de> for Overlay {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        let Self { document, current } = self;
        match document {
            Some(Value::Mapping(document)) if matches!(current, Some(Value::Mapping(_))) => {
                visitor.visit_map(merged_entries(document, current))
            }
            Some(value) => value.deserialize_any(visitor),
            None => current.unwrap_or(Value::Null).deserialize_any(visitor),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        let Self { document, current } = self;
        match document {
            Some(Value::Null) => visitor.visit_none(),
            Some(value) => visitor.visit_some(Self {
                document: Some(value),
                current: current.filter(|value| !value.is_null()),
            }),
            None => match current {
                None | Some(Value::Null) => visitor.visit_none(),
                Some(value) => visitor.visit_some(value),
            },
        }
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        let Self { document, current } = self;
        match document {
            Some(value) => value.deserialize_seq(visitor),
            None => current.unwrap_or(Value::Null).deserialize_seq(visitor),
        }
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        let Self { document, current } = self;
        match document {
            Some(Value::Mapping(document)) => visitor.visit_map(merged_entries(document, current)),
            Some(value) => value.deserialize_map(visitor),
            None => current.unwrap_or(Value::Null).deserialize_map(visitor),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        let Self { document, current } = self;
        match document {
            Some(Value::Mapping(document)) => visitor.visit_map(merged_entries(document, current)),
            None | Some(Value::Null) => {
                current
                    .unwrap_or(Value::Null)
                    .deserialize_struct(name, fields, visitor)
            }
            Some(value) => value.deserialize_struct(name, fields, visitor),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value, Error> {
        self.resolved().deserialize_tuple(len, visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, Error> {
        self.resolved().deserialize_tuple_struct(name, len, visitor)
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        self.resolved().deserialize_unit_struct(name, visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        self.resolved().deserialize_enum(name, variants, visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_unit()
    }

    deserialize_resolved! {
        deserialize_bool
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64 deserialize_i128
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64 deserialize_u128
        deserialize_f32 deserialize_f64
        deserialize_char deserialize_str deserialize_string
        deserialize_bytes deserialize_byte_buf
        deserialize_unit deserialize_identifier
    }
}

struct OverlayMap {
    entries: std::vec::IntoIter<(Value, Overlay)>,
    value: Option<Overlay>,
}

impl<'de> MapAccess<'de> for OverlayMap {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, Error> {
        match self.entries.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(key).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<S: DeserializeSeed<'de>>(&mut self, seed: S) -> Result<S::Value, Error> {
        let value = self
            .value
            .take()
            .ok_or_else(|| <Error as de::Error>::custom("map value requested before its key"))?;
        seed.deserialize(value)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}
