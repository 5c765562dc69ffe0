//! Borrowed views over the members of a store.

use std::iter::FusedIterator;

use crate::{metadata::typesystem::CilTypeRc, value::Value};

/// One member of a [`crate::serialization::SerializationInfo`]
#[derive(Debug, Clone, Copy)]
pub struct SerializationEntry<'a> {
    name: &'a str,
    value: Option<&'a Value>,
    object_type: &'a CilTypeRc,
}

impl<'a> SerializationEntry<'a> {
    pub(crate) fn new(name: &'a str, value: Option<&'a Value>, object_type: &'a CilTypeRc) -> Self {
        SerializationEntry {
            name,
            value,
            object_type,
        }
    }

    /// Member name
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Stored value, `None` if the member was added without one
    #[must_use]
    pub fn value(&self) -> Option<&'a Value> {
        self.value
    }

    /// Declared type of the member
    #[must_use]
    pub fn object_type(&self) -> &'a CilTypeRc {
        self.object_type
    }
}

/// Insertion-ordered iterator over the members of a store.
///
/// The iterator is lazy and borrows the store, so the store cannot change while an
/// enumeration is in progress. A clone starts over from the clone's current position;
/// [`SerializationIter::reset`] rewinds to the first member.
#[derive(Debug, Clone)]
pub struct SerializationIter<'a> {
    names: &'a [String],
    values: &'a [Option<Value>],
    types: &'a [CilTypeRc],
    position: usize,
}

impl<'a> SerializationIter<'a> {
    pub(crate) fn new(
        names: &'a [String],
        values: &'a [Option<Value>],
        types: &'a [CilTypeRc],
    ) -> Self {
        debug_assert!(names.len() == values.len() && names.len() == types.len());
        SerializationIter {
            names,
            values,
            types,
            position: 0,
        }
    }

    /// Rewind to the first member
    pub fn reset(&mut self) {
        self.position = 0;
    }
}

impl<'a> Iterator for SerializationIter<'a> {
    type Item = SerializationEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let position = self.position;
        let name = self.names.get(position)?;
        let value = self.values.get(position)?.as_ref();
        let object_type = self.types.get(position)?;

        self.position += 1;
        Some(SerializationEntry::new(name, value, object_type))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.names.len().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SerializationIter<'_> {}

impl FusedIterator for SerializationIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::CilPrimitiveKind;
    use std::sync::Arc;

    #[test]
    fn test_iter_yields_in_order_and_resets() {
        let names = vec!["a".to_string(), "b".to_string()];
        let values = vec![Some(Value::Int32(1)), None];
        let types = vec![
            CilPrimitiveKind::I4.type_ref(),
            CilPrimitiveKind::Object.type_ref(),
        ];

        let mut iter = SerializationIter::new(&names, &values, &types);
        assert_eq!(iter.len(), 2);

        let first = iter.next().unwrap();
        assert_eq!(first.name(), "a");
        assert_eq!(first.value(), Some(&Value::Int32(1)));
        assert!(Arc::ptr_eq(first.object_type(), &types[0]));

        let restart = iter.clone();
        let second = iter.next().unwrap();
        assert_eq!(second.name(), "b");
        assert!(second.value().is_none());
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());

        assert_eq!(restart.map(|entry| entry.name()).collect::<Vec<_>>(), ["b"]);

        iter.reset();
        assert_eq!(iter.count(), 2);
    }
}
