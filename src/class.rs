//! Traversal classes.
//!
//! Every [`HashAppend`] implementation declares which strategy it was
//! resolved to. Derived impls get their class from the resolver in
//! `shapehash-macros`; hand-written impls state it themselves.
//!
//! # Priority
//!
//! A type may structurally qualify for several classes (a struct can be
//! both iterable and a plain record). The resolver always picks the first
//! match in this order:
//!
//! ```text
//! CustomMember > CustomFreeFunction > Sequence > Product > PlainData
//! ```
//!
//! `Scalar` never competes: scalars have no parts to traverse.
//!
//! [`HashAppend`]: crate::HashAppend

use std::fmt;

use crate::HashAppend;

/// The strategy selected for encoding a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TraversalClass {
    /// The type's own bound method encodes it.
    CustomMember,
    /// A registered free function encodes it.
    CustomFreeFunction,
    /// Elements in iteration order, then the element count.
    Sequence,
    /// Fixed positional parts (tuples, tuple structs), then the part count.
    Product,
    /// Named data members in declaration order, then the member count.
    PlainData,
    /// Fixed-width bit pattern (integers, floats, fieldless enums, addresses).
    Scalar,
}

impl TraversalClass {
    /// All classes, in resolver priority order.
    pub const PRIORITY: [TraversalClass; 6] = [
        Self::CustomMember,
        Self::CustomFreeFunction,
        Self::Sequence,
        Self::Product,
        Self::PlainData,
        Self::Scalar,
    ];

    /// Short lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::CustomMember => "custom-member",
            Self::CustomFreeFunction => "custom-free-function",
            Self::Sequence => "sequence",
            Self::Product => "product",
            Self::PlainData => "plain-data",
            Self::Scalar => "scalar",
        }
    }

    /// True for user-supplied hooks.
    pub const fn is_hook(self) -> bool {
        matches!(self, Self::CustomMember | Self::CustomFreeFunction)
    }

    /// True for classes that append a trailing count marker.
    pub const fn appends_count(self) -> bool {
        matches!(self, Self::Sequence | Self::Product | Self::PlainData)
    }
}

impl fmt::Display for TraversalClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The traversal class `T` resolved to.
#[inline]
pub const fn class_of<T: HashAppend + ?Sized>() -> TraversalClass {
    T::CLASS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_matches_ord() {
        let mut sorted = TraversalClass::PRIORITY;
        sorted.sort();
        assert_eq!(sorted, TraversalClass::PRIORITY);
    }

    #[test]
    fn test_hooks_and_counts() {
        assert!(TraversalClass::CustomMember.is_hook());
        assert!(TraversalClass::CustomFreeFunction.is_hook());
        assert!(!TraversalClass::Sequence.is_hook());

        assert!(TraversalClass::Sequence.appends_count());
        assert!(TraversalClass::PlainData.appends_count());
        assert!(!TraversalClass::Scalar.appends_count());
    }

    #[test]
    fn test_builtin_classes() {
        assert_eq!(class_of::<u32>(), TraversalClass::Scalar);
        assert_eq!(class_of::<f64>(), TraversalClass::Scalar);
        assert_eq!(class_of::<*const u8>(), TraversalClass::Scalar);
        assert_eq!(class_of::<str>(), TraversalClass::Sequence);
        assert_eq!(class_of::<Vec<u8>>(), TraversalClass::Sequence);
        assert_eq!(class_of::<[u8; 4]>(), TraversalClass::Sequence);
        assert_eq!(class_of::<Option<u8>>(), TraversalClass::Sequence);
        assert_eq!(class_of::<(u8, u16)>(), TraversalClass::Product);
        assert_eq!(class_of::<()>(), TraversalClass::Product);
        assert_eq!(class_of::<&Vec<u8>>(), TraversalClass::Sequence);
        assert_eq!(class_of::<Box<(u8,)>>(), TraversalClass::Product);
    }

    #[test]
    fn test_display() {
        assert_eq!(TraversalClass::PlainData.to_string(), "plain-data");
    }
}
