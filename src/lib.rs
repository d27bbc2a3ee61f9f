//! shapehash - Structural hashing with a fixed traversal priority
//!
//! ## Core Concepts
//!
//! **Accumulators** consume byte spans and produce a digest (FNV-1a by
//! default). **`HashAppend`** types feed their *structure* to an
//! accumulator: scalars as fixed-width little-endian bytes, sequences as
//! their elements followed by a count, products as their parts followed by
//! a part count. The trailing counts make `[1, 2]` and `[1, 2, 0]` (or two
//! structs sharing leading fields) hash differently.
//!
//! For every type exactly one strategy is chosen, first match wins:
//! member hook, free-function hook, sequence, product, plain data. Scalars
//! and addresses are handled directly.
//!
//! ## Modules
//! - `accumulator`: `Accumulator`, FNV-1a, BLAKE3, byte recorder
//! - `class`: `TraversalClass` and `class_of`
//! - `engine`: scalar, address, sequence and product encoders
//! - `map`: `DigestMap`, a lookup table keyed by structural digests
//! - `json`: JSON writer/reader driven by the same structure (feature `json`)
//! - `parallel`: batch digests with rayon (feature `parallel`)
//!
//! ## Usage
//!
//! ```
//! use shapehash::{fnv1a64, HashAppend};
//!
//! #[derive(HashAppend)]
//! struct Ratio {
//!     max: i32,
//!     current: i32,
//! }
//!
//! #[derive(HashAppend)]
//! struct Player {
//!     name: String,
//!     health: Ratio,
//!     magic: Ratio,
//! }
//!
//! let player = Player {
//!     name: "andrew".into(),
//!     health: Ratio { max: 100, current: 100 },
//!     magic: Ratio { max: 50, current: 50 },
//! };
//! let key = fnv1a64(&player);
//! ```

extern crate self as shapehash;

// =============================================================================
// Core modules
// =============================================================================

/// Accumulators: FNV-1a, BLAKE3, byte recorder, `Hasher` adapter
pub mod accumulator;

/// `HashAppend` and its std implementations
pub mod append;

/// Traversal classes
pub mod class;

/// Encoders used by `HashAppend` implementations
pub mod engine;

/// Entry points
pub mod hash;

/// Digest-keyed lookup table
pub mod map;

/// Error types for the JSON front end
#[cfg(feature = "json")]
pub mod error;

/// JSON front end
#[cfg(feature = "json")]
pub mod json;

/// Batch digests
#[cfg(feature = "parallel")]
pub mod parallel;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

pub use accumulator::{
    Accumulator, ByteRecorder, DigestWord, Fnv1a, Fnv1a32, Fnv1a64, HasherAccumulator,
    StableHasher,
};
pub use append::HashAppend;
pub use class::{TraversalClass, class_of};
pub use hash::{StructuralHash, digest, fnv1a32, fnv1a64, hash_append, stable_digest};
pub use map::DigestMap;

#[cfg(feature = "json")]
pub use error::{JsonError, JsonResult};
#[cfg(feature = "json")]
pub use json::{ReadJson, WriteJson};

#[cfg(feature = "derive")]
pub use shapehash_macros::HashAppend;

// =============================================================================
// Tests
// =============================================================================

#[cfg(all(test, feature = "derive"))]
mod tests {
    use super::*;

    #[derive(HashAppend, Debug, Clone, PartialEq, Eq)]
    #[cfg_attr(feature = "json", derive(WriteJson, ReadJson))]
    struct Ratio {
        max: i32,
        current: i32,
    }

    #[derive(HashAppend, Debug, Clone, PartialEq, Eq)]
    #[cfg_attr(feature = "json", derive(WriteJson, ReadJson))]
    struct Player {
        name: String,
        health: Ratio,
        magic: Ratio,
    }

    fn andrew() -> Player {
        Player {
            name: "andrew".to_string(),
            health: Ratio {
                max: 100,
                current: 100,
            },
            magic: Ratio {
                max: 50,
                current: 50,
            },
        }
    }

    #[test]
    fn test_player_digest() {
        assert_eq!(fnv1a64(&andrew()), fnv1a64(&andrew()));
        assert_eq!(fnv1a32(&andrew()), fnv1a32(&andrew()));
        assert_eq!(stable_digest(&andrew()), stable_digest(&andrew()));

        let mut hurt = andrew();
        hurt.health.current = 99;
        assert_ne!(fnv1a64(&andrew()), fnv1a64(&hurt));
    }

    #[test]
    fn test_player_byte_layout() {
        // "andrew" + count, two ratios of (i32, i32, count), field count
        let mut recorder = ByteRecorder::new();
        hash_append(&mut recorder, &andrew());
        assert_eq!(recorder.len(), (6 + 8) + 2 * (4 + 4 + 8) + 8);
        assert_eq!(&recorder.bytes()[..6], b"andrew");
        assert_eq!(&recorder.bytes()[recorder.len() - 8..], &3u64.to_le_bytes());
    }

    #[test]
    fn test_derived_shape_matches_tuple() {
        let ratio = Ratio {
            max: 100,
            current: 99,
        };
        assert_eq!(fnv1a64(&ratio), fnv1a64(&(100i32, 99i32)));
        assert_eq!(class_of::<Ratio>(), TraversalClass::PlainData);
    }

    #[derive(HashAppend)]
    struct Two(u8, u8);

    #[derive(HashAppend)]
    struct Three(u8, u8, u8);

    #[derive(HashAppend)]
    struct Unit;

    #[test]
    fn test_field_count_discrimination() {
        assert_ne!(fnv1a64(&Two(1, 2)), fnv1a64(&Three(1, 2, 0)));
        assert_eq!(fnv1a64(&Two(1, 2)), fnv1a64(&(1u8, 2u8)));
        assert_eq!(fnv1a64(&Unit), fnv1a64(&()));
        assert_eq!(class_of::<Two>(), TraversalClass::Product);
        assert_eq!(class_of::<Unit>(), TraversalClass::Product);
    }

    // -------------------------------------------------------------------------
    // Hooks
    // -------------------------------------------------------------------------

    #[derive(HashAppend)]
    #[hash_append(member = "append_id")]
    struct Tagged {
        id: u32,
        note: String,
    }

    impl Tagged {
        fn append_id<H: Accumulator>(&self, hash: &mut H) {
            hash_append(hash, &self.id);
        }
    }

    #[derive(HashAppend)]
    #[hash_append(with = "append_note", member = "append_id")]
    struct Both {
        id: u32,
        note: String,
    }

    impl Both {
        fn append_id<H: Accumulator>(&self, hash: &mut H) {
            hash_append(hash, &self.id);
        }
    }

    #[derive(HashAppend)]
    #[hash_append(with = "append_note")]
    struct NoteOnly {
        id: u32,
        note: String,
    }

    fn append_note<H: Accumulator>(hash: &mut H, value: &NoteOnly) {
        hash_append(hash, value.note.as_str());
    }

    #[test]
    fn test_member_hook_wins_over_plain_data() {
        let a = Tagged {
            id: 5,
            note: "first".into(),
        };
        let b = Tagged {
            id: 5,
            note: "second".into(),
        };
        assert_ne!(a.note, b.note);
        assert_eq!(fnv1a64(&a), fnv1a64(&b));
        assert_eq!(fnv1a64(&a), fnv1a64(&5u32));
        assert_eq!(class_of::<Tagged>(), TraversalClass::CustomMember);
    }

    #[test]
    fn test_member_hook_wins_over_free_function() {
        let both = Both {
            id: 7,
            note: "ignored".into(),
        };
        assert_eq!(fnv1a64(&both), fnv1a64(&7u32));
        assert_eq!(class_of::<Both>(), TraversalClass::CustomMember);
        assert_eq!(both.note, "ignored");
    }

    #[test]
    fn test_free_function_hook() {
        let a = NoteOnly {
            id: 1,
            note: "same".into(),
        };
        let b = NoteOnly {
            id: 2,
            note: "same".into(),
        };
        assert_ne!(a.id, b.id);
        assert_eq!(fnv1a64(&a), fnv1a64(&b));
        assert_eq!(fnv1a64(&a), fnv1a64("same"));
        assert_eq!(class_of::<NoteOnly>(), TraversalClass::CustomFreeFunction);
    }

    fn append_rounded<H: Accumulator>(hash: &mut H, value: &f64) {
        hash_append(hash, &(value.round() as i64));
    }

    #[derive(HashAppend)]
    struct Sample {
        label: &'static str,
        #[hash_append(with = "append_rounded")]
        value: f64,
    }

    #[test]
    fn test_field_hook() {
        let a = Sample {
            label: "x",
            value: 1.2,
        };
        let b = Sample {
            label: "x",
            value: 0.9,
        };
        assert_eq!(fnv1a64(&a), fnv1a64(&b));
        assert_eq!(fnv1a64(&a), fnv1a64(&("x", 1i64)));
    }

    #[derive(HashAppend)]
    #[hash_append(sequence)]
    struct Bag {
        items: Vec<u16>,
    }

    impl<'a> IntoIterator for &'a Bag {
        type Item = &'a u16;
        type IntoIter = std::slice::Iter<'a, u16>;

        fn into_iter(self) -> Self::IntoIter {
            self.items.iter()
        }
    }

    #[test]
    fn test_sequence_wins_over_plain_data() {
        let bag = Bag { items: vec![1, 2] };
        assert_eq!(fnv1a64(&bag), fnv1a64(&vec![1u16, 2]));
        assert_eq!(fnv1a64(&bag), fnv1a64(&[1u16, 2][..]));
        assert_eq!(class_of::<Bag>(), TraversalClass::Sequence);
    }

    // -------------------------------------------------------------------------
    // Enums and generics
    // -------------------------------------------------------------------------

    #[derive(HashAppend, Debug, PartialEq)]
    #[cfg_attr(feature = "json", derive(WriteJson, ReadJson))]
    enum Mode {
        Idle,
        Busy,
    }

    #[derive(HashAppend, Debug, PartialEq)]
    #[cfg_attr(feature = "json", derive(WriteJson, ReadJson))]
    enum Shape {
        Dot,
        Line(u8, u8),
        Rect { w: u8, h: u8 },
    }

    #[derive(HashAppend, Clone, Copy)]
    #[repr(u8)]
    enum Level {
        Low = 10,
        High = 200,
    }

    #[test]
    fn test_fieldless_enum_is_discriminant() {
        // no repr: isize, widened to 64 bits
        assert_eq!(fnv1a64(&Mode::Busy), fnv1a64(&1i64));
        assert_ne!(fnv1a64(&Mode::Idle), fnv1a64(&Mode::Busy));
        assert_eq!(class_of::<Mode>(), TraversalClass::Scalar);
    }

    #[test]
    fn test_explicit_discriminants_use_repr_width() {
        let mut recorder = ByteRecorder::new();
        hash_append(&mut recorder, &Level::Low);
        assert_eq!(recorder.bytes(), &[10]);
        assert_eq!(fnv1a64(&Level::High), fnv1a64(&200u8));
        assert_eq!(class_of::<Level>(), TraversalClass::Scalar);
    }

    #[test]
    fn test_data_enum_layout() {
        assert_ne!(
            fnv1a64(&Shape::Line(1, 2)),
            fnv1a64(&Shape::Rect { w: 1, h: 2 })
        );
        assert_eq!(class_of::<Shape>(), TraversalClass::PlainData);

        // discriminant, fields, field count
        let mut recorder = ByteRecorder::new();
        hash_append(&mut recorder, &Shape::Line(3, 4));
        let mut expected = 1u32.to_le_bytes().to_vec();
        expected.extend([3, 4]);
        expected.extend(2u64.to_le_bytes());
        assert_eq!(recorder.bytes(), &expected[..]);

        let mut recorder = ByteRecorder::new();
        hash_append(&mut recorder, &Shape::Dot);
        assert_eq!(recorder.len(), 4 + 8);
    }

    #[derive(HashAppend)]
    struct Labelled<T> {
        label: u8,
        value: T,
    }

    #[test]
    fn test_generic_struct() {
        let a = Labelled {
            label: 1,
            value: vec!["x".to_string()],
        };
        let b = Labelled {
            label: 1,
            value: vec!["x".to_string(), String::new()],
        };
        assert_ne!(fnv1a64(&a), fnv1a64(&b));
        assert_eq!(class_of::<Labelled<String>>(), TraversalClass::PlainData);
    }

    #[test]
    fn test_digest_map_with_derived_key() {
        let mut map: DigestMap<Player, &str> = DigestMap::new();
        map.insert(andrew(), "online");
        assert_eq!(map.get(&andrew()), Some(&"online"));

        let mut hurt = andrew();
        hurt.magic.current = 0;
        assert_eq!(map.get(&hurt), None);
    }

    static_assertions::assert_impl_all!(Fnv1a32: Accumulator, Default, Send, Sync);
    static_assertions::assert_impl_all!(Fnv1a64: Accumulator, Default, Send, Sync);
    static_assertions::assert_impl_all!(StableHasher: Accumulator, Default, Send, Sync);
    static_assertions::assert_impl_all!(Player: HashAppend);
    static_assertions::assert_not_impl_any!(std::cell::Cell<u8>: HashAppend);

    // -------------------------------------------------------------------------
    // JSON
    // -------------------------------------------------------------------------

    #[cfg(feature = "json")]
    mod json_front_end {
        use super::*;
        use crate::json::{
            self, JsonReader, JsonWriter, ReadConfig, WriteConfig, from_str, from_str_with,
            to_string,
        };

        const ANDREW: &str =
            r#"{"name":"andrew","health":{"max":100,"current":100},"magic":{"max":50,"current":50}}"#;

        static_assertions::assert_impl_all!(Player: WriteJson, ReadJson);
        static_assertions::assert_not_impl_any!(*const u8: WriteJson, ReadJson);

        #[test]
        fn test_player_to_json() {
            assert_eq!(to_string(&andrew()).unwrap(), ANDREW);
        }

        #[test]
        fn test_player_round_trip() {
            let back: Player = from_str(ANDREW).unwrap();
            assert_eq!(back, andrew());
            assert_eq!(fnv1a64(&back), fnv1a64(&andrew()));

            let pretty = json::to_string_with(&andrew(), WriteConfig::PRETTY.with_indent(4)).unwrap();
            assert!(pretty.contains("\n    \"name\": \"andrew\","));
            assert_eq!(from_str::<Player>(&pretty).unwrap(), andrew());
        }

        #[test]
        fn test_member_order_is_free() {
            let text = r#"{"magic":{"current":50,"max":50},"name":"andrew","health":{"max":100,"current":100}}"#;
            assert_eq!(from_str::<Player>(text).unwrap(), andrew());
        }

        #[test]
        fn test_unknown_member() {
            let text = r#"{"max":1,"current":1,"mana":{"x":[1,2]}}"#;
            match from_str::<Ratio>(text) {
                Err(JsonError::UnknownField { field, ty, at }) => {
                    assert_eq!(field, "mana");
                    assert_eq!(ty, "Ratio");
                    assert_eq!(at, json::Position { line: 1, column: 22 });
                }
                other => panic!("expected unknown member error, got {other:?}"),
            }

            let lenient: Ratio = from_str_with(text, ReadConfig::LENIENT).unwrap();
            assert_eq!(lenient, Ratio { max: 1, current: 1 });
        }

        #[test]
        fn test_duplicate_member() {
            let err = from_str::<Ratio>(r#"{"max":1,"max":2,"current":1}"#).unwrap_err();
            assert!(matches!(err, JsonError::DuplicateField { field: "max", .. }));
        }

        #[test]
        fn test_missing_member() {
            let err = from_str::<Player>(r#"{"name":"andrew","health":{"max":1,"current":1}}"#)
                .unwrap_err();
            assert!(matches!(err, JsonError::MissingField { field: "magic", ty: "Player", .. }));
            assert!(err.to_string().contains("incomplete initialization"));
        }

        #[test]
        fn test_enums() {
            assert_eq!(to_string(&Mode::Busy).unwrap(), r#""Busy""#);
            assert_eq!(to_string(&Shape::Dot).unwrap(), r#""Dot""#);
            assert_eq!(to_string(&Shape::Line(1, 2)).unwrap(), r#"{"Line":[1,2]}"#);
            assert_eq!(
                to_string(&Shape::Rect { w: 3, h: 4 }).unwrap(),
                r#"{"Rect":{"w":3,"h":4}}"#
            );

            assert_eq!(from_str::<Mode>(r#""Idle""#).unwrap(), Mode::Idle);
            assert_eq!(from_str::<Shape>(r#""Dot""#).unwrap(), Shape::Dot);
            assert_eq!(from_str::<Shape>(r#"{"Line":[1,2]}"#).unwrap(), Shape::Line(1, 2));
            assert_eq!(
                from_str::<Shape>(r#"{ "Rect" : { "h":4, "w":3 } }"#).unwrap(),
                Shape::Rect { w: 3, h: 4 }
            );

            assert!(matches!(
                from_str::<Mode>(r#""Asleep""#),
                Err(JsonError::UnknownVariant { .. })
            ));
            assert!(matches!(
                from_str::<Shape>(r#"{"Line":[1]}"#),
                Err(JsonError::Arity { expected: 2, found: 1, .. })
            ));
        }

        mod percent {
            use crate::json::{JsonReader, JsonResult, JsonWriter};
            use std::fmt::Write;

            pub fn write_json<W: Write>(writer: &mut JsonWriter<'_, W>, value: &f64) -> JsonResult<()> {
                writer.write_integer((value * 100.0).round() as i64)
            }

            pub fn read_json(reader: &mut JsonReader<'_>) -> JsonResult<f64> {
                reader.read_integer::<i64>().map(|p| p as f64 / 100.0)
            }
        }

        #[derive(WriteJson, ReadJson, Debug, PartialEq)]
        struct Progress {
            task: String,
            #[json(with = "percent")]
            done: f64,
        }

        #[test]
        fn test_field_with_module() {
            let progress = Progress {
                task: "index".into(),
                done: 0.25,
            };
            let text = to_string(&progress).unwrap();
            assert_eq!(text, r#"{"task":"index","done":25}"#);
            assert_eq!(from_str::<Progress>(&text).unwrap(), progress);
        }

        #[derive(WriteJson)]
        #[json(member = "write_summary")]
        struct Summary {
            total: u32,
            parts: Vec<u32>,
        }

        impl Summary {
            fn write_summary<W: std::fmt::Write>(
                &self,
                writer: &mut JsonWriter<'_, W>,
            ) -> JsonResult<()> {
                let mut object = writer.object()?;
                object.field("total", &self.total)?;
                object.field("count", &self.parts.len())?;
                object.finish()
            }
        }

        #[test]
        fn test_member_hook_writes() {
            let summary = Summary {
                total: 6,
                parts: vec![1, 2, 3],
            };
            assert_eq!(to_string(&summary).unwrap(), r#"{"total":6,"count":3}"#);
        }

        #[derive(WriteJson, ReadJson, Debug, PartialEq)]
        #[json(sequence)]
        struct Stack {
            items: Vec<u8>,
        }

        impl<'a> IntoIterator for &'a Stack {
            type Item = &'a u8;
            type IntoIter = std::slice::Iter<'a, u8>;

            fn into_iter(self) -> Self::IntoIter {
                self.items.iter()
            }
        }

        impl IntoIterator for Stack {
            type Item = u8;
            type IntoIter = std::vec::IntoIter<u8>;

            fn into_iter(self) -> Self::IntoIter {
                self.items.into_iter()
            }
        }

        impl FromIterator<u8> for Stack {
            fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
                Self {
                    items: iter.into_iter().collect(),
                }
            }
        }

        #[test]
        fn test_sequence_hook() {
            let stack = Stack {
                items: vec![3, 1, 2],
            };
            assert_eq!(to_string(&stack).unwrap(), "[3,1,2]");
            assert_eq!(from_str::<Stack>("[3,1,2]").unwrap(), stack);
        }

        #[test]
        fn test_reader_streams_values() {
            let mut reader = JsonReader::new(r#"{"max":1,"current":2} [3]"#);
            let ratio: Ratio = reader.read().unwrap();
            let tail: Vec<u8> = reader.read().unwrap();
            reader.end().unwrap();
            assert_eq!(ratio, Ratio { max: 1, current: 2 });
            assert_eq!(tail, vec![3]);
        }

        #[test]
        fn test_writer_sink_reuse() {
            let mut out = String::new();
            let mut writer = JsonWriter::new(&mut out);
            writer.write(&Mode::Idle).unwrap();
            writer.write(&Mode::Busy).unwrap();
            assert_eq!(out, r#""Idle""Busy""#);
        }
    }
}
