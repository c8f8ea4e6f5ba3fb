//! Reading and writing GEDCOM lines.
//!
//! ## Key Components
//!
//! - [`grammar`] - decomposes one line into level, pointer, tag, value and terminator
//! - [`TreeBuilder`] - attaches decomposed lines to a forest by level alone
//! - [`multiline`] - splits long or multi-line values into `CONC`/`CONT` children and joins
//!   them back
//!
//! The [`Database`](crate::database::Database) drives all three: it feeds source lines through
//! [`grammar::parse_line`] into a [`TreeBuilder`], and calls into [`multiline`] whenever a
//! value is set or read.
//!
//! ```rust
//! use gedcom_core::codec::{grammar::parse_line, TreeBuilder};
//!
//! let mut builder = TreeBuilder::new();
//! for (idx, text) in ["0 @I1@ INDI\n", "1 NAME Ada /Lovelace/\n"].iter().enumerate() {
//!     let line = parse_line(idx + 1, text)?;
//!     builder.push(idx + 1, &line)?;
//! }
//! let forest = builder.finish();
//! assert_eq!(forest.order.len(), 2);
//! # Ok::<(), gedcom_core::GedcomError>(())
//! ```

pub mod builder;
pub mod grammar;
pub mod multiline;

pub use builder::{Forest, PointerIndex, TreeBuilder};
pub use grammar::{parse_line, GedcomLine, SourceLines};
pub use multiline::{decode, encode, own_terminator, Encoding, Segment};
