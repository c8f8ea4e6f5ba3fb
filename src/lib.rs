//! # gedcom-core
//!
//! A parser and serializer for GEDCOM 5.5 genealogical data, with relationship queries over
//! the parsed records.
//!
//! ## Overview
//!
//! A GEDCOM file is a sequence of lines, each `level [@pointer@] TAG [value]`. There are no
//! closing markers: a line is the child of the nearest preceding line one level up. This crate
//! turns such a file into a forest of [`record::Record`]s owned by a [`database::Database`],
//! serializes it back byte for byte, and answers questions such as "who are this person's
//! natural parents" or "how does this person descend from that one".
//!
//! ### Key Features
//!
//! - **Level-driven tree building**: one pass, no lookahead, precise line numbers on failure
//! - **Round-trip fidelity**: each record keeps the terminator (`\n`, `\r`, `\r\n`) it was read
//!   with
//! - **Continuation codec**: long or multi-line values are split into `CONC`/`CONT` children
//!   under the 255 char line limit, and folded back when read
//! - **Relationship queries**: families, members by role, parents (all or natural), ancestors,
//!   ancestor paths, marriages
//!
//! ## Architecture
//!
//! - **[`codec`]**: line grammar, tree builder, and `CONC`/`CONT` codec
//! - **[`database`]**: the arena of records, the pointer index, and the printer
//! - **[`query`]**: the relationship query engine ([`query::Relations`])
//! - **[`individual`]**: accessors for `INDI` records and criteria matching
//! - **[`pedigree`]**: whole-database parent graph for reachability questions
//! - **[`config`]**: codec settings, loadable from TOML
//!
//! ## Quick Start
//!
//! ```rust
//! use gedcom_core::{database::Database, query::ParentType};
//!
//! let text = "0 @I1@ INDI\n\
//!             1 NAME Ada /Lovelace/\n\
//!             1 FAMC @F1@\n\
//!             0 @I2@ INDI\n\
//!             1 NAME George Gordon /Byron/\n\
//!             1 FAMS @F1@\n\
//!             0 @F1@ FAM\n\
//!             1 HUSB @I2@\n\
//!             1 CHIL @I1@\n\
//!             0 TRLR\n";
//! let db = Database::parse_str(text)?;
//!
//! let ada = db.get("@I1@").unwrap();
//! let parents = db.relations().parents(ada, ParentType::All)?;
//! assert_eq!(parents, vec![db.get("@I2@").unwrap()]);
//! assert_eq!(db.individual(parents[0])?.name().1, "Byron");
//!
//! // Serialization reproduces the source.
//! assert_eq!(db.to_gedcom_string(), text);
//! # Ok::<(), gedcom_core::GedcomError>(())
//! ```
//!
//! ### Long values
//!
//! ```rust
//! use gedcom_core::database::Database;
//!
//! let mut db = Database::new();
//! let note = db.add_record(db.root(), "@N1@", "NOTE", "")?;
//! let text = "word ".repeat(200);
//! db.set_multi_line_value(note, &format!("{text}\nsecond paragraph"))?;
//!
//! assert!(db.to_gedcom_string().lines().all(|line| line.chars().count() <= 255));
//! assert_eq!(db.multi_line_value(note)?, format!("{text}\nsecond paragraph"));
//! # Ok::<(), gedcom_core::GedcomError>(())
//! ```
//!
//! ## Concurrency
//!
//! A `Database` is single-owner. A finished database is `Sync` and may be read from several
//! threads as long as nothing mutates it meanwhile.

pub mod codec;
pub mod config;
pub mod database;
pub mod error;
pub mod individual;
pub mod pedigree;
pub mod query;
pub mod record;
#[cfg(test)]
mod tests;

pub use database::Database;
pub use error::*;
pub use record::{LineTerminator, Record, RecordId};
