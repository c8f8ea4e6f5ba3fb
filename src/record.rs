//! The node type of a parsed GEDCOM forest.
//!
//! Records live in an arena owned by [`Database`](crate::database::Database) and refer to each
//! other through [`RecordId`]s. A child list is the ownership edge; the parent link is a plain
//! id and never keeps anything alive.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

use crate::error::GedcomError;

/// Level carried by the virtual root. It is never serialized.
pub const ROOT_LEVEL: i32 = -1;

/// Tags the codec and the query engine attach meaning to.
pub mod tags {
    pub const ROOT: &str = "TOP";
    pub const INDIVIDUAL: &str = "INDI";
    pub const FAMILY: &str = "FAM";
    pub const SPOUSE_FAMILY: &str = "FAMS";
    pub const CHILD_FAMILY: &str = "FAMC";
    pub const HUSBAND: &str = "HUSB";
    pub const WIFE: &str = "WIFE";
    pub const CHILD: &str = "CHIL";
    pub const CONCATENATION: &str = "CONC";
    pub const CONTINUATION: &str = "CONT";
    pub const MOTHER_RELATION: &str = "_MREL";
    pub const FATHER_RELATION: &str = "_FREL";
    pub const NATURAL: &str = "Natural";
}

/// Index of a [`Record`] inside its database arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub(crate) usize);

impl RecordId {
    /// The virtual root of every database.
    pub const ROOT: RecordId = RecordId(0);

    pub fn index(&self) -> usize {
        self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The line terminator a record was read with, reproduced verbatim on output.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LineTerminator {
    #[default]
    Lf,
    Cr,
    CrLf,
    /// Last line of a source that does not end in a terminator.
    None,
}

impl LineTerminator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineTerminator::Lf => "\n",
            LineTerminator::Cr => "\r",
            LineTerminator::CrLf => "\r\n",
            LineTerminator::None => "",
        }
    }

    /// The break inserted in front of a `CONT` segment that follows a segment with this
    /// terminator. A missing terminator falls back to `\n`.
    pub fn line_break(&self) -> &'static str {
        match self {
            LineTerminator::None => LineTerminator::Lf.as_str(),
            other => other.as_str(),
        }
    }
}

impl TryFrom<&str> for LineTerminator {
    type Error = GedcomError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "\n" => Ok(LineTerminator::Lf),
            "\r" => Ok(LineTerminator::Cr),
            "\r\n" => Ok(LineTerminator::CrLf),
            "" => Ok(LineTerminator::None),
            other => Err(GedcomError::InvalidArgument(format!(
                "{other:?} is not a GEDCOM line terminator"
            ))),
        }
    }
}

impl TryFrom<String> for LineTerminator {
    type Error = GedcomError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        LineTerminator::try_from(value.as_str())
    }
}

impl From<LineTerminator> for String {
    fn from(value: LineTerminator) -> Self {
        value.as_str().to_string()
    }
}

/// One logical GEDCOM line.
///
/// `level`, `pointer` and `tag` are fixed at construction. The value and the child list are
/// only mutated through the owning database so that continuation records stay consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    level: i32,
    pointer: String,
    tag: String,
    pub(crate) value: String,
    pub(crate) children: Vec<RecordId>,
    parent: Option<RecordId>,
    pub(crate) terminator: LineTerminator,
}

impl Record {
    pub(crate) fn root() -> Record {
        Record::new(ROOT_LEVEL, "", tags::ROOT, "", None, LineTerminator::Lf)
    }

    pub(crate) fn new(
        level: i32,
        pointer: &str,
        tag: &str,
        value: &str,
        parent: Option<RecordId>,
        terminator: LineTerminator,
    ) -> Record {
        Record {
            level,
            pointer: pointer.to_string(),
            tag: tag.to_string(),
            value: value.to_string(),
            children: Vec::new(),
            parent,
            terminator,
        }
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    /// The `@…@` identifier this record declares, or `""`.
    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    pub fn has_pointer(&self) -> bool {
        !self.pointer.is_empty()
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The raw value of this line only. See
    /// [`Database::multi_line_value`](crate::database::Database::multi_line_value) for the value
    /// with `CONC`/`CONT` children folded in.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn children(&self) -> &[RecordId] {
        &self.children
    }

    pub fn parent(&self) -> Option<RecordId> {
        self.parent
    }

    pub fn terminator(&self) -> LineTerminator {
        self.terminator
    }

    pub fn is_root(&self) -> bool {
        self.level == ROOT_LEVEL
    }

    pub fn is_individual(&self) -> bool {
        self.tag == tags::INDIVIDUAL
    }

    pub fn is_family(&self) -> bool {
        self.tag == tags::FAMILY
    }

    pub fn is_continuation(&self) -> bool {
        self.tag == tags::CONCATENATION || self.tag == tags::CONTINUATION
    }

    /// `level[ pointer] tag`, the part of the serialized line that precedes the value.
    pub fn prefix(&self) -> String {
        if self.has_pointer() {
            format!("{} {} {}", self.level, self.pointer, self.tag)
        } else {
            format!("{} {}", self.level, self.tag)
        }
    }

    /// Number of chars a value may occupy on this record's own line under `line_limit`.
    /// Never less than one, so splitting always makes progress.
    pub fn value_budget(&self, line_limit: usize) -> usize {
        let used = self.prefix().chars().count() + 1;
        line_limit.saturating_sub(used).max(1)
    }

    /// The serialized line followed by its terminator. The root renders as `""`.
    pub fn to_line(&self) -> String {
        if self.is_root() {
            return String::new();
        }
        format!("{self}{}", self.terminator.as_str())
    }
}

/// Formats the record as its source line, without the terminator.
impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return Ok(());
        }
        write!(f, "{}", self.prefix())?;
        if !self.value.is_empty() {
            write!(f, " {}", self.value)?;
        }
        Ok(())
    }
}
