use std::collections::BTreeMap;

use crate::{
    codec::grammar::GedcomLine,
    error::GedcomError,
    record::{Record, RecordId},
};

/// Maps each declared pointer to the record that declares it.
pub type PointerIndex = BTreeMap<String, RecordId>;

/// The output of a [`TreeBuilder`]: the arena (slot 0 is the virtual root), the pointer index,
/// and records in document order.
#[derive(Debug, Clone)]
pub struct Forest {
    pub records: Vec<Record>,
    pub index: PointerIndex,
    pub order: Vec<RecordId>,
}

/// Attaches decomposed lines to a forest using only their levels.
///
/// The builder keeps the last attached record. Its ancestor chain holds every level that is
/// still open, so a new line at level `L` finds its parent by walking up from there until it
/// reaches level `L - 1`. Level may drop by any amount, stay equal, or grow by exactly one.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    records: Vec<Record>,
    index: PointerIndex,
    order: Vec<RecordId>,
    last: RecordId,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        TreeBuilder {
            records: vec![Record::root()],
            index: PointerIndex::new(),
            order: Vec::new(),
            last: RecordId::ROOT,
        }
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `line` to the forest. `line_num` is 1-based and only used for error reporting.
    pub fn push(&mut self, line_num: usize, line: &GedcomLine<'_>) -> Result<RecordId, GedcomError> {
        let previous = self.records[self.last.0].level();
        // Grammar guarantees the level fits in an i32.
        let level = line.level as i32;
        if level > previous + 1 {
            return Err(GedcomError::Structure {
                line: line_num,
                level: line.level,
                previous,
            });
        }

        let mut parent = self.last;
        while self.records[parent.0].level() > level - 1 {
            match self.records[parent.0].parent() {
                Some(up) => parent = up,
                None => break,
            }
        }
        debug_assert_eq!(self.records[parent.0].level(), level - 1);

        let id = RecordId(self.records.len());
        self.records.push(Record::new(
            level,
            line.pointer,
            line.tag,
            line.value,
            Some(parent),
            line.terminator,
        ));
        self.records[parent.0].children.push(id);
        if !line.pointer.is_empty() {
            if let Some(previous) = self.index.insert(line.pointer.to_string(), id) {
                tracing::warn!(
                    "Line {line_num}: pointer {} was already declared by record {previous}, \
                    the later declaration wins",
                    line.pointer
                );
            }
        }
        self.order.push(id);
        self.last = id;
        Ok(id)
    }

    pub fn finish(self) -> Forest {
        Forest {
            records: self.records,
            index: self.index,
            order: self.order,
        }
    }
}
