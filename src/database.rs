//! The [`Database`]: owner of a parsed GEDCOM forest.
//!
//! Records live in an arena indexed by [`RecordId`]; slot 0 is the virtual root (level `-1`)
//! that owns every level-0 record. Two derived caches sit next to the arena, the pre-order
//! record list and the pointer index. Both are filled by the parse. After editing the forest
//! through [`Database::add_record`] or [`Database::set_multi_line_value`], call
//! [`Database::invalidate_caches`] before trusting [`Database::records`] or
//! [`Database::get`] again; they rebuild on the next access.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::{
    fs::read_to_string,
    io::{Read, Write},
    path::Path,
};

use crate::{
    codec::{
        grammar::{parse_line, SourceLines},
        multiline, PointerIndex, TreeBuilder,
    },
    config::CodecConfig,
    error::GedcomError,
    individual::Individual,
    query::Relations,
    record::{Record, RecordId},
};

/// Nested, serializable view of one record and its descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTree {
    pub level: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pointer: String,
    pub tag: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RecordTree>,
}

#[derive(Debug)]
pub struct Database {
    records: Vec<Record>,
    config: CodecConfig,
    flat: OnceCell<Vec<RecordId>>,
    index: OnceCell<PointerIndex>,
}

impl Default for Database {
    fn default() -> Self {
        Database::with_config(CodecConfig::default())
    }
}

impl Database {
    /// An empty database holding only the virtual root.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Database {
            records: vec![Record::root()],
            config,
            flat: OnceCell::new(),
            index: OnceCell::new(),
        }
    }

    pub fn parse_str(text: &str) -> Result<Database, GedcomError> {
        Database::parse_with_config(text, CodecConfig::default())
    }

    /// Parse `text` line by line. The first grammar or structure violation aborts the parse.
    #[tracing::instrument(skip_all)]
    pub fn parse_with_config(text: &str, config: CodecConfig) -> Result<Database, GedcomError> {
        let mut builder = TreeBuilder::new();
        for (idx, raw) in SourceLines::new(text).enumerate() {
            let line_num = idx + 1;
            let line = parse_line(line_num, raw)?;
            builder.push(line_num, &line)?;
        }
        let forest = builder.finish();
        tracing::debug!(
            "Parsed {} records, {} with pointers",
            forest.order.len(),
            forest.index.len()
        );
        Ok(Database {
            records: forest.records,
            config,
            flat: OnceCell::with_value(forest.order),
            index: OnceCell::with_value(forest.index),
        })
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Database, GedcomError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Database::parse_str(&text)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Database, GedcomError> {
        tracing::debug!("Reading {:?}", path.as_ref());
        let text = read_to_string(path)?;
        Database::parse_str(&text)
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn root(&self) -> RecordId {
        RecordId::ROOT
    }

    /// Look up a record by id. Ids from another database may not resolve.
    pub fn record(&self, id: RecordId) -> Result<&Record, GedcomError> {
        self.records
            .get(id.0)
            .ok_or_else(|| GedcomError::NotFound(format!("record {id}")))
    }

    /// Ids handed out by this database always index the arena.
    pub(crate) fn node(&self, id: RecordId) -> &Record {
        &self.records[id.0]
    }

    /// Level-0 records in document order.
    pub fn top_level(&self) -> &[RecordId] {
        self.records[RecordId::ROOT.0].children()
    }

    /// Every record except the root, in pre-order. Cached; see [`Database::invalidate_caches`].
    pub fn records(&self) -> &[RecordId] {
        self.flat.get_or_init(|| {
            tracing::debug!("Rebuilding flat record list");
            self.preorder(RecordId::ROOT)
        })
    }

    /// Pointer to declaring record. Cached; see [`Database::invalidate_caches`].
    pub fn pointer_index(&self) -> &PointerIndex {
        self.index.get_or_init(|| {
            tracing::debug!("Rebuilding pointer index");
            let mut index = PointerIndex::new();
            for id in self.records() {
                let record = self.node(*id);
                if record.has_pointer() {
                    if let Some(previous) = index.insert(record.pointer().to_string(), *id) {
                        tracing::warn!(
                            "Pointer {} declared by both {previous} and {id}, keeping {id}",
                            record.pointer()
                        );
                    }
                }
            }
            index
        })
    }

    /// Resolve a pointer such as `@I1@`.
    pub fn get(&self, pointer: &str) -> Option<RecordId> {
        self.pointer_index().get(pointer).copied()
    }

    /// Drop the flat list and pointer index so the next access rebuilds them from the forest.
    pub fn invalidate_caches(&mut self) {
        self.flat.take();
        self.index.take();
    }

    /// Append a new record as the last child of `parent` and give it `value` through the
    /// multi-line encoder. Caches are left untouched.
    pub fn add_record(
        &mut self,
        parent: RecordId,
        pointer: &str,
        tag: &str,
        value: &str,
    ) -> Result<RecordId, GedcomError> {
        let level = self.record(parent)?.level() + 1;
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(GedcomError::InvalidArgument(format!(
                "{tag:?} is not a GEDCOM tag"
            )));
        }
        let well_formed_pointer = pointer.is_empty()
            || (pointer.len() > 2
                && pointer.starts_with('@')
                && pointer.ends_with('@')
                && !pointer[1..pointer.len() - 1].contains(['@', '\r', '\n']));
        if !well_formed_pointer {
            return Err(GedcomError::InvalidArgument(format!(
                "{pointer:?} is not a GEDCOM pointer"
            )));
        }

        let id = self.push_child(
            parent,
            Record::new(
                level,
                pointer,
                tag,
                "",
                Some(parent),
                self.config.line_terminator,
            ),
        );
        self.set_multi_line_value(id, value)?;
        Ok(id)
    }

    fn push_child(&mut self, parent: RecordId, record: Record) -> RecordId {
        let id = RecordId(self.records.len());
        self.records.push(record);
        self.records[parent.0].children.push(id);
        id
    }

    /// Assign `value` to a record, replacing any existing `CONC`/`CONT` children with a fresh
    /// encoding under the configured line limit. New continuations come first among the
    /// record's children; other children keep their order after them.
    pub fn set_multi_line_value(&mut self, id: RecordId, value: &str) -> Result<(), GedcomError> {
        let record = self.record(id)?;
        if record.is_root() {
            return Err(GedcomError::InvalidArgument(
                "the virtual root carries no value".to_string(),
            ));
        }
        let encoding = multiline::encode(&self.records, id, value, self.config.line_limit);
        let level = record.level() + 1;

        let kept: Vec<RecordId> = record
            .children()
            .iter()
            .copied()
            .filter(|child| !self.node(*child).is_continuation())
            .collect();
        let mut children = Vec::with_capacity(encoding.continuations.len() + kept.len());
        for segment in encoding.continuations {
            let child = RecordId(self.records.len());
            self.records.push(Record::new(
                level,
                "",
                segment.tag,
                &segment.value,
                Some(id),
                segment.terminator,
            ));
            children.push(child);
        }
        children.extend(kept);

        let record = &mut self.records[id.0];
        record.value = encoding.value;
        record.terminator = encoding.terminator;
        record.children = children;
        Ok(())
    }

    /// The value of a record with its `CONC`/`CONT` children folded in.
    pub fn multi_line_value(&self, id: RecordId) -> Result<String, GedcomError> {
        self.record(id)?;
        Ok(multiline::decode(&self.records, id))
    }

    fn preorder(&self, start: RecordId) -> Vec<RecordId> {
        let mut order = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let record = self.node(id);
            if !record.is_root() {
                order.push(id);
            }
            stack.extend(record.children().iter().rev().copied());
        }
        order
    }

    fn write_lines(&self, start: RecordId, out: &mut String) {
        let order = self.preorder(start);
        let last = order.len().saturating_sub(1);
        for (pos, id) in order.iter().enumerate() {
            let record = self.node(*id);
            out.push_str(&record.to_string());
            // A record read without a terminator only keeps that property at the very end.
            if pos == last {
                out.push_str(record.terminator().as_str());
            } else {
                out.push_str(record.terminator().line_break());
            }
        }
    }

    /// Serialize the whole forest, root excluded, reproducing each record's terminator.
    pub fn to_gedcom_string(&self) -> String {
        let mut out = String::new();
        self.write_lines(RecordId::ROOT, &mut out);
        out
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), GedcomError> {
        writer.write_all(self.to_gedcom_string().as_bytes())?;
        Ok(())
    }

    /// Serialize one record and all of its descendants.
    pub fn subtree_string(&self, id: RecordId) -> Result<String, GedcomError> {
        self.record(id)?;
        let mut out = String::new();
        self.write_lines(id, &mut out);
        Ok(out)
    }

    fn tree(&self, id: RecordId) -> RecordTree {
        let record = self.node(id);
        RecordTree {
            level: record.level(),
            pointer: record.pointer().to_string(),
            tag: record.tag().to_string(),
            value: record.value().to_string(),
            children: record.children().iter().map(|c| self.tree(*c)).collect(),
        }
    }

    /// The forest as nested [`RecordTree`]s, one per level-0 record.
    pub fn export_tree(&self) -> Vec<RecordTree> {
        self.top_level().iter().map(|id| self.tree(*id)).collect()
    }

    pub fn to_json(&self) -> Result<String, GedcomError> {
        Ok(serde_json::to_string_pretty(&self.export_tree())?)
    }

    /// Relationship queries over this database.
    pub fn relations(&self) -> Relations<'_> {
        Relations::new(self)
    }

    /// Accessors for an `INDI` record.
    pub fn individual(&self, id: RecordId) -> Result<Individual<'_>, GedcomError> {
        Individual::new(self, id)
    }
}
