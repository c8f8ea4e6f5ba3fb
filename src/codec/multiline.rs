//! `CONC`/`CONT` continuation encoding.
//!
//! A serialized line may hold at most `line_limit` chars. Longer values, and values holding line
//! breaks, are carried by continuation children: `CONC` appends its value directly, `CONT`
//! appends a line break and then its value. [`encode`] plans the head value plus continuation
//! segments for a record; [`decode`] folds a record and its continuations back into one string.
//!
//! The break in front of a `CONT` is the terminator of the segment emitted just before it. The
//! encoder stores the break that actually separated the logical lines on that segment, so
//! `decode(encode(v)) == v` holds for `\n`, `\r` and `\r\n` alike.

use crate::{
    codec::grammar::{split_terminator, SourceLines},
    record::{tags, LineTerminator, Record, RecordId},
};

/// One continuation child the encoder wants appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub tag: &'static str,
    pub value: String,
    pub terminator: LineTerminator,
}

/// The encoder's plan for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    /// Value stored on the record itself.
    pub value: String,
    /// Terminator for the record itself.
    pub terminator: LineTerminator,
    /// Continuation children, in order.
    pub continuations: Vec<Segment>,
}

/// Split `value` into logical lines, each paired with the break that followed it.
///
/// The last line never has a break; a value ending in a break yields a trailing empty line.
pub fn logical_lines(value: &str) -> Vec<(&str, Option<LineTerminator>)> {
    let mut lines = Vec::new();
    let mut ends_with_break = true;
    for raw in SourceLines::new(value) {
        let (body, terminator) = split_terminator(raw);
        ends_with_break = terminator != LineTerminator::None;
        lines.push((body, ends_with_break.then_some(terminator)));
    }
    if ends_with_break {
        lines.push(("", None));
    }
    lines
}

/// Byte offset at which `text` should be cut so that the first piece fits in `budget` chars.
///
/// Returns `text.len()` when everything fits. A cut never lands inside a word and the first
/// piece never ends in a space: the cut backs off to the start of the last run of spaces.
/// When no such boundary exists within the budget (one word, or only leading spaces) the cut
/// is at exactly `budget` chars.
pub fn split_point(text: &str, budget: usize) -> usize {
    let budget = budget.max(1);
    let window: Vec<(usize, char)> = text.char_indices().take(budget + 1).collect();
    if window.len() <= budget {
        return text.len();
    }
    let is_space = |n: usize| window[n].1 == ' ';

    let mut n = budget;
    if !is_space(n) && !is_space(n - 1) {
        match (0..n).rev().find(|k| is_space(*k)) {
            Some(space) => n = space,
            None => return window[budget].0,
        }
    }
    while n > 0 && is_space(n - 1) {
        n -= 1;
    }
    if n == 0 {
        window[budget].0
    } else {
        window[n].0
    }
}

/// Cut `text` into pieces: the first fits `first_budget`, the rest fit `rest_budget`.
/// An empty `text` yields one empty piece.
pub fn chunks(text: &str, first_budget: usize, rest_budget: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = text;
    let mut budget = first_budget;
    loop {
        let cut = split_point(rest, budget);
        let (piece, tail) = rest.split_at(cut);
        pieces.push(piece);
        if tail.is_empty() {
            break;
        }
        rest = tail;
        budget = rest_budget;
    }
    pieces
}

/// The terminator that ends the whole value of `records[id]`.
///
/// Once a value is encoded the record's own terminator may hold the break before its first
/// `CONT`. The last continuation child is never followed by a break, so it carries the line's
/// original terminator.
pub fn own_terminator(records: &[Record], id: RecordId) -> LineTerminator {
    let record = &records[id.0];
    record
        .children()
        .iter()
        .map(|child| &records[child.0])
        .filter(|child| child.is_continuation())
        .last()
        .unwrap_or(record)
        .terminator()
}

/// Plan how `records[id]` carries `value` under `line_limit`.
///
/// Continuation children sit one level below the record and declare no pointer, so all of them
/// share one budget.
pub fn encode(records: &[Record], id: RecordId, value: &str, line_limit: usize) -> Encoding {
    let record = &records[id.0];
    let first_budget = record.value_budget(line_limit);
    let probe = Record::new(
        record.level() + 1,
        "",
        tags::CONCATENATION,
        "",
        None,
        LineTerminator::Lf,
    );
    let rest_budget = probe.value_budget(line_limit);
    let base = own_terminator(records, id);

    let mut encoding = Encoding {
        value: String::new(),
        terminator: base,
        continuations: Vec::new(),
    };
    for (line_idx, (text, line_break)) in logical_lines(value).into_iter().enumerate() {
        let budget = if line_idx == 0 {
            first_budget
        } else {
            rest_budget
        };
        let pieces = chunks(text, budget, rest_budget);
        let last_piece = pieces.len() - 1;
        for (piece_idx, piece) in pieces.into_iter().enumerate() {
            let terminator = match line_break {
                Some(line_break) if piece_idx == last_piece => line_break,
                _ => base,
            };
            if line_idx == 0 && piece_idx == 0 {
                encoding.value = piece.to_string();
                encoding.terminator = terminator;
                continue;
            }
            encoding.continuations.push(Segment {
                tag: if piece_idx == 0 {
                    tags::CONTINUATION
                } else {
                    tags::CONCATENATION
                },
                value: piece.to_string(),
                terminator,
            });
        }
    }
    encoding
}

/// Rebuild the logical value of `records[id]` from its own value and its `CONC`/`CONT`
/// children. Other children are content, not continuation, and are skipped.
pub fn decode(records: &[Record], id: RecordId) -> String {
    let record = &records[id.0];
    let mut value = record.value().to_string();
    let mut previous = record.terminator();
    for child_id in record.children() {
        let child = &records[child_id.0];
        match child.tag() {
            tags::CONCATENATION => value.push_str(child.value()),
            tags::CONTINUATION => {
                value.push_str(previous.line_break());
                value.push_str(child.value());
            }
            _ => continue,
        }
        previous = child.terminator();
    }
    value
}
