//! The line grammar: `level SP [pointer SP] tag [SP value] terminator`.
//!
//! [`parse_line`] is a hand-written scanner over one line. It never looks at neighbouring
//! lines; structural checks belong to the [`TreeBuilder`](super::builder::TreeBuilder).

use std::fmt::{self, Display, Formatter};

use crate::{error::GedcomError, record::LineTerminator};

/// One decomposed input line, borrowing from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GedcomLine<'a> {
    pub level: u32,
    /// `""` when the line declares no pointer.
    pub pointer: &'a str,
    pub tag: &'a str,
    /// `""` both for an absent value and for a lone separating space.
    pub value: &'a str,
    pub terminator: LineTerminator,
}

impl Display for GedcomLine<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level)?;
        if !self.pointer.is_empty() {
            write!(f, " {}", self.pointer)?;
        }
        write!(f, " {}", self.tag)?;
        if !self.value.is_empty() {
            write!(f, " {}", self.value)?;
        }
        write!(f, "{}", self.terminator.as_str())
    }
}

fn grammar_error(line_num: usize, text: &str, reason: &str) -> GedcomError {
    GedcomError::Grammar {
        line: line_num,
        text: text.to_string(),
        reason: reason.to_string(),
    }
}

/// Split a trailing `\r\n`, `\n` or `\r` off `line`.
pub fn split_terminator(line: &str) -> (&str, LineTerminator) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, LineTerminator::CrLf)
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, LineTerminator::Lf)
    } else if let Some(body) = line.strip_suffix('\r') {
        (body, LineTerminator::Cr)
    } else {
        (line, LineTerminator::None)
    }
}

fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Decompose one line. `line_num` is 1-based and only used for error reporting.
pub fn parse_line(line_num: usize, line: &str) -> Result<GedcomLine<'_>, GedcomError> {
    let (body, terminator) = split_terminator(line);
    if body.contains(['\r', '\n']) {
        return Err(grammar_error(line_num, line, "embedded line break"));
    }

    // Level: "0" or digits without a leading zero.
    let digits = body
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(body.len());
    let level_text = &body[..digits];
    if level_text.is_empty() {
        return Err(grammar_error(line_num, line, "line must start with a level"));
    }
    if level_text.len() > 1 && level_text.starts_with('0') {
        return Err(grammar_error(line_num, line, "level has a leading zero"));
    }
    let level = level_text
        .parse::<u32>()
        .ok()
        .filter(|level| i32::try_from(*level).is_ok())
        .ok_or_else(|| grammar_error(line_num, line, "level out of range"))?;

    let mut rest = body[digits..]
        .strip_prefix(' ')
        .ok_or_else(|| grammar_error(line_num, line, "level must be followed by a space"))?;

    // Optional pointer: '@', at least one non-'@' char, '@', then a space.
    let mut pointer = "";
    if let Some(after_at) = rest.strip_prefix('@') {
        let close = after_at
            .find('@')
            .filter(|close| *close > 0)
            .ok_or_else(|| grammar_error(line_num, line, "pointer must be flanked by '@'"))?;
        let end = close + 2;
        pointer = &rest[..end];
        rest = rest[end..]
            .strip_prefix(' ')
            .ok_or_else(|| grammar_error(line_num, line, "pointer must be followed by a space"))?;
    }

    let tag_end = rest.find(|c: char| !is_tag_char(c)).unwrap_or(rest.len());
    let tag = &rest[..tag_end];
    if tag.is_empty() {
        return Err(grammar_error(line_num, line, "missing or malformed tag"));
    }
    let value = match &rest[tag_end..] {
        "" => "",
        after_tag => after_tag
            .strip_prefix(' ')
            .ok_or_else(|| grammar_error(line_num, line, "invalid character in tag"))?,
    };

    Ok(GedcomLine {
        level,
        pointer,
        tag,
        value,
        terminator,
    })
}

/// Iterator over the lines of a source text, each yielded with its own terminator.
///
/// `\r\n` counts as a single terminator. A trailing empty segment is not a line.
pub struct SourceLines<'a> {
    rest: &'a str,
}

impl<'a> SourceLines<'a> {
    pub fn new(text: &'a str) -> Self {
        SourceLines { rest: text }
    }
}

impl<'a> Iterator for SourceLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let end = match self.rest.find(['\r', '\n']) {
            Some(idx) if self.rest[idx..].starts_with("\r\n") => idx + 2,
            Some(idx) => idx + 1,
            None => self.rest.len(),
        };
        let (line, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(err: GedcomError) -> (usize, String) {
        match err {
            GedcomError::Grammar { line, reason, .. } => (line, reason),
            other => panic!("expected a grammar error, got {other:?}"),
        }
    }

    #[test]
    fn decomposes_all_fields() {
        let line = parse_line(1, "0 @I1@ INDI\n").unwrap();
        assert_eq!(line.level, 0);
        assert_eq!(line.pointer, "@I1@");
        assert_eq!(line.tag, "INDI");
        assert_eq!(line.value, "");
        assert_eq!(line.terminator, LineTerminator::Lf);

        let line = parse_line(2, "12 NAME John /Smith/\r\n").unwrap();
        assert_eq!(line.level, 12);
        assert_eq!(line.pointer, "");
        assert_eq!(line.tag, "NAME");
        assert_eq!(line.value, "John /Smith/");
        assert_eq!(line.terminator, LineTerminator::CrLf);

        let line = parse_line(3, "1 _FREL Natural\r").unwrap();
        assert_eq!(line.tag, "_FREL");
        assert_eq!(line.terminator, LineTerminator::Cr);
    }

    #[test]
    fn value_keeps_inner_and_trailing_spaces() {
        let line = parse_line(1, "1 NOTE  leading and trailing  \n").unwrap();
        assert_eq!(line.value, " leading and trailing  ");

        let line = parse_line(1, "1 NOTE \n").unwrap();
        assert_eq!(line.value, "");
    }

    #[test]
    fn missing_terminator_is_accepted() {
        let line = parse_line(9, "0 TRLR").unwrap();
        assert_eq!(line.tag, "TRLR");
        assert_eq!(line.terminator, LineTerminator::None);
    }

    #[test]
    fn value_may_hold_a_pointer() {
        let line = parse_line(1, "1 FAMS @F1@\n").unwrap();
        assert_eq!(line.pointer, "");
        assert_eq!(line.value, "@F1@");
    }

    #[test]
    fn rejects_leading_zero_levels() {
        let (line, reason) = reason(parse_line(4, "01 NAME x\n").unwrap_err());
        assert_eq!(line, 4);
        assert!(reason.contains("leading zero"));
        assert!(parse_line(1, "00 HEAD\n").is_err());
        assert!(parse_line(1, "10 HEAD\n").is_ok());
    }

    #[test]
    fn rejects_malformed_lines() {
        for bad in [
            "",
            "\n",
            "HEAD\n",
            "0HEAD\n",
            "0  HEAD\n",
            "-1 HEAD\n",
            "0 @@ INDI\n",
            "0 @I1 INDI\n",
            "0 @I1@INDI\n",
            "0 @I1@\n",
            "0 IN-DI\n",
            "0 INDI\tvalue\n",
            "99999999999 HEAD\n",
        ] {
            assert!(parse_line(7, bad).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn error_names_line_and_text() {
        let err = parse_line(42, "x BAD\n").unwrap_err();
        match &err {
            GedcomError::Grammar { line, text, .. } => {
                assert_eq!(*line, 42);
                assert_eq!(text, "x BAD\n");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(err.line(), Some(42));
    }

    #[test]
    fn serialize_then_parse_is_identity() {
        let lines = [
            GedcomLine {
                level: 0,
                pointer: "@F12@",
                tag: "FAM",
                value: "",
                terminator: LineTerminator::CrLf,
            },
            GedcomLine {
                level: 3,
                pointer: "",
                tag: "CONT",
                value: "  indented text ",
                terminator: LineTerminator::Lf,
            },
            GedcomLine {
                level: 1,
                pointer: "@N 1@",
                tag: "NOTE",
                value: "has @ signs @X@",
                terminator: LineTerminator::None,
            },
        ];
        for line in lines {
            let text = line.to_string();
            assert_eq!(parse_line(1, &text).unwrap(), line);
        }
    }

    #[test]
    fn source_lines_keep_their_terminators() {
        let lines: Vec<&str> = SourceLines::new("0 HEAD\r\n1 CHAR ASCII\r0 @I1@ INDI\n0 TRLR").collect();
        assert_eq!(
            lines,
            vec!["0 HEAD\r\n", "1 CHAR ASCII\r", "0 @I1@ INDI\n", "0 TRLR"]
        );
        assert_eq!(SourceLines::new("0 HEAD\n").count(), 1);
        assert_eq!(SourceLines::new("").count(), 0);
    }
}
