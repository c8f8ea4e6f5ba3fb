//! Field accessors for `INDI` records and criteria matching.
//!
//! These are thin scans over a record's children. Values are read raw (no `CONC`/`CONT`
//! folding), except for notes-like fields where noted.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{
    database::Database,
    error::GedcomError,
    query::{year_of, Relations},
    record::{Record, RecordId},
};

/// Date, place and source references of an event such as `BIRT` or `CENS`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub date: Option<String>,
    pub place: Option<String>,
    pub sources: Vec<String>,
}

impl Event {
    pub fn year(&self) -> Option<i32> {
        self.date.as_deref().and_then(year_of)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Individual<'a> {
    db: &'a Database,
    id: RecordId,
    record: &'a Record,
}

impl<'a> Individual<'a> {
    pub fn new(db: &'a Database, id: RecordId) -> Result<Individual<'a>, GedcomError> {
        let record = db.record(id)?;
        if !record.is_individual() {
            return Err(GedcomError::InvalidArgument(format!(
                "operation only valid for records with the INDI tag, {id} is {}",
                record.tag()
            )));
        }
        Ok(Individual { db, id, record })
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn record(&self) -> &'a Record {
        self.record
    }

    fn children_tagged(&self, tag: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        let db = self.db;
        self.record
            .children()
            .iter()
            .map(move |child| db.node(*child))
            .filter(move |child| child.tag() == tag)
    }

    fn field(&self, tag: &'a str) -> Option<&'a str> {
        self.children_tagged(tag).last().map(|record| record.value())
    }

    fn event(&self, record: &Record) -> Event {
        let mut event = Event::default();
        for detail in record.children().iter().map(|c| self.db.node(*c)) {
            match detail.tag() {
                "DATE" => event.date = Some(detail.value().to_string()),
                "PLAC" => event.place = Some(detail.value().to_string()),
                "SOUR" => event.sources.push(detail.value().to_string()),
                _ => {}
            }
        }
        event
    }

    fn last_event(&self, tag: &'a str) -> Option<Event> {
        self.children_tagged(tag).last().map(|record| self.event(record))
    }

    /// `(given, surname)` from the last `NAME`: either its `Given /Surname/` value or its
    /// `GIVN`/`SURN` children.
    pub fn name(&self) -> (String, String) {
        let Some(name) = self.children_tagged("NAME").last() else {
            return (String::new(), String::new());
        };
        if !name.value().is_empty() {
            let mut parts = name.value().split('/');
            let given = parts.next().unwrap_or_default().trim().to_string();
            let surname = parts.next().unwrap_or_default().trim().to_string();
            return (given, surname);
        }
        let mut given = String::new();
        let mut surname = String::new();
        for part in name.children().iter().map(|c| self.db.node(*c)) {
            match part.tag() {
                "GIVN" => given = part.value().to_string(),
                "SURN" => surname = part.value().to_string(),
                _ => {}
            }
        }
        (given, surname)
    }

    pub fn gender(&self) -> Option<&'a str> {
        self.field("SEX")
    }

    pub fn is_private(&self) -> bool {
        self.field("PRIV") == Some("Y")
    }

    pub fn birth(&self) -> Option<Event> {
        self.last_event("BIRT")
    }

    pub fn death(&self) -> Option<Event> {
        self.last_event("DEAT")
    }

    pub fn burial(&self) -> Option<Event> {
        self.last_event("BURI")
    }

    pub fn birth_year(&self) -> Option<i32> {
        self.birth().and_then(|event| event.year())
    }

    pub fn death_year(&self) -> Option<i32> {
        self.death().and_then(|event| event.year())
    }

    /// Every `CENS` event, in file order.
    pub fn census(&self) -> Vec<Event> {
        self.children_tagged("CENS")
            .map(|record| self.event(record))
            .collect()
    }

    /// `OCCU` value with any continuation lines folded in.
    pub fn occupation(&self) -> Option<String> {
        let id = self
            .record
            .children()
            .iter()
            .copied()
            .filter(|child| self.db.node(*child).tag() == "OCCU")
            .last()?;
        self.db.multi_line_value(id).ok()
    }

    /// `CHAN`/`DATE`: when the record was last changed.
    pub fn last_updated(&self) -> Option<String> {
        self.children_tagged("CHAN")
            .last()
            .and_then(|change| self.event(change).date)
    }

    pub fn is_deceased(&self) -> bool {
        self.children_tagged("DEAT").next().is_some()
    }

    pub fn criteria_match(&self, criteria: &Criteria) -> Result<bool, GedcomError> {
        let relations = Relations::new(self.db);
        for criterion in &criteria.0 {
            let matched = match criterion {
                Criterion::Surname(name) => self.name().1.contains(name.as_str()),
                Criterion::Name(name) => self.name().0.contains(name.as_str()),
                Criterion::Birth(year) => self.birth_year() == Some(*year),
                Criterion::BirthRange(from, to) => self
                    .birth_year()
                    .is_some_and(|year| (*from..=*to).contains(&year)),
                Criterion::Death(year) => self.death_year() == Some(*year),
                Criterion::DeathRange(from, to) => self
                    .death_year()
                    .is_some_and(|year| (*from..=*to).contains(&year)),
                Criterion::Marriage(year) => relations.marriage_year_match(self.id, *year)?,
                Criterion::MarriageRange(from, to) => {
                    relations.marriage_range_match(self.id, *from, *to)?
                }
            };
            if !matched {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Criterion {
    Surname(String),
    Name(String),
    Birth(i32),
    BirthRange(i32, i32),
    Death(i32),
    DeathRange(i32, i32),
    Marriage(i32),
    MarriageRange(i32, i32),
}

/// A conjunction of [`Criterion`]s, written `key=value[:key=value...]`.
///
/// ```rust
/// use gedcom_core::individual::{Criteria, Criterion};
///
/// let criteria: Criteria = "surname=Smith:birthrange=1800-1850".parse()?;
/// assert_eq!(criteria.0[1], Criterion::BirthRange(1800, 1850));
/// # Ok::<(), gedcom_core::GedcomError>(())
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria(pub Vec<Criterion>);

fn invalid(crit: &str) -> GedcomError {
    GedcomError::InvalidArgument(format!("malformed criterion {crit:?}"))
}

fn parse_year(crit: &str, value: &str) -> Result<i32, GedcomError> {
    value.trim().parse().map_err(|_| invalid(crit))
}

fn parse_range(crit: &str, value: &str) -> Result<(i32, i32), GedcomError> {
    let (from, to) = value.split_once('-').ok_or_else(|| invalid(crit))?;
    Ok((parse_year(crit, from)?, parse_year(crit, to)?))
}

impl FromStr for Criteria {
    type Err = GedcomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut criteria = Vec::new();
        for crit in s.split(':') {
            let (key, value) = crit.split_once('=').ok_or_else(|| invalid(crit))?;
            let criterion = match key {
                "surname" => Criterion::Surname(value.to_string()),
                "name" => Criterion::Name(value.to_string()),
                "birth" => Criterion::Birth(parse_year(crit, value)?),
                "birthrange" => {
                    let (from, to) = parse_range(crit, value)?;
                    Criterion::BirthRange(from, to)
                }
                "death" => Criterion::Death(parse_year(crit, value)?),
                "deathrange" => {
                    let (from, to) = parse_range(crit, value)?;
                    Criterion::DeathRange(from, to)
                }
                "marriage" => Criterion::Marriage(parse_year(crit, value)?),
                "marriagerange" => {
                    let (from, to) = parse_range(crit, value)?;
                    Criterion::MarriageRange(from, to)
                }
                _ => return Err(invalid(crit)),
            };
            criteria.push(criterion);
        }
        Ok(Criteria(criteria))
    }
}
