//! Relationship queries over a parsed forest.
//!
//! [`Relations`] is a read-only view of a [`Database`]. Cross references are resolved through
//! the pointer index; a reference that does not resolve is dropped from the result rather than
//! reported, since real-world files are full of them. Passing a record of the wrong kind
//! (for example a `FAM` where an `INDI` is expected) is an [`GedcomError::InvalidArgument`].

use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeSet,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use crate::{
    database::Database,
    error::GedcomError,
    record::{tags, Record, RecordId},
};

/// Which family links of an individual to follow.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FamilyType {
    /// `FAMS`: families where the individual is a spouse.
    #[default]
    Spouse,
    /// `FAMC`: families where the individual is a child.
    Child,
}

impl FamilyType {
    pub fn tag(&self) -> &'static str {
        match self {
            FamilyType::Spouse => tags::SPOUSE_FAMILY,
            FamilyType::Child => tags::CHILD_FAMILY,
        }
    }
}

impl FromStr for FamilyType {
    type Err = GedcomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            tags::SPOUSE_FAMILY => Ok(FamilyType::Spouse),
            tags::CHILD_FAMILY => Ok(FamilyType::Child),
            other => Err(GedcomError::InvalidArgument(format!(
                "unknown family type {other:?}, expected FAMS or FAMC"
            ))),
        }
    }
}

impl Display for FamilyType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Which members of a family to return.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberType {
    /// `HUSB`, `WIFE` and `CHIL`.
    #[default]
    All,
    /// `HUSB` and `WIFE`.
    Parents,
    Husband,
    Wife,
    Children,
}

impl MemberType {
    pub fn matches(&self, tag: &str) -> bool {
        match self {
            MemberType::All => {
                tag == tags::HUSBAND || tag == tags::WIFE || tag == tags::CHILD
            }
            MemberType::Parents => tag == tags::HUSBAND || tag == tags::WIFE,
            MemberType::Husband => tag == tags::HUSBAND,
            MemberType::Wife => tag == tags::WIFE,
            MemberType::Children => tag == tags::CHILD,
        }
    }
}

impl FromStr for MemberType {
    type Err = GedcomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(MemberType::All),
            "PARENTS" => Ok(MemberType::Parents),
            tags::HUSBAND => Ok(MemberType::Husband),
            tags::WIFE => Ok(MemberType::Wife),
            tags::CHILD => Ok(MemberType::Children),
            other => Err(GedcomError::InvalidArgument(format!(
                "unknown member type {other:?}, expected ALL, PARENTS, HUSB, WIFE or CHIL"
            ))),
        }
    }
}

impl Display for MemberType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            MemberType::All => "ALL",
            MemberType::Parents => "PARENTS",
            MemberType::Husband => tags::HUSBAND,
            MemberType::Wife => tags::WIFE,
            MemberType::Children => tags::CHILD,
        };
        write!(f, "{name}")
    }
}

/// Which parents count.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParentType {
    /// Every `HUSB`/`WIFE` of every `FAMC` family.
    #[default]
    All,
    /// Only parents marked `Natural` through `_MREL`/`_FREL` on the child's `CHIL` entry.
    Natural,
}

impl FromStr for ParentType {
    type Err = GedcomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(ParentType::All),
            "NAT" => Ok(ParentType::Natural),
            other => Err(GedcomError::InvalidArgument(format!(
                "unknown parent type {other:?}, expected ALL or NAT"
            ))),
        }
    }
}

impl Display for ParentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParentType::All => write!(f, "ALL"),
            ParentType::Natural => write!(f, "NAT"),
        }
    }
}

/// One `MARR` event of a spouse family.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marriage {
    pub family: Option<RecordId>,
    pub date: String,
    pub place: String,
}

/// The last whitespace-separated token of a GEDCOM date, read as a year.
pub(crate) fn year_of(date: &str) -> Option<i32> {
    date.split_whitespace().last()?.parse().ok()
}

#[derive(Debug, Clone, Copy)]
pub struct Relations<'a> {
    db: &'a Database,
}

impl<'a> Relations<'a> {
    pub fn new(db: &'a Database) -> Self {
        Relations { db }
    }

    pub fn database(&self) -> &'a Database {
        self.db
    }

    fn expect_individual(&self, id: RecordId) -> Result<&'a Record, GedcomError> {
        let record = self.db.record(id)?;
        if !record.is_individual() {
            return Err(GedcomError::InvalidArgument(format!(
                "operation only valid for records with the INDI tag, {id} is {}",
                record.tag()
            )));
        }
        Ok(record)
    }

    fn expect_family(&self, id: RecordId) -> Result<&'a Record, GedcomError> {
        let record = self.db.record(id)?;
        if !record.is_family() {
            return Err(GedcomError::InvalidArgument(format!(
                "operation only valid for records with the FAM tag, {id} is {}",
                record.tag()
            )));
        }
        Ok(record)
    }

    fn resolve(&self, pointer: &str) -> Option<RecordId> {
        let resolved = self.db.get(pointer);
        if resolved.is_none() {
            tracing::trace!("Unresolved reference {pointer:?}, skipping");
        }
        resolved
    }

    /// Families an individual belongs to, in the order its `FAMS`/`FAMC` lines appear.
    pub fn families(
        &self,
        individual: RecordId,
        family_type: FamilyType,
    ) -> Result<Vec<RecordId>, GedcomError> {
        let record = self.expect_individual(individual)?;
        Ok(record
            .children()
            .iter()
            .map(|child| self.db.node(*child))
            .filter(|child| child.tag() == family_type.tag())
            .filter_map(|child| self.resolve(child.value()))
            .filter(|family| self.db.node(*family).is_family())
            .collect())
    }

    /// Members of a family with the roles `member_type` selects, in file order.
    pub fn family_members(
        &self,
        family: RecordId,
        member_type: MemberType,
    ) -> Result<Vec<RecordId>, GedcomError> {
        let record = self.expect_family(family)?;
        Ok(record
            .children()
            .iter()
            .map(|child| self.db.node(*child))
            .filter(|child| member_type.matches(child.tag()))
            .filter_map(|child| self.resolve(child.value()))
            .collect())
    }

    /// Parents of an individual across all of its `FAMC` families.
    ///
    /// With [`ParentType::Natural`] a parent is only returned when the individual's own
    /// `CHIL` entry in that family carries a marker valued `Natural`: `_MREL` selects the
    /// `WIFE`, `_FREL` selects the `HUSB`.
    pub fn parents(
        &self,
        individual: RecordId,
        parent_type: ParentType,
    ) -> Result<Vec<RecordId>, GedcomError> {
        let record = self.expect_individual(individual)?;
        let mut parents = Vec::new();
        for family in self.families(individual, FamilyType::Child)? {
            match parent_type {
                ParentType::All => {
                    parents.extend(self.family_members(family, MemberType::Parents)?);
                }
                ParentType::Natural => {
                    if !record.has_pointer() {
                        continue;
                    }
                    let entries = self
                        .db
                        .node(family)
                        .children()
                        .iter()
                        .map(|child| self.db.node(*child))
                        .filter(|child| {
                            child.tag() == tags::CHILD && child.value() == record.pointer()
                        });
                    for entry in entries {
                        for marker in entry.children().iter().map(|m| self.db.node(*m)) {
                            if marker.value() != tags::NATURAL {
                                continue;
                            }
                            let role = match marker.tag() {
                                tags::MOTHER_RELATION => MemberType::Wife,
                                tags::FATHER_RELATION => MemberType::Husband,
                                _ => continue,
                            };
                            parents.extend(self.family_members(family, role)?);
                        }
                    }
                }
            }
        }
        Ok(parents)
    }

    /// Every ancestor reachable through [`Relations::parents`], without repeats.
    ///
    /// Order: the individual's parents, then each parent's ancestors in turn. A record is
    /// expanded at most once, so a file with a parent cycle still terminates. Parent links that
    /// point at something other than an `INDI` are returned but not expanded.
    pub fn ancestors(
        &self,
        individual: RecordId,
        anc_type: ParentType,
    ) -> Result<Vec<RecordId>, GedcomError> {
        self.expect_individual(individual)?;
        let mut ancestors = Vec::new();
        let mut seen = BTreeSet::new();
        let mut expanded = BTreeSet::from([individual]);
        self.collect_ancestors(individual, anc_type, &mut ancestors, &mut seen, &mut expanded)?;
        Ok(ancestors)
    }

    fn collect_ancestors(
        &self,
        individual: RecordId,
        anc_type: ParentType,
        ancestors: &mut Vec<RecordId>,
        seen: &mut BTreeSet<RecordId>,
        expanded: &mut BTreeSet<RecordId>,
    ) -> Result<(), GedcomError> {
        let parents = self.parents(individual, anc_type)?;
        for parent in &parents {
            if seen.insert(*parent) {
                ancestors.push(*parent);
            }
        }
        for parent in parents {
            if !self.db.node(parent).is_individual() {
                tracing::trace!("Parent {parent} of {individual} is not an INDI record");
                continue;
            }
            if !expanded.insert(parent) {
                continue;
            }
            self.collect_ancestors(parent, anc_type, ancestors, seen, expanded)?;
        }
        Ok(())
    }

    /// Depth-first search from `descendant` up natural parent links to `ancestor`.
    ///
    /// Returns the first path found, both ends included, or `None` when no natural line
    /// connects them. Parents are tried in the order [`Relations::parents`] returns them, so the
    /// answer is deterministic but not necessarily the shortest. A parent already on the
    /// current path is never revisited.
    pub fn find_path_to_ancestor(
        &self,
        descendant: RecordId,
        ancestor: RecordId,
    ) -> Result<Option<Vec<RecordId>>, GedcomError> {
        self.expect_individual(descendant)?;
        let target = self.expect_individual(ancestor)?;
        let mut path = vec![descendant];
        if self.search_ancestor(target, ancestor, &mut path)? {
            Ok(Some(path))
        } else {
            Ok(None)
        }
    }

    fn search_ancestor(
        &self,
        target: &Record,
        target_id: RecordId,
        path: &mut Vec<RecordId>,
    ) -> Result<bool, GedcomError> {
        let Some(&current) = path.last() else {
            return Ok(false);
        };
        let record = self.db.node(current);
        let reached = if record.has_pointer() && target.has_pointer() {
            record.pointer() == target.pointer()
        } else {
            current == target_id
        };
        if reached {
            return Ok(true);
        }
        for parent in self.parents(current, ParentType::Natural)? {
            if path.contains(&parent) || !self.db.node(parent).is_individual() {
                continue;
            }
            path.push(parent);
            if self.search_ancestor(target, target_id, path)? {
                return Ok(true);
            }
            path.pop();
        }
        Ok(false)
    }

    /// One entry per `MARR` event in each of the individual's spouse families.
    pub fn marriages(&self, individual: RecordId) -> Result<Vec<Marriage>, GedcomError> {
        let mut marriages = Vec::new();
        for family in self.families(individual, FamilyType::Spouse)? {
            let events = self
                .db
                .node(family)
                .children()
                .iter()
                .map(|child| self.db.node(*child))
                .filter(|child| child.tag() == "MARR");
            for event in events {
                let mut marriage = Marriage {
                    family: Some(family),
                    ..Default::default()
                };
                for detail in event.children().iter().map(|d| self.db.node(*d)) {
                    match detail.tag() {
                        "DATE" => marriage.date = detail.value().to_string(),
                        "PLAC" => marriage.place = detail.value().to_string(),
                        _ => {}
                    }
                }
                marriages.push(marriage);
            }
        }
        Ok(marriages)
    }

    /// Years of the individual's marriages whose date ends in a number.
    pub fn marriage_years(&self, individual: RecordId) -> Result<Vec<i32>, GedcomError> {
        Ok(self
            .marriages(individual)?
            .iter()
            .filter_map(|marriage| year_of(&marriage.date))
            .collect())
    }

    pub fn marriage_year_match(&self, individual: RecordId, year: i32) -> Result<bool, GedcomError> {
        Ok(self.marriage_years(individual)?.contains(&year))
    }

    /// Whether any marriage year lies in `from..=to`.
    pub fn marriage_range_match(
        &self,
        individual: RecordId,
        from: i32,
        to: i32,
    ) -> Result<bool, GedcomError> {
        Ok(self
            .marriage_years(individual)?
            .iter()
            .any(|year| (from..=to).contains(year)))
    }
}
