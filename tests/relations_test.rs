//! Relationship queries over loaded files and generated pedigrees

mod common;

use common::{load_family, pointers};
use gedcom_core::{
    individual::Criteria,
    pedigree::Pedigree,
    query::{MemberType, ParentType},
    Database, RecordId,
};
use test_log::test;

/// A single male line `generations` deep: `@I0@` is the youngest, `@I{n}@` the oldest.
fn male_line(generations: usize) -> String {
    let mut text = String::from("0 HEAD\n");
    for n in 0..=generations {
        text.push_str(&format!("0 @I{n}@ INDI\n1 NAME Gen{n} /Line/\n"));
        if n < generations {
            text.push_str(&format!("1 FAMC @F{n}@\n"));
        }
        if n > 0 {
            text.push_str(&format!("1 FAMS @F{}@\n", n - 1));
        }
    }
    for n in 0..generations {
        text.push_str(&format!(
            "0 @F{n}@ FAM\n1 HUSB @I{}@\n1 CHIL @I{n}@\n2 _FREL Natural\n",
            n + 1
        ));
    }
    text.push_str("0 TRLR\n");
    text
}

fn lookup(db: &Database, pointer: &str) -> RecordId {
    db.get(pointer).unwrap()
}

#[test]
fn deep_lines_resolve_end_to_end() {
    let db = Database::parse_str(&male_line(60)).unwrap();
    let relations = db.relations();
    let youngest = lookup(&db, "@I0@");
    let oldest = lookup(&db, "@I60@");

    let ancestors = relations.ancestors(youngest, ParentType::Natural).unwrap();
    assert_eq!(ancestors.len(), 60);
    assert_eq!(ancestors.last(), Some(&oldest));

    let path = relations
        .find_path_to_ancestor(youngest, oldest)
        .unwrap()
        .unwrap();
    assert_eq!(path.len(), 61);
    assert_eq!(path[0], youngest);
    assert_eq!(path[60], oldest);
    assert_eq!(
        relations.find_path_to_ancestor(oldest, youngest).unwrap(),
        None
    );

    let pedigree = Pedigree::build(&db, ParentType::Natural).unwrap();
    assert_eq!(pedigree.descendants(oldest).len(), 60);
    assert!(pedigree.is_ancestor(youngest, oldest));
}

#[test]
fn loaded_fixture_answers_family_questions() {
    let db = load_family();
    let relations = db.relations();
    let carol = lookup(&db, "@I1@");
    let adam = lookup(&db, "@I4@");

    let path = relations.find_path_to_ancestor(carol, adam).unwrap().unwrap();
    assert_eq!(pointers(&db, &path), vec!["@I1@", "@I2@", "@I4@"]);

    let f2 = lookup(&db, "@F2@");
    let children = relations.family_members(f2, MemberType::Children).unwrap();
    assert_eq!(pointers(&db, &children), vec!["@I1@", "@I6@"]);
}

#[test]
fn criteria_select_individuals() {
    let db = load_family();
    let criteria: Criteria = "surname=Smith:birthrange=1900-1960".parse().unwrap();

    let mut matched = Vec::new();
    for id in db.records() {
        if !db.record(*id).unwrap().is_individual() {
            continue;
        }
        if db.individual(*id).unwrap().criteria_match(&criteria).unwrap() {
            matched.push(*id);
        }
    }
    assert_eq!(pointers(&db, &matched), vec!["@I1@", "@I2@"]);
}

#[test]
fn database_is_shared_across_threads() {
    let db = load_family();
    let carol = lookup(&db, "@I1@");
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    db.relations()
                        .ancestors(carol, ParentType::All)
                        .unwrap()
                        .len()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 4);
        }
    });
}
