//! Basic usage example for gedcom-core
//!
//! This example demonstrates:
//! - Loading a GEDCOM file
//! - Querying parents, ancestors and ancestor paths
//! - Storing a long note and writing the file back out
//!
//! Run with: cargo run --example basic_usage

use gedcom_core::{
    config::CodecConfig,
    pedigree::Pedigree,
    query::{FamilyType, ParentType},
    Database, GedcomError, RecordId,
};
use tempfile::TempDir;

const FAMILY: &str = "0 HEAD
1 CHAR UTF-8
0 @I1@ INDI
1 NAME Ada /Lovelace/
1 BIRT
2 DATE 10 DEC 1815
2 PLAC London
1 FAMC @F1@
0 @I2@ INDI
1 NAME George Gordon /Byron/
1 FAMS @F1@
0 @I3@ INDI
1 NAME Anne Isabella /Milbanke/
1 FAMS @F1@
0 @F1@ FAM
1 HUSB @I2@
1 WIFE @I3@
1 CHIL @I1@
2 _FREL Natural
2 _MREL Natural
1 MARR
2 DATE 2 JAN 1815
0 TRLR
";

fn describe(db: &Database, id: RecordId) -> Result<String, GedcomError> {
    let (given, surname) = db.individual(id)?.name();
    Ok(format!("{given} {surname}"))
}

fn main() -> Result<(), GedcomError> {
    // Set up logging to see what's happening
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== gedcom-core Basic Usage Example ===\n");

    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("lovelace.ged");
    std::fs::write(&path, FAMILY)?;

    println!("1. Loading {path:?}...");
    let mut db = Database::from_path(&path)?;
    println!("   ✓ Parsed {} records\n", db.records().len());

    println!("2. Querying relationships...");
    let ada = db
        .get("@I1@")
        .ok_or_else(|| GedcomError::NotFound("@I1@".to_string()))?;
    let relations = db.relations();
    for parent in relations.parents(ada, ParentType::Natural)? {
        println!("   natural parent: {}", describe(&db, parent)?);
    }
    for family in relations.families(ada, FamilyType::Child)? {
        println!("   child of family {}", db.record(family)?.pointer());
    }
    let byron = db
        .get("@I2@")
        .ok_or_else(|| GedcomError::NotFound("@I2@".to_string()))?;
    if let Some(path) = relations.find_path_to_ancestor(ada, byron)? {
        let names = path
            .iter()
            .map(|id| describe(&db, *id))
            .collect::<Result<Vec<_>, _>>()?;
        println!("   path: {}", names.join(" -> "));
    }
    println!("   marriage years of Byron: {:?}", relations.marriage_years(byron)?);
    let pedigree = Pedigree::build(&db, ParentType::All)?;
    println!(
        "   pedigree: {} individuals, {} parent links\n",
        pedigree.as_graph().node_count(),
        pedigree.as_graph().edge_count()
    );

    println!("3. Adding a long note...");
    let note = "Ada Lovelace wrote what is often called the first computer program, \
                an algorithm for the Analytical Engine to compute Bernoulli numbers. "
        .repeat(4);
    let note_id = db.add_record(ada, "", "NOTE", &format!("{note}\nPublished 1843."))?;
    db.invalidate_caches();
    let continuations = db.record(note_id)?.children().len();
    println!("   ✓ Stored as one NOTE line and {continuations} continuation lines\n");

    println!("4. Writing back out...");
    let out = temp_dir.path().join("lovelace-out.ged");
    db.write_to(std::fs::File::create(&out)?)?;
    let reloaded = Database::from_path(&out)?;
    println!(
        "   ✓ Reloaded {} records, longest line {} chars (limit {})",
        reloaded.records().len(),
        reloaded
            .to_gedcom_string()
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or_default(),
        CodecConfig::default().line_limit
    );

    Ok(())
}
