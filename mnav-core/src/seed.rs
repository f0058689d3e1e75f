//! Seed list of tracked companies.
//!
//! The dashboard starts from, and resets to, this list. Balance-sheet
//! fields start unknown and are filled in by hand or by import.

use crate::company::Company;

const SEED: &[(&str, &str, &str)] = &[
    ("1", "Strategy", "MSTR"),
    ("2", "Twenty One Capital", "XXI"),
    ("3", "Cantor Equity Partners", "CEPO"),
    ("4", "Bullish", "BLSH"),
    ("5", "Strive", "ASST"),
    ("6", "GD Culture Group", "GDC"),
    ("7", "Next Technology Holding", "NXTT"),
    ("8", "American Bitcoin", "ABTC"),
    ("9", "KindlyMD", "NAKA"),
    ("10", "Semler Scientific", "SMLR"),
    ("11", "ProCap Financial", "BRR"),
    ("12", "Empery Digital", "EMPD"),
    ("13", "MicroCloud Hologram", "HOLO"),
    ("14", "Exodus Movement", "EXOD"),
    ("15", "Fold Holdings", "FLD"),
    ("16", "DDC Enterprise", "DDC"),
    ("17", "KULR Technology Group", "KULR"),
    ("18", "Nano Labs", "NA"),
    ("19", "USBC", "USBC"),
];

/// The initial company list.
pub fn initial_companies() -> Vec<Company> {
    SEED.iter()
        .map(|(id, name, ticker)| Company::new(*id, *name, *ticker))
        .collect()
}
