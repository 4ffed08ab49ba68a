//! Normalized atom record shared by every reader and by the structure builder.
//!
//! Atoms carry their element and Cartesian position plus whatever residue, chain, and
//! crystallographic annotations the source file provided. Optional fields stay `None` when the
//! column was blank or unparsable, so downstream consumers can tell "absent" from "zero".

use super::types::{Point, UNKNOWN_ELEMENT};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// Atom names that make up the polymer backbone of amino-acid residues.
const BACKBONE_ATOM_NAMES: [&str; 4] = ["N", "CA", "C", "O"];

/// One physical atom of a parsed structure.
///
/// The element is never empty (readers substitute `"X"` when it cannot be resolved) and the
/// position is always finite; both are enforced by the readers before an `Atom` is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Atom {
    /// Serial number from the source file, if it parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<i32>,
    /// Canonically capitalized element symbol (e.g. `C`, `Fe`).
    pub element: SmolStr,
    /// Cartesian coordinates measured in ångströms.
    pub pos: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residue_name: Option<SmolStr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residue_seq: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<SmolStr>,
    /// Atom name as written in the source (e.g. `CA`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<SmolStr>,
    /// Temperature factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupancy: Option<f64>,
    /// Set for `HETATM` records and non-polymer `_atom_site` rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_ligand: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_backbone: Option<bool>,
}

impl Atom {
    /// Creates an atom with only an element and a position; every annotation is `None`.
    ///
    /// An empty element string is replaced by the unknown-element placeholder so the
    /// non-empty invariant holds for hand-built atoms as well.
    pub fn new(element: &str, pos: Point) -> Self {
        let element = if element.trim().is_empty() {
            UNKNOWN_ELEMENT
        } else {
            element.trim()
        };
        Self {
            serial: None,
            element: SmolStr::new(element),
            pos,
            residue_name: None,
            residue_seq: None,
            chain_id: None,
            name: None,
            b_factor: None,
            occupancy: None,
            is_ligand: None,
            is_backbone: None,
        }
    }

    /// Reports whether the position holds three finite coordinates.
    pub fn has_finite_position(&self) -> bool {
        self.pos.coords.iter().all(|c| c.is_finite())
    }

    /// Returns `true` when `name` is one of the amino-acid backbone atoms.
    pub fn is_backbone_name(name: &str) -> bool {
        BACKBONE_ATOM_NAMES.contains(&name)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Atom {{ name: \"{}\", element: {}, pos: [{:.3}, {:.3}, {:.3}] }}",
            self.name.as_deref().unwrap_or(""),
            self.element,
            self.pos.x,
            self.pos.y,
            self.pos.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atom_new_sets_element_and_position_only() {
        let pos = Point::new(1.0, 2.0, 3.0);
        let atom = Atom::new("C", pos);

        assert_eq!(atom.element, "C");
        assert_eq!(atom.pos, pos);
        assert!(atom.name.is_none());
        assert!(atom.chain_id.is_none());
        assert!(atom.is_ligand.is_none());
    }

    #[test]
    fn atom_new_substitutes_placeholder_for_empty_element() {
        let atom = Atom::new("  ", Point::origin());
        assert_eq!(atom.element, UNKNOWN_ELEMENT);
    }

    #[test]
    fn atom_reports_non_finite_positions() {
        let atom = Atom::new("O", Point::new(f64::NAN, 0.0, 0.0));
        assert!(!atom.has_finite_position());
        assert!(Atom::new("O", Point::new(1.0, -2.0, 3.5)).has_finite_position());
    }

    #[test]
    fn backbone_names_are_recognized() {
        assert!(Atom::is_backbone_name("CA"));
        assert!(Atom::is_backbone_name("O"));
        assert!(!Atom::is_backbone_name("CB"));
        assert!(!Atom::is_backbone_name("OXT"));
    }

    #[test]
    fn atom_display_formats_correctly() {
        let mut atom = Atom::new("C", Point::new(1.234, -5.678, 9.012));
        atom.name = Some("CA".into());

        let display = format!("{}", atom);
        let expected = "Atom { name: \"CA\", element: C, pos: [1.234, -5.678, 9.012] }";

        assert_eq!(display, expected);
    }

    #[test]
    fn atom_serializes_without_absent_fields() {
        let mut atom = Atom::new("N", Point::new(0.0, 0.0, 0.0));
        atom.residue_seq = Some(7);

        let json = serde_json::to_value(&atom).unwrap();
        assert_eq!(json["element"], "N");
        assert_eq!(json["residueSeq"], 7);
        assert!(json.get("chainId").is_none());
        assert!(json.get("bFactor").is_none());
    }
}
