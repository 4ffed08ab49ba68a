use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type Point = Point3<f64>;

/// Element symbol used when neither the element column nor the atom name yields one.
pub const UNKNOWN_ELEMENT: &str = "X";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecondaryStructure {
    Helix,
    Sheet,
    Coil,
}

impl BondOrder {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(BondOrder::Single),
            2 => Some(BondOrder::Double),
            3 => Some(BondOrder::Triple),
            4 => Some(BondOrder::Aromatic),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Aromatic => 4,
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Aromatic => 1.5,
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl TryFrom<u8> for BondOrder {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        BondOrder::from_code(code).ok_or_else(|| format!("Invalid bond order code: {}", code))
    }
}

impl From<BondOrder> for u8 {
    fn from(order: BondOrder) -> Self {
        order.code()
    }
}

impl FromStr for BondOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1" | "sing" | "single" => Ok(BondOrder::Single),
            "2" | "doub" | "double" => Ok(BondOrder::Double),
            "3" | "trip" | "triple" => Ok(BondOrder::Triple),
            "4" | "arom" | "aromatic" => Ok(BondOrder::Aromatic),
            _ => Err(format!("Invalid bond order: {}", s)),
        }
    }
}

impl SecondaryStructure {
    pub fn name(&self) -> &'static str {
        match self {
            SecondaryStructure::Helix => "Helix",
            SecondaryStructure::Sheet => "Sheet",
            SecondaryStructure::Coil => "Coil",
        }
    }
}

impl fmt::Display for SecondaryStructure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Two-letter element symbols that show up in macromolecular files (metals, halogens,
/// common cofactor atoms). Single-letter symbols are handled separately.
const TWO_LETTER_ELEMENTS: &[&str] = &[
    "He", "Li", "Be", "Ne", "Na", "Mg", "Al", "Si", "Cl", "Ar", "Ca", "Sc", "Ti", "Cr", "Mn",
    "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Zr", "Mo",
    "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", "Sb", "Te", "Xe", "Cs", "Ba", "La", "Ce", "Gd",
    "Yb", "Lu", "Hf", "Ta", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Sm", "Eu",
    "Tb", "Ho", "Er", "Pr", "Nd",
];

const ONE_LETTER_ELEMENTS: &[&str] = &[
    "H", "B", "C", "N", "O", "F", "P", "S", "K", "V", "I", "W", "U", "Y",
];

/// Normalizes an element token (`"FE"`, `"fe"`, `"Fe"`) to its canonical capitalization.
///
/// Returns `None` when the token is not a recognized element symbol.
pub fn normalize_element(token: &str) -> Option<&'static str> {
    let token = token.trim();
    let mut chars = token.chars();
    let first = chars.next()?.to_ascii_uppercase();
    match (chars.next(), chars.next()) {
        (None, _) => ONE_LETTER_ELEMENTS
            .iter()
            .copied()
            .find(|sym| sym.starts_with(first)),
        (Some(second), None) => {
            let second = second.to_ascii_lowercase();
            TWO_LETTER_ELEMENTS
                .iter()
                .copied()
                .find(|sym| sym.starts_with(first) && sym.ends_with(second))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bond_order_codes_round_trip_and_reject_out_of_range() {
        for code in 1..=4u8 {
            let order = BondOrder::from_code(code).expect("valid code");
            assert_eq!(order.code(), code);
        }
        assert!(BondOrder::from_code(0).is_none());
        assert!(BondOrder::from_code(5).is_none());
        assert!(BondOrder::try_from(7u8).is_err());
    }

    #[test]
    fn bond_order_parses_mmcif_value_order_tokens() {
        assert_eq!("sing".parse::<BondOrder>(), Ok(BondOrder::Single));
        assert_eq!("DOUB".parse::<BondOrder>(), Ok(BondOrder::Double));
        assert_eq!("trip".parse::<BondOrder>(), Ok(BondOrder::Triple));
        assert_eq!("arom".parse::<BondOrder>(), Ok(BondOrder::Aromatic));
        assert!("quad".parse::<BondOrder>().is_err());
    }

    #[test]
    fn normalize_element_handles_case_variants() {
        assert_eq!(normalize_element("C"), Some("C"));
        assert_eq!(normalize_element("c"), Some("C"));
        assert_eq!(normalize_element("FE"), Some("Fe"));
        assert_eq!(normalize_element(" zn "), Some("Zn"));
        assert_eq!(normalize_element("Qq"), None);
        assert_eq!(normalize_element(""), None);
        assert_eq!(normalize_element("ABC"), None);
    }

    #[test]
    fn secondary_structure_serializes_lowercase() {
        let json = serde_json::to_string(&SecondaryStructure::Helix).unwrap();
        assert_eq!(json, "\"helix\"");
    }
}
