use crate::io::detect::Format;
use crate::io::error::Error;
use crate::io::mmcif::block::{CifData, CifRow, CifTable, parse_block};
use crate::io::record::{
    AtomRecord, AtomRef, Connection, ParsedSource, SecondaryRange, SkippedRecords,
    SourceMetadata, infer_element_from_name, push_unique,
};
use crate::model::types::{
    BondOrder, Point, SecondaryStructure, UNKNOWN_ELEMENT, normalize_element,
};
use smol_str::SmolStr;
use std::str::FromStr;

const FORMAT: &str = "mmCIF";

const RESOLUTION_SOURCES: [(&str, &str); 3] = [
    ("refine", "ls_d_res_high"),
    ("reflns", "d_resolution_high"),
    ("em_3d_reconstruction", "resolution"),
];

const ORGANISM_SOURCES: [(&str, &str); 3] = [
    ("entity_src_gen", "pdbx_gene_src_scientific_name"),
    ("entity_src_nat", "pdbx_organism_scientific"),
    ("pdbx_entity_src_syn", "organism_scientific"),
];

/// Bond-order code that no valid bond carries; rejected by the builder.
const INVALID_ORDER: u8 = 0;

/// Column positions for one `_atom_site` loop.
///
/// `auth_*` columns are preferred per row; the matching `label_*` column is the fallback when
/// the author value is absent.
#[derive(Debug, Default)]
struct AtomSiteIndices {
    group_pdb: Option<usize>,
    id: Option<usize>,
    auth_atom_id: Option<usize>,
    label_atom_id: Option<usize>,
    auth_comp_id: Option<usize>,
    label_comp_id: Option<usize>,
    auth_asym_id: Option<usize>,
    label_asym_id: Option<usize>,
    auth_seq_id: Option<usize>,
    label_seq_id: Option<usize>,
    cartn_x: usize,
    cartn_y: usize,
    cartn_z: usize,
    occupancy: Option<usize>,
    b_iso: Option<usize>,
    type_symbol: Option<usize>,
}

impl AtomSiteIndices {
    /// Maps the loop header to column positions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when any of the three coordinate columns is missing, since no
    /// row of such a table can yield an atom.
    fn from_table(table: &CifTable) -> Result<Self, Error> {
        let required = |field: &str| {
            table.column(field).ok_or_else(|| {
                Error::parse(
                    FORMAT,
                    table.line_number,
                    format!("_atom_site.{field} column is required"),
                )
            })
        };

        Ok(Self {
            group_pdb: table.column("group_pdb"),
            id: table.column("id"),
            auth_atom_id: table.column("auth_atom_id"),
            label_atom_id: table.column("label_atom_id"),
            auth_comp_id: table.column("auth_comp_id"),
            label_comp_id: table.column("label_comp_id"),
            auth_asym_id: table.column("auth_asym_id"),
            label_asym_id: table.column("label_asym_id"),
            auth_seq_id: table.column("auth_seq_id"),
            label_seq_id: table.column("label_seq_id"),
            cartn_x: required("cartn_x")?,
            cartn_y: required("cartn_y")?,
            cartn_z: required("cartn_z")?,
            occupancy: table.column("occupancy"),
            b_iso: table.column("b_iso_or_equiv"),
            type_symbol: table.column("type_symbol"),
        })
    }
}

/// Parses mmCIF text into reader-neutral records.
///
/// Atoms come from `_atom_site` in row order. Metadata, secondary structure, and
/// `_struct_conn` connectivity come from their respective categories when present. A
/// category written as key-value items is read as a table with one row.
///
/// # Arguments
///
/// * `text` - Full file contents already classified as mmCIF.
///
/// # Errors
///
/// Returns [`Error::Parse`] when `_atom_site` lacks a coordinate column. Rows with
/// quoting problems, wrong value counts, or unusable coordinates are skipped and counted.
pub(crate) fn read(text: &str) -> Result<ParsedSource, Error> {
    let data = parse_block(text);
    let mut source = ParsedSource::new(Format::Tag);
    source.skipped.rows = data.skipped_rows;

    if let Some(table) = data.table("atom_site") {
        read_atom_site(&table, &mut source)?;
    }

    source.metadata = read_metadata(&data);
    source.secondary = read_secondary_structure(&data);
    source.connections = read_struct_conn(&data, &mut source.skipped);

    log::debug!(
        "mmCIF reader collected {} atoms, {} secondary ranges, {} connections ({} rows and {} atoms skipped)",
        source.atoms.len(),
        source.secondary.len(),
        source.connections.len(),
        source.skipped.rows,
        source.skipped.atoms
    );

    Ok(source)
}

fn read_atom_site(table: &CifTable, source: &mut ParsedSource) -> Result<(), Error> {
    let indices = AtomSiteIndices::from_table(table)?;

    for row in &table.rows {
        match parse_atom_row(row, &indices) {
            Some(atom) => source.atoms.push(atom),
            None => {
                source.skipped.atoms += 1;
                log::warn!(
                    "mmCIF line {}: skipping _atom_site row with malformed coordinates",
                    row.line_number
                );
            }
        }
    }

    Ok(())
}

fn parse_coordinate(row: &CifRow, column: usize) -> Option<f64> {
    row.get(Some(column))?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn preferred<'a>(row: &'a CifRow, auth: Option<usize>, label: Option<usize>) -> Option<&'a str> {
    row.get(auth).or_else(|| row.get(label))
}

fn parse_atom_row(row: &CifRow, indices: &AtomSiteIndices) -> Option<AtomRecord> {
    let x = parse_coordinate(row, indices.cartn_x)?;
    let y = parse_coordinate(row, indices.cartn_y)?;
    let z = parse_coordinate(row, indices.cartn_z)?;

    let name = preferred(row, indices.auth_atom_id, indices.label_atom_id);
    let residue_name = preferred(row, indices.auth_comp_id, indices.label_comp_id);
    let is_hetatm = row
        .get(indices.group_pdb)
        .is_some_and(|group| group.eq_ignore_ascii_case("HETATM"));

    let element = row
        .get(indices.type_symbol)
        .and_then(normalize_element)
        .or_else(|| name.and_then(|name| infer_element(name, residue_name, is_hetatm)))
        .unwrap_or(UNKNOWN_ELEMENT);

    Some(AtomRecord {
        serial: row.get(indices.id).and_then(|v| v.parse().ok()),
        name: name.map(SmolStr::new),
        residue_name: residue_name.map(SmolStr::new),
        chain_id: preferred(row, indices.auth_asym_id, indices.label_asym_id).map(SmolStr::new),
        residue_seq: preferred(row, indices.auth_seq_id, indices.label_seq_id)
            .and_then(|v| v.parse().ok()),
        pos: Point::new(x, y, z),
        occupancy: row.get(indices.occupancy).and_then(|v| v.parse().ok()),
        b_factor: row.get(indices.b_iso).and_then(|v| v.parse().ok()),
        element: SmolStr::new(element),
        is_hetatm,
    })
}

/// Infers an element from an unjustified mmCIF atom name when `type_symbol` is absent.
///
/// The name is laid out the way a PDB atom-name field would be: left-justified when it
/// likely names a two-letter element (an ion whose residue carries the same name, or a
/// two-letter hetero atom not led by C, N, O, or H), right-shifted otherwise, so `CA` in a
/// protein stays carbon while `FE` in a heme group becomes iron.
fn infer_element(name: &str, residue_name: Option<&str>, is_hetatm: bool) -> Option<&'static str> {
    let is_ion = residue_name.is_some_and(|residue| residue.eq_ignore_ascii_case(name));
    let two_letter_hetero = is_hetatm
        && name.len() == 2
        && name.bytes().all(|b| b.is_ascii_alphabetic())
        && !matches!(name.as_bytes()[0].to_ascii_uppercase(), b'C' | b'N' | b'O' | b'H');

    let field = if is_ion || two_letter_hetero {
        format!("{name:<4}")
    } else {
        format!(" {name}")
    };
    infer_element_from_name(&field)
}

fn read_metadata(data: &CifData) -> SourceMetadata {
    let mut metadata = SourceMetadata {
        id: data
            .first("entry", "id")
            .or(data.block_name.as_deref())
            .filter(|id| !id.is_empty())
            .map(str::to_string),
        title: data.first("struct", "title").map(str::to_string),
        deposition_date: data
            .first("pdbx_database_status", "recvd_initial_deposition_date")
            .map(str::to_string),
        classification: data
            .first("struct_keywords", "pdbx_keywords")
            .map(str::to_string),
        ..SourceMetadata::default()
    };

    metadata.resolution = RESOLUTION_SOURCES.iter().find_map(|(category, field)| {
        data.first(category, field)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v > 0.0)
    });

    if let Some(exptl) = data.category("exptl") {
        let methods = exptl.values("method");
        if !methods.is_empty() {
            metadata.method = Some(methods.join(", "));
        }
    }

    if let Some(authors) = data.category("audit_author") {
        for name in authors.values("name") {
            push_unique(&mut metadata.authors, name);
        }
    }

    for (category, field) in ORGANISM_SOURCES {
        if let Some(category) = data.category(category) {
            for organism in category.values(field) {
                push_unique(&mut metadata.organisms, organism);
            }
        }
    }

    metadata
}

/// Column pair naming one end of a range or connection, `auth_*` preferred.
struct SiteColumns {
    asym: (Option<usize>, Option<usize>),
    seq: (Option<usize>, Option<usize>),
}

impl SiteColumns {
    fn new(table: &CifTable, prefix: &str) -> Self {
        let pair = |field: &str| {
            (
                table.column(&format!("{prefix}_auth_{field}")),
                table.column(&format!("{prefix}_label_{field}")),
            )
        };
        Self {
            asym: pair("asym_id"),
            seq: pair("seq_id"),
        }
    }

    fn chain<'a>(&self, row: &'a CifRow) -> Option<&'a str> {
        preferred(row, self.asym.0, self.asym.1)
    }

    fn seq(&self, row: &CifRow) -> Option<i32> {
        preferred(row, self.seq.0, self.seq.1)?.parse().ok()
    }
}

fn read_secondary_structure(data: &CifData) -> Vec<SecondaryRange> {
    let mut ranges = Vec::new();

    if let Some(table) = data.table("struct_conf") {
        let conf_type = table.column("conf_type_id");
        let begin = SiteColumns::new(&table, "beg");
        let end = SiteColumns::new(&table, "end");
        for row in &table.rows {
            let is_helix = row
                .get(conf_type)
                .is_some_and(|t| t.to_ascii_uppercase().starts_with("HELX"));
            if is_helix {
                ranges.extend(site_range(row, SecondaryStructure::Helix, &begin, &end));
            }
        }
    }

    if let Some(table) = data.table("struct_sheet_range") {
        let begin = SiteColumns::new(&table, "beg");
        let end = SiteColumns::new(&table, "end");
        for row in &table.rows {
            ranges.extend(site_range(row, SecondaryStructure::Sheet, &begin, &end));
        }
    }

    ranges
}

fn site_range(
    row: &CifRow,
    kind: SecondaryStructure,
    begin: &SiteColumns,
    end: &SiteColumns,
) -> Option<SecondaryRange> {
    let chain_id = begin.chain(row)?;
    if end.chain(row).is_some_and(|end_chain| end_chain != chain_id) {
        return None;
    }
    let start_seq = begin.seq(row)?;
    let end_seq = end.seq(row)?;

    Some(SecondaryRange {
        kind,
        chain_id: SmolStr::new(chain_id),
        start_seq: start_seq.min(end_seq),
        end_seq: start_seq.max(end_seq),
    })
}

/// Maps `_struct_conn.pdbx_value_order` to a bond-order code.
///
/// An absent order means single. `quad` and unrecognized values map to codes the builder
/// rejects.
fn value_order_code(value: Option<&str>) -> u8 {
    match value {
        None => BondOrder::Single.code(),
        Some(v) if v.eq_ignore_ascii_case("quad") => BondOrder::Aromatic.code() + 1,
        Some(v) => BondOrder::from_str(v).map_or(INVALID_ORDER, |order| order.code()),
    }
}

/// Collects `_struct_conn` connections, skipping hydrogen bonds.
///
/// Rows that do not name both partner atoms are dropped and counted in `skipped.bonds`.
fn read_struct_conn(data: &CifData, skipped: &mut SkippedRecords) -> Vec<Connection> {
    let Some(table) = data.table("struct_conn") else {
        return Vec::new();
    };

    let conn_type = table.column("conn_type_id");
    let order = table.column("pdbx_value_order");
    let partners = ["ptnr1", "ptnr2"].map(|prefix| {
        (
            SiteColumns::new(&table, prefix),
            table.column(&format!("{prefix}_auth_atom_id")),
            table.column(&format!("{prefix}_label_atom_id")),
        )
    });

    let site = |row: &CifRow, index: usize| -> Option<AtomRef> {
        let (columns, auth_atom, label_atom) = &partners[index];
        Some(AtomRef::Site {
            chain_id: SmolStr::new(columns.chain(row)?),
            residue_seq: columns.seq(row)?,
            atom_name: SmolStr::new(preferred(row, *auth_atom, *label_atom)?),
        })
    };

    let mut connections = Vec::new();
    for row in &table.rows {
        if row
            .get(conn_type)
            .is_some_and(|t| t.eq_ignore_ascii_case("hydrog"))
        {
            continue;
        }
        match (site(row, 0), site(row, 1)) {
            (Some(from), Some(to)) => connections.push(Connection {
                from,
                to,
                order: value_order_code(row.get(order)),
            }),
            _ => {
                skipped.bonds += 1;
                log::warn!(
                    "mmCIF line {}: _struct_conn row does not name both partner atoms",
                    row.line_number
                );
            }
        }
    }

    connections
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATOM_SITE: &str = "\
data_TEST
_entry.id TEST
#
loop_
_atom_site.group_PDB
_atom_site.id
_atom_site.type_symbol
_atom_site.label_atom_id
_atom_site.label_comp_id
_atom_site.label_asym_id
_atom_site.label_seq_id
_atom_site.Cartn_x
_atom_site.Cartn_y
_atom_site.Cartn_z
_atom_site.occupancy
_atom_site.B_iso_or_equiv
_atom_site.auth_seq_id
_atom_site.auth_asym_id
ATOM   1 N N   ALA A 1 11.104 13.207 2.123 1.00 20.00 10 B
ATOM   2 C CA  ALA A 1 12.560 13.207 2.123 1.00 21.00 10 B
HETATM 3 O O   HOH C . 1.000 2.000 3.000 1.00 30.00 201 W
#
";

    #[test]
    fn read_maps_atom_site_rows_in_order() {
        let source = read(ATOM_SITE).unwrap();

        assert_eq!(source.format, Format::Tag);
        assert_eq!(source.atoms.len(), 3);
        let serials: Vec<_> = source.atoms.iter().map(|a| a.serial).collect();
        assert_eq!(serials, vec![Some(1), Some(2), Some(3)]);

        let ca = &source.atoms[1];
        assert_eq!(ca.name.as_deref(), Some("CA"));
        assert_eq!(ca.element, "C");
        assert_eq!(ca.residue_name.as_deref(), Some("ALA"));
        assert_eq!(ca.chain_id.as_deref(), Some("B"), "auth_asym_id preferred");
        assert_eq!(ca.residue_seq, Some(10), "auth_seq_id preferred");
        assert_eq!(ca.b_factor, Some(21.0));
        assert!(!ca.is_hetatm);

        let water = &source.atoms[2];
        assert!(water.is_hetatm);
        assert_eq!(water.residue_seq, Some(201));
        assert_eq!(source.metadata.id.as_deref(), Some("TEST"));
    }

    #[test]
    fn read_falls_back_to_label_columns() {
        let cif = "\
data_X
loop_
_atom_site.label_atom_id
_atom_site.label_asym_id
_atom_site.label_seq_id
_atom_site.auth_seq_id
_atom_site.Cartn_x
_atom_site.Cartn_y
_atom_site.Cartn_z
CA A 5 ? 0.0 0.0 0.0
";
        let atom = &read(cif).unwrap().atoms[0];
        assert_eq!(atom.chain_id.as_deref(), Some("A"));
        assert_eq!(atom.residue_seq, Some(5));
        assert_eq!(atom.element, "C", "inferred from the atom name");
    }

    #[test]
    fn read_skips_row_with_non_numeric_coordinate() {
        let cif = ATOM_SITE.replace("12.560", "abc");
        let source = read(&cif).unwrap();

        assert_eq!(source.atoms.len(), 2);
        assert_eq!(source.skipped.atoms, 1);
        let serials: Vec<_> = source.atoms.iter().map(|a| a.serial).collect();
        assert_eq!(serials, vec![Some(1), Some(3)]);
    }

    #[test]
    fn read_counts_rows_with_wrong_value_counts() {
        let cif = ATOM_SITE.replace("HETATM 3 O O   HOH C .", "HETATM 3 O O   HOH C");
        let source = read(&cif).unwrap();

        assert_eq!(source.atoms.len(), 2);
        assert_eq!(source.skipped.rows, 1);
    }

    #[test]
    fn missing_coordinate_column_is_a_parse_error() {
        let cif = "data_X\nloop_\n_atom_site.id\n_atom_site.Cartn_x\n_atom_site.Cartn_y\n1 0.0 0.0\n";
        let err = read(cif).unwrap_err();
        assert_eq!(
            err,
            Error::parse("mmCIF", 2, "_atom_site.cartn_z column is required")
        );
    }

    #[test]
    fn read_without_atom_site_yields_no_atoms() {
        let source = read("data_X\n_entry.id X\n").unwrap();
        assert!(source.atoms.is_empty());
    }

    #[test]
    fn read_metadata_from_categories() {
        let cif = "\
data_1ABC
_entry.id 1ABC
_struct.title 'Crystal structure of a test protein'
_struct_keywords.pdbx_keywords HYDROLASE
_exptl.method 'X-RAY DIFFRACTION'
_refine.ls_d_res_high 1.85
_pdbx_database_status.recvd_initial_deposition_date 2001-02-03
#
loop_
_audit_author.name
_audit_author.pdbx_ordinal
'Smith, J.' 1
'Doe, A.' 2
#
_entity_src_gen.pdbx_gene_src_scientific_name 'Homo sapiens'
_entity_src_nat.pdbx_organism_scientific 'Homo sapiens'
";
        let metadata = read_metadata(&parse_block(cif));

        assert_eq!(metadata.id.as_deref(), Some("1ABC"));
        assert_eq!(
            metadata.title.as_deref(),
            Some("Crystal structure of a test protein")
        );
        assert_eq!(metadata.classification.as_deref(), Some("HYDROLASE"));
        assert_eq!(metadata.method.as_deref(), Some("X-RAY DIFFRACTION"));
        assert_eq!(metadata.resolution, Some(1.85));
        assert_eq!(metadata.deposition_date.as_deref(), Some("2001-02-03"));
        assert_eq!(metadata.authors, vec!["Smith, J.", "Doe, A."]);
        assert_eq!(metadata.organisms, vec!["Homo sapiens"]);
    }

    #[test]
    fn resolution_falls_back_through_sources() {
        let cif = "data_X\n_refine.ls_d_res_high ?\n_em_3d_reconstruction.resolution 3.2\n";
        assert_eq!(read_metadata(&parse_block(cif)).resolution, Some(3.2));
    }

    #[test]
    fn secondary_structure_from_conf_and_sheet_range() {
        let cif = "\
data_X
loop_
_struct_conf.conf_type_id
_struct_conf.beg_auth_asym_id
_struct_conf.beg_auth_seq_id
_struct_conf.end_auth_asym_id
_struct_conf.end_auth_seq_id
HELX_P A 2 A 8
TURN_P A 9 A 10
#
loop_
_struct_sheet_range.sheet_id
_struct_sheet_range.beg_label_asym_id
_struct_sheet_range.beg_label_seq_id
_struct_sheet_range.end_label_asym_id
_struct_sheet_range.end_label_seq_id
S1 B 20 B 15
#
";
        let ranges = read_secondary_structure(&parse_block(cif));
        assert_eq!(
            ranges,
            vec![
                SecondaryRange {
                    kind: SecondaryStructure::Helix,
                    chain_id: "A".into(),
                    start_seq: 2,
                    end_seq: 8,
                },
                SecondaryRange {
                    kind: SecondaryStructure::Sheet,
                    chain_id: "B".into(),
                    start_seq: 15,
                    end_seq: 20,
                },
            ]
        );
    }

    #[test]
    fn struct_conn_rows_become_site_connections() {
        let cif = "\
data_X
loop_
_struct_conn.id
_struct_conn.conn_type_id
_struct_conn.ptnr1_auth_asym_id
_struct_conn.ptnr1_auth_seq_id
_struct_conn.ptnr1_label_atom_id
_struct_conn.ptnr2_auth_asym_id
_struct_conn.ptnr2_auth_seq_id
_struct_conn.ptnr2_label_atom_id
_struct_conn.pdbx_value_order
disulf1 disulf A 3 SG A 40 SG ?
covale1 covale A 5 C B 1 N doub
hydrog1 hydrog A 7 O A 11 N ?
covale2 covale A 6 C B 2 N quad
";
        let mut skipped = SkippedRecords::default();
        let connections = read_struct_conn(&parse_block(cif), &mut skipped);

        assert_eq!(connections.len(), 3);
        assert_eq!(skipped.bonds, 0, "hydrogen bonds are not counted as dropped");
        assert_eq!(
            connections[0],
            Connection {
                from: AtomRef::Site {
                    chain_id: "A".into(),
                    residue_seq: 3,
                    atom_name: "SG".into(),
                },
                to: AtomRef::Site {
                    chain_id: "A".into(),
                    residue_seq: 40,
                    atom_name: "SG".into(),
                },
                order: 1,
            }
        );
        assert_eq!(connections[1].order, 2);
        assert!(BondOrder::from_code(connections[2].order).is_none());
    }

    #[test]
    fn struct_conn_rows_missing_a_partner_are_counted() {
        let cif = "\
data_X
loop_
_struct_conn.id
_struct_conn.ptnr1_auth_asym_id
_struct_conn.ptnr1_auth_seq_id
_struct_conn.ptnr1_auth_atom_id
_struct_conn.ptnr2_auth_asym_id
_struct_conn.ptnr2_auth_seq_id
_struct_conn.ptnr2_auth_atom_id
c1 A 3 SG A 40 SG
c2 A 3 SG ? ? ?
";
        let source = read(cif).unwrap();

        assert_eq!(source.connections.len(), 1);
        assert_eq!(source.skipped.bonds, 1);
    }

    #[test]
    fn key_value_struct_conn_becomes_one_connection() {
        let cif = "\
data_X
_struct_conn.id                 disulf1
_struct_conn.conn_type_id       disulf
_struct_conn.ptnr1_auth_asym_id A
_struct_conn.ptnr1_auth_seq_id  3
_struct_conn.ptnr1_label_atom_id SG
_struct_conn.ptnr2_auth_asym_id A
_struct_conn.ptnr2_auth_seq_id  40
_struct_conn.ptnr2_label_atom_id SG
_struct_conn.pdbx_value_order   ?
";
        let source = read(cif).unwrap();

        assert_eq!(
            source.connections,
            vec![Connection {
                from: AtomRef::Site {
                    chain_id: "A".into(),
                    residue_seq: 3,
                    atom_name: "SG".into(),
                },
                to: AtomRef::Site {
                    chain_id: "A".into(),
                    residue_seq: 40,
                    atom_name: "SG".into(),
                },
                order: 1,
            }]
        );
        assert_eq!(source.skipped.bonds, 0);
    }

    #[test]
    fn key_value_atom_site_yields_one_atom() {
        let cif = "\
data_ZN
_atom_site.group_PDB     HETATM
_atom_site.id            1
_atom_site.label_atom_id ZN
_atom_site.label_comp_id ZN
_atom_site.label_asym_id A
_atom_site.auth_seq_id   101
_atom_site.Cartn_x       1.500
_atom_site.Cartn_y       -2.250
_atom_site.Cartn_z       0.125
";
        let source = read(cif).unwrap();

        assert_eq!(source.atoms.len(), 1);
        let atom = &source.atoms[0];
        assert_eq!(atom.pos, Point::new(1.5, -2.25, 0.125));
        assert_eq!(atom.element, "Zn");
        assert_eq!(atom.residue_seq, Some(101));
        assert!(atom.is_hetatm);
    }

    #[test]
    fn key_value_atom_site_without_coordinates_is_a_parse_error() {
        let cif = "data_X\n_atom_site.id 1\n_atom_site.Cartn_x 0.0\n";
        let err = read(cif).unwrap_err();
        assert_eq!(
            err,
            Error::parse("mmCIF", 2, "_atom_site.cartn_y column is required")
        );
    }

    #[test]
    fn key_value_struct_conf_marks_one_helix() {
        let cif = "\
data_X
_struct_conf.conf_type_id       HELX_P
_struct_conf.beg_auth_asym_id   A
_struct_conf.beg_auth_seq_id    4
_struct_conf.end_auth_asym_id   A
_struct_conf.end_auth_seq_id    9
";
        let ranges = read_secondary_structure(&parse_block(cif));
        assert_eq!(
            ranges,
            vec![SecondaryRange {
                kind: SecondaryStructure::Helix,
                chain_id: "A".into(),
                start_seq: 4,
                end_seq: 9,
            }]
        );
    }

    #[test]
    fn element_inference_keeps_protein_names_and_reads_metals() {
        assert_eq!(infer_element("CA", Some("ALA"), false), Some("C"));
        assert_eq!(infer_element("CA", Some("CA"), true), Some("Ca"));
        assert_eq!(infer_element("FE", Some("HEM"), true), Some("Fe"));
        assert_eq!(infer_element("NA", Some("HEM"), true), Some("N"));
        assert_eq!(infer_element("HG", Some("SER"), false), Some("H"));
        assert_eq!(infer_element("ZN", None, true), Some("Zn"));
        assert_eq!(infer_element("O5'", Some("DA"), false), Some("O"));
    }

    #[test]
    fn value_order_codes() {
        assert_eq!(value_order_code(None), 1);
        assert_eq!(value_order_code(Some("sing")), 1);
        assert_eq!(value_order_code(Some("trip")), 3);
        assert_eq!(value_order_code(Some("arom")), 4);
        assert_eq!(value_order_code(Some("quad")), 5);
        assert_eq!(value_order_code(Some("weird")), INVALID_ORDER);
    }
}
