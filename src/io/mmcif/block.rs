//! Generic mmCIF data-block parsing: tokenizer, key-value items, loop tables, text fields.
//!
//! Only the first `data_` block of a file is read. Tags are stored lower-cased and split into
//! category and field at the first `.`, so `_atom_site.Cartn_x` lands in category
//! `atom_site` under field `cartn_x`.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::iter::{Enumerate, Peekable};
use std::str::Lines;

type LineIter<'a> = Peekable<Enumerate<Lines<'a>>>;

/// Values that mark a field as inapplicable (`.`) or unknown (`?`).
pub(crate) fn present(value: &str) -> Option<&str> {
    match value {
        "" | "." | "?" => None,
        other => Some(other),
    }
}

/// One data row of a loop table.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CifRow {
    pub line_number: usize,
    pub values: Vec<String>,
}

impl CifRow {
    /// Value at `column`, `None` when the column is absent or the value is `.`/`?`.
    pub fn get(&self, column: Option<usize>) -> Option<&str> {
        self.values.get(column?).map(String::as_str).and_then(present)
    }
}

/// A `loop_` table: ordered column names and rows of exactly that many values.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct CifTable {
    /// Line of the `loop_` keyword.
    pub line_number: usize,
    pub columns: Vec<String>,
    pub rows: Vec<CifRow>,
}

impl CifTable {
    pub fn column(&self, field: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == field)
    }
}

/// A category holds either one key-value record or a table of rows.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Category {
    Single {
        /// Line of the first item of the category.
        line_number: usize,
        fields: BTreeMap<String, String>,
    },
    Table(CifTable),
}

impl Category {
    /// First present value of `field`.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.values(field).into_iter().next()
    }

    /// Every present value of `field`, in row order.
    pub fn values(&self, field: &str) -> Vec<&str> {
        match self {
            Category::Single { fields, .. } => fields
                .get(field)
                .map(String::as_str)
                .and_then(present)
                .into_iter()
                .collect(),
            Category::Table(table) => {
                let column = table.column(field);
                table.rows.iter().filter_map(|row| row.get(column)).collect()
            }
        }
    }

    /// Row view of the category; a key-value record becomes a one-row table whose columns
    /// are its field names.
    pub fn as_table(&self) -> Cow<'_, CifTable> {
        match self {
            Category::Table(table) => Cow::Borrowed(table),
            Category::Single {
                line_number,
                fields,
            } => Cow::Owned(CifTable {
                line_number: *line_number,
                columns: fields.keys().cloned().collect(),
                rows: vec![CifRow {
                    line_number: *line_number,
                    values: fields.values().cloned().collect(),
                }],
            }),
        }
    }
}

/// Everything read from the first data block of a file.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct CifData {
    pub block_name: Option<String>,
    pub categories: BTreeMap<String, Category>,
    /// Loop rows and items dropped for quoting or column-count problems.
    pub skipped_rows: usize,
}

impl CifData {
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    /// Rows of `name`, whether it was written as a `loop_` or as key-value items.
    pub fn table(&self, name: &str) -> Option<Cow<'_, CifTable>> {
        self.category(name).map(Category::as_table)
    }

    /// First present value of `category.field`.
    pub fn first(&self, category: &str, field: &str) -> Option<&str> {
        self.category(category)?.first(field)
    }
}

/// A quoted token whose closing quote never appeared on the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UnterminatedQuote {
    pub column: usize,
}

/// Splits one line into whitespace-separated tokens.
///
/// A token starting with `'` or `"` runs until the same quote followed by whitespace or end
/// of line, so `'O5'` style primes stay literal inside a quoted name. Quotes that do not
/// start a token are ordinary characters. A `#` at a token start begins a comment.
///
/// # Errors
///
/// Returns [`UnterminatedQuote`] when a quoted token is not closed before end of line.
pub(crate) fn tokenize(line: &str) -> Result<Vec<&str>, UnterminatedQuote> {
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        if b == b'#' {
            break;
        }

        if b == b'\'' || b == b'"' {
            let start = i + 1;
            let mut j = start;
            let end = loop {
                if j >= bytes.len() {
                    return Err(UnterminatedQuote { column: i + 1 });
                }
                if bytes[j] == b && bytes.get(j + 1).is_none_or(|c| c.is_ascii_whitespace()) {
                    break j;
                }
                j += 1;
            };
            tokens.push(&line[start..end]);
            i = end + 1;
        } else {
            let start = i;
            while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            tokens.push(&line[start..i]);
        }
    }

    Ok(tokens)
}

fn split_tag(tag: &str) -> (String, String) {
    let tag = tag.trim_start_matches('_').to_ascii_lowercase();
    match tag.split_once('.') {
        Some((category, field)) => (category.to_string(), field.to_string()),
        None => (tag, String::new()),
    }
}

struct LoopState {
    category: String,
    table: CifTable,
    reading_rows: bool,
    pending: Vec<String>,
    pending_line: usize,
}

impl LoopState {
    fn new(line_number: usize) -> Self {
        Self {
            category: String::new(),
            table: CifTable {
                line_number,
                ..CifTable::default()
            },
            reading_rows: false,
            pending: Vec::new(),
            pending_line: line_number,
        }
    }
}

#[derive(Default)]
struct BlockParser {
    data: CifData,
    current_loop: Option<LoopState>,
    pending_key: Option<(String, String)>,
}

impl BlockParser {
    fn set_item(&mut self, category: String, field: String, value: String, line_number: usize) {
        let entry = self
            .data
            .categories
            .entry(category)
            .or_insert_with(|| Category::Single {
                line_number,
                fields: BTreeMap::new(),
            });
        match entry {
            Category::Single { fields, .. } => {
                fields.insert(field, value);
            }
            Category::Table(_) => {
                log::debug!("mmCIF: ignoring key-value item {field} for a looped category");
            }
        }
    }

    fn end_loop(&mut self) {
        let Some(state) = self.current_loop.take() else {
            return;
        };
        if !state.pending.is_empty() {
            self.data.skipped_rows += 1;
            log::warn!(
                "mmCIF line {}: dropping incomplete {} row ({} of {} values)",
                state.pending_line,
                state.category,
                state.pending.len(),
                state.table.columns.len()
            );
        }
        if state.table.columns.is_empty() {
            return;
        }
        self.data
            .categories
            .insert(state.category, Category::Table(state.table));
    }

    fn push_loop_value(&mut self, value: String, line_number: usize, row_may_continue: bool) {
        let Some(state) = self.current_loop.as_mut() else {
            return;
        };
        state.reading_rows = true;
        if state.pending.is_empty() {
            state.pending_line = line_number;
        }
        state.pending.push(value);
        self.flush_row(row_may_continue);
    }

    /// Emits the pending row once it has the declared number of values.
    ///
    /// A row only continues onto the next line when a text field is involved; a short plain
    /// line is dropped immediately so it cannot shift the columns of the rows after it.
    fn flush_row(&mut self, row_may_continue: bool) {
        let Some(state) = self.current_loop.as_mut() else {
            return;
        };
        let expected = state.table.columns.len();
        let found = state.pending.len();

        if found == expected {
            let values = std::mem::take(&mut state.pending);
            state.table.rows.push(CifRow {
                line_number: state.pending_line,
                values,
            });
        } else if found > expected || !row_may_continue {
            log::warn!(
                "mmCIF line {}: skipping {} row with {found} values, expected {expected}",
                state.pending_line,
                state.category
            );
            state.pending.clear();
            self.data.skipped_rows += 1;
        }
    }

    fn handle_text_field(&mut self, value: String, line_number: usize) {
        if let Some((category, field)) = self.pending_key.take() {
            self.set_item(category, field, value, line_number);
        } else if self
            .current_loop
            .as_ref()
            .is_some_and(|s| !s.table.columns.is_empty())
        {
            self.push_loop_value(value, line_number, true);
        } else {
            log::debug!("mmCIF line {line_number}: ignoring stray text field");
        }
    }

    fn handle_tag_line(&mut self, line: &str, line_number: usize) {
        if let Some(state) = self.current_loop.as_mut().filter(|s| !s.reading_rows) {
            let tag = line.split_whitespace().next().unwrap_or_default();
            let (category, field) = split_tag(tag);
            if state.category.is_empty() {
                state.category = category;
            }
            state.table.columns.push(field);
            return;
        }

        self.end_loop();
        self.pending_key = None;

        let tokens = match tokenize(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.data.skipped_rows += 1;
                log::warn!(
                    "mmCIF line {line_number}: skipping item with unterminated quote at column {}",
                    err.column
                );
                return;
            }
        };
        let Some((&tag, values)) = tokens.split_first() else {
            return;
        };
        let (category, field) = split_tag(tag);
        match values.first() {
            Some(value) => self.set_item(category, field, (*value).to_string(), line_number),
            None => self.pending_key = Some((category, field)),
        }
    }

    fn handle_data_line(&mut self, line: &str, line_number: usize, next_is_text_field: bool) {
        let tokens = match tokenize(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.data.skipped_rows += 1;
                if let Some(state) = self.current_loop.as_mut() {
                    state.pending.clear();
                }
                self.pending_key = None;
                log::warn!(
                    "mmCIF line {line_number}: skipping row with unterminated quote at column {}",
                    err.column
                );
                return;
            }
        };

        if let Some((category, field)) = self.pending_key.take() {
            if let Some(value) = tokens.first() {
                self.set_item(category, field, (*value).to_string(), line_number);
            }
            return;
        }

        let Some(state) = self.current_loop.as_mut() else {
            log::debug!("mmCIF line {line_number}: ignoring data outside any item or loop");
            return;
        };
        state.reading_rows = true;
        if state.table.columns.is_empty() {
            return;
        }
        if state.pending.is_empty() {
            state.pending_line = line_number;
        }
        state
            .pending
            .extend(tokens.into_iter().map(str::to_string));
        self.flush_row(next_is_text_field);
    }
}

/// Reads the body of a `;`-delimited text field whose opening line is `first`.
///
/// Returns `None` when input ends before the closing `;` line.
fn read_text_field(first: &str, lines: &mut LineIter<'_>) -> Option<String> {
    let mut buffer = first[1..].to_string();
    for (_, line) in lines.by_ref() {
        if line.starts_with(';') {
            return Some(buffer.trim().to_string());
        }
        buffer.push('\n');
        buffer.push_str(line);
    }
    None
}

/// Parses the first data block of `text` into categories.
///
/// Loops end at a blank line, a `#` comment line, `loop_`, a new tag, or a new `data_` block.
/// Malformed rows are dropped and counted in [`CifData::skipped_rows`]; nothing here fails
/// the whole parse.
pub(crate) fn parse_block(text: &str) -> CifData {
    let mut parser = BlockParser::default();
    let mut lines: LineIter<'_> = text.lines().enumerate().peekable();

    while let Some((idx, line)) = lines.next() {
        let line_number = idx + 1;

        if line.starts_with(';') {
            match read_text_field(line, &mut lines) {
                Some(value) => parser.handle_text_field(value, line_number),
                None => {
                    log::warn!("mmCIF line {line_number}: text field is never closed");
                    parser.data.skipped_rows += 1;
                    if let Some(state) = parser.current_loop.as_mut() {
                        state.pending.clear();
                    }
                    parser.pending_key = None;
                }
            }
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            parser.end_loop();
            continue;
        }

        if let Some(name) = line.strip_prefix("data_") {
            if parser.data.block_name.is_some() {
                log::debug!("mmCIF line {line_number}: ignoring data blocks after the first");
                break;
            }
            parser.end_loop();
            parser.data.block_name = Some(name.trim().to_string());
            continue;
        }

        if trimmed.eq_ignore_ascii_case("loop_") {
            parser.end_loop();
            parser.pending_key = None;
            parser.current_loop = Some(LoopState::new(line_number));
            continue;
        }

        if trimmed.starts_with('_') {
            parser.handle_tag_line(trimmed, line_number);
            continue;
        }

        let next_is_text_field = lines
            .peek()
            .is_some_and(|(_, next)| next.starts_with(';'));
        parser.handle_data_line(trimmed, line_number, next_is_text_field);
    }

    parser.end_loop();
    parser.data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_splits_on_whitespace_and_honours_quotes() {
        assert_eq!(
            tokenize("ATOM 1 C \"C5'\" 'two words' x").unwrap(),
            vec!["ATOM", "1", "C", "C5'", "two words", "x"]
        );
    }

    #[test]
    fn tokenize_keeps_quotes_inside_bare_words() {
        assert_eq!(tokenize("O5' don't").unwrap(), vec!["O5'", "don't"]);
    }

    #[test]
    fn tokenize_quote_closes_only_before_whitespace() {
        assert_eq!(tokenize("'it's here' next").unwrap(), vec!["it's here", "next"]);
    }

    #[test]
    fn tokenize_reports_unterminated_quote() {
        assert_eq!(
            tokenize("A 'unterminated value"),
            Err(UnterminatedQuote { column: 3 })
        );
    }

    #[test]
    fn tokenize_stops_at_comment() {
        assert_eq!(tokenize("a b # trailing").unwrap(), vec!["a", "b"]);
        assert_eq!(tokenize("a#b").unwrap(), vec!["a#b"]);
    }

    #[test]
    fn parse_block_reads_key_values_and_loops() {
        let cif = "\
data_1ABC
_entry.id 1ABC
_struct.title 'A small test'
#
loop_
_audit_author.name
_audit_author.pdbx_ordinal
'Smith, J.' 1
'Jones, K.' 2
#
";
        let data = parse_block(cif);

        assert_eq!(data.block_name.as_deref(), Some("1ABC"));
        assert_eq!(data.first("entry", "id"), Some("1ABC"));
        assert_eq!(data.first("struct", "title"), Some("A small test"));
        let authors = data.category("audit_author").unwrap().values("name");
        assert_eq!(authors, vec!["Smith, J.", "Jones, K."]);
        assert_eq!(data.skipped_rows, 0);
    }

    #[test]
    fn parse_block_reads_values_from_following_lines_and_text_fields() {
        let cif = "\
data_X
_struct.title
'Title on its own line'
_struct.pdbx_descriptor
;First line
second line
;
_exptl.method 'X-RAY DIFFRACTION'
";
        let data = parse_block(cif);

        assert_eq!(data.first("struct", "title"), Some("Title on its own line"));
        assert_eq!(
            data.first("struct", "pdbx_descriptor"),
            Some("First line\nsecond line")
        );
        assert_eq!(data.first("exptl", "method"), Some("X-RAY DIFFRACTION"));
    }

    #[test]
    fn key_value_category_reads_as_one_row_table() {
        let cif = "\
data_X
#
_struct_conn.id            disulf1
_struct_conn.conn_type_id  disulf
_struct_conn.ptnr1_auth_seq_id 3
_struct_conn.pdbx_value_order ?
#
";
        let data = parse_block(cif);
        let table = data.table("struct_conn").unwrap();

        assert_eq!(table.line_number, 3);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].line_number, 3);
        let row = &table.rows[0];
        assert_eq!(row.get(table.column("conn_type_id")), Some("disulf"));
        assert_eq!(row.get(table.column("ptnr1_auth_seq_id")), Some("3"));
        assert_eq!(row.get(table.column("pdbx_value_order")), None);
        assert!(data.table("atom_site").is_none());
    }

    #[test]
    fn parse_block_treats_placeholders_as_absent() {
        let cif = "data_X\n_refine.ls_d_res_high ?\n_struct.title .\n";
        let data = parse_block(cif);
        assert_eq!(data.first("refine", "ls_d_res_high"), None);
        assert_eq!(data.first("struct", "title"), None);
    }

    #[test]
    fn parse_block_skips_rows_with_bad_token_counts_or_quotes() {
        let cif = "\
data_X
loop_
_t.a
_t.b
_t.c
1 2 3
4 5
6 7 8 9
'bad 1 2
10 11 12
";
        let data = parse_block(cif);
        let table = data.table("t").unwrap();

        let rows: Vec<_> = table.rows.iter().map(|r| r.values.clone()).collect();
        assert_eq!(rows, vec![vec!["1", "2", "3"], vec!["10", "11", "12"]]);
        assert_eq!(table.rows[1].line_number, 10);
        assert_eq!(data.skipped_rows, 3);
    }

    #[test]
    fn parse_block_rows_may_span_text_fields() {
        let cif = "\
data_X
loop_
_entity_poly.entity_id
_entity_poly.type
_entity_poly.pdbx_seq_one_letter_code
_entity_poly.pdbx_strand_id
1 'polypeptide(L)'
;MKV
LLA
;
A
2 'polypeptide(L)' GG B
";
        let data = parse_block(cif);
        let table = data.table("entity_poly").unwrap();

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].values[2], "MKV\nLLA");
        assert_eq!(table.rows[0].values[3], "A");
        assert_eq!(table.rows[1].values, vec!["2", "polypeptide(L)", "GG", "B"]);
        assert_eq!(data.skipped_rows, 0);
    }

    #[test]
    fn loops_end_at_blank_lines_and_new_tags() {
        let cif = "\
data_X
loop_
_t.a
_t.b
1 2

3 4
_s.value 9
";
        let data = parse_block(cif);
        assert_eq!(data.table("t").unwrap().rows.len(), 1);
        assert_eq!(data.first("s", "value"), Some("9"));
    }

    #[test]
    fn only_the_first_data_block_is_read() {
        let cif = "data_A\n_entry.id A\ndata_B\n_entry.id B\n";
        let data = parse_block(cif);
        assert_eq!(data.block_name.as_deref(), Some("A"));
        assert_eq!(data.first("entry", "id"), Some("A"));
    }

    #[test]
    fn tags_are_case_insensitive() {
        let cif = "data_X\nloop_\n_ATOM_SITE.Cartn_X\n1.0\n";
        let data = parse_block(cif);
        assert_eq!(data.table("atom_site").unwrap().column("cartn_x"), Some(0));
    }
}
