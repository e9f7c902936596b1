use crate::utils::{PayrollSortError, Result};
use csv::{ReaderBuilder, StringRecord};
use std::path::Path;

pub const SOURCE_DELIMITER: u8 = b';';

/// One parsed record. `line` is where it started in the source file.
///
/// An empty line is a row with no fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub line: u64,
    pub fields: Vec<String>,
}

impl Row {
    pub fn new(line: u64, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Every data row of a source file, in input order, with the header removed.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub header: Option<Row>,
    pub rows: Vec<Row>,
}

impl Dataset {
    /// Splits off the first row unconditionally.
    pub fn from_rows(mut rows: Vec<Row>) -> Self {
        if rows.is_empty() {
            return Self::default();
        }
        let header = rows.remove(0);
        Self {
            header: Some(header),
            rows,
        }
    }

    /// Records in the source, header included.
    pub fn rows_read(&self) -> usize {
        self.rows.len() + usize::from(self.header.is_some())
    }
}

/// Maps byte offsets to 1-based line numbers. Offsets must not decrease.
struct LineCounter<'a> {
    data: &'a [u8],
    offset: usize,
    line: u64,
}

impl<'a> LineCounter<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            line: 1,
        }
    }

    fn line_at(&mut self, offset: usize) -> u64 {
        let offset = offset.min(self.data.len()).max(self.offset);
        self.line += self.data[self.offset..offset]
            .iter()
            .filter(|&&b| b == b'\n')
            .count() as u64;
        self.offset = offset;
        self.line
    }
}

/// Empty lines starting at `start`, which the csv parser passes over
/// without yielding a record. Returns their offsets and the offset of the
/// first byte after them.
fn empty_lines(data: &[u8], start: usize) -> (Vec<usize>, usize) {
    let mut at = start;
    // Tail of the previous record's `\r\n`.
    if at > 0 && data[at - 1] == b'\r' && data.get(at) == Some(&b'\n') {
        at += 1;
    }

    let mut offsets = Vec::new();
    while let Some(&b) = data.get(at) {
        match b {
            b'\n' => at += 1,
            b'\r' if data.get(at + 1) == Some(&b'\n') => at += 2,
            b'\r' => at += 1,
            _ => break,
        }
        offsets.push(at - 1);
    }
    (offsets, at)
}

/// Parses `;`-delimited bytes into rows, one per line or quoted record.
pub fn parse_rows(data: &[u8]) -> Result<Vec<Row>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(SOURCE_DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(data);
    let mut lines = LineCounter::new(data);

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    loop {
        let (blanks, record_start) = empty_lines(data, reader.position().byte() as usize);
        for offset in blanks {
            rows.push(Row::new(lines.line_at(offset), Vec::new()));
        }

        match reader.read_record(&mut record) {
            Ok(true) => rows.push(Row::new(
                lines.line_at(record_start),
                record.iter().map(String::from).collect(),
            )),
            Ok(false) => break,
            Err(e) => {
                return Err(PayrollSortError::MalformedRecord {
                    line: lines.line_at(record_start),
                    source: e,
                });
            }
        }
    }
    Ok(rows)
}

pub fn read_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| PayrollSortError::SourceUnavailable {
        path: path.to_path_buf(),
        source: e,
    })?;

    let dataset = Dataset::from_rows(parse_rows(&data)?);
    if let Some(header) = &dataset.header {
        tracing::debug!("Dropped header with {} fields", header.len());
    }
    tracing::info!(
        "Read {} data rows from {}",
        dataset.rows.len(),
        path.display()
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ErrorKind;
    use std::io::Write;

    fn source_file(content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn drops_header_and_keeps_order() {
        let file = source_file(b"H0;H1;H2;H3;H4\nA;B;10;C;zeta\nD;E;2;F;alpha\n");
        let dataset = read_dataset(file.path()).unwrap();

        assert_eq!(dataset.header.as_ref().unwrap().get(4), Some("H4"));
        assert_eq!(dataset.rows.len(), 2);
        assert_eq!(dataset.rows_read(), 3);
        assert_eq!(dataset.rows[0].get(4), Some("zeta"));
        assert_eq!(dataset.rows[0].line, 2);
        assert_eq!(dataset.rows[1].get(4), Some("alpha"));
        assert_eq!(dataset.rows[1].line, 3);
    }

    #[test]
    fn empty_and_header_only_sources_yield_no_rows() {
        let empty = source_file(b"");
        let dataset = read_dataset(empty.path()).unwrap();
        assert!(dataset.header.is_none());
        assert!(dataset.rows.is_empty());
        assert_eq!(dataset.rows_read(), 0);

        let header_only = source_file(b"H0;H1;H2;H3;H4\n");
        let dataset = read_dataset(header_only.path()).unwrap();
        assert!(dataset.header.is_some());
        assert!(dataset.rows.is_empty());
    }

    #[test]
    fn quoted_fields_keep_semicolons_and_quotes() {
        let file = source_file(b"h\n\"a;b\";\"say \"\"hi\"\"\";3;x;\"SILVA, ANA\"\n");
        let dataset = read_dataset(file.path()).unwrap();

        let row = &dataset.rows[0];
        assert_eq!(row.len(), 5);
        assert_eq!(row.get(0), Some("a;b"));
        assert_eq!(row.get(1), Some("say \"hi\""));
        assert_eq!(row.get(4), Some("SILVA, ANA"));
    }

    #[test]
    fn ragged_rows_are_kept_as_read() {
        let file = source_file(b"h;h;h;h;h\n1;2;3\n1;2;3;4;5;6\n");
        let dataset = read_dataset(file.path()).unwrap();
        assert_eq!(dataset.rows[0].len(), 3);
        assert_eq!(dataset.rows[1].len(), 6);
    }

    #[test]
    fn fields_are_not_trimmed() {
        let file = source_file(b"h\n a ; b ; 3 ;d; e \n");
        let dataset = read_dataset(file.path()).unwrap();
        assert_eq!(dataset.rows[0].get(2), Some(" 3 "));
        assert_eq!(dataset.rows[0].get(4), Some(" e "));
    }

    #[test]
    fn missing_source_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_dataset(dir.path().join("absent.csv")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn invalid_utf8_is_a_format_error_with_line() {
        let file = source_file(b"h;h;h;h;h\nA;B;1;C;ok\nA;B;2;C;\xff\xfe\n");
        let err = read_dataset(file.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(err.line(), Some(3));
    }

    fn lines_and_widths(rows: &[Row]) -> Vec<(u64, usize)> {
        rows.iter().map(|r| (r.line, r.len())).collect()
    }

    #[test]
    fn blank_line_between_records_is_an_empty_row() {
        let rows = parse_rows(b"h;h;h;h;h\nA;B;1;C;x\n\nA;B;2;C;y\n").unwrap();
        assert_eq!(lines_and_widths(&rows), vec![(1, 5), (2, 5), (3, 0), (4, 5)]);
        assert!(rows[2].is_empty());
    }

    #[test]
    fn leading_blank_line_becomes_the_header() {
        let file = source_file(b"\nH0;H1;H2;H3;H4\nA;B;1;C;x\n");
        let dataset = read_dataset(file.path()).unwrap();

        assert!(dataset.header.as_ref().unwrap().is_empty());
        assert_eq!(dataset.rows.len(), 2);
        assert_eq!(dataset.rows[0].get(2), Some("H2"));
        assert_eq!(dataset.rows[0].line, 2);
    }

    #[test]
    fn trailing_blank_lines_are_rows() {
        let rows = parse_rows(b"h\nA;B;1;C;x\n\n\n").unwrap();
        assert_eq!(lines_and_widths(&rows), vec![(1, 1), (2, 5), (3, 0), (4, 0)]);

        let rows = parse_rows(b"h\nA;B;1;C;x\n").unwrap();
        assert_eq!(lines_and_widths(&rows), vec![(1, 1), (2, 5)]);
    }

    #[test]
    fn crlf_terminators_are_not_blank_lines() {
        let rows = parse_rows(b"h\r\nA;B;1;C;x\r\nA;B;2;C;y\r\n").unwrap();
        assert_eq!(lines_and_widths(&rows), vec![(1, 1), (2, 5), (3, 5)]);

        let rows = parse_rows(b"h\r\n\r\nA;B;1;C;x\r\n").unwrap();
        assert_eq!(lines_and_widths(&rows), vec![(1, 1), (2, 0), (3, 5)]);
    }

    #[test]
    fn empty_line_inside_quoted_field_is_content() {
        let rows = parse_rows(b"h\nA;\"x\n\ny\";1;C;n\nA;B;2;C;m\n").unwrap();
        assert_eq!(lines_and_widths(&rows), vec![(1, 1), (2, 5), (5, 5)]);
        assert_eq!(rows[1].get(1), Some("x\n\ny"));
    }
}
