use crate::text::decode;
use crate::types::{ConversionResult, ErrorKind, FileError};

const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];
const EMPTY_CSV_MARKDOWN: &str = "# CSV File\n\nEmpty CSV file.\n";

/// `.csv`: Markdown table whose rows all have the header's width.
///
/// The delimiter is sniffed from the first non-blank line. Short rows are
/// padded with empty cells and long rows truncated. An empty file is not an
/// error and renders an explicit marker.
pub fn csv_to_markdown(bytes: &[u8]) -> ConversionResult {
    let text = decode(bytes)?;
    let delimiter = sniff_delimiter(&text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record
            .map_err(|err| FileError::new(ErrorKind::Parse, format!("malformed CSV: {err}")))?;
        rows.push(record.iter().map(escape_cell).collect());
    }

    match rows.split_first() {
        None => Ok(EMPTY_CSV_MARKDOWN.to_string()),
        Some((header, data)) => Ok(render_table(header, data)),
    }
}

fn render_table(header: &[String], data: &[Vec<String>]) -> String {
    let width = header.len();
    let mut markdown = String::from("# CSV Data\n\n");
    markdown.push_str(&table_row(header));
    markdown.push_str(&table_row(&vec!["---".to_string(); width]));
    for row in data {
        let mut cells: Vec<String> = row.iter().take(width).cloned().collect();
        cells.resize(width, String::new());
        markdown.push_str(&table_row(&cells));
    }
    markdown
}

fn table_row(cells: &[String]) -> String {
    format!("| {} |\n", cells.join(" | "))
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}

/// Most frequent candidate in the first non-blank line; comma on a tie or none.
fn sniff_delimiter(text: &str) -> u8 {
    let first = text.lines().find(|line| !line.trim().is_empty()).unwrap_or("");
    let mut best = (b',', 0usize);
    for candidate in CANDIDATE_DELIMITERS {
        let count = first.bytes().filter(|b| *b == candidate).count();
        if count > best.1 {
            best = (candidate, count);
        }
    }
    best.0
}

#[cfg(test)]
mod tests {
    use super::sniff_delimiter;

    #[test]
    fn sniffs_semicolons_and_tabs() {
        assert_eq!(sniff_delimiter("a;b;c\n1;2;3"), b';');
        assert_eq!(sniff_delimiter("a\tb\n1\t2"), b'\t');
    }

    #[test]
    fn defaults_to_comma() {
        assert_eq!(sniff_delimiter("single"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }
}
