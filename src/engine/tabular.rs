//! Header extraction and streaming row count over decoded CSV text.
//!
//! Rows are logical lines: the text is split at line breaks, except where a break sits inside a
//! quoted field. A blank line is a row with no fields.

use csv::{ReaderBuilder, StringRecord};

use super::ContentError;

/// Parser output: the header row and the number of data records after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Parsed {
    Table {
        header: Vec<String>,
        data_row_count: u64,
    },
    /// The text has no lines at all.
    Empty,
}

/// Take the first logical line as the header (comma-delimited, quote-aware), then count the
/// remaining logical lines in one forward pass. Rows are never retained.
pub fn parse_table(text: &str) -> Result<Parsed, ContentError> {
    let mut lines = LogicalLines::new(text);
    let Some(first) = lines.next() else {
        return Ok(Parsed::Empty);
    };
    let header = split_header(first)?;
    let data_row_count = lines.count() as u64;

    Ok(Parsed::Table {
        header,
        data_row_count,
    })
}

/// Split one logical line into fields. A blank line has no fields.
fn split_header(line: &str) -> Result<Vec<String>, ContentError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    let mut record = StringRecord::new();
    if !rdr.read_record(&mut record)? {
        return Ok(Vec::new());
    }
    Ok(record.iter().map(str::to_string).collect())
}

/// Same break set as a universal-newline line splitter; `\r\n` is one break.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0B}'
            | '\u{0C}'
            | '\u{1C}'
            | '\u{1D}'
            | '\u{1E}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Where the scanner is within the current field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FieldState {
    Start,
    Unquoted,
    Quoted,
    /// Just saw a `"` inside a quoted field: either a close or the first half of `""`.
    QuoteInQuoted,
}

impl FieldState {
    fn step(self, c: char) -> Self {
        use FieldState::*;
        match (self, c) {
            (Start, '"') => Quoted,
            (Start | Unquoted | QuoteInQuoted, ',') => Start,
            (Start | Unquoted, _) => Unquoted,
            (Quoted, '"') => QuoteInQuoted,
            (Quoted, _) => Quoted,
            (QuoteInQuoted, '"') => Quoted,
            (QuoteInQuoted, _) => Unquoted,
        }
    }
}

/// Logical lines of `text`, without their terminating break. A trailing break does not open
/// another line; an unterminated quote runs to the end of the text.
struct LogicalLines<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> LogicalLines<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl<'a> Iterator for LogicalLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.pos >= self.text.len() {
            return None;
        }
        let rest = &self.text[self.pos..];
        let mut state = FieldState::Start;
        let mut chars = rest.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if state != FieldState::Quoted && is_line_break(c) {
                let mut consumed = i + c.len_utf8();
                if c == '\r'
                    && let Some(&(_, '\n')) = chars.peek()
                {
                    consumed += 1;
                }
                self.pos += consumed;
                return Some(&rest[..i]);
            }
            state = state.step(c);
        }
        self.pos = self.text.len();
        Some(rest)
    }
}
