use crate::data::datatable::{DataColumn, DataRow, DataTable, DataType, DataValue};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Candidate delimiters tried by auto-detection, in tie-break order
const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Reasons a dataset could not be loaded. Each maps to the message shown
/// to the user before the program exits.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Arquivo {} não encontrado!", .0.display())]
    NotFound(PathBuf),

    #[error("O arquivo está vazio.")]
    Empty(PathBuf),

    #[error("Ocorreu um erro ao processar o arquivo CSV. Verifique o formato.")]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Ocorreu um erro ao carregar o CSV: {0}")]
    Other(String),
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Other(err.to_string())
    }
}

/// How the delimiter is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Byte(u8),
    Auto,
}

impl Delimiter {
    /// Parse a config/CLI value: `auto`, `tab`, `\t`, or a single ASCII char
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "auto" => Some(Delimiter::Auto),
            "tab" | "\\t" | "\t" => Some(Delimiter::Byte(b'\t')),
            s if s.len() == 1 && s.is_ascii() => Some(Delimiter::Byte(s.as_bytes()[0])),
            _ => None,
        }
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Delimiter::Byte(b',')
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub delimiter: Delimiter,
    pub has_headers: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::default(),
            has_headers: true,
        }
    }
}

/// Pick the candidate delimiter occurring most often in the first line
pub fn detect_delimiter(first_line: &str) -> u8 {
    let mut best = b',';
    let mut best_count = 0;
    for candidate in DELIMITER_CANDIDATES {
        let count = first_line.bytes().filter(|b| *b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

/// Load a CSV file into a DataTable
pub fn load_csv_to_datatable<P: AsRef<Path>>(
    path: P,
    table_name: &str,
    options: &LoadOptions,
) -> Result<DataTable, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Other(format!("{}: {}", path.display(), e)),
    })?;

    let mut reader = BufReader::new(file);
    let delimiter = match options.delimiter {
        Delimiter::Byte(b) => b,
        Delimiter::Auto => {
            let first_line = String::from_utf8_lossy(reader.fill_buf()?)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string();
            detect_delimiter(&first_line)
        }
    };

    let table = load_csv_from_reader(reader, table_name, delimiter, options.has_headers)
        .map_err(|e| match e {
            ReaderFailure::Empty => LoadError::Empty(path.to_path_buf()),
            ReaderFailure::Csv(source) => LoadError::Malformed {
                path: path.to_path_buf(),
                source,
            },
        })?;

    info!(
        "Loaded {} rows x {} columns from {}",
        table.row_count(),
        table.column_count(),
        path.display()
    );
    Ok(table)
}

#[derive(Debug)]
enum ReaderFailure {
    Empty,
    Csv(csv::Error),
}

impl From<csv::Error> for ReaderFailure {
    fn from(err: csv::Error) -> Self {
        ReaderFailure::Csv(err)
    }
}

fn load_csv_from_reader<R: Read>(
    source: R,
    table_name: &str,
    delimiter: u8,
    has_headers: bool,
) -> Result<DataTable, ReaderFailure> {
    let mut reader = ReaderBuilder::new()
        .has_headers(has_headers)
        .delimiter(delimiter)
        .flexible(false)
        .from_reader(source);

    // Read all rows first to collect data
    let mut string_rows: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record = result?;
        string_rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    let column_names: Vec<String> = if has_headers {
        reader.headers()?.iter().map(|h| h.to_string()).collect()
    } else {
        let width = string_rows.first().map(|r| r.len()).unwrap_or(0);
        (0..width).map(|i| format!("column_{}", i)).collect()
    };

    if column_names.is_empty() || (column_names.len() == 1 && column_names[0].is_empty()) {
        return Err(ReaderFailure::Empty);
    }

    let mut table = DataTable::new(table_name);
    for name in &column_names {
        table.add_column(DataColumn::new(name.as_str()));
    }

    let duplicates = table.duplicate_column_names();
    if !duplicates.is_empty() {
        warn!(
            "Duplicate column names {:?}; lookups by name resolve to the first match",
            duplicates
        );
    }

    // Infer column types over every row so a column's cells share one type
    let mut column_types = vec![DataType::Null; column_names.len()];
    for row in &string_rows {
        for (col_idx, value) in row.iter().enumerate() {
            column_types[col_idx] = column_types[col_idx].merge(&DataType::infer_from_string(value));
        }
    }

    // Convert string data to typed DataValues and add rows
    for string_row in string_rows {
        let values: Vec<DataValue> = string_row
            .iter()
            .enumerate()
            .map(|(col_idx, value)| DataValue::from_string(value, &column_types[col_idx]))
            .collect();
        // widths are already enforced by the non-flexible reader
        if let Err(e) = table.add_row(DataRow::new(values)) {
            warn!("Skipping row: {}", e);
        }
    }

    // Update column statistics
    table.infer_column_types();

    Ok(table)
}
