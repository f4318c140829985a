//! Inventory table loading.
//!
//! Reads the device inventory (spreadsheet, first sheet only, or delimited
//! text) and the software inventory (delimited text) into domain records.
//! Column names differ between inventory exports, so every logical column is
//! looked up through a list of accepted header aliases.
//!
//! Only the hostname column is required. A missing optional column is logged
//! and its values are treated as absent, which the evaluator then degrades to
//! failing values.

use std::io::Read;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, DataType, Reader};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::device::DeviceRecord;
use crate::domain::error::InventoryError;
use crate::domain::software::SoftwareInstallRecord;
use crate::obs::{emit_column_missing, emit_inventory_loaded, emit_rows_skipped};

/// Accepted headers for the hostname column, in both tables.
pub const HOSTNAME_COLUMNS: &[&str] = &["Hostname", "Device Hostname"];
pub const CPU_COLUMNS: &[&str] = &["Device CPU"];
pub const RAM_COLUMNS: &[&str] = &["Memory (Usable)"];
pub const BIOS_COLUMNS: &[&str] = &["BIOS Released"];
pub const SOFTWARE_NAME_COLUMNS: &[&str] = &["Software", "Software Name"];
pub const VERSION_COLUMNS: &[&str] = &["Version"];

/// Placeholder version for installs whose version cell is empty.
pub const UNKNOWN_VERSION: &str = "Unknown";

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// One table cell.
///
/// Delimited text only yields `Text`. Spreadsheets also yield `Value` for
/// numbers, booleans and dates, rendered as text but kept distinct so that
/// columns which must hold a string can reject them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Value(String),
}

impl Cell {
    /// Rendered text of a `Text` or `Value` cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) | Cell::Value(s) => Some(s),
        }
    }

    /// Text of a string cell only.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A loaded table: header row plus data rows.
///
/// Rows shorter than the header are padded with `Empty` on access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Index of the first header matching any of `aliases`.
    ///
    /// Matching ignores case, surrounding whitespace and a UTF-8 BOM.
    pub fn column(&self, aliases: &[&str]) -> Option<usize> {
        aliases.iter().find_map(|alias| {
            self.headers
                .iter()
                .position(|h| normalize_header(h).eq_ignore_ascii_case(alias))
        })
    }

    fn cell(row: &[Cell], idx: Option<usize>) -> &Cell {
        const EMPTY: &Cell = &Cell::Empty;
        idx.and_then(|i| row.get(i)).unwrap_or(EMPTY)
    }

    /// Parse delimited text.
    pub fn from_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Self, csv::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(reader);

        // Exports are not always UTF-8; decode lossily rather than reject.
        let headers = csv_reader
            .byte_headers()?
            .iter()
            .map(|h| String::from_utf8_lossy(h).into_owned())
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.byte_records() {
            let record = record?;
            rows.push(
                record
                    .iter()
                    .map(|field| {
                        let text = String::from_utf8_lossy(field);
                        if text.is_empty() {
                            Cell::Empty
                        } else {
                            Cell::Text(text.into_owned())
                        }
                    })
                    .collect(),
            );
        }

        Ok(Self { headers, rows })
    }

    /// Build a table from spreadsheet cells; the first row is the header.
    pub fn from_cells<'a, I>(mut rows: I) -> Self
    where
        I: Iterator<Item = &'a [Data]>,
    {
        let headers = rows
            .next()
            .map(|row| {
                row.iter()
                    .map(|c| cell_from_data(c).as_str().unwrap_or_default().to_string())
                    .collect()
            })
            .unwrap_or_default();
        let rows = rows
            .map(|row| row.iter().map(cell_from_data).collect())
            .collect();
        Self { headers, rows }
    }
}

fn normalize_header(header: &str) -> &str {
    header.trim_start_matches('\u{feff}').trim()
}

/// Convert a spreadsheet cell. Empty and error cells are `Empty`; dates are
/// rendered as `YYYY-MM-DD`.
fn cell_from_data(cell: &Data) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Value(f.to_string()),
        Data::Int(i) => Cell::Value(i.to_string()),
        Data::DateTime(_) => Cell::Value(
            cell.as_date()
                .map(|d: chrono::NaiveDate| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| cell.to_string()),
        ),
        other => Cell::Value(other.to_string()),
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Load any supported table format, choosing the reader by file extension.
pub fn load_table(path: &Path) -> Result<Table, InventoryError> {
    let extension = extension_of(path);
    match extension.as_str() {
        "csv" | "txt" => load_delimited(path, b','),
        "tsv" => load_delimited(path, b'\t'),
        ext if SPREADSHEET_EXTENSIONS.contains(&ext) => load_spreadsheet(path),
        _ => Err(InventoryError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        }),
    }
}

fn load_delimited(path: &Path, delimiter: u8) -> Result<Table, InventoryError> {
    let file = std::fs::File::open(path).map_err(|source| InventoryError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Table::from_delimited(file, delimiter).map_err(|source| InventoryError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

fn load_spreadsheet(path: &Path) -> Result<Table, InventoryError> {
    std::fs::metadata(path).map_err(|source| InventoryError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let spreadsheet_err = |detail: String| InventoryError::Spreadsheet {
        path: path.to_path_buf(),
        detail,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| spreadsheet_err(e.to_string()))?;
    let first_sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| InventoryError::NoSheets {
            path: path.to_path_buf(),
        })?;
    debug!(sheet = %first_sheet, path = %path.display(), "reading first sheet");

    let range = workbook
        .worksheet_range(&first_sheet)
        .map_err(|e| spreadsheet_err(e.to_string()))?;
    Ok(Table::from_cells(range.rows()))
}

fn require_hostname_column(table: &Table, path: &Path) -> Result<usize, InventoryError> {
    table
        .column(HOSTNAME_COLUMNS)
        .ok_or_else(|| InventoryError::MissingIdentifierColumn {
            path: path.to_path_buf(),
            expected: HOSTNAME_COLUMNS.join(", "),
        })
}

fn row_hostname(row: &[Cell], host: usize) -> Option<&str> {
    Table::cell(row, Some(host))
        .as_str()
        .map(str::trim)
        .filter(|h| !h.is_empty())
}

fn optional_column(table: &Table, name: &str, aliases: &[&str]) -> Option<usize> {
    let idx = table.column(aliases);
    if idx.is_none() {
        emit_column_missing(name, aliases[0]);
    }
    idx
}

/// Convert a loaded device table into records. Rows without a hostname are skipped.
pub fn devices_from_table(
    table: &Table,
    path: &Path,
) -> Result<Vec<DeviceRecord>, InventoryError> {
    let host = require_hostname_column(table, path)?;
    let cpu = optional_column(table, "devices", CPU_COLUMNS);
    let ram = optional_column(table, "devices", RAM_COLUMNS);
    let bios = optional_column(table, "devices", BIOS_COLUMNS);

    let mut skipped = 0usize;
    let mut devices = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let Some(hostname) = row_hostname(row, host) else {
            skipped += 1;
            continue;
        };
        devices.push(DeviceRecord {
            hostname: hostname.to_string(),
            // A CPU cell that is not a string counts as missing data.
            cpu: Table::cell(row, cpu).as_text().map(str::to_string),
            ram: Table::cell(row, ram).as_str().map(str::to_string),
            bios_released: Table::cell(row, bios).as_str().map(str::to_string),
        });
    }

    if skipped > 0 {
        emit_rows_skipped("devices", skipped);
    }
    Ok(devices)
}

/// Convert a loaded software table into install records. Rows without a
/// hostname are skipped; an empty version becomes [`UNKNOWN_VERSION`].
pub fn installs_from_table(
    table: &Table,
    path: &Path,
) -> Result<Vec<SoftwareInstallRecord>, InventoryError> {
    let host = require_hostname_column(table, path)?;
    let name = optional_column(table, "software", SOFTWARE_NAME_COLUMNS);
    let version = optional_column(table, "software", VERSION_COLUMNS);

    let mut skipped = 0usize;
    let mut installs = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let Some(hostname) = row_hostname(row, host) else {
            skipped += 1;
            continue;
        };
        installs.push(SoftwareInstallRecord {
            hostname: hostname.to_string(),
            name: Table::cell(row, name).as_str().unwrap_or_default().to_string(),
            version: Table::cell(row, version)
                .as_str()
                .unwrap_or(UNKNOWN_VERSION)
                .to_string(),
        });
    }

    if skipped > 0 {
        emit_rows_skipped("software", skipped);
    }
    Ok(installs)
}

/// Load the device inventory from `path`.
pub fn load_devices(path: &Path) -> Result<Vec<DeviceRecord>, InventoryError> {
    let table = load_table(path)?;
    let devices = devices_from_table(&table, path)?;
    emit_inventory_loaded("devices", path, devices.len());
    Ok(devices)
}

/// Load the software inventory from `path`.
pub fn load_software(path: &Path) -> Result<Vec<SoftwareInstallRecord>, InventoryError> {
    let table = load_table(path)?;
    let installs = installs_from_table(&table, path)?;
    emit_inventory_loaded("software", path, installs.len());
    Ok(installs)
}

/// SHA-256 hex digest of a file's bytes, used to identify report inputs.
pub fn digest_file(path: &Path) -> Result<String, InventoryError> {
    let bytes = std::fs::read(path).map_err(|source| InventoryError::Read {
        path: PathBuf::from(path),
        source,
    })?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}
