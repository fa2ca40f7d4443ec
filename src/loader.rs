use polars::prelude::*;
use ratatui::layout::Alignment;
use rayon::prelude::*;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument};
use unicode_width::UnicodeWidthStr;

use tvtable::{CellValue, Column, Row};

use crate::error::ViewerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileType {
    Csv,
    Parquet,
    Arrow,
}

#[derive(Debug)]
struct FileInfo {
    path: PathBuf,
    file_size: u64,
    file_type: FileType,
}

/// Columns and rows read from a data file, ready to hand to a table.
#[derive(Debug)]
pub struct LoadedTable {
    pub name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

struct LoadedColumn {
    name: String,
    numeric: bool,
    width: usize,
    cells: Vec<Option<CellValue>>,
}

/// Reads a csv, parquet or arrow file. Every column is converted on its own rayon task.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_data_file(path: PathBuf, max_column_width: usize) -> Result<LoadedTable, ViewerError> {
    let file_info = get_file_info(path)?;
    debug!("Loading {:?}", file_info);
    let frame = match file_info.file_type {
        FileType::Csv => load_csv(&file_info.path)?,
        FileType::Parquet => load_parquet(&file_info.path)?,
        FileType::Arrow => load_arrow(&file_info.path)?,
    };

    let start_time = Instant::now();
    let df = frame.collect()?;
    let loaded: Result<Vec<LoadedColumn>, PolarsError> = df
        .get_column_names()
        .par_iter()
        .map(|name| load_column(&df, name))
        .collect();
    let loaded = loaded?;
    if loaded.is_empty() {
        return Err(ViewerError::loading_failed("file has no columns"));
    }
    info!(
        "Loading {} bytes took {}ms ...",
        file_info.file_size,
        start_time.elapsed().as_millis()
    );

    let columns = loaded
        .iter()
        .map(|c| {
            let column = Column::new(c.name.clone(), c.name.clone(), c.width.min(max_column_width).max(1));
            if c.numeric {
                column
            } else {
                column.with_alignment(Alignment::Left)
            }
        })
        .collect();
    let rows = (0..df.height())
        .map(|idx| {
            loaded
                .iter()
                .filter_map(|c| c.cells[idx].clone().map(|cell| (c.name.clone(), cell)))
                .collect::<Row>()
        })
        .collect();

    let name = file_info
        .path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("???")
        .to_string();
    Ok(LoadedTable {
        name,
        columns,
        rows,
    })
}

fn load_column(df: &DataFrame, col_name: &str) -> Result<LoadedColumn, PolarsError> {
    let col = df.column(col_name)?;
    let dtype = col.dtype().clone();

    let cells: Vec<Option<CellValue>> = if dtype.is_integer() {
        let col = col.cast(&DataType::Int64)?;
        col.i64()?.into_iter().map(|v| v.map(CellValue::Int)).collect()
    } else if dtype.is_float() {
        let col = col.cast(&DataType::Float64)?;
        col.f64()?.into_iter().map(|v| v.map(CellValue::Float)).collect()
    } else if dtype == DataType::Boolean {
        col.bool()?.into_iter().map(|v| v.map(CellValue::Bool)).collect()
    } else {
        let col = col.cast(&DataType::String)?;
        col.str()?
            .into_iter()
            .map(|v| v.map(|s| CellValue::Text(s.replace("\r\n", " ↵ ").replace('\n', " ↵ "))))
            .collect()
    };

    let width = cells
        .iter()
        .flatten()
        .map(|c| c.render().width())
        .chain(std::iter::once(col_name.width()))
        .max()
        .unwrap_or(1);
    Ok(LoadedColumn {
        name: col_name.to_string(),
        numeric: dtype.is_numeric(),
        width,
        cells,
    })
}

fn detect_file_type(path: &Path) -> Result<FileType, ViewerError> {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_uppercase())
        .as_deref()
    {
        Some("CSV") => Ok(FileType::Csv),
        Some("PARQUET") | Some("PQ") => Ok(FileType::Parquet),
        Some("ARROW") | Some("IPC") | Some("FEATHER") => Ok(FileType::Arrow),
        _ => Err(ViewerError::UnknownFileType(path.display().to_string())),
    }
}

fn get_file_info(path: PathBuf) -> Result<FileInfo, ViewerError> {
    let metadata = fs::metadata(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ViewerError::FileNotFound(path.display().to_string()),
        ErrorKind::PermissionDenied => ViewerError::PermissionDenied(path.display().to_string()),
        _ => ViewerError::IoError(e),
    })?;
    if !metadata.is_file() {
        return Err(ViewerError::loading_failed(format!(
            "{} is not a file",
            path.display()
        )));
    }

    let file_type = detect_file_type(&path)?;
    Ok(FileInfo {
        path,
        file_size: metadata.len(),
        file_type,
    })
}

fn load_csv(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyCsvReader::new(PlPath::Local(path.into()))
        .with_has_header(true)
        .finish()
}

fn load_parquet(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_parquet(PlPath::Local(path.into()), ScanArgsParquet::default())
}

fn load_arrow(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_ipc(
        PlPath::Local(path.into()),
        polars::io::ipc::IpcScanOptions,
        UnifiedScanArgs::default(),
    )
}

/// Quotes a cell for a comma separated clipboard line.
pub fn wrap_cell_content(c: &str) -> String {
    let needs_escaping = c.contains('"');
    let needs_wrapping = c.chars().any(|c| c == ' ' || c == '\t' || c == ',');
    let mut out = c.to_string();

    if needs_escaping {
        out = out.replace('"', "\"\"");
    }
    if needs_wrapping || needs_escaping {
        out = format!("\"{out}\"");
    }
    out
}
