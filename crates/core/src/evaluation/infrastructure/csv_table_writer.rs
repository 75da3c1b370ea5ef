use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::evaluation::domain::iou_table::IouTable;

#[derive(Error, Debug)]
pub enum TableWriteError {
    #[error("failed to write IoU table: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes the table as CSV: a header of column names, then one record per
/// sample.
pub fn write_iou_table_csv<W: Write>(table: &IouTable, writer: W) -> Result<(), TableWriteError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(table.column_names())?;
    for row in table.rows() {
        let record = std::iter::once(row.batch_idx.to_string())
            .chain(row.values.iter().map(|v| v.to_string()));
        csv_writer.write_record(record)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Same as [`write_iou_table_csv`], creating the file and its parent
/// directory.
pub fn write_iou_table_csv_file(table: &IouTable, path: &Path) -> Result<(), TableWriteError> {
    let io_err = |source| TableWriteError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = std::fs::File::create(path).map_err(io_err)?;
    write_iou_table_csv(table, file)?;
    log::info!("IoU table written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::domain::iou_table::IouRow;
    use crate::shared::constants::MISSING_IOU;

    fn sample_table() -> IouTable {
        let mut table = IouTable::new(&["background", "body"]).unwrap();
        table
            .push_row(IouRow {
                batch_idx: 0,
                values: vec![1.0, 0.5],
            })
            .unwrap();
        table
            .push_row(IouRow {
                batch_idx: 1,
                values: vec![0.25, MISSING_IOU],
            })
            .unwrap();
        table
    }

    #[test]
    fn test_writes_header_and_rows() {
        let mut buf = Vec::new();
        write_iou_table_csv(&sample_table(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "batch_idx,background,body\n0,1,0.5\n1,0.25,-1\n");
    }

    #[test]
    fn test_empty_table_writes_header_only() {
        let mut buf = Vec::new();
        write_iou_table_csv(&IouTable::new(&["a"]).unwrap(), &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "batch_idx,a\n");
    }

    #[test]
    fn test_file_roundtrip_with_csv_reader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("iou.csv");
        write_iou_table_csv_file(&sample_table(), &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["batch_idx", "background", "body"]);
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[1][2], "-1");
    }

    #[test]
    fn test_invalid_path_returns_error() {
        let result = write_iou_table_csv_file(&sample_table(), Path::new("/proc/nonexistent/iou.csv"));
        assert!(result.is_err());
    }
}
