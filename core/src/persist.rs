use crate::error::{Error, Result};
use crate::index::{BuiltIndex, IdfEntry, IdfTable, TfEntry, TfTable};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{create_dir_all, File};
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

/// File locations of one collection: `<base>.xml`, `<base>.tf`, `<base>.idf`.
#[derive(Debug, Clone)]
pub struct IndexPaths {
    pub base: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(base: P) -> Self {
        Self { base: base.as_ref().to_path_buf() }
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut s = self.base.clone().into_os_string();
        s.push(suffix);
        PathBuf::from(s)
    }

    pub fn collection(&self) -> PathBuf { self.with_suffix(".xml") }
    pub fn tf(&self) -> PathBuf { self.with_suffix(".tf") }
    pub fn idf(&self) -> PathBuf { self.with_suffix(".idf") }
}

pub fn index_exists(paths: &IndexPaths) -> bool {
    paths.tf().is_file() && paths.idf().is_file()
}

fn write_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    let f = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut w = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(BufWriter::new(f));
    for row in rows {
        w.serialize(row).map_err(|e| csv_to_io(path, e))?;
    }
    w.flush().map_err(|e| Error::io(path, e))?;
    Ok(())
}

fn csv_to_io(path: &Path, err: csv::Error) -> Error {
    Error::io(path, err.into())
}

/// Read tab-separated rows that must each carry exactly `arity` fields.
fn read_rows<T: DeserializeOwned>(path: &Path, arity: usize) -> Result<Vec<T>> {
    let f = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::MissingIndexFile { path: path.to_path_buf() },
        _ => Error::io(path, e),
    })?;
    let mut r = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::new(f));
    let mut rows = Vec::new();
    for (i, rec) in r.records().enumerate() {
        let rec = rec.map_err(|e| Error::MalformedIndex {
            path: path.to_path_buf(),
            line: e.position().map(|p| p.line()).unwrap_or(i as u64 + 1),
            reason: e.to_string(),
        })?;
        let line = rec.position().map(|p| p.line()).unwrap_or(i as u64 + 1);
        if rec.len() != arity {
            return Err(Error::MalformedIndex {
                path: path.to_path_buf(),
                line,
                reason: format!("expected {arity} fields, found {}", rec.len()),
            });
        }
        let row: T = rec.deserialize(None).map_err(|e| Error::MalformedIndex {
            path: path.to_path_buf(),
            line,
            reason: e.to_string(),
        })?;
        rows.push(row);
    }
    Ok(rows)
}

fn malformed(path: &Path, line: usize, reason: &str) -> Error {
    Error::MalformedIndex { path: path.to_path_buf(), line: line as u64 + 1, reason: reason.to_string() }
}

pub fn save_tf_table(paths: &IndexPaths, entries: &[TfEntry]) -> Result<()> {
    write_rows(&paths.tf(), entries)
}

pub fn save_idf_table(paths: &IndexPaths, entries: &[IdfEntry]) -> Result<()> {
    write_rows(&paths.idf(), entries)
}

pub fn save_index(paths: &IndexPaths, index: &BuiltIndex) -> Result<()> {
    save_tf_table(paths, &index.tf_entries)?;
    save_idf_table(paths, &index.idf_entries)?;
    tracing::info!(
        tf = %paths.tf().display(),
        idf = %paths.idf().display(),
        rows = index.tf_entries.len(),
        terms = index.idf_entries.len(),
        "index written"
    );
    Ok(())
}

pub fn load_tf_table(paths: &IndexPaths) -> Result<TfTable> {
    let path = paths.tf();
    let rows: Vec<TfEntry> = read_rows(&path, 3)?;
    let mut table = TfTable::new();
    for (i, e) in rows.into_iter().enumerate() {
        if e.doc_id.is_empty() || e.term.is_empty() {
            return Err(malformed(&path, i, "empty doc_id or term"));
        }
        if !e.tf.is_finite() {
            return Err(malformed(&path, i, "tf is not a finite number"));
        }
        table.insert(e.doc_id, e.term, e.tf);
    }
    Ok(table)
}

pub fn load_idf_table(paths: &IndexPaths) -> Result<IdfTable> {
    let path = paths.idf();
    let rows: Vec<IdfEntry> = read_rows(&path, 2)?;
    let mut table = IdfTable::new();
    for (i, e) in rows.into_iter().enumerate() {
        if e.term.is_empty() {
            return Err(malformed(&path, i, "empty term"));
        }
        if !e.idf.is_finite() {
            return Err(malformed(&path, i, "idf is not a finite number"));
        }
        table.insert(e.term, e.idf);
    }
    Ok(table)
}

/// Load both tables required to search.
pub fn load_index(paths: &IndexPaths) -> Result<(TfTable, IdfTable)> {
    let idf = load_idf_table(paths)?;
    let tf = load_tf_table(paths)?;
    tracing::info!(docs = tf.num_documents(), terms = idf.len(), "index loaded");
    Ok((tf, idf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexBuilder;
    use std::fs;
    use tempfile::tempdir;

    fn sample() -> BuiltIndex {
        let mut b = IndexBuilder::new();
        b.add_document("d2", ["cat", "cat", "dog"]).unwrap();
        b.add_document("d1", ["cat", "bird", "bird", "bird"]).unwrap();
        b.add_document("d3", ["fish"]).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn round_trip_preserves_values() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::new(dir.path().join("coll"));
        let built = sample();
        save_index(&paths, &built).unwrap();
        assert!(index_exists(&paths));

        let (tf, idf) = load_index(&paths).unwrap();
        assert_eq!(tf, built.tf_table());
        assert_eq!(idf, built.idf_table());
    }

    #[test]
    fn files_are_tab_separated_in_build_order() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::new(dir.path().join("coll"));
        save_index(&paths, &sample()).unwrap();

        let tf = fs::read_to_string(paths.tf()).unwrap();
        let first: Vec<&str> = tf.lines().next().unwrap().split('\t').collect();
        assert_eq!(first[0], "d1");
        assert_eq!(first[1], "bird");
        assert_eq!(first[2].parse::<f64>().unwrap(), 1.0);
        assert_eq!(tf.lines().count(), 5);

        let idf = fs::read_to_string(paths.idf()).unwrap();
        let terms: Vec<&str> = idf.lines().map(|l| l.split('\t').next().unwrap()).collect();
        assert_eq!(terms, vec!["bird", "cat", "dog", "fish"]);
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::new(dir.path().join("absent"));
        assert!(!index_exists(&paths));
        assert!(matches!(load_index(&paths), Err(Error::MissingIndexFile { .. })));

        fs::write(paths.idf(), "cat\t0.5\n").unwrap();
        match load_index(&paths) {
            Err(Error::MissingIndexFile { path }) => assert_eq!(path, paths.tf()),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn malformed_rows_are_rejected() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::new(dir.path().join("bad"));
        fs::write(paths.idf(), "cat\t0.5\ndog\tnot-a-number\n").unwrap();
        fs::write(paths.tf(), "d1\tcat\t1.0\n").unwrap();
        assert!(matches!(load_idf_table(&paths), Err(Error::MalformedIndex { .. })));

        fs::write(paths.idf(), "cat\t0.5\n").unwrap();
        fs::write(paths.tf(), "d1\tcat\n").unwrap();
        assert!(matches!(load_tf_table(&paths), Err(Error::MalformedIndex { .. })));

        fs::write(paths.tf(), "d1\t\t1.0\n").unwrap();
        assert!(matches!(load_tf_table(&paths), Err(Error::MalformedIndex { line: 1, .. })));
    }

    #[test]
    fn extra_fields_are_rejected_even_when_every_row_has_them() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::new(dir.path().join("wide"));
        fs::write(paths.idf(), "cat\t0.5\tjunk\n").unwrap();
        fs::write(paths.tf(), "d1\tcat\t1.0\tjunk\nd2\tdog\t0.5\tmore\n").unwrap();
        assert!(matches!(load_idf_table(&paths), Err(Error::MalformedIndex { line: 1, .. })));
        assert!(matches!(load_tf_table(&paths), Err(Error::MalformedIndex { line: 1, .. })));

        fs::write(paths.tf(), "d1\tcat\t1.0\nd2\tdog\t0.5\tmore\n").unwrap();
        assert!(matches!(load_tf_table(&paths), Err(Error::MalformedIndex { line: 2, .. })));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::new(dir.path().join("nan"));
        fs::write(paths.idf(), "cat\tNaN\n").unwrap();
        fs::write(paths.tf(), "d1\tcat\t1.0\n").unwrap();
        assert!(matches!(load_index(&paths), Err(Error::MalformedIndex { .. })));

        fs::write(paths.idf(), "cat\t0.5\n").unwrap();
        fs::write(paths.tf(), "d1\tcat\tinf\n").unwrap();
        assert!(matches!(load_tf_table(&paths), Err(Error::MalformedIndex { .. })));
    }

    #[test]
    fn row_order_does_not_matter_on_load() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::new(dir.path().join("shuffled"));
        fs::write(paths.tf(), "d2\tdog\t0.5\nd1\tcat\t1.0\nd2\tcat\t1.0\n").unwrap();
        fs::write(paths.idf(), "dog\t0.6931471805599453\ncat\t0.0\n").unwrap();
        let (tf, idf) = load_index(&paths).unwrap();
        assert_eq!(tf.tf("d2", "dog"), 0.5);
        assert_eq!(tf.tf("d1", "dog"), 0.0);
        assert_eq!(idf.idf("cat"), Some(0.0));
        assert_eq!(tf.num_documents(), 2);
    }
}
