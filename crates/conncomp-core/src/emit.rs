//! Per-component edge-list artifacts.
//!
//! Component `i` of a run with base name `B` is written to `B_i.csv` in the
//! same `from,to` record shape the ingest side reads.
//!
//! [`write_components`] is all-or-nothing: every artifact is first written
//! to a `.tmp` sibling, and only when all of them succeeded are they renamed
//! into place. Any failure removes what this call wrote.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use tracing::{debug, warn};

use crate::error::ErrorCode;
use crate::graph::Edge;

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl EmitError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Write { .. } => ErrorCode::ArtifactWriteFailed,
        }
    }
}

/// `<base>_<index>.csv`.
#[must_use]
pub fn artifact_path(base: &Path, index: usize) -> PathBuf {
    let mut raw: OsString = base.as_os_str().to_os_string();
    raw.push(format!("_{index}.csv"));
    PathBuf::from(raw)
}

/// Write `edges` as headerless `from,to` records.
///
/// # Errors
///
/// Returns the underlying CSV/I-O error.
pub fn write_edges<W: Write>(writer: W, edges: &[Edge]) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    for edge in edges {
        wtr.serialize(edge.endpoints())?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write one artifact per component and return their paths, in index order.
///
/// # Errors
///
/// Returns the first [`EmitError`]; no artifact of this call is left behind.
pub fn write_components(base: &Path, components: &[Vec<Edge>]) -> Result<Vec<PathBuf>, EmitError> {
    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(components.len());

    let result = stage_all(base, components, &mut staged).and_then(|()| commit(&staged));
    if let Err(err) = result {
        discard(&staged);
        return Err(err);
    }

    debug!(artifacts = staged.len(), base = %base.display(), "component artifacts written");
    Ok(staged.into_iter().map(|(_, target)| target).collect())
}

fn stage_all(
    base: &Path,
    components: &[Vec<Edge>],
    staged: &mut Vec<(PathBuf, PathBuf)>,
) -> Result<(), EmitError> {
    for (index, edges) in components.iter().enumerate() {
        let target = artifact_path(base, index);
        let mut tmp = target.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        staged.push((tmp.clone(), target));
        write_file(&tmp, edges)?;
    }
    Ok(())
}

fn write_file(path: &Path, edges: &[Edge]) -> Result<(), EmitError> {
    let as_write_error = |source: io::Error| EmitError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(as_write_error)?;
    let mut out = BufWriter::new(file);
    write_edges(&mut out, edges).map_err(|err| as_write_error(io::Error::from(err)))?;
    out.flush().map_err(as_write_error)?;
    out.get_ref().sync_all().map_err(as_write_error)
}

fn commit(staged: &[(PathBuf, PathBuf)]) -> Result<(), EmitError> {
    for (i, (tmp, target)) in staged.iter().enumerate() {
        if let Err(source) = fs::rename(tmp, target) {
            for (_, committed) in &staged[..i] {
                remove_quietly(committed);
            }
            return Err(EmitError::Write {
                path: target.clone(),
                source,
            });
        }
    }
    Ok(())
}

fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (tmp, _) in staged {
        remove_quietly(tmp);
    }
}

fn remove_quietly(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => warn!(path = %path.display(), error = %err, "cannot remove partial artifact"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeId;

    fn edges(pairs: &[(NodeId, NodeId)]) -> Vec<Edge> {
        pairs
            .iter()
            .map(|&(a, b)| Edge::new(a, b).expect("edge"))
            .collect()
    }

    #[test]
    fn artifact_names_are_indexed() {
        assert_eq!(
            artifact_path(Path::new("out/processed"), 0),
            PathBuf::from("out/processed_0.csv")
        );
        assert_eq!(
            artifact_path(Path::new("run"), 12),
            PathBuf::from("run_12.csv")
        );
    }

    #[test]
    fn write_edges_uses_input_record_shape() {
        let mut buf = Vec::new();
        write_edges(&mut buf, &edges(&[(2, 1), (2, 3)])).expect("write");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "1,2\n2,3\n");
    }

    #[test]
    fn empty_component_writes_empty_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let base = dir.path().join("single");
        let paths = write_components(&base, &[Vec::new()]).expect("write");
        assert_eq!(fs::read_to_string(&paths[0]).expect("read"), "");
    }

    #[test]
    fn writes_every_component() {
        let dir = tempfile::tempdir().expect("tempdir");
        let base = dir.path().join("processed");
        let components = vec![edges(&[(1, 2), (2, 3)]), edges(&[(4, 5)])];

        let paths = write_components(&base, &components).expect("write");
        assert_eq!(paths, vec![artifact_path(&base, 0), artifact_path(&base, 1)]);
        assert_eq!(fs::read_to_string(&paths[0]).expect("read"), "1,2\n2,3\n");
        assert_eq!(fs::read_to_string(&paths[1]).expect("read"), "4,5\n");

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .expect("read_dir")
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn failure_leaves_no_artifacts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let base = dir.path().join("processed");
        // Block the second component's staging file with a directory.
        fs::create_dir(dir.path().join("processed_1.csv.tmp")).expect("mkdir");

        let components = vec![edges(&[(1, 2)]), edges(&[(3, 4)])];
        let err = write_components(&base, &components).expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::ArtifactWriteFailed);

        assert!(!artifact_path(&base, 0).exists());
        assert!(!dir.path().join("processed_0.csv.tmp").exists());
        assert!(!artifact_path(&base, 1).exists());
    }

    #[test]
    fn missing_directory_is_a_write_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let base = dir.path().join("absent").join("processed");
        let err = write_components(&base, &[edges(&[(1, 2)])]).expect_err("must fail");
        assert!(matches!(err, EmitError::Write { .. }));
    }
}
