//! `conncomp gather`: concatenate the leading data lines of several files.
//!
//! Each input contributes its lines up to, not including, the first blank
//! line or the first line starting with `#`. Lines are copied as bytes, so
//! inputs need not be UTF-8. An input is read in full before any of it
//! reaches the output: one that fails part way contributes nothing and is
//! reported as skipped. The output still gets written, but the command fails
//! afterwards so scripts notice.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use conncomp_core::ErrorCode;
use serde::Serialize;
use tracing::{info, warn};

use crate::output::{OutputMode, render};

/// Arguments for `conncomp gather`.
#[derive(Args, Debug)]
pub struct GatherArgs {
    /// Input files followed by the output file.
    #[arg(value_name = "PATH", num_args = 2.., required = true)]
    pub paths: Vec<PathBuf>,
}

impl GatherArgs {
    /// Split the positional list into inputs and the trailing output.
    fn inputs_and_output(&self) -> Option<(&[PathBuf], &Path)> {
        let (output, inputs) = self.paths.split_last()?;
        if inputs.is_empty() {
            return None;
        }
        Some((inputs, output.as_path()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatherError {
    #[error("cannot write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{skipped} of {total} inputs could not be read")]
    Skipped { skipped: usize, total: usize },
}

impl GatherError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Output { .. } => ErrorCode::ArtifactWriteFailed,
            Self::Skipped { .. } => ErrorCode::GatherInputSkipped,
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct GatherReport {
    pub output: PathBuf,
    pub lines: usize,
    pub gathered: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Copy data lines from `reader` to `out`, stopping at the first blank or
/// `#` line. Surrounding ASCII whitespace is trimmed and every copied line
/// ends in `\n`. Returns the number of lines copied.
pub fn gather_lines<R: BufRead, W: Write>(mut reader: R, out: &mut W) -> io::Result<usize> {
    let mut line = Vec::new();
    let mut copied = 0;
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        let data = line.trim_ascii();
        if data.is_empty() || data.starts_with(b"#") {
            break;
        }
        out.write_all(data)?;
        out.write_all(b"\n")?;
        copied += 1;
    }
    Ok(copied)
}

/// Gather one input into memory. Nothing is returned unless the whole
/// input was read.
fn gather_input<R: BufRead>(reader: R) -> io::Result<(Vec<u8>, usize)> {
    let mut buf = Vec::new();
    let lines = gather_lines(reader, &mut buf)?;
    Ok((buf, lines))
}

/// Execute `conncomp gather`.
pub fn run_gather(args: &GatherArgs, output: OutputMode) -> anyhow::Result<()> {
    let Some((inputs, target)) = args.inputs_and_output() else {
        anyhow::bail!("at least one input file and one output file are required");
    };
    let output_error = |source| GatherError::Output {
        path: target.to_path_buf(),
        source,
    };

    let file = File::create(target).map_err(output_error)?;
    let mut out = BufWriter::new(file);
    let mut report = GatherReport {
        output: target.to_path_buf(),
        ..GatherReport::default()
    };

    for input in inputs {
        let gathered = File::open(input)
            .map(BufReader::new)
            .and_then(gather_input);
        match gathered {
            Ok((data, lines)) => {
                out.write_all(&data).map_err(output_error)?;
                info!(input = %input.display(), lines, "gathered");
                report.lines += lines;
                report.gathered.push(input.clone());
            }
            Err(err) => {
                warn!(input = %input.display(), error = %err, "skipping unreadable input");
                report.skipped.push(input.clone());
            }
        }
    }
    out.flush().map_err(output_error)?;

    render(output, &report, |r, w| {
        writeln!(w, "{} lines from {} files -> {}", r.lines, r.gathered.len(), r.output.display())
    })?;

    if report.skipped.is_empty() {
        Ok(())
    } else {
        Err(GatherError::Skipped {
            skipped: report.skipped.len(),
            total: inputs.len(),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: GatherArgs,
    }

    #[test]
    fn last_path_is_the_output() {
        let w = Wrapper::parse_from(["test", "a.csv", "b.csv", "all.csv"]);
        let (inputs, output) = w.args.inputs_and_output().expect("split");
        assert_eq!(inputs, [PathBuf::from("a.csv"), PathBuf::from("b.csv")]);
        assert_eq!(output, Path::new("all.csv"));
    }

    #[test]
    fn single_path_is_rejected_by_the_parser() {
        assert!(Wrapper::try_parse_from(["test", "only.csv"]).is_err());
    }

    #[test]
    fn stops_at_first_blank_line() {
        let mut out = Vec::new();
        let copied = gather_lines("1,2\n2,3\n\n9,9\n".as_bytes(), &mut out).expect("gather");
        assert_eq!(copied, 2);
        assert_eq!(String::from_utf8(out).expect("utf8"), "1,2\n2,3\n");
    }

    #[test]
    fn stops_at_first_comment_line() {
        let mut out = Vec::new();
        let copied = gather_lines("1,2\n# trailer\n3,4\n".as_bytes(), &mut out).expect("gather");
        assert_eq!(copied, 1);
        assert_eq!(String::from_utf8(out).expect("utf8"), "1,2\n");
    }

    #[test]
    fn leading_comment_copies_nothing() {
        let mut out = Vec::new();
        assert_eq!(gather_lines("#x\n1,2\n".as_bytes(), &mut out).expect("gather"), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn non_utf8_lines_pass_through() {
        let mut out = Vec::new();
        let copied = gather_lines(&b"1,2\n\xff,3\n4,5\n"[..], &mut out).expect("gather");
        assert_eq!(copied, 3);
        assert_eq!(out, b"1,2\n\xff,3\n4,5\n");
    }

    /// Yields its bytes, then fails every later read.
    struct Truncated(&'static [u8]);

    impl io::Read for Truncated {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() {
                return Err(io::Error::other("device went away"));
            }
            let n = self.0.len().min(buf.len());
            buf[..n].copy_from_slice(&self.0[..n]);
            self.0 = &self.0[n..];
            Ok(n)
        }
    }

    #[test]
    fn failed_read_yields_no_partial_input() {
        let reader = BufReader::new(Truncated(b"1,2\n2,3\n"));
        let err = gather_input(reader).expect_err("read fails after two lines");
        assert_eq!(err.to_string(), "device went away");
    }

    #[test]
    fn crlf_input_is_normalized() {
        let mut out = Vec::new();
        gather_lines("1,2\r\n3,4\r\n".as_bytes(), &mut out).expect("gather");
        assert_eq!(String::from_utf8(out).expect("utf8"), "1,2\n3,4\n");
    }
}
