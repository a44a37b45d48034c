//! Reading branch traces from text.
//!
//! Each line holds one conditional branch: a program counter value (decimal,
//! or hexadecimal with a `0x` prefix) and an outcome.
//!
//! ```text
//! # pc        outcome
//! 0x400a10    T
//! 0x400a24    0
//! ```

use std::path::Path;

use crate::{ BranchRecord, Outcome };
use crate::error::TraceError;

fn parse_pc(s: &str) -> Option<usize> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

fn parse_outcome(s: &str) -> Option<Outcome> {
    match s {
        "1" | "T" | "t" | "taken" => Some(Outcome::T),
        "0" | "N" | "n" | "not-taken" => Some(Outcome::N),
        _ => None,
    }
}

/// Parse a single line. Returns `None` for blank lines and comments.
fn parse_line(lineno: usize, line: &str)
    -> Result<Option<BranchRecord>, TraceError>
{
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let err = |reason: String| TraceError::Parse { line: lineno, reason };

    let mut fields = line.split_whitespace();
    let (pc, outcome) = match (fields.next(), fields.next(), fields.next()) {
        (Some(pc), Some(outcome), None) => (pc, outcome),
        _ => return Err(err(format!("expected '<pc> <outcome>', got '{}'", line))),
    };
    let pc = parse_pc(pc)
        .ok_or_else(|| err(format!("invalid program counter '{}'", pc)))?;
    let outcome = parse_outcome(outcome)
        .ok_or_else(|| err(format!("invalid outcome '{}'", outcome)))?;
    Ok(Some(BranchRecord::new(pc, outcome)))
}

/// Parse a whole trace. Line numbers in errors start at 1.
pub fn parse_trace(text: &str) -> Result<Vec<BranchRecord>, TraceError> {
    let mut res = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if let Some(r) = parse_line(idx + 1, line)? {
            res.push(r);
        }
    }
    Ok(res)
}

/// Read and parse the trace in some file.
pub fn read_trace(path: impl AsRef<Path>) -> Result<Vec<BranchRecord>, TraceError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    let res = parse_trace(&text)?;
    log::debug!("read {} records from {}", res.len(), path.as_ref().display());
    Ok(res)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;
    use Outcome::*;

    #[test]
    fn accepts_every_spelling() {
        let text = "\
# header
0x10 1
16 T

0x10 t
0X1f taken
   31   not-taken
0x20 0
0x20 N
0x20 n
";
        let t = parse_trace(text).unwrap();
        let pcs: Vec<usize> = t.iter().map(|r| r.pc).collect();
        let outcomes: Vec<Outcome> = t.iter().map(|r| r.outcome).collect();
        assert_eq!(pcs, vec![16, 16, 16, 31, 31, 32, 32, 32]);
        assert_eq!(outcomes, vec![T, T, T, T, N, N, N, N]);
    }

    #[test]
    fn reports_bad_lines() {
        match parse_trace("0x10 1\n0x10 maybe\n") {
            Err(TraceError::Parse { line, .. }) => assert_eq!(line, 2),
            r => panic!("unexpected {:?}", r),
        }
        assert!(matches!(parse_trace("zz 1"),
            Err(TraceError::Parse { line: 1, .. })));
        assert!(matches!(parse_trace("\n0x10"),
            Err(TraceError::Parse { line: 2, .. })));
        assert!(matches!(parse_trace("0x10 1 extra"),
            Err(TraceError::Parse { line: 1, .. })));
    }

    #[test]
    fn reads_files() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "0x400a10 1").unwrap();
        writeln!(f, "0x400a24 0").unwrap();
        let t = read_trace(f.path()).unwrap();
        assert_eq!(t, vec![
            BranchRecord::new(0x400a10, T),
            BranchRecord::new(0x400a24, N),
        ]);

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(read_trace(dir.path().join("missing")),
            Err(TraceError::Io(_))));
    }
}
