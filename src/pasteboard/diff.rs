//! # Line Diff
//!
//! A longest-common-subsequence diff over `\n`-separated lines. Lines are
//! compared as exact strings. Where a change both removes and adds lines, the
//! removals are listed first.
//!
//! The common prefix and suffix are peeled off before the LCS table is built,
//! so the quadratic part only covers the region that actually changed. When
//! that region would need more than [`MAX_TABLE_CELLS`] table cells, it is
//! reported as a plain replacement: every old line removed, then every new
//! line added.

use serde::Serialize;
use std::fmt;

use crate::model::Paste;

/// Largest LCS table (in cells) built for one diff.
pub const MAX_TABLE_CELLS: usize = 1 << 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffMarker {
    /// Only in the left (old) text.
    Removed,
    /// Only in the right (new) text.
    Added,
    Common,
}

impl DiffMarker {
    pub fn symbol(self) -> char {
        match self {
            DiffMarker::Removed => '-',
            DiffMarker::Added => '+',
            DiffMarker::Common => ' ',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    pub marker: DiffMarker,
    pub text: String,
}

impl DiffLine {
    fn new(marker: DiffMarker, text: &str) -> Self {
        Self {
            marker,
            text: text.to_string(),
        }
    }
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.marker.symbol(), self.text)
    }
}

/// The diff between two stored pastes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diff {
    pub from: Paste,
    pub to: Paste,
    pub lines: Vec<DiffLine>,
}

impl Diff {
    pub fn new(from: Paste, to: Paste) -> Self {
        let lines = diff_lines(&from.content, &to.content);
        Self { from, to, lines }
    }

    pub fn has_changes(&self) -> bool {
        self.lines.iter().any(|l| l.marker != DiffMarker::Common)
    }

    /// One `<marker><line>` per output line, each terminated by `\n`.
    pub fn to_text(&self) -> String {
        self.lines.iter().map(|l| format!("{}\n", l)).collect()
    }
}

/// Diff two pastes' contents.
pub fn diff(left: &Paste, right: &Paste) -> Vec<DiffLine> {
    diff_lines(&left.content, &right.content)
}

pub fn diff_lines(left: &str, right: &str) -> Vec<DiffLine> {
    let a: Vec<&str> = left.split('\n').collect();
    let b: Vec<&str> = right.split('\n').collect();

    let prefix = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();

    let mut out = Vec::with_capacity(a.len().max(b.len()));
    out.extend(a[..prefix].iter().map(|l| DiffLine::new(DiffMarker::Common, l)));
    lcs_diff(
        &a[prefix..a.len() - suffix],
        &b[prefix..b.len() - suffix],
        &mut out,
    );
    out.extend(
        a[a.len() - suffix..]
            .iter()
            .map(|l| DiffLine::new(DiffMarker::Common, l)),
    );
    out
}

fn lcs_diff(a: &[&str], b: &[&str], out: &mut Vec<DiffLine>) {
    let (n, m) = (a.len(), b.len());
    let width = m + 1;

    let cells = (n + 1).checked_mul(width).filter(|&c| c <= MAX_TABLE_CELLS);
    let Some(cells) = cells else {
        tracing::debug!(target: "pasteboard::diff", n, m, "changed region too large, diffing as replacement");
        out.extend(a.iter().map(|l| DiffLine::new(DiffMarker::Removed, l)));
        out.extend(b.iter().map(|l| DiffLine::new(DiffMarker::Added, l)));
        return;
    };

    // table[i * width + j] = LCS length of a[i..] and b[j..]
    let mut table = vec![0u32; cells];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i * width + j] = if a[i] == b[j] {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a[i] == b[j] {
            out.push(DiffLine::new(DiffMarker::Common, a[i]));
            i += 1;
            j += 1;
        } else if table[(i + 1) * width + j] >= table[i * width + j + 1] {
            out.push(DiffLine::new(DiffMarker::Removed, a[i]));
            i += 1;
        } else {
            out.push(DiffLine::new(DiffMarker::Added, b[j]));
            j += 1;
        }
    }
    out.extend(a[i..].iter().map(|l| DiffLine::new(DiffMarker::Removed, l)));
    out.extend(b[j..].iter().map(|l| DiffLine::new(DiffMarker::Added, l)));
}
