use std::io::{self, Write};
use std::path::Path;

use anyhow::Context;
use thompson_nfa::{Fsm, Matcher};

/// What a search saw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchSummary {
    /// Number of lines searched
    pub lines: usize,
    /// Number of lines written out
    pub matched: usize,
    /// Some line matched before any character was consumed
    pub matched_without_char: bool,
}

/// Runs a table over every line of a text and writes the matching lines.
pub struct Searcher<'a> {
    matcher: Matcher<'a>,
}

impl<'a> Searcher<'a> {
    pub fn new(fsm: &'a Fsm) -> Self {
        Self { matcher: Matcher::new(fsm) }
    }

    /// Searches `haystack` line by line, writing each matching line followed
    /// by `\n` to `wtr`.
    ///
    /// Lines end at `\n`; a `\r` right before it is not part of the line.
    /// Lines that are not valid UTF-8 are matched lossily but written out as
    /// they are.
    pub fn search_slice<W: Write>(&self, haystack: &[u8], mut wtr: W) -> io::Result<SearchSummary> {
        let mut summary = SearchSummary::default();
        for line in lines(haystack) {
            summary.lines += 1;
            let text = String::from_utf8_lossy(line);
            let Some(found) = self.matcher.find(&text) else {
                continue;
            };
            summary.matched += 1;
            summary.matched_without_char |= found.without_char;
            wtr.write_all(line)?;
            wtr.write_all(b"\n")?;
        }
        wtr.flush()?;
        Ok(summary)
    }

    /// Reads the file at `path` completely, then searches it.
    pub fn search_path<P: AsRef<Path>, W: Write>(
        &self,
        path: P,
        wtr: W,
    ) -> anyhow::Result<SearchSummary> {
        let path = path.as_ref();
        let haystack = std::fs::read(path)
            .with_context(|| format!("could not read file `{}`", path.display()))?;

        let summary = self
            .search_slice(&haystack, wtr)
            .context("could not write matching lines")?;

        log::debug!(
            "{}: {} of {} lines matched",
            path.display(),
            summary.matched,
            summary.lines
        );
        Ok(summary)
    }
}

/// Splits `haystack` into lines without their terminators.
fn lines(haystack: &[u8]) -> impl Iterator<Item = &[u8]> {
    let mut start = 0;
    let mut ends = memchr::memchr_iter(b'\n', haystack);
    std::iter::from_fn(move || {
        let line = match ends.next() {
            Some(end) => {
                let line = &haystack[start..end];
                start = end + 1;
                line
            }
            None if start < haystack.len() => {
                let line = &haystack[start..];
                start = haystack.len();
                line
            }
            None => return None,
        };
        Some(line.strip_suffix(b"\r").unwrap_or(line))
    })
}
