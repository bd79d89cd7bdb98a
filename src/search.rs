// search.rs - Regex search over a buffer

use crate::buffer::TextBuffer;
use crate::cursor::Position;
use log::warn;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A match as a rune span on one line, end exclusive.
pub type Match = (Position, Position);

#[derive(Debug, Default)]
pub struct SearchState {
    pub query: String,
    pub regex: Option<Regex>,
    pub matches: Vec<Match>,
    pub current: Option<usize>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn clear(&mut self) {
        self.matches.clear();
        self.current = None;
    }

    /// Collect every non-overlapping match of `pattern`, line by line.
    /// An invalid pattern leaves the state empty. Searching the same
    /// pattern again reuses the compiled regex.
    pub fn search(&mut self, pattern: &str, buffer: &TextBuffer) -> Result<usize, SearchError> {
        self.query = pattern.to_string();
        self.clear();
        let cached = self.regex.take().filter(|r| r.as_str() == pattern);
        if pattern.is_empty() {
            return Ok(0);
        }

        let regex = match cached {
            Some(regex) => regex,
            None => Regex::new(pattern).map_err(|source| {
                warn!("failed to search {:?}: {}", pattern, source);
                SearchError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                }
            })?,
        };

        for line_idx in 0..buffer.line_count() {
            let Some(line) = buffer.line(line_idx) else {
                continue;
            };
            // byte offsets -> rune offsets, walking forward once per line
            let mut byte = 0;
            let mut rune = 0;
            for m in regex.find_iter(&line) {
                rune += line[byte..m.start()].chars().count();
                let start = rune;
                let end = start + m.as_str().chars().count();
                byte = m.start();
                self.matches
                    .push((Position::new(line_idx, start), Position::new(line_idx, end)));
            }
        }
        self.regex = Some(regex);
        Ok(self.matches.len())
    }

    /// Highlight match `index` and move the cursor to its start.
    pub fn jump_to(&mut self, index: usize, buffer: &mut TextBuffer) -> Option<Match> {
        let found = *self.matches.get(index)?;
        self.current = Some(index);
        buffer.set_cursor(found.0);
        buffer.highlight = Some(found);
        Some(found)
    }

    pub fn next(&mut self, buffer: &mut TextBuffer) -> Option<Match> {
        if self.matches.is_empty() {
            return None;
        }
        let index = self.current.map_or(0, |i| (i + 1) % self.matches.len());
        self.jump_to(index, buffer)
    }

    pub fn prev(&mut self, buffer: &mut TextBuffer) -> Option<Match> {
        if self.matches.is_empty() {
            return None;
        }
        let len = self.matches.len();
        let index = self.current.map_or(len - 1, |i| (i + len - 1) % len);
        self.jump_to(index, buffer)
    }

    /// Jump to the first match strictly after `pos`, wrapping to the first.
    pub fn next_after(&mut self, pos: Position, buffer: &mut TextBuffer) -> Option<Match> {
        let index = self
            .matches
            .iter()
            .position(|(start, _)| *start > pos)
            .or(if self.matches.is_empty() { None } else { Some(0) })?;
        self.jump_to(index, buffer)
    }

    /// Jump to the last match strictly before `pos`, wrapping to the last.
    pub fn prev_before(&mut self, pos: Position, buffer: &mut TextBuffer) -> Option<Match> {
        let index = self
            .matches
            .iter()
            .rposition(|(start, _)| *start < pos)
            .or(self.matches.len().checked_sub(1))?;
        self.jump_to(index, buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn buffer(lines: &[&str]) -> TextBuffer {
        TextBuffer::from_lines(Path::new("search.txt"), lines)
    }

    #[test]
    fn test_search_collects_all_matches_in_order() {
        let buf = buffer(&["foo bar foo", "nothing", "xfoo"]);
        let mut search = SearchState::new();
        assert_eq!(search.search("foo", &buf).unwrap(), 3);
        assert_eq!(
            search.matches,
            vec![
                (Position::new(0, 0), Position::new(0, 3)),
                (Position::new(0, 8), Position::new(0, 11)),
                (Position::new(2, 1), Position::new(2, 4)),
            ]
        );
    }

    #[test]
    fn test_search_reports_rune_columns() {
        let buf = buffer(&["漢字 abc 漢字"]);
        let mut search = SearchState::new();
        search.search("漢字", &buf).unwrap();
        assert_eq!(
            search.matches,
            vec![
                (Position::new(0, 0), Position::new(0, 2)),
                (Position::new(0, 7), Position::new(0, 9)),
            ]
        );
    }

    #[test]
    fn test_search_regex() {
        let buf = buffer(&["a1 b22 c333"]);
        let mut search = SearchState::new();
        search.search(r"\d+", &buf).unwrap();
        let spans: Vec<(usize, usize)> = search.matches.iter().map(|(s, e)| (s.col, e.col)).collect();
        assert_eq!(spans, vec![(1, 2), (4, 6), (8, 11)]);
    }

    #[test]
    fn test_invalid_pattern_yields_no_matches() {
        let buf = buffer(&["(unclosed"]);
        let mut search = SearchState::new();
        search.search("x", &buf).unwrap();
        let err = search.search("(", &buf).unwrap_err();
        assert!(matches!(err, SearchError::InvalidPattern { .. }));
        assert!(search.is_empty());
        assert_eq!(search.current, None);
    }

    #[test]
    fn test_zero_matches_leave_cursor() {
        let mut buf = buffer(&["abc", "def"]);
        buf.set_cursor(Position::new(1, 2));
        let mut search = SearchState::new();
        assert_eq!(search.search("zzz", &buf).unwrap(), 0);
        assert!(search.next(&mut buf).is_none());
        assert!(search.prev(&mut buf).is_none());
        assert!(search.next_after(Position::origin(), &mut buf).is_none());
        assert_eq!(buf.cursor(), Position::new(1, 2));
        assert!(buf.highlight.is_none());
    }

    #[test]
    fn test_jump_sets_highlight_and_cursor() {
        let mut buf = buffer(&["one", "two one"]);
        let mut search = SearchState::new();
        search.search("one", &buf).unwrap();
        search.jump_to(1, &mut buf).unwrap();
        assert_eq!(buf.cursor(), Position::new(1, 4));
        assert_eq!(buf.highlight, Some((Position::new(1, 4), Position::new(1, 7))));
        assert!(search.jump_to(5, &mut buf).is_none());
        assert_eq!(search.current, Some(1));
    }

    #[test]
    fn test_navigation_wraps() {
        let mut buf = buffer(&["x x", "x"]);
        let mut search = SearchState::new();
        search.search("x", &buf).unwrap();

        assert_eq!(search.next(&mut buf).unwrap().0, Position::new(0, 0));
        assert_eq!(search.next(&mut buf).unwrap().0, Position::new(0, 2));
        assert_eq!(search.next(&mut buf).unwrap().0, Position::new(1, 0));
        assert_eq!(search.next(&mut buf).unwrap().0, Position::new(0, 0));
        assert_eq!(search.prev(&mut buf).unwrap().0, Position::new(1, 0));
    }

    #[test]
    fn test_next_after_and_prev_before() {
        let mut buf = buffer(&["ab ab", "ab"]);
        let mut search = SearchState::new();
        search.search("ab", &buf).unwrap();
        let found = search.next_after(Position::new(0, 0), &mut buf).unwrap();
        assert_eq!(found.0, Position::new(0, 3));
        let found = search.next_after(Position::new(1, 0), &mut buf).unwrap();
        assert_eq!(found.0, Position::new(0, 0));
        let found = search.prev_before(Position::new(0, 0), &mut buf).unwrap();
        assert_eq!(found.0, Position::new(1, 0));
    }

    #[test]
    fn test_empty_pattern() {
        let buf = buffer(&["abc"]);
        let mut search = SearchState::new();
        search.search("b", &buf).unwrap();
        assert_eq!(search.search("", &buf).unwrap(), 0);
        assert!(search.regex.is_none());
    }

    #[test]
    fn test_research_reuses_regex_on_changed_text() {
        let mut buf = buffer(&["ab"]);
        let mut search = SearchState::new();
        assert_eq!(search.search("a", &buf).unwrap(), 1);
        assert_eq!(search.regex.as_ref().unwrap().as_str(), "a");

        buf.set_cursor(Position::new(0, 2));
        buf.insert_rune('a');
        assert_eq!(search.search("a", &buf).unwrap(), 2);
        assert_eq!(search.regex.as_ref().unwrap().as_str(), "a");

        search.search("b", &buf).unwrap();
        assert_eq!(search.regex.as_ref().unwrap().as_str(), "b");
        assert!(search.search("(", &buf).is_err());
        assert!(search.regex.is_none());
    }
}
