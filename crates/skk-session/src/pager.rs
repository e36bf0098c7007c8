//! Candidate index stepping and page layout.
//!
//! The first `show_count` candidates are shown inline one at a time. Past
//! that, each step jumps a whole page of [`PAGE_SIZE`] and the page holding
//! the current index is offered with selection keys. Pages start at
//! `show_count + n * PAGE_SIZE`; the last one may be partial.

use skk_core::dict::strip_annotation;
use skk_core::settings::{CandidateSettings, PAGE_SIZE};

const STEP: isize = PAGE_SIZE as isize;

#[derive(Debug, Clone)]
pub struct CandidatePager {
    show_count: isize,
    keys: Vec<char>,
}

impl CandidatePager {
    pub fn new(show_count: usize, keys: Vec<char>) -> Self {
        Self {
            show_count: show_count as isize,
            keys,
        }
    }

    pub fn from_settings(settings: &CandidateSettings) -> Self {
        Self::new(settings.show_candidates_count, settings.select_keys())
    }

    pub fn show_count(&self) -> usize {
        self.show_count as usize
    }

    pub fn keys(&self) -> &[char] {
        &self.keys
    }

    /// Next index. The caller treats a result `>= len` as exhaustion.
    pub fn forward(&self, index: isize) -> isize {
        if index < self.show_count - 1 {
            index + 1
        } else {
            index + STEP
        }
    }

    /// Next index among `len` candidates, or `None` once the last one has
    /// been reached. A page step past the end lands on the last candidate.
    pub fn next(&self, index: isize, len: usize) -> Option<isize> {
        let last = len as isize - 1;
        if index >= last {
            return None;
        }
        Some(self.forward(index).min(last))
    }

    /// Previous index: the end of the previous page, or the last inline
    /// candidate. `-1` means back to composing.
    pub fn backward(&self, index: isize) -> isize {
        if index >= self.show_count {
            self.page_start(index) as isize - 1
        } else {
            index - 1
        }
    }

    /// Whether `index` is shown as a page rather than inline.
    pub fn is_paged(&self, index: isize) -> bool {
        index >= self.show_count
    }

    /// First index of the page holding the paged `index`.
    pub fn page_start(&self, index: isize) -> usize {
        if index < self.show_count {
            return 0;
        }
        let t = self.show_count;
        (t + (index - t) / STEP * STEP) as usize
    }

    /// Candidate index chosen by `key` on the page holding `index`.
    /// Keys outside the selection set or past the end yield `None`.
    pub fn select(&self, index: isize, key: char, len: usize) -> Option<usize> {
        let pos = self.keys.iter().position(|&k| k == key)?;
        let i = self.page_start(index) + pos;
        (i < len).then_some(i)
    }

    /// `key: candidate` labels for `candidates[start..start + 7]`.
    pub fn labels(&self, candidates: &[String], start: usize) -> Vec<String> {
        candidates
            .iter()
            .skip(start)
            .take(PAGE_SIZE)
            .zip(&self.keys)
            .map(|(cand, key)| format!("{key}: {}", strip_annotation(cand)))
            .collect()
    }

    /// Start of interactive page `page` (0-based), right after the inline run.
    pub fn interactive_start(&self, page: usize) -> usize {
        self.show_count as usize + page * PAGE_SIZE
    }

    /// Interactive page containing the paged `index`.
    pub fn interactive_page(&self, index: isize) -> usize {
        let start = self.page_start(index);
        start.saturating_sub(self.show_count as usize) / PAGE_SIZE
    }
}
