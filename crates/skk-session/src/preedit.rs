/// Tracks what the host currently shows so each key can be answered with a
/// literal edit string.
#[derive(Debug, Clone, Default)]
pub struct PreEdit {
    current: String,
    kakutei: String,
}

impl PreEdit {
    /// Queue committed text for the next [`output`](Self::output).
    pub fn kakutei(&mut self, text: &str) {
        self.kakutei.push_str(text);
    }

    /// Edit string turning the shown pre-edit into `committed + next`.
    ///
    /// When nothing was committed and `next` extends the shown text, only the
    /// appended part is returned; otherwise the old pre-edit is erased with
    /// one backspace per character first.
    pub fn output(&mut self, next: &str) -> String {
        let committed = std::mem::take(&mut self.kakutei);
        let out = match next.strip_prefix(self.current.as_str()) {
            Some(suffix) if committed.is_empty() => suffix.to_string(),
            _ => {
                let erase = "\x08".repeat(self.current.chars().count());
                format!("{erase}{committed}{next}")
            }
        };
        self.current = next.to_string();
        out
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn pending_kakutei(&self) -> &str {
        &self.kakutei
    }

    pub fn reset(&mut self) {
        self.current.clear();
        self.kakutei.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_suffix_only() {
        let mut p = PreEdit::default();
        assert_eq!(p.output("k"), "k");
        assert_eq!(p.output("k"), "");
        assert_eq!(p.current(), "k");
    }

    #[test]
    fn erases_on_replacement() {
        let mut p = PreEdit::default();
        p.output("▽か");
        assert_eq!(p.output("▽かk"), "k");
        assert_eq!(p.output("▽かき"), "\x08\x08\x08▽かき");
    }

    #[test]
    fn committed_text_goes_between() {
        let mut p = PreEdit::default();
        p.output("▼漢字");
        p.kakutei("漢字");
        assert_eq!(p.output(""), "\x08\x08\x08漢字");
        assert_eq!(p.current(), "");
        p.kakutei("あ");
        assert_eq!(p.output(""), "あ");
    }
}
