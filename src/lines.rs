/// An iterator over lines that keeps each line's terminator attached.
///
/// Keeping the terminator lets callers accumulate byte offsets while walking a
/// message, so footer values spanning multiple lines can be returned as one
/// contiguous slice of the original text.
pub(crate) struct LinesWithTerminator<'a> {
    text: &'a str,
}

impl<'a> LinesWithTerminator<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { text }
    }
}

impl<'a> Iterator for LinesWithTerminator<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        match self.text.find('\n') {
            None if self.text.is_empty() => None,
            None => {
                let line = self.text;
                self.text = "";
                Some(line)
            }
            Some(end) => {
                let (line, rest) = self.text.split_at(end + 1);
                self.text = rest;
                Some(line)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keeps_terminators() {
        let lines: Vec<_> = LinesWithTerminator::new("a\nb\r\n\nc").collect();
        assert_eq!(lines, vec!["a\n", "b\r\n", "\n", "c"]);
    }

    #[test]
    fn empty_input() {
        assert_eq!(LinesWithTerminator::new("").next(), None);
    }

    #[test]
    fn trailing_newline() {
        let lines: Vec<_> = LinesWithTerminator::new("a\n").collect();
        assert_eq!(lines, vec!["a\n"]);
    }
}
