use serde::Serialize;

/// Cursor over a deck of `len` pages.
///
/// Moves that would leave `[0, len - 1]` are no-ops and return `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    current: usize,
    len: usize,
}

/// Position shown in the viewer's progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// 1-based page number, 0 for an empty deck.
    pub position: usize,
    pub total: usize,
    pub percent: u8,
}

impl Navigator {
    pub fn new(len: usize) -> Self {
        Self { current: 0, len }
    }

    /// Cursor placed at `index`, or `None` when out of range.
    pub fn at(len: usize, index: usize) -> Option<Self> {
        (index < len).then_some(Self {
            current: index,
            len,
        })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn has_next(&self) -> bool {
        self.current + 1 < self.len
    }

    pub fn has_previous(&self) -> bool {
        self.current > 0 && self.len > 0
    }

    /// On the final page, where the booking call to action is shown.
    pub fn is_last(&self) -> bool {
        self.len > 0 && self.current == self.len - 1
    }

    pub fn next_index(&self) -> Option<usize> {
        self.has_next().then_some(self.current + 1)
    }

    pub fn previous_index(&self) -> Option<usize> {
        self.has_previous().then(|| self.current - 1)
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.current + 1)
    }

    pub fn previous(&mut self) -> bool {
        match self.current.checked_sub(1) {
            Some(index) => self.go_to(index),
            None => false,
        }
    }

    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.len || index == self.current {
            return false;
        }
        self.current = index;
        true
    }

    pub fn progress(&self) -> Progress {
        if self.len == 0 {
            return Progress {
                position: 0,
                total: 0,
                percent: 0,
            };
        }
        let position = self.current + 1;
        Progress {
            position,
            total: self.len,
            percent: (position * 100 / self.len) as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_forward_and_back_within_bounds() {
        let mut nav = Navigator::new(3);
        assert!(!nav.has_previous());
        assert!(!nav.previous());
        assert_eq!(nav.current(), 0);

        assert!(nav.next());
        assert!(nav.next());
        assert!(nav.is_last());
        assert!(!nav.next());
        assert_eq!(nav.current(), 2);

        assert!(nav.previous());
        assert_eq!(nav.current(), 1);
    }

    #[test]
    fn out_of_range_jump_is_a_no_op() {
        let mut nav = Navigator::new(2);
        assert!(!nav.go_to(5));
        assert_eq!(nav.current(), 0);
        assert!(nav.go_to(1));
        assert_eq!(nav.current(), 1);
    }

    #[test]
    fn empty_deck_never_moves() {
        let mut nav = Navigator::new(0);
        assert!(nav.is_empty());
        assert!(!nav.next());
        assert!(!nav.previous());
        assert!(!nav.is_last());
        assert!(!nav.has_previous());
        assert_eq!(nav.progress().position, 0);
    }

    #[test]
    fn at_rejects_out_of_range() {
        assert!(Navigator::at(3, 3).is_none());
        let nav = Navigator::at(3, 1).unwrap();
        assert_eq!(nav.previous_index(), Some(0));
        assert_eq!(nav.next_index(), Some(2));
    }

    #[test]
    fn progress_reports_position_and_percent() {
        let nav = Navigator::at(4, 1).unwrap();
        assert_eq!(
            nav.progress(),
            Progress {
                position: 2,
                total: 4,
                percent: 50,
            }
        );
        assert_eq!(Navigator::at(3, 2).unwrap().progress().percent, 100);
    }
}
