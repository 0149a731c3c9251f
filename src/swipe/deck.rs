use crate::news::NewsItem;

/// What happened when the top card was dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The next card is now on top.
    Moved,
    /// There was no next card; the deck needs a reload.
    Exhausted,
}

/// Ordered cards plus the position of the one on top.
///
/// Invariant: `current_index <= items.len()`, and `current_index < items.len()`
/// whenever the deck is non-empty.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    items: Vec<NewsItem>,
    current_index: usize,
}

impl Deck {
    pub fn new(items: Vec<NewsItem>) -> Self {
        Self {
            items,
            current_index: 0,
        }
    }

    pub fn items(&self) -> &[NewsItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> Option<&NewsItem> {
        self.items.get(self.current_index)
    }

    /// The card underneath the current one, if any. Never mutates.
    pub fn peek_next(&self) -> Option<&NewsItem> {
        self.items.get(self.current_index + 1)
    }

    /// Move to the next card, or report that the deck ran out.
    pub fn advance(&mut self) -> Advance {
        if self.current_index + 1 < self.items.len() {
            self.current_index += 1;
            Advance::Moved
        } else {
            Advance::Exhausted
        }
    }

    /// Swap in a freshly loaded feed, starting from the top.
    pub fn replace(&mut self, items: Vec<NewsItem>) {
        self.items = items;
        self.current_index = 0;
    }
}
