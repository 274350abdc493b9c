//! Manual album ordering within a category.
//!
//! Albums are ordered by their `date` field, ascending. A move adjusts only
//! the moved album's date — the midpoint of its two new neighbors, or a
//! one-day offset from the single adjacent neighbor at a list boundary —
//! so siblings never need renumbering and a move is O(1).

use chrono::{DateTime, Duration, Utc};

use galleria_core::AlbumId;

use crate::error::StoreError;
use crate::store::Store;

impl Store {
    /// Move an album one position towards the front of its category.
    /// A no-op when it is already first.
    pub fn move_up(&mut self, id: &AlbumId, category: &str) -> Result<(), StoreError> {
        self.shift(id, category, -1)
    }

    /// Move an album one position towards the back of its category.
    /// A no-op when it is already last.
    pub fn move_down(&mut self, id: &AlbumId, category: &str) -> Result<(), StoreError> {
        self.shift(id, category, 1)
    }

    fn shift(&mut self, id: &AlbumId, category: &str, direction: i64) -> Result<(), StoreError> {
        let ordered: Vec<(AlbumId, DateTime<Utc>)> = self
            .albums_in_category(category)
            .iter()
            .map(|a| (a.id.clone(), a.date))
            .collect();
        let pos = ordered
            .iter()
            .position(|(aid, _)| aid == id)
            .ok_or_else(|| StoreError::UnknownAlbum { id: id.0.clone() })?;

        let new_date = match direction {
            -1 if pos == 0 => return Ok(()),
            -1 => slot_before(&ordered, pos - 1),
            1 if pos + 1 == ordered.len() => return Ok(()),
            1 => slot_after(&ordered, pos + 1),
            _ => return Ok(()),
        };

        self.find_mut(id)?.date = new_date;
        self.mark_dirty();
        Ok(())
    }
}

/// A date placing the album immediately before `ordered[neighbor]`:
/// the midpoint to the previous element, or one day earlier at the front.
fn slot_before(ordered: &[(AlbumId, DateTime<Utc>)], neighbor: usize) -> DateTime<Utc> {
    let succ = ordered[neighbor].1;
    match neighbor.checked_sub(1) {
        Some(prev) => midpoint(ordered[prev].1, succ),
        None => succ - Duration::days(1),
    }
}

/// A date placing the album immediately after `ordered[neighbor]`:
/// the midpoint to the next element, or one day later at the back.
fn slot_after(ordered: &[(AlbumId, DateTime<Utc>)], neighbor: usize) -> DateTime<Utc> {
    let pred = ordered[neighbor].1;
    if neighbor + 1 < ordered.len() {
        midpoint(pred, ordered[neighbor + 1].1)
    } else {
        pred + Duration::days(1)
    }
}

fn midpoint(a: DateTime<Utc>, b: DateTime<Utc>) -> DateTime<Utc> {
    a + (b - a) / 2
}
