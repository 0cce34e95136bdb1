//! Distance-sorted reference lists and their bidirectional cursor.

use proxima_types::{DbId, DistanceId};

/// The points assigned to one reference point, sorted ascending by their
/// distance to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistanceList {
    entries: Vec<DistanceId>,
}

impl DistanceList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Build a list from unsorted pairs.
    pub fn from_unsorted(mut entries: Vec<DistanceId>) -> Self {
        entries.sort_by(DistanceId::total_cmp);
        Self { entries }
    }

    pub(crate) fn push(&mut self, distance: f64, id: DbId) {
        self.entries.push(DistanceId::new(distance, id));
    }

    pub(crate) fn sort(&mut self) {
        self.entries.sort_by(DistanceId::total_cmp);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, offset: usize) -> Option<&DistanceId> {
        self.entries.get(offset)
    }

    pub fn as_slice(&self) -> &[DistanceId] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DistanceId> {
        self.entries.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = DbId> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    /// Largest stored distance, i.e. the radius of the reference's region.
    pub fn radius(&self) -> Option<f64> {
        self.entries.last().map(|e| e.distance)
    }

    pub fn is_sorted(&self) -> bool {
        self.entries.windows(2).all(|w| w[0].distance <= w[1].distance)
    }

    /// Position at which a scan for `distance` should start.
    ///
    /// Returns the offset of an entry with exactly this distance if there is
    /// one, otherwise the first entry with a larger distance, clamped to the
    /// last entry. Returns 0 for an empty list.
    pub fn search(&self, distance: f64) -> usize {
        let (mut left, mut right) = (0, self.entries.len());
        while left < right {
            let mid = (left + right) / 2;
            let current = self.entries[mid].distance;
            if distance < current {
                right = mid;
            } else if distance > current {
                left = mid + 1;
            } else {
                left = mid;
                break;
            }
        }
        left.min(self.entries.len().saturating_sub(1))
    }

    /// Cursor positioned at the first entry (invalid for an empty list).
    pub fn cursor(&self) -> ListCursor<'_> {
        ListCursor {
            entries: &self.entries,
            pos: 0,
        }
    }

    /// Cursor positioned at `offset`.
    pub fn cursor_at(&self, offset: usize) -> ListCursor<'_> {
        let mut cursor = self.cursor();
        cursor.seek(offset);
        cursor
    }
}

impl<'a> IntoIterator for &'a DistanceList {
    type Item = &'a DistanceId;
    type IntoIter = std::slice::Iter<'a, DistanceId>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A position in a [`DistanceList`] that can move in both directions.
///
/// The cursor may step one past either end, where it becomes invalid. Use
/// [`peek`](ListCursor::peek) for a borrowed view of the current entry and
/// the [`Iterator`] impl for owned copies.
#[derive(Debug, Clone)]
pub struct ListCursor<'a> {
    entries: &'a [DistanceId],
    pos: isize,
}

impl<'a> ListCursor<'a> {
    pub fn is_valid(&self) -> bool {
        self.pos >= 0 && (self.pos as usize) < self.entries.len()
    }

    /// Offset of the current entry, `None` when invalid.
    pub fn offset(&self) -> Option<usize> {
        self.is_valid().then_some(self.pos as usize)
    }

    pub fn peek(&self) -> Option<&'a DistanceId> {
        self.offset().map(|offset| &self.entries[offset])
    }

    /// Stored distance of the current entry, NaN when invalid.
    pub fn distance(&self) -> f64 {
        self.peek().map_or(f64::NAN, |e| e.distance)
    }

    pub fn seek(&mut self, offset: usize) {
        self.pos = offset.min(self.entries.len()) as isize;
    }

    pub fn advance(&mut self) {
        if self.pos < self.entries.len() as isize {
            self.pos += 1;
        }
    }

    pub fn retract(&mut self) {
        if self.pos >= 0 {
            self.pos -= 1;
        }
    }
}

impl Iterator for ListCursor<'_> {
    type Item = DistanceId;

    fn next(&mut self) -> Option<DistanceId> {
        let current = self.peek().copied();
        if current.is_some() {
            self.advance();
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(distances: &[f64]) -> DistanceList {
        DistanceList::from_unsorted(
            distances
                .iter()
                .enumerate()
                .map(|(i, d)| DistanceId::new(*d, DbId::new(i as u32)))
                .collect(),
        )
    }

    #[test]
    fn test_sorted_on_construction() {
        let l = list(&[3.0, 1.0, 2.0]);
        assert!(l.is_sorted());
        assert_eq!(l.ids().collect::<Vec<_>>(), vec![DbId::new(1), DbId::new(2), DbId::new(0)]);
        assert_eq!(l.radius(), Some(3.0));
    }

    #[test]
    fn test_search() {
        let l = list(&[0.0, 1.0, 2.0, 4.0]);
        assert_eq!(l.search(2.0), 2);
        assert_eq!(l.search(3.0), 3);
        assert_eq!(l.search(-1.0), 0);
        assert_eq!(l.search(9.0), 3);
        assert_eq!(DistanceList::new().search(1.0), 0);
    }

    #[test]
    fn test_cursor_moves_both_ways() {
        let l = list(&[0.0, 1.0, 2.0]);
        let mut cursor = l.cursor_at(1);
        assert_eq!(cursor.distance(), 1.0);
        cursor.retract();
        assert_eq!(cursor.offset(), Some(0));
        cursor.retract();
        assert!(!cursor.is_valid());
        assert!(cursor.distance().is_nan());
        cursor.retract();
        cursor.advance();
        assert_eq!(cursor.offset(), Some(0));

        cursor.seek(2);
        cursor.advance();
        assert!(cursor.peek().is_none());
        cursor.advance();
        cursor.retract();
        assert_eq!(cursor.offset(), Some(2));
    }

    #[test]
    fn test_cursor_iterates_owned_copies() {
        let l = list(&[0.5, 0.25]);
        let collected: Vec<DistanceId> = l.cursor().collect();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].distance, 0.25);
        assert!(DistanceList::new().cursor().next().is_none());
    }
}
