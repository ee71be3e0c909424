//! Borrowing and consuming iterators

use std::iter::FusedIterator;

use crate::list::DoublyLinkedList;

/// Head-to-tail iterator over borrowed values. Created by
/// [`DoublyLinkedList::iter`].
pub struct Iter<'a, T> {
    list: &'a DoublyLinkedList<T>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(list: &'a DoublyLinkedList<T>) -> Self {
        Self {
            list,
            front: list.head,
            back: list.tail,
            remaining: list.len(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let slot = &self.list.slots[self.front?];
        self.front = slot.next;
        self.remaining -= 1;
        slot.value.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = &self.list.slots[self.back?];
        self.back = slot.prev;
        self.remaining -= 1;
        slot.value.as_ref()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            list: self.list,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

/// Consuming iterator. Each step pops the current head (or tail from the
/// back), so the list is drained in order and cannot be walked again.
pub struct IntoIter<T> {
    list: DoublyLinkedList<T>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(list: DoublyLinkedList<T>) -> Self {
        Self { list }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.list.pop_last()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_both_ends() {
        let list: DoublyLinkedList<i32> = (1..=5).collect();
        let mut iter = list.iter();

        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&5));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.next(), Some(&3));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn test_iter_is_repeatable() {
        let list: DoublyLinkedList<i32> = (1..=3).collect();

        let first: Vec<_> = list.iter().collect();
        let second: Vec<_> = (&list).into_iter().collect();

        assert_eq!(first, second);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_into_iter_drains_head_first() {
        let mut list = DoublyLinkedList::new();
        list.push(1);
        list.push(2);
        list.push(3);

        let drained: Vec<_> = list.into_iter().collect();
        assert_eq!(drained, vec![3, 2, 1]);
    }

    #[test]
    fn test_into_iter_rev() {
        let list: DoublyLinkedList<i32> = (1..=3).collect();

        let drained: Vec<_> = list.into_iter().rev().collect();
        assert_eq!(drained, vec![3, 2, 1]);
    }

    #[test]
    fn test_iter_empty() {
        let list = DoublyLinkedList::<i32>::new();

        assert_eq!(list.iter().next(), None);
        assert_eq!(list.into_iter().next(), None);
    }
}
