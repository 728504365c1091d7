//! OverflowStore: entries the primary table could not place within its
//! probe budget.
//!
//! A singly linked list whose nodes live in a `SlotMap` arena, so links
//! are generational keys rather than pointers. Appends are O(1) through
//! the tail handle; lookups and removals scan from the head.

use slotmap::{DefaultKey, SlotMap};

#[derive(Debug)]
struct Node<V> {
    key: i64,
    value: V,
    next: Option<DefaultKey>,
}

pub(crate) struct OverflowStore<V> {
    nodes: SlotMap<DefaultKey, Node<V>>,
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
}

impl<V> OverflowStore<V> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            head: None,
            tail: None,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }
    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends at the tail. The caller guarantees `key` is not already here.
    pub(crate) fn append(&mut self, key: i64, value: V) {
        debug_assert!(self.find(key).is_none(), "key {} already in overflow", key);
        let k = self.nodes.insert(Node {
            key,
            value,
            next: None,
        });
        match self.tail {
            Some(t) => self.nodes[t].next = Some(k),
            None => self.head = Some(k),
        }
        self.tail = Some(k);
    }

    fn locate(&self, key: i64) -> Option<DefaultKey> {
        let mut cur = self.head;
        while let Some(k) = cur {
            let node = &self.nodes[k];
            if node.key == key {
                return Some(k);
            }
            cur = node.next;
        }
        None
    }

    pub(crate) fn find(&self, key: i64) -> Option<&V> {
        self.locate(key).map(|k| &self.nodes[k].value)
    }

    pub(crate) fn find_mut(&mut self, key: i64) -> Option<&mut V> {
        let k = self.locate(key)?;
        Some(&mut self.nodes[k].value)
    }

    pub(crate) fn contains(&self, key: i64) -> bool {
        self.locate(key).is_some()
    }

    /// Unlinks the node holding `key`, repairing head and tail.
    pub(crate) fn remove(&mut self, key: i64) -> Option<V> {
        let mut prev: Option<DefaultKey> = None;
        let mut cur = self.head;
        while let Some(k) = cur {
            if self.nodes[k].key == key {
                break;
            }
            prev = Some(k);
            cur = self.nodes[k].next;
        }
        let k = cur?;
        let node = self.nodes.remove(k).expect("linked node missing from arena");
        match prev {
            Some(p) => self.nodes[p].next = node.next,
            None => self.head = node.next,
        }
        if self.tail == Some(k) {
            self.tail = prev;
        }
        Some(node.value)
    }

    /// Empties the store, yielding entries in list order.
    pub(crate) fn drain(&mut self) -> Drain<V> {
        let nodes = core::mem::take(&mut self.nodes);
        let head = self.head.take();
        self.tail = None;
        Drain { nodes, cur: head }
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    pub(crate) fn iter(&self) -> Iter<'_, V> {
        Iter {
            nodes: &self.nodes,
            cur: self.head,
        }
    }

    pub(crate) fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            it: self.nodes.iter_mut(),
        }
    }
}

/// Owning iterator returned by [`OverflowStore::drain`].
pub(crate) struct Drain<V> {
    nodes: SlotMap<DefaultKey, Node<V>>,
    cur: Option<DefaultKey>,
}

impl<V> Iterator for Drain<V> {
    type Item = (i64, V);
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cur?;
        let node = self.nodes.remove(k)?;
        self.cur = node.next;
        Some((node.key, node.value))
    }
}

/// List-order iterator over overflow entries.
pub(crate) struct Iter<'a, V> {
    nodes: &'a SlotMap<DefaultKey, Node<V>>,
    cur: Option<DefaultKey>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (i64, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes.get(self.cur?)?;
        self.cur = node.next;
        Some((node.key, &node.value))
    }
}

/// Mutable iterator; arena order, which need not match list order.
pub(crate) struct IterMut<'a, V> {
    it: slotmap::basic::IterMut<'a, DefaultKey, Node<V>>,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (i64, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, n)| (n.key, &mut n.value))
    }
}
