//! Collision chains.
//!
//! A slot is `Option<Node>`: the chain head lives inline in the slot, so
//! placing into an empty slot allocates nothing. Every further node lives in
//! the table's `SlotMap` arena and is reached through the `next` link of
//! its predecessor. Each arena node is owned by exactly one link; unlinking
//! a node hands its `next` to whoever pointed at it.

use core::borrow::Borrow;
use core::mem;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Arena handle of a non-head chain node.
    pub(crate) struct NodeId;
}

#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) next: Option<NodeId>,
}

impl<K, V> Node<K, V> {
    #[inline]
    pub(crate) fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            next: None,
        }
    }
}

pub(crate) type Slot<K, V> = Option<Node<K, V>>;
pub(crate) type Arena<K, V> = SlotMap<NodeId, Node<K, V>>;

/// Walks one chain in order. Yields `(None, head)` first, then
/// `(Some(id), node)` for every arena node.
pub(crate) struct Walk<'a, K, V> {
    arena: &'a Arena<K, V>,
    next: Option<(Option<NodeId>, &'a Node<K, V>)>,
}

impl<'a, K, V> Iterator for Walk<'a, K, V> {
    type Item = (Option<NodeId>, &'a Node<K, V>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (id, node) = self.next.take()?;
        self.next = node
            .next
            .and_then(|nid| self.arena.get(nid).map(|n| (Some(nid), n)));
        Some((id, node))
    }
}

pub(crate) fn walk<'a, K, V>(slot: &'a Slot<K, V>, arena: &'a Arena<K, V>) -> Walk<'a, K, V> {
    Walk {
        arena,
        next: slot.as_ref().map(|head| (None, head)),
    }
}

/// Number of entries in the chain rooted at `slot`.
#[cfg(test)]
pub(crate) fn len<K, V>(slot: &Slot<K, V>, arena: &Arena<K, V>) -> usize {
    walk(slot, arena).count()
}

/// Append `(key, value)` at the tail. No duplicate check.
pub(crate) fn push_back<K, V>(slot: &mut Slot<K, V>, arena: &mut Arena<K, V>, key: K, value: V) {
    let Some(head) = slot.as_mut() else {
        *slot = Some(Node::new(key, value));
        return;
    };
    let id = arena.insert(Node::new(key, value));
    let Some(mut tail) = head.next else {
        head.next = Some(id);
        return;
    };
    while let Some(next) = arena[tail].next {
        tail = next;
    }
    arena[tail].next = Some(id);
}

/// First node whose key equals `q`.
pub(crate) fn find<'a, K, V, Q>(
    slot: &'a Slot<K, V>,
    arena: &'a Arena<K, V>,
    q: &Q,
) -> Option<&'a Node<K, V>>
where
    K: Borrow<Q>,
    Q: ?Sized + Eq,
{
    walk(slot, arena)
        .map(|(_, node)| node)
        .find(|node| node.key.borrow() == q)
}

/// Mutable access to the value of the first node whose key equals `q`.
pub(crate) fn find_mut<'a, K, V, Q>(
    slot: &'a mut Slot<K, V>,
    arena: &'a mut Arena<K, V>,
    q: &Q,
) -> Option<&'a mut V>
where
    K: Borrow<Q>,
    Q: ?Sized + Eq,
{
    let head = slot.as_mut()?;
    if head.key.borrow() == q {
        return Some(&mut head.value);
    }
    let mut cur = head.next;
    while let Some(id) = cur {
        let node = arena.get(id)?;
        let hit = node.key.borrow() == q;
        cur = node.next;
        if hit {
            return arena.get_mut(id).map(|n| &mut n.value);
        }
    }
    None
}

/// Unlink the first node whose key equals `q` and return its contents.
///
/// A removed head with a successor takes over the successor's contents and
/// link; the successor's arena slot is freed. A removed head without a
/// successor leaves the slot empty. A removed inner node is bypassed by
/// moving its `next` into its predecessor.
pub(crate) fn unlink<K, V, Q>(
    slot: &mut Slot<K, V>,
    arena: &mut Arena<K, V>,
    q: &Q,
) -> Option<(K, V)>
where
    K: Borrow<Q>,
    Q: ?Sized + Eq,
{
    let head = slot.as_mut()?;
    if head.key.borrow() == q {
        if let Some(successor) = head.next.and_then(|id| arena.remove(id)) {
            let old = mem::replace(head, successor);
            return Some((old.key, old.value));
        }
        let old = slot.take()?;
        return Some((old.key, old.value));
    }

    let mut prev: Option<NodeId> = None;
    let mut cur = head.next;
    while let Some(id) = cur {
        let node = arena.get(id)?;
        let next = node.next;
        if node.key.borrow() == q {
            let removed = arena.remove(id)?;
            match prev {
                None => head.next = next,
                Some(p) => arena[p].next = next,
            }
            return Some((removed.key, removed.value));
        }
        prev = Some(id);
        cur = next;
    }
    None
}

/// Move every entry of the chain into `out`, in chain order, leaving the
/// slot empty and freeing the chain's arena nodes.
pub(crate) fn drain_into<K, V>(
    slot: &mut Slot<K, V>,
    arena: &mut Arena<K, V>,
    out: &mut Vec<(K, V)>,
) {
    let Some(head) = slot.take() else {
        return;
    };
    let mut next = head.next;
    out.push((head.key, head.value));
    while let Some(node) = next.and_then(|id| arena.remove(id)) {
        next = node.next;
        out.push((node.key, node.value));
    }
}
