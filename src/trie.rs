//! Code for the [`TrieNode`] prefix tree.

use std::mem;

/// A node in the prefix tree that a lookup function is generated from.
///
/// Each node holds an ordered list of [`Entry`]s: either the next byte of
/// some key and the node it leads to, or the end of a key and its value.
/// Entries stay in the order they were first inserted, so rendering the same
/// keys in the same order always produces the same code.
///
/// ```rust
/// use triegen::{Entry, TrieNode};
///
/// let root =
///     TrieNode::from_iter([("ab".as_bytes(), 1), ("a".as_bytes(), 2)]);
/// assert_eq!(root.get(b"ab"), Some(1));
/// assert_eq!(root.get(b"a"), Some(2));
/// assert_eq!(root.get(b"b"), None);
///
/// let Entry::Byte(b'a', child) = &root.entries[0] else { panic!() };
/// assert!(matches!(child.entries[..], [Entry::Byte(b'b', _), Entry::End(2)]));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrieNode {
    /// Entries in insertion order. There is at most one [`Entry::End`], and
    /// at most one [`Entry::Byte`] for any given byte.
    pub entries: Vec<Entry>,
}

/// One outgoing entry of a [`TrieNode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    /// A key ends at this node.
    ///
    /// This is the terminal marker. In generated code it is the string
    /// terminator, `0`, which is why keys may not contain a NUL byte.
    End(i64),

    /// The next byte of at least one key, and the node it leads to.
    Byte(u8, TrieNode),
}

/// An unbranched run of nodes that ends a single key.
///
/// Returned by [`TrieNode::chain()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chain {
    /// The remaining bytes of the key. Never empty.
    pub bytes: Vec<u8>,

    /// The value of the key.
    pub value: i64,
}

impl TrieNode {
    /// Insert a key rooted in this node.
    ///
    /// Returns the previous value if the exact key was already present. The
    /// value is replaced in place, so the entry keeps its original position.
    ///
    /// ```rust
    /// let mut node = triegen::TrieNode::default();
    /// assert_eq!(node.insert(b"a", 1), None);
    /// assert_eq!(node.insert(b"a", 2), Some(1));
    /// assert_eq!(node.get(b"a"), Some(2));
    /// ```
    pub fn insert<'a, K>(&mut self, key: K, value: i64) -> Option<i64>
    where
        K: IntoIterator<Item = &'a u8>,
    {
        key.into_iter()
            .fold(self, |node, &byte| node.child_or_insert(byte))
            .set_end(value)
    }

    /// Look up a key the same way the generated code does.
    #[must_use]
    pub fn get(&self, key: &[u8]) -> Option<i64> {
        key.iter()
            .try_fold(self, |node, &byte| node.child(byte))?
            .end()
    }

    /// The child reached by `byte`, if any.
    #[must_use]
    pub fn child(&self, byte: u8) -> Option<&Self> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Byte(b, child) if *b == byte => Some(child),
            _ => None,
        })
    }

    /// The value of the key that ends at this node, if any.
    #[must_use]
    pub fn end(&self) -> Option<i64> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::End(value) => Some(*value),
            Entry::Byte(..) => None,
        })
    }

    /// The number of distinct keys in this subtree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| match entry {
                Entry::End(_) => 1,
                Entry::Byte(_, child) => child.len(),
            })
            .sum()
    }

    /// Every key in this subtree with its value, in the order the generated
    /// code checks them.
    ///
    /// ```rust
    /// let root = triegen::TrieNode::from_iter([
    ///     ("ab".as_bytes(), 1),
    ///     ("b".as_bytes(), 2),
    ///     ("a".as_bytes(), 3),
    /// ]);
    /// assert_eq!(
    ///     root.pairs(),
    ///     [(b"ab".to_vec(), 1), (b"a".to_vec(), 3), (b"b".to_vec(), 2)],
    /// );
    /// ```
    #[must_use]
    pub fn pairs(&self) -> Vec<(Vec<u8>, i64)> {
        let mut pairs = Vec::with_capacity(self.len());
        self.collect_pairs(&mut Vec::new(), &mut pairs);
        pairs
    }

    /// Recursive part of [`Self::pairs()`]. `prefix` is the key so far.
    fn collect_pairs(
        &self,
        prefix: &mut Vec<u8>,
        pairs: &mut Vec<(Vec<u8>, i64)>,
    ) {
        for entry in &self.entries {
            match entry {
                Entry::End(value) => pairs.push((prefix.clone(), *value)),
                Entry::Byte(byte, child) => {
                    prefix.push(*byte);
                    child.collect_pairs(prefix, pairs);
                    prefix.pop();
                }
            }
        }
    }

    /// Whether no keys end in this subtree.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if this node starts a chain that can be collapsed into a single
    /// comparison.
    ///
    /// A chain is a path where every node has exactly one entry, ending in
    /// [`Entry::End`]. A node whose only entry is [`Entry::End`] is not a
    /// chain by itself: there must be at least one byte to compare.
    ///
    /// ```rust
    /// use triegen::{Chain, TrieNode};
    ///
    /// let root = TrieNode::from_iter([(b"hello", 7)]);
    /// assert_eq!(
    ///     root.chain(),
    ///     Some(Chain { bytes: b"hello".to_vec(), value: 7 }),
    /// );
    ///
    /// let root =
    ///     TrieNode::from_iter([("cat".as_bytes(), 1), ("car".as_bytes(), 2)]);
    /// assert_eq!(root.chain(), None);
    /// ```
    #[must_use]
    pub fn chain(&self) -> Option<Chain> {
        let mut chain = self.chain_tail(true)?;
        chain.bytes.reverse();
        Some(chain)
    }

    /// Recursive part of [`Self::chain()`]. Collects bytes in reverse.
    fn chain_tail(&self, first: bool) -> Option<Chain> {
        match self.entries.as_slice() {
            [Entry::End(_)] if first => None,
            [Entry::End(value)] => Some(Chain {
                bytes: Vec::new(),
                value: *value,
            }),
            [Entry::Byte(byte, child)] => {
                let mut chain = child.chain_tail(false)?;
                chain.bytes.push(*byte);
                Some(chain)
            }
            _ => None,
        }
    }

    /// Get the child for `byte`, appending a new one if it doesn’t exist.
    fn child_or_insert(&mut self, byte: u8) -> &mut Self {
        let index = self
            .entries
            .iter()
            .position(|entry| matches!(entry, Entry::Byte(b, _) if *b == byte))
            .unwrap_or_else(|| {
                self.entries.push(Entry::Byte(byte, Self::default()));
                self.entries.len().saturating_sub(1)
            });

        match &mut self.entries[index] {
            Entry::Byte(_, child) => child,
            Entry::End(_) => unreachable!("index always refers to a byte"),
        }
    }

    /// Set the value of the key ending here. Returns the old value, if any.
    fn set_end(&mut self, value: i64) -> Option<i64> {
        for entry in &mut self.entries {
            if let Entry::End(old) = entry {
                return Some(mem::replace(old, value));
            }
        }
        self.entries.push(Entry::End(value));
        None
    }
}

impl<'a, K> FromIterator<(K, i64)> for TrieNode
where
    K: IntoIterator<Item = &'a u8>,
{
    fn from_iter<I: IntoIterator<Item = (K, i64)>>(iter: I) -> Self {
        let mut root = Self::default();
        root.extend(iter);
        root
    }
}

impl<'a, K> Extend<(K, i64)> for TrieNode
where
    K: IntoIterator<Item = &'a u8>,
{
    fn extend<I: IntoIterator<Item = (K, i64)>>(&mut self, iter: I) {
        iter.into_iter().for_each(|(key, value)| {
            self.insert(key, value);
        });
    }
}
