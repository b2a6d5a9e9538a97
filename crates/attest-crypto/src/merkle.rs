//! # Order-Independent Merkle Tree
//!
//! A binary hash tree over a batch of document target hashes. The batch is
//! treated as a set: leaves are sorted by raw bytes (and de-duplicated)
//! before the tree is built, so any permutation of the same batch yields the
//! same tree, root, and per-leaf proofs.
//!
//! ## Algorithm
//!
//! - Combine: `keccak256(sort(left, right) concatenated)`. Each step is
//!   commutative, so a proof is a plain list of sibling hashes with no
//!   left/right markers.
//! - Odd node at a level: promoted unchanged to the next level (no
//!   duplication, no padding).
//! - A single-leaf tree has the leaf as its root and an empty proof.
//!
//! Verification folds the leaf through the proof left to right with the
//! same combine step and compares against the root.

use crate::error::CryptoError;
use crate::keccak::{digest_sorted, Hash256};

/// Combine two sibling hashes into their parent.
pub fn combine(a: &Hash256, b: &Hash256) -> Hash256 {
    digest_sorted(vec![*a, *b])
}

/// A Merkle tree over a set of 32-byte hashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    /// Level 0 is the sorted leaf set; the last level holds only the root.
    layers: Vec<Vec<Hash256>>,
    root: Hash256,
}

impl MerkleTree {
    /// Build a tree over `leaves`.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::EmptyTree` if `leaves` is empty.
    pub fn new(leaves: &[Hash256]) -> Result<Self, CryptoError> {
        let mut level = leaves.to_vec();
        level.sort_unstable();
        level.dedup();
        let mut root = *level.first().ok_or(CryptoError::EmptyTree)?;

        let mut layers = vec![level];
        while let Some(last) = layers.last().filter(|l| l.len() > 1) {
            let next: Vec<Hash256> = last
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => combine(left, right),
                    _ => pair[0],
                })
                .collect();
            root = next[0];
            layers.push(next);
        }

        Ok(Self { layers, root })
    }

    /// The root hash.
    pub fn root(&self) -> Hash256 {
        self.root
    }

    /// The sorted, de-duplicated leaf set.
    pub fn leaves(&self) -> &[Hash256] {
        &self.layers[0]
    }

    /// Number of distinct leaves.
    pub fn len(&self) -> usize {
        self.layers[0].len()
    }

    /// Always `false`: a tree has at least one leaf.
    pub fn is_empty(&self) -> bool {
        self.layers[0].is_empty()
    }

    /// Sibling hashes from `leaf` up to the root, in replay order.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::LeafNotInTree` if `leaf` is not a leaf.
    pub fn proof(&self, leaf: &Hash256) -> Result<Vec<Hash256>, CryptoError> {
        let mut index = self.layers[0]
            .binary_search(leaf)
            .map_err(|_| CryptoError::LeafNotInTree(leaf.to_hex()))?;

        let mut path = Vec::new();
        for layer in &self.layers[..self.layers.len() - 1] {
            if let Some(sibling) = layer.get(index ^ 1) {
                path.push(*sibling);
            }
            index /= 2;
        }
        Ok(path)
    }
}

/// Replay `proof` from `leaf` and compare the result with `root`.
///
/// Usable standalone by third parties auditing a signature.
pub fn check_proof(leaf: &Hash256, proof: &[Hash256], root: &Hash256) -> bool {
    let computed = proof.iter().fold(*leaf, |acc, sibling| combine(&acc, sibling));
    computed == *root
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::keccak::keccak256;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn every_leaf_proves_under_any_permutation(
            seeds in prop::collection::btree_set(any::<u64>(), 1..24),
            rotate in any::<usize>(),
        ) {
            let leaves: Vec<Hash256> = seeds.iter().map(|s| keccak256(&s.to_be_bytes())).collect();
            let mut shuffled = leaves.clone();
            let k = rotate % shuffled.len();
            shuffled.rotate_left(k);
            shuffled.reverse();

            let tree = MerkleTree::new(&leaves).unwrap();
            let other = MerkleTree::new(&shuffled).unwrap();
            prop_assert_eq!(tree.root(), other.root());
            for leaf in &leaves {
                let proof = tree.proof(leaf).unwrap();
                prop_assert_eq!(&proof, &other.proof(leaf).unwrap());
                prop_assert!(check_proof(leaf, &proof, &tree.root()));
            }
        }
    }
}
