//! Nested parameter containers.
//!
//! A `Tree` is a nested container of array leaves: dictionaries keyed by
//! string, ordered lists, single leaves, or nothing. Model parameters, model
//! state and the variables handed to an ansatz are all trees. Leaves are
//! visited in a deterministic order (sorted keys, list order), so two trees
//! with the same structure and the same leaf signatures compare and hash equal.
//!
//! # Module structure
//!
//! - `predicates`: real/complex class queries over the leaves of a tree

pub mod predicates;

pub use predicates::{has_complex_leaf, has_real_leaf, is_homogeneous};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::EvalError;
use crate::lattice::{AbstractArray, ShapeDtype};

/// Key under which the parameter tree is stored in a variables tree.
pub const PARAMS_KEY: &str = "params";

/// Key used for a model state that is not itself a dictionary.
pub const MODEL_STATE_KEY: &str = "model_state";

/// Separator between the components of a leaf path.
pub const PATH_SEPARATOR: char = '/';

/// A nested container of leaves.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tree<L> {
    #[default]
    Empty,
    Leaf(L),
    List(Vec<Tree<L>>),
    Dict(BTreeMap<String, Tree<L>>),
}

impl<L> Tree<L> {
    pub fn leaf(value: L) -> Self {
        Tree::Leaf(value)
    }

    /// Build a dictionary node from `(key, subtree)` pairs.
    pub fn dict<K: Into<String>>(entries: impl IntoIterator<Item = (K, Tree<L>)>) -> Self {
        Tree::Dict(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn list(items: impl IntoIterator<Item = Tree<L>>) -> Self {
        Tree::List(items.into_iter().collect())
    }

    /// All leaves in deterministic order.
    pub fn leaves(&self) -> Vec<&L> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a L>) {
        match self {
            Tree::Empty => {}
            Tree::Leaf(value) => out.push(value),
            Tree::List(items) => {
                for item in items {
                    item.collect_leaves(out);
                }
            }
            Tree::Dict(entries) => {
                for value in entries.values() {
                    value.collect_leaves(out);
                }
            }
        }
    }

    /// All leaves paired with their `/`-separated paths.
    ///
    /// List elements contribute their index as a path component.
    pub fn leaves_with_path(&self) -> Vec<(String, &L)> {
        let mut out = Vec::new();
        self.collect_paths(String::new(), &mut out);
        out
    }

    fn collect_paths<'a>(&'a self, prefix: String, out: &mut Vec<(String, &'a L)>) {
        match self {
            Tree::Empty => {}
            Tree::Leaf(value) => out.push((prefix, value)),
            Tree::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    item.collect_paths(join_path(&prefix, &i.to_string()), out);
                }
            }
            Tree::Dict(entries) => {
                for (key, value) in entries {
                    value.collect_paths(join_path(&prefix, key), out);
                }
            }
        }
    }

    pub fn num_leaves(&self) -> usize {
        match self {
            Tree::Empty => 0,
            Tree::Leaf(_) => 1,
            Tree::List(items) => items.iter().map(Tree::num_leaves).sum(),
            Tree::Dict(entries) => entries.values().map(Tree::num_leaves).sum(),
        }
    }

    /// True when the tree holds no leaves at all.
    pub fn has_no_leaves(&self) -> bool {
        self.num_leaves() == 0
    }

    /// Look up a subtree by `/`-separated path. The empty path is the tree itself.
    pub fn get(&self, path: &str) -> Option<&Tree<L>> {
        if path.is_empty() {
            return Some(self);
        }
        let mut node = self;
        for key in path.split(PATH_SEPARATOR) {
            node = match node {
                Tree::Dict(entries) => entries.get(key)?,
                Tree::List(items) => items.get(key.parse::<usize>().ok()?)?,
                Tree::Empty | Tree::Leaf(_) => return None,
            };
        }
        Some(node)
    }

    /// Look up a leaf by path, distinguishing a missing path from a non-leaf node.
    pub fn get_leaf(&self, path: &str) -> Result<&L, EvalError> {
        match self.get(path) {
            Some(Tree::Leaf(value)) => Ok(value),
            Some(_) => Err(EvalError::LeafKind {
                path: path.to_string(),
            }),
            None => Err(EvalError::MissingVariable {
                path: path.to_string(),
            }),
        }
    }

    /// Insert `subtree` at a `/`-separated path, creating dictionaries on the way.
    ///
    /// Any node along the path that is not a dictionary is replaced by one.
    pub fn insert(&mut self, path: &str, subtree: Tree<L>) {
        let (head, rest) = path.split_once(PATH_SEPARATOR).unwrap_or((path, ""));
        if !matches!(self, Tree::Dict(_)) {
            *self = Tree::Dict(BTreeMap::new());
        }
        let Tree::Dict(entries) = self else {
            return;
        };
        if rest.is_empty() {
            entries.insert(head.to_string(), subtree);
        } else {
            entries
                .entry(head.to_string())
                .or_insert(Tree::Empty)
                .insert(rest, subtree);
        }
    }

    /// Apply `f` to every leaf, keeping the structure.
    pub fn map<M>(&self, f: &mut impl FnMut(&L) -> M) -> Tree<M> {
        match self {
            Tree::Empty => Tree::Empty,
            Tree::Leaf(value) => Tree::Leaf(f(value)),
            Tree::List(items) => Tree::List(items.iter().map(|item| item.map(f)).collect()),
            Tree::Dict(entries) => Tree::Dict(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.map(f)))
                    .collect(),
            ),
        }
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}{}{}", prefix, PATH_SEPARATOR, key)
    }
}

impl<L: ShapeDtype> Tree<L> {
    /// The abstract tree: same structure, every leaf replaced by its shape and dtype.
    pub fn avals(&self) -> Tree<AbstractArray> {
        self.map(&mut |leaf| leaf.aval())
    }
}

impl<L: Clone> Tree<L> {
    /// Assemble the variables tree an ansatz is applied to.
    ///
    /// The result is a dictionary holding `params` under `"params"` with every
    /// top-level entry of a dictionary `model_state` merged next to it. State
    /// entries are inserted last and win on key collisions. A model state that
    /// is a single leaf or a list is stored under `"model_state"`; an absent or
    /// empty state adds nothing.
    pub fn variables(params: &Tree<L>, model_state: Option<&Tree<L>>) -> Tree<L> {
        let mut entries = BTreeMap::new();
        entries.insert(PARAMS_KEY.to_string(), params.clone());

        match model_state {
            None | Some(Tree::Empty) => {}
            Some(Tree::Dict(state)) => {
                for (key, value) in state {
                    entries.insert(key.clone(), value.clone());
                }
            }
            Some(other) => {
                entries.insert(MODEL_STATE_KEY.to_string(), other.clone());
            }
        }

        Tree::Dict(entries)
    }
}

impl<L> From<L> for Tree<L> {
    fn from(value: L) -> Self {
        Tree::Leaf(value)
    }
}
