//! Test trees and flattening
//!
//! A module is a tree of named entries. Flattening turns it into an ordered
//! mapping of qualified name to test.

use indexmap::IndexMap;

use super::Test;

/// Key that stands for an unwrapped top-level export
pub const DEFAULT_KEY: &str = "default";

/// Separator between qualified name segments
pub const SEPARATOR: char = ' ';

/// A node in a test module tree
#[derive(Clone, Debug)]
pub enum TestNode {
    Leaf(Test),
    /// Named entries, in declaration order
    Map(Vec<(String, TestNode)>),
    /// Unnamed entries, rendered as `[i]`
    List(Vec<TestNode>),
}

impl TestNode {
    /// Empty map node
    pub fn map() -> Self {
        TestNode::Map(Vec::new())
    }

    /// Empty list node
    pub fn list() -> Self {
        TestNode::List(Vec::new())
    }

    /// Leaf for a module that failed to load
    pub fn broken(err: impl Into<anyhow::Error>) -> Self {
        TestNode::Leaf(Test::broken(err))
    }

    /// Append an entry; maps take the given key, lists ignore it
    ///
    /// Appending to a leaf turns it into a map holding the old leaf under
    /// [`DEFAULT_KEY`], which keeps its qualified name unchanged.
    pub fn entry(self, key: impl Into<String>, node: impl Into<TestNode>) -> Self {
        match self {
            TestNode::Map(mut entries) => {
                entries.push((key.into(), node.into()));
                TestNode::Map(entries)
            }
            TestNode::List(mut items) => {
                items.push(node.into());
                TestNode::List(items)
            }
            leaf @ TestNode::Leaf(_) => TestNode::Map(vec![
                (DEFAULT_KEY.to_string(), leaf),
                (key.into(), node.into()),
            ]),
        }
    }

    /// Append an unnamed entry
    pub fn item(self, node: impl Into<TestNode>) -> Self {
        match self {
            TestNode::List(mut items) => {
                items.push(node.into());
                TestNode::List(items)
            }
            other => {
                let key = other.len().to_string();
                other.entry(key, node)
            }
        }
    }

    /// Number of direct children
    pub fn len(&self) -> usize {
        match self {
            TestNode::Leaf(_) => 0,
            TestNode::Map(entries) => entries.len(),
            TestNode::List(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0 && !matches!(self, TestNode::Leaf(_))
    }
}

impl Default for TestNode {
    fn default() -> Self {
        TestNode::map()
    }
}

impl From<Test> for TestNode {
    fn from(test: Test) -> Self {
        TestNode::Leaf(test)
    }
}

impl<K: Into<String>> FromIterator<(K, TestNode)> for TestNode {
    fn from_iter<I: IntoIterator<Item = (K, TestNode)>>(iter: I) -> Self {
        TestNode::Map(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl FromIterator<TestNode> for TestNode {
    fn from_iter<I: IntoIterator<Item = TestNode>>(iter: I) -> Self {
        TestNode::List(iter.into_iter().collect())
    }
}

/// Flatten a tree into qualified name → test
///
/// Later entries win on name collisions; the name keeps the position of its
/// first occurrence.
pub fn flatten(node: &TestNode, prefix: &str) -> IndexMap<String, Test> {
    let mut tests = IndexMap::new();
    flatten_into(node, prefix, &mut tests);
    tests
}

fn flatten_into(node: &TestNode, prefix: &str, tests: &mut IndexMap<String, Test>) {
    match node {
        TestNode::Leaf(test) => {
            tests.insert(prefix.to_string(), test.clone());
        }
        TestNode::Map(entries) => {
            for (key, child) in entries {
                let name = if key == DEFAULT_KEY {
                    prefix.to_string()
                } else {
                    join(prefix, key)
                };
                flatten_into(child, &name, tests);
            }
        }
        TestNode::List(items) => {
            for (i, child) in items.iter().enumerate() {
                flatten_into(child, &join(prefix, &format!("[{i}]")), tests);
            }
        }
    }
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}{SEPARATOR}{segment}")
    }
}
