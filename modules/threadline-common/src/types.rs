use serde::{Deserialize, Serialize};

/// One link in a reconstructed self-thread chain.
///
/// A thread is deliberately a chain, not a tree: at every level only the
/// first same-author reply survives, so each node carries at most one
/// child. A leaf is `child: None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadNode {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child: Option<Box<ThreadNode>>,
}

impl ThreadNode {
    /// A terminal node with no continuation.
    pub fn leaf(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            child: None,
        }
    }

    /// Number of posts in the chain, this node included.
    pub fn chain_len(&self) -> usize {
        let mut count = 1;
        let mut cursor = self.child.as_deref();
        while let Some(node) = cursor {
            count += 1;
            cursor = node.child.as_deref();
        }
        count
    }

    /// Post texts in chain order, root first.
    pub fn texts(&self) -> Vec<&str> {
        let mut out = vec![self.text.as_str()];
        let mut cursor = self.child.as_deref();
        while let Some(node) = cursor {
            out.push(node.text.as_str());
            cursor = node.child.as_deref();
        }
        out
    }
}

/// A reconstructed thread as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub thread_id: i64,
    pub tweets: ThreadNode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_len_and_texts_walk_the_children() {
        let chain = ThreadNode {
            id: "1".into(),
            text: "root".into(),
            child: Some(Box::new(ThreadNode {
                id: "2".into(),
                text: "middle".into(),
                child: Some(Box::new(ThreadNode::leaf("3", "tail"))),
            })),
        };
        assert_eq!(chain.chain_len(), 3);
        assert_eq!(chain.texts(), vec!["root", "middle", "tail"]);
    }

    #[test]
    fn leaf_serializes_without_child_key() {
        let json = serde_json::to_value(ThreadNode::leaf("42", "solo")).unwrap();
        assert_eq!(json, serde_json::json!({"id": "42", "text": "solo"}));
    }
}
