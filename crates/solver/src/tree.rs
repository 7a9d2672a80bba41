use serde::Serialize;

/// A node in the bounded ternary decomposition tree.
///
/// Children are owned exclusively by their parent and attached in order as
/// `first`/`second`/`third`; `result` stays empty until resolution writes
/// it exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskNode {
    pub task: String,
    pub first: Option<Box<TaskNode>>,
    pub second: Option<Box<TaskNode>>,
    pub third: Option<Box<TaskNode>>,
    pub result: Option<String>,
}

impl TaskNode {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            first: None,
            second: None,
            third: None,
            result: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.first.is_none() && self.second.is_none() && self.third.is_none()
    }

    /// Present children, in `first`/`second`/`third` order.
    pub fn children(&self) -> Vec<&TaskNode> {
        [&self.first, &self.second, &self.third]
            .into_iter()
            .filter_map(|child| child.as_deref())
            .collect()
    }

    /// Total number of nodes in this subtree.
    pub fn count(&self) -> usize {
        1 + self.children().into_iter().map(TaskNode::count).sum::<usize>()
    }

    /// Height of this subtree (a lone node has height 1).
    pub fn height(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(TaskNode::height)
            .max()
            .unwrap_or(0)
    }

    /// Task texts level by level, for display.
    pub fn levels(&self) -> Vec<Vec<&str>> {
        let mut levels = Vec::new();
        let mut current: Vec<&TaskNode> = vec![self];

        while !current.is_empty() {
            levels.push(current.iter().map(|node| node.task.as_str()).collect());
            current = current
                .into_iter()
                .flat_map(|node| node.children())
                .collect();
        }
        levels
    }
}
