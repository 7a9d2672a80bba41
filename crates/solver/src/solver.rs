use crate::error::{Result, SolverError};
use crate::tree::TaskNode;
use codemap_oracle::{Oracle, OracleError};

pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Expansion and resolution settings.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum tree depth, counting the root as one level.
    pub max_depth: usize,
    /// Skip the breakdown-needed oracle and always split.
    pub force_breakdown: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            force_breakdown: false,
        }
    }
}

/// Drives one task through expansion and bottom-up resolution.
pub struct TaskSolver<'a> {
    oracle: &'a dyn Oracle,
    config: SolverConfig,
}

impl<'a> TaskSolver<'a> {
    pub fn new(oracle: &'a dyn Oracle, config: SolverConfig) -> Self {
        Self { oracle, config }
    }

    /// Build and resolve the full tree for one task.
    pub fn solve(&self, task: &str) -> Result<TaskNode> {
        let mut root = TaskNode::new(task);
        self.expand(&mut root)?;
        log::debug!("expanded '{task}' into {} nodes", root.count());
        self.resolve(&mut root)?;
        Ok(root)
    }

    /// Breadth-first, depth-bounded expansion.
    ///
    /// Terminates because the remaining depth strictly decreases; nodes the
    /// oracle declines to split stay leaves even with depth to spare.
    pub fn expand(&self, root: &mut TaskNode) -> Result<()> {
        let mut remaining = self.config.max_depth;
        let mut frontier: Vec<&mut TaskNode> = vec![root];

        while !frontier.is_empty() && remaining > 0 {
            remaining -= 1;
            if remaining == 0 {
                // The current frontier is the last allowed level.
                break;
            }

            let mut next: Vec<&mut TaskNode> = Vec::new();
            for node in frontier {
                let needed =
                    self.config.force_breakdown || self.breakdown_needed(&node.task)?;
                if !needed {
                    continue;
                }

                // Zero returned sub-tasks leaves a childless node; it is a
                // leaf from here on, never retried.
                let mut subtasks = self.breakdown(&node.task)?.into_iter();
                node.first = subtasks.next().map(|task| Box::new(TaskNode::new(task)));
                node.second = subtasks.next().map(|task| Box::new(TaskNode::new(task)));
                node.third = subtasks.next().map(|task| Box::new(TaskNode::new(task)));

                if let Some(child) = node.first.as_deref_mut() {
                    next.push(child);
                }
                if let Some(child) = node.second.as_deref_mut() {
                    next.push(child);
                }
                if let Some(child) = node.third.as_deref_mut() {
                    next.push(child);
                }
            }
            frontier = next;
        }
        Ok(())
    }

    /// Bottom-up resolution: children first, then the node itself with the
    /// concatenation of its children's results as context.
    pub fn resolve(&self, node: &mut TaskNode) -> Result<()> {
        if node.result.is_some() {
            return Ok(());
        }

        for child in [&mut node.first, &mut node.second, &mut node.third] {
            if let Some(child) = child.as_deref_mut() {
                self.resolve(child)?;
            }
        }

        let mut context = String::new();
        for child in [&node.first, &node.second, &node.third] {
            if let Some(result) = child.as_deref().and_then(|c| c.result.as_deref()) {
                context.push_str(result);
            }
        }
        let context = (!context.is_empty()).then_some(context.as_str());

        let result = self
            .oracle
            .solve(&node.task, context)
            .map_err(|source| oracle_error(&node.task, source))?;
        node.result = Some(result);
        Ok(())
    }

    fn breakdown_needed(&self, task: &str) -> Result<bool> {
        self.oracle
            .breakdown_needed(task)
            .map_err(|source| oracle_error(task, source))
    }

    fn breakdown(&self, task: &str) -> Result<Vec<String>> {
        let subtasks = self
            .oracle
            .breakdown(task)
            .map_err(|source| oracle_error(task, source))?;
        if subtasks.len() > 3 {
            log::warn!(
                "breakdown returned {} sub-tasks for '{task}'; keeping the first 3",
                subtasks.len()
            );
        }
        Ok(subtasks.into_iter().take(3).collect())
    }
}

fn oracle_error(task: &str, source: OracleError) -> SolverError {
    SolverError::Oracle {
        task: task.to_string(),
        source,
    }
}
