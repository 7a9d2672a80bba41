use crate::error::Result;
use crate::Oracle;
use std::collections::BTreeMap;

const EMBEDDING_DIM: usize = 16;

/// Deterministic stand-in oracle.
///
/// Produces stable, inspectable answers from the inputs alone, so offline
/// runs and tests behave identically from one invocation to the next.
#[derive(Debug, Default)]
pub struct CannedOracle;

impl CannedOracle {
    pub fn new() -> Self {
        Self
    }
}

fn signature_line(body: &str) -> &str {
    body.lines()
        .next()
        .unwrap_or("")
        .trim()
        .trim_end_matches(':')
}

impl Oracle for CannedOracle {
    fn describe_leaf(
        &self,
        body: &str,
        callee_summaries: &BTreeMap<String, String>,
        enclosing_class: Option<&str>,
    ) -> Result<String> {
        let mut summary = format!("`{}`", signature_line(body));
        if let Some(class) = enclosing_class {
            summary.push_str(&format!(" (method of {class})"));
        }
        if callee_summaries.is_empty() {
            summary.push_str(" performs its work inline");
        } else {
            let names: Vec<&str> = callee_summaries.keys().map(String::as_str).collect();
            summary.push_str(&format!(" delegates to {}", names.join(", ")));
        }
        Ok(summary)
    }

    fn describe_class(
        &self,
        name: &str,
        body: &str,
        method_summaries: &BTreeMap<String, String>,
    ) -> Result<String> {
        if method_summaries.is_empty() {
            return Ok(format!("class {name}: `{}`", signature_line(body)));
        }
        let methods: Vec<&str> = method_summaries.keys().map(String::as_str).collect();
        Ok(format!(
            "class {name} groups {} methods: {}",
            methods.len(),
            methods.join(", ")
        ))
    }

    fn breakdown_needed(&self, task: &str) -> Result<bool> {
        Ok(task.contains(';') || task.contains(" and ") || task.split_whitespace().count() > 12)
    }

    fn breakdown(&self, task: &str) -> Result<Vec<String>> {
        let parts: Vec<String> = if task.contains(';') {
            task.split(';').map(str::trim).map(str::to_string).collect()
        } else if task.contains(" and ") {
            task.split(" and ").map(str::trim).map(str::to_string).collect()
        } else {
            // Indivisible: the caller turns this into a leaf.
            Vec::new()
        };

        Ok(parts
            .into_iter()
            .filter(|part| !part.is_empty())
            .take(3)
            .collect())
    }

    fn solve(&self, task: &str, context: Option<&str>) -> Result<String> {
        match context {
            Some(context) => Ok(format!("solved: {task} [with {} context bytes]", context.len())),
            None => Ok(format!("solved: {task}")),
        }
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; EMBEDDING_DIM];
        for (index, byte) in text.bytes().enumerate() {
            vector[index % EMBEDDING_DIM] += f32::from(byte) / 255.0;
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        Ok(vector)
    }
}
