//! Prompt scaffolding shared by oracle implementations.

use std::collections::BTreeMap;

pub const TASK_TYPE_PROMPT: &str =
    "is this a general question, task or a greeting (answer only in \"general question\", \"task\", \"greeting\") - ";
pub const IS_BREAKDOWN_REQUIRED_PROMPT: &str =
    "Do this question needs to be broken into sub-tasks or it is trivial. Reply with only yes or no? - ";
pub const BREAKDOWN_INTO_SUBTASK: &str = "break this task in 3 or less sub-tasks (separated by ';'):\n";
pub const SOLVE_TASK_INPUT: &str = "given the information :\n";
pub const SOLVE_TASK_QUESTION: &str = "answer this: ";

pub const FUNCTION_SUMMARY_PROMPT: &str =
    "summarize what this function does in 3 lines or less:\n";
pub const FUNCTION_CALLS_PREAMBLE: &str = "the functions it calls are described as:\n";
pub const FUNCTION_CLASS_PREAMBLE: &str = "it is a method of the class: ";
pub const CLASS_SUMMARY_PROMPT: &str = "summarize the purpose of this class in 3 lines or less. ";
pub const CLASS_METHODS_PREAMBLE: &str = "its methods are described as:\n";
pub const CLASS_BODY_PREAMBLE: &str = "its code is:\n";

pub fn function_summary(
    body: &str,
    callee_summaries: &BTreeMap<String, String>,
    enclosing_class: Option<&str>,
) -> String {
    let mut prompt = String::from(FUNCTION_SUMMARY_PROMPT);
    prompt.push_str(body);
    prompt.push('\n');

    if !callee_summaries.is_empty() {
        prompt.push_str(FUNCTION_CALLS_PREAMBLE);
        for (name, summary) in callee_summaries {
            prompt.push_str(&format!("{name}: {summary}\n"));
        }
    }

    if let Some(class) = enclosing_class {
        prompt.push_str(FUNCTION_CLASS_PREAMBLE);
        prompt.push_str(class);
        prompt.push('\n');
    }

    prompt
}

pub fn class_summary(
    name: &str,
    body: &str,
    method_summaries: &BTreeMap<String, String>,
) -> String {
    let mut prompt = format!("{CLASS_SUMMARY_PROMPT}the class is named {name}.\n");

    if !method_summaries.is_empty() {
        prompt.push_str(CLASS_METHODS_PREAMBLE);
        for (method, summary) in method_summaries {
            prompt.push_str(&format!("{method}: {summary}\n"));
        }
    } else if !body.is_empty() {
        prompt.push_str(CLASS_BODY_PREAMBLE);
        prompt.push_str(body);
        prompt.push('\n');
    }

    prompt
}

pub fn solve_task(task: &str, context: Option<&str>) -> String {
    let mut prompt = String::new();
    if let Some(context) = context {
        prompt.push_str(SOLVE_TASK_INPUT);
        prompt.push_str(context);
        prompt.push('\n');
    }
    prompt.push_str(SOLVE_TASK_QUESTION);
    prompt.push_str(task);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn function_prompt_includes_callees_and_class() {
        let mut callees = BTreeMap::new();
        callees.insert("helper".to_string(), "does a thing".to_string());

        let prompt = function_summary("def m(self):\n    helper()", &callees, Some("Foo"));

        assert!(prompt.starts_with(FUNCTION_SUMMARY_PROMPT));
        assert!(prompt.contains("helper: does a thing\n"));
        assert!(prompt.contains("it is a method of the class: Foo\n"));
    }

    #[test]
    fn class_prompt_prefers_methods_over_body() {
        let mut methods = BTreeMap::new();
        methods.insert("Foo.bar".to_string(), "bars".to_string());

        let with_methods = class_summary("Foo", "class Foo: ...", &methods);
        assert!(with_methods.contains(CLASS_METHODS_PREAMBLE));
        assert!(!with_methods.contains(CLASS_BODY_PREAMBLE));

        let with_body = class_summary("Foo", "class Foo: ...", &BTreeMap::new());
        assert!(with_body.contains(CLASS_BODY_PREAMBLE));
    }

    #[test]
    fn solve_prompt_with_and_without_context() {
        assert_eq!(
            solve_task("do it", None),
            format!("{SOLVE_TASK_QUESTION}do it")
        );
        assert_eq!(
            solve_task("do it", Some("facts")),
            format!("{SOLVE_TASK_INPUT}facts\n{SOLVE_TASK_QUESTION}do it")
        );
    }
}
