use crate::error::{MeaningError, Result};
use crate::store::SummaryStore;
use codemap_graph::{CallGraph, CallableId};
use codemap_oracle::Oracle;
use std::collections::{BTreeMap, BTreeSet};

/// Source of declaration body text for a callable or class identifier.
///
/// Missing declarations read as empty text; the summarizer treats that as
/// "no summary produced" rather than an error.
pub trait SourceFetch {
    fn fetch_body(&self, id: &CallableId) -> String;
}

/// Memoized post-order summarization over a call graph.
pub struct Summarizer<'a> {
    graph: &'a CallGraph,
    oracle: &'a dyn Oracle,
    source: &'a dyn SourceFetch,
}

impl<'a> Summarizer<'a> {
    pub fn new(graph: &'a CallGraph, oracle: &'a dyn Oracle, source: &'a dyn SourceFetch) -> Self {
        Self {
            graph,
            oracle,
            source,
        }
    }

    /// Summarize every node of the graph into a fresh store.
    pub fn summarize(&self) -> Result<SummaryStore> {
        let mut store = SummaryStore::new();
        self.summarize_into(&mut store)?;
        Ok(store)
    }

    /// Summarize into an existing store.
    ///
    /// An oracle failure aborts the traversal but leaves every summary
    /// committed so far intact, so the caller can retry with the same store
    /// and only the missing nodes are revisited.
    pub fn summarize_into(&self, store: &mut SummaryStore) -> Result<()> {
        let mut in_progress = BTreeSet::new();

        for id in self.graph.ids() {
            if self.graph.is_class(id) {
                continue;
            }
            self.summarize_node(id, store, &mut in_progress)?;
        }

        self.summarize_classes(store)
    }

    fn summarize_node(
        &self,
        id: &CallableId,
        store: &mut SummaryStore,
        in_progress: &mut BTreeSet<CallableId>,
    ) -> Result<()> {
        if store.is_summarized(id) || in_progress.contains(id) {
            return Ok(());
        }
        in_progress.insert(id.clone());

        // A method's class gets its slot now; the class pass fills it once
        // every method summary is available.
        if let Some(class) = id.class_name() {
            store.reserve(CallableId::from(class));
        }

        let mut callee_summaries = BTreeMap::new();
        for callee in self.graph.callees(id) {
            let Some(target) = callee.resolved() else {
                continue;
            };
            // Class targets (constructor calls) are summarized by the class
            // pass; they contribute no callee context here.
            if self.graph.is_class(target) {
                continue;
            }
            // A callee still in progress is a cycle back to this node: skip
            // it and leave it out of the context.
            if in_progress.contains(target) {
                continue;
            }
            if !store.is_summarized(target) {
                self.summarize_node(target, store, in_progress)?;
            }
            if let Some(summary) = store.get(target) {
                callee_summaries.insert(target.to_string(), summary.to_string());
            }
        }

        let body = self.source.fetch_body(id);
        if body.is_empty() {
            log::warn!("No source found for '{id}'; no summary produced");
        } else {
            match self
                .oracle
                .describe_leaf(&body, &callee_summaries, id.class_name())
            {
                Ok(summary) => {
                    store.insert(id.clone(), summary);
                }
                Err(source) => {
                    in_progress.remove(id);
                    return Err(MeaningError::Oracle {
                        id: id.to_string(),
                        source,
                    });
                }
            }
        }

        in_progress.remove(id);
        Ok(())
    }

    /// Deferred class pass: a class summary aggregates its method summaries,
    /// falling back to the class body when it has none.
    fn summarize_classes(&self, store: &mut SummaryStore) -> Result<()> {
        for class in self.graph.classes() {
            store.reserve(class.clone());
        }

        for id in store.pending() {
            let prefix = format!("{id}.");
            let method_summaries: BTreeMap<String, String> = store
                .summaries()
                .filter(|(method, _)| method.as_str().starts_with(&prefix))
                .map(|(method, summary)| (method.to_string(), summary.to_string()))
                .collect();

            let summary = if method_summaries.is_empty() {
                let body = self.source.fetch_body(&id);
                if body.is_empty() {
                    log::warn!("No source found for class '{id}'; no summary produced");
                    continue;
                }
                self.describe_class(&id, &body, &method_summaries)?
            } else {
                self.describe_class(&id, "", &method_summaries)?
            };
            store.insert(id, summary);
        }
        Ok(())
    }

    fn describe_class(
        &self,
        id: &CallableId,
        body: &str,
        method_summaries: &BTreeMap<String, String>,
    ) -> Result<String> {
        self.oracle
            .describe_class(id.as_str(), body, method_summaries)
            .map_err(|source| MeaningError::Oracle {
                id: id.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemap_graph::GraphBuilder;
    use codemap_oracle::OracleError;
    use codemap_parser::SourceParser;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    fn build(source: &str) -> CallGraph {
        let tree = SourceParser::new().unwrap().parse(source).unwrap();
        GraphBuilder::new().build(&tree)
    }

    /// Fetcher producing a recognizable body per identifier.
    struct EchoFetch {
        missing: Vec<&'static str>,
    }

    impl EchoFetch {
        fn all() -> Self {
            Self { missing: vec![] }
        }

        fn without(missing: Vec<&'static str>) -> Self {
            Self { missing }
        }
    }

    impl SourceFetch for EchoFetch {
        fn fetch_body(&self, id: &CallableId) -> String {
            if self.missing.contains(&id.as_str()) {
                String::new()
            } else {
                format!("body of {id}")
            }
        }
    }

    /// Oracle that records every describe call it serves.
    #[derive(Default)]
    struct RecordingOracle {
        described: RefCell<Vec<String>>,
        contexts: RefCell<BTreeMap<String, Vec<String>>>,
        classes: RefCell<BTreeMap<String, Option<String>>>,
        fail_for: Option<String>,
    }

    impl RecordingOracle {
        fn failing_on(id: &str) -> Self {
            Self {
                fail_for: Some(id.to_string()),
                ..Self::default()
            }
        }
    }

    impl Oracle for RecordingOracle {
        fn describe_leaf(
            &self,
            body: &str,
            callee_summaries: &BTreeMap<String, String>,
            enclosing_class: Option<&str>,
        ) -> codemap_oracle::Result<String> {
            let name = body.strip_prefix("body of ").unwrap_or(body).to_string();
            if self.fail_for.as_deref() == Some(name.as_str()) {
                return Err(OracleError::EmptyCompletion);
            }
            self.described.borrow_mut().push(name.clone());
            self.contexts
                .borrow_mut()
                .insert(name.clone(), callee_summaries.keys().cloned().collect());
            self.classes
                .borrow_mut()
                .insert(name.clone(), enclosing_class.map(str::to_string));
            Ok(format!("summary of {name}"))
        }

        fn describe_class(
            &self,
            name: &str,
            body: &str,
            method_summaries: &BTreeMap<String, String>,
        ) -> codemap_oracle::Result<String> {
            if method_summaries.is_empty() {
                assert!(!body.is_empty());
                Ok(format!("class {name} from body"))
            } else {
                Ok(format!("class {name} with {} methods", method_summaries.len()))
            }
        }

        fn breakdown_needed(&self, _task: &str) -> codemap_oracle::Result<bool> {
            unreachable!("not used by the summarizer")
        }

        fn breakdown(&self, _task: &str) -> codemap_oracle::Result<Vec<String>> {
            unreachable!("not used by the summarizer")
        }

        fn solve(&self, _task: &str, _context: Option<&str>) -> codemap_oracle::Result<String> {
            unreachable!("not used by the summarizer")
        }

        fn embed(&self, _text: &str) -> codemap_oracle::Result<Vec<f32>> {
            unreachable!("not used by the summarizer")
        }
    }

    #[test]
    fn visits_callees_before_callers_and_writes_once() {
        let graph = build("def a():\n    b()\n\ndef b():\n    c()\n\ndef c():\n    pass\n");
        let oracle = RecordingOracle::default();
        let fetch = EchoFetch::all();
        let summarizer = Summarizer::new(&graph, &oracle, &fetch);

        let mut store = SummaryStore::new();
        summarizer.summarize_into(&mut store).unwrap();
        summarizer.summarize_into(&mut store).unwrap();

        assert_eq!(
            *oracle.described.borrow(),
            vec!["c".to_string(), "b".to_string(), "a".to_string()]
        );
        assert_eq!(store.get(&CallableId::from("a")), Some("summary of a"));
    }

    #[test]
    fn mutual_recursion_terminates_with_partial_context() {
        let graph = build("def a():\n    b()\n\ndef b():\n    a()\n");
        let oracle = RecordingOracle::default();
        let fetch = EchoFetch::all();
        let store = Summarizer::new(&graph, &oracle, &fetch).summarize().unwrap();

        assert!(store.is_summarized(&CallableId::from("a")));
        assert!(store.is_summarized(&CallableId::from("b")));

        let contexts = oracle.contexts.borrow();
        // `b` is described while `a` is still in progress, so its context
        // omits the cyclic partner; `a` then sees `b` normally.
        assert_eq!(contexts["b"], Vec::<String>::new());
        assert_eq!(contexts["a"], vec!["b".to_string()]);
    }

    #[test]
    fn methods_carry_their_class_and_the_class_pass_aggregates() {
        let graph = build(
            "class Foo:\n    def bar(self):\n        helper()\n\ndef helper():\n    pass\n",
        );
        let oracle = RecordingOracle::default();
        let fetch = EchoFetch::all();
        let store = Summarizer::new(&graph, &oracle, &fetch).summarize().unwrap();

        assert_eq!(
            *oracle.described.borrow(),
            vec!["helper".to_string(), "Foo.bar".to_string()]
        );
        assert_eq!(
            oracle.classes.borrow()["Foo.bar"],
            Some("Foo".to_string())
        );
        assert_eq!(
            store.get(&CallableId::from("Foo")),
            Some("class Foo with 1 methods")
        );
    }

    #[test]
    fn methodless_class_is_described_from_its_body() {
        let graph = build("class Empty:\n    VERSION = 1\n");
        let oracle = RecordingOracle::default();
        let fetch = EchoFetch::all();
        let store = Summarizer::new(&graph, &oracle, &fetch).summarize().unwrap();

        assert_eq!(
            store.get(&CallableId::from("Empty")),
            Some("class Empty from body")
        );
    }

    #[test]
    fn missing_body_produces_no_summary() {
        let graph = build("def caller():\n    ghost()\n\ndef ghost():\n    pass\n");
        let oracle = RecordingOracle::default();
        let fetch = EchoFetch::without(vec!["ghost"]);
        let store = Summarizer::new(&graph, &oracle, &fetch).summarize().unwrap();

        assert!(!store.is_summarized(&CallableId::from("ghost")));
        assert_eq!(oracle.contexts.borrow()["caller"], Vec::<String>::new());
    }

    #[test]
    fn constructor_calls_contribute_no_callee_context() {
        let graph = build(
            "class Foo:\n    def m(self):\n        pass\n\ndef make():\n    return Foo()\n",
        );
        let oracle = RecordingOracle::default();
        let fetch = EchoFetch::all();
        let store = Summarizer::new(&graph, &oracle, &fetch).summarize().unwrap();

        assert_eq!(oracle.contexts.borrow()["make"], Vec::<String>::new());
        assert_eq!(
            store.get(&CallableId::from("Foo")),
            Some("class Foo with 1 methods")
        );
    }

    #[test]
    fn oracle_failure_keeps_committed_results_and_is_retryable() {
        let source = "def a():\n    b()\n\ndef b():\n    pass\n\ndef z():\n    pass\n";
        let graph = build(source);
        let fetch = EchoFetch::all();

        let failing = RecordingOracle::failing_on("a");
        let mut store = SummaryStore::new();
        let err = Summarizer::new(&graph, &failing, &fetch)
            .summarize_into(&mut store)
            .unwrap_err();
        assert!(matches!(err, MeaningError::Oracle { ref id, .. } if id == "a"));

        // `b` was committed before the failure and survives it.
        assert!(store.is_summarized(&CallableId::from("b")));
        assert!(!store.is_summarized(&CallableId::from("a")));

        // A retry with a healthy oracle only revisits the missing nodes.
        let healthy = RecordingOracle::default();
        Summarizer::new(&graph, &healthy, &fetch)
            .summarize_into(&mut store)
            .unwrap();
        assert_eq!(
            *healthy.described.borrow(),
            vec!["a".to_string(), "z".to_string()]
        );
        assert!(store.is_summarized(&CallableId::from("z")));
    }
}
