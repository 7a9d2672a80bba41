use crate::builtins::{is_builtin, is_excluded_callable};
use crate::types::{CallGraph, CallableId, CalleeRef};
use codemap_parser::{CallExpr, ParseTree, SyntaxNode};
use std::collections::BTreeSet;

/// Builds a call graph from condensed parse trees.
///
/// The walk threads two pieces of context downward: the nearest enclosing
/// callable and the nearest enclosing non-excluded class. Resolution of
/// bare names is re-checked once the whole map is known, since declarations
/// may be visited after their first call site.
#[derive(Debug, Default)]
pub struct GraphBuilder;

impl GraphBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, tree: &ParseTree) -> CallGraph {
        let mut graph = CallGraph::default();
        for node in &tree.roots {
            visit(node, None, None, &mut graph);
        }
        finalize(&mut graph);
        graph
    }
}

fn visit(
    node: &SyntaxNode,
    current_callable: Option<&CallableId>,
    current_class: Option<&str>,
    graph: &mut CallGraph,
) {
    match node {
        SyntaxNode::Function { name, children } => {
            let id = match current_class {
                Some(class) => CallableId::qualified(class, name),
                None => CallableId::new(name.as_str()),
            };
            if graph.register_callable(id.clone()) {
                log::warn!("Duplicate declaration for '{id}'; keeping the later one");
            }
            for child in children {
                visit(child, Some(&id), current_class, graph);
            }
        }
        SyntaxNode::Class {
            name,
            excluded,
            children,
        } => {
            if *excluded {
                // Walk the body, but nested callables stay unqualified.
                for child in children {
                    visit(child, current_callable, None, graph);
                }
            } else {
                graph.register_class(CallableId::new(name.as_str()));
                for child in children {
                    visit(child, current_callable, Some(name), graph);
                }
            }
        }
        SyntaxNode::Call { expr, children } => {
            if let Some(caller) = current_callable {
                record_call(caller, expr, graph);
            }
            for child in children {
                visit(child, current_callable, current_class, graph);
            }
        }
    }
}

fn record_call(caller: &CallableId, expr: &CallExpr, graph: &mut CallGraph) {
    let callee = match expr {
        CallExpr::Bare { callee } => {
            if graph.contains_name(callee) {
                CalleeRef::Resolved {
                    target: CallableId::from(callee.as_str()),
                }
            } else {
                CalleeRef::Unresolved {
                    name: callee.clone(),
                }
            }
        }
        CallExpr::Qualified { receiver, method } => {
            if graph.contains_name(receiver) {
                let target = CallableId::qualified(receiver, method);
                if graph.contains(&target) {
                    CalleeRef::Resolved { target }
                } else {
                    CalleeRef::Unresolved {
                        name: target.to_string(),
                    }
                }
            } else {
                // Receiver type is not tracked; do not guess at a target.
                CalleeRef::OpaqueReceiver {
                    receiver: receiver.clone(),
                }
            }
        }
    };
    graph.push_callee(caller, callee);
}

/// Single pass over the finished adjacency map.
fn finalize(graph: &mut CallGraph) {
    // Excluded callables are dropped as nodes first, so nothing below can
    // resolve against them.
    for id in graph.node_ids() {
        if is_excluded_callable(id.final_segment()) {
            graph.remove_node(&id);
        }
    }

    let known: BTreeSet<CallableId> = graph.node_ids().into_iter().collect();

    for (id, list) in graph.lists_mut() {
        let mut cleaned: Vec<CalleeRef> = list
            .drain(..)
            .map(|callee| resolve_against(callee, &known))
            .filter(|callee| keep(id, callee))
            .collect();

        cleaned.sort_by(|a, b| {
            a.rendered()
                .cmp(b.rendered())
                .then(a.variant_rank().cmp(&b.variant_rank()))
        });
        cleaned.dedup();
        *list = cleaned;
    }
}

/// Re-check name resolution now that the whole map is known.
fn resolve_against(callee: CalleeRef, known: &BTreeSet<CallableId>) -> CalleeRef {
    match callee {
        CalleeRef::Unresolved { name } => {
            let candidate = CallableId::from(name.as_str());
            if known.contains(&candidate) {
                CalleeRef::Resolved { target: candidate }
            } else {
                CalleeRef::Unresolved { name }
            }
        }
        CalleeRef::Resolved { target } if !known.contains(&target) => CalleeRef::Unresolved {
            name: target.to_string(),
        },
        other => other,
    }
}

fn keep(id: &CallableId, callee: &CalleeRef) -> bool {
    let rendered = callee.rendered();
    if rendered == id.as_str() {
        return false;
    }
    if let CalleeRef::Unresolved { name } = callee {
        if is_builtin(name) {
            return false;
        }
    }
    let final_segment = rendered.rsplit_once('.').map_or(rendered, |(_, s)| s);
    !is_excluded_callable(final_segment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemap_parser::SourceParser;
    use pretty_assertions::assert_eq;

    fn build(source: &str) -> CallGraph {
        let tree = SourceParser::new().unwrap().parse(source).unwrap();
        GraphBuilder::new().build(&tree)
    }

    fn resolved(name: &str) -> CalleeRef {
        CalleeRef::Resolved {
            target: CallableId::from(name),
        }
    }

    fn unresolved(name: &str) -> CalleeRef {
        CalleeRef::Unresolved {
            name: name.to_string(),
        }
    }

    fn opaque(receiver: &str) -> CalleeRef {
        CalleeRef::OpaqueReceiver {
            receiver: receiver.to_string(),
        }
    }

    #[test]
    fn free_function_edge() {
        let graph = build("def outer():\n    helper()\n\ndef helper():\n    pass\n");

        assert_eq!(graph.callees(&CallableId::from("outer")), &[resolved("helper")]);
        assert_eq!(graph.callees(&CallableId::from("helper")), &[] as &[CalleeRef]);
    }

    #[test]
    fn forward_reference_resolves_at_finalization() {
        // `helper` is declared after its call site; the finalization pass
        // promotes the reference.
        let graph = build("def outer():\n    helper()\n\ndef helper():\n    pass\n");
        assert_eq!(graph.callees(&CallableId::from("outer")), &[resolved("helper")]);
    }

    #[test]
    fn unknown_target_stays_unresolved() {
        let graph = build("def f():\n    mystery()\n");
        assert_eq!(graph.callees(&CallableId::from("f")), &[unresolved("mystery")]);
    }

    #[test]
    fn self_receiver_yields_opaque_marker_not_false_edge() {
        let graph = build(
            "class Foo:\n    def bar(self):\n        self.helper()\n    def helper(self):\n        pass\n",
        );

        assert_eq!(graph.callees(&CallableId::from("Foo.bar")), &[opaque("self")]);
        assert_eq!(
            graph.callees(&CallableId::from("Foo.helper")),
            &[] as &[CalleeRef]
        );
    }

    #[test]
    fn class_receiver_resolves_to_method() {
        let graph = build(
            "class Foo:\n    def bar(self):\n        Foo.helper(self)\n    def helper(self):\n        pass\n",
        );

        assert_eq!(
            graph.callees(&CallableId::from("Foo.bar")),
            &[resolved("Foo.helper")]
        );
    }

    #[test]
    fn class_receiver_with_unknown_method_stays_unresolved() {
        let graph = build("class Foo:\n    def bar(self):\n        Foo.nope(self)\n");

        assert_eq!(
            graph.callees(&CallableId::from("Foo.bar")),
            &[unresolved("Foo.nope")]
        );
    }

    #[test]
    fn class_node_exists_once_a_method_is_visited() {
        let graph = build("class Foo:\n    def bar(self):\n        pass\n");

        let class_id = CallableId::from("Foo");
        assert!(graph.contains(&class_id));
        assert!(graph.is_class(&class_id));
        assert_eq!(graph.callees(&class_id), &[] as &[CalleeRef]);
    }

    #[test]
    fn builtins_are_filtered() {
        let graph = build("def f():\n    print(len([]))\n");
        assert_eq!(graph.callees(&CallableId::from("f")), &[] as &[CalleeRef]);
    }

    #[test]
    fn user_function_shadowing_a_builtin_is_kept() {
        let graph = build("def filter():\n    pass\n\ndef f():\n    filter()\n");
        assert_eq!(graph.callees(&CallableId::from("f")), &[resolved("filter")]);
    }

    #[test]
    fn excluded_callables_are_dropped_as_nodes_and_edges() {
        let graph = build(
            "def main():\n    work()\n\ndef work():\n    main()\n\nclass Foo:\n    def __init__(self):\n        pass\n",
        );

        assert!(!graph.contains(&CallableId::from("main")));
        assert!(!graph.contains(&CallableId::from("Foo.__init__")));
        assert_eq!(graph.callees(&CallableId::from("work")), &[] as &[CalleeRef]);
    }

    #[test]
    fn callee_lists_are_deduplicated_and_sorted() {
        let graph = build(
            "def b():\n    pass\n\ndef a():\n    pass\n\ndef f():\n    b()\n    a()\n    b()\n",
        );

        assert_eq!(
            graph.callees(&CallableId::from("f")),
            &[resolved("a"), resolved("b")]
        );
    }

    #[test]
    fn opaque_markers_are_deduplicated() {
        let graph = build("def f():\n    obj.first()\n    obj.second()\n");
        assert_eq!(graph.callees(&CallableId::from("f")), &[opaque("obj")]);
    }

    #[test]
    fn self_loops_are_dropped() {
        let graph = build("def f():\n    f()\n");
        assert_eq!(graph.callees(&CallableId::from("f")), &[] as &[CalleeRef]);
    }

    #[test]
    fn excluded_class_methods_are_unqualified() {
        let graph = build(
            "class TestFoo:\n    def check(self):\n        target()\n\ndef target():\n    pass\n",
        );

        assert!(!graph.contains(&CallableId::from("TestFoo")));
        assert!(!graph.contains(&CallableId::from("TestFoo.check")));
        assert_eq!(
            graph.callees(&CallableId::from("check")),
            &[resolved("target")]
        );
    }

    #[test]
    fn nested_functions_take_the_innermost_context() {
        let graph = build(
            "def outer():\n    def inner():\n        deep()\n    inner()\n",
        );

        assert_eq!(graph.callees(&CallableId::from("outer")), &[resolved("inner")]);
        assert_eq!(graph.callees(&CallableId::from("inner")), &[unresolved("deep")]);
    }

    #[test]
    fn duplicate_declaration_keeps_the_later_one() {
        let graph = build(
            "def target():\n    pass\n\ndef helper():\n    target()\n\ndef helper():\n    pass\n",
        );

        assert_eq!(graph.callees(&CallableId::from("helper")), &[] as &[CalleeRef]);
    }

    #[test]
    fn rebuild_is_byte_identical() {
        let source = "class Foo:\n    def bar(self):\n        helper()\n        self.spin()\n\ndef helper():\n    other()\n";
        let first = serde_json::to_string(&build(source)).unwrap();
        let second = serde_json::to_string(&build(source)).unwrap();
        assert_eq!(first, second);
    }
}
