use tank_core::TickContext;
use tank_dectree::{
    Decision, DecisionNode, DecisionTree, DecisionTreeBuilder, NodeRef, Step, TreeError,
};
use tank_tools::VecTraceSink;

#[derive(Debug, Default)]
struct Probe {
    flag: bool,
    second: bool,
    predicate_calls: std::cell::Cell<u32>,
    left: u32,
    right: u32,
    noop: u32,
}

fn ctx() -> TickContext {
    TickContext::new(42, 1.0 / 30.0)
}

fn flag(p: &Probe, _ctx: &TickContext) -> bool {
    p.predicate_calls.set(p.predicate_calls.get() + 1);
    p.flag
}

fn second(p: &Probe, _ctx: &TickContext) -> bool {
    p.predicate_calls.set(p.predicate_calls.get() + 1);
    p.second
}

fn two_way_tree() -> DecisionTree<Probe> {
    let mut t = DecisionTreeBuilder::<Probe>::new("two_way");
    let root = t.branch("flag", flag);
    let left = t.leaf("left", |p: &mut Probe, _: &TickContext| p.left += 1);
    let right = t.leaf("right", |p: &mut Probe, _: &TickContext| p.right += 1);
    t.wire(root, Some(left.into()), Some(right.into()))
        .expect("wire root");
    t.build(root.into()).expect("valid tree")
}

#[test]
fn branch_visits_exactly_the_child_selected_by_its_predicate() {
    let tree = two_way_tree();

    for value in [true, false, true, true, false] {
        let mut probe = Probe {
            flag: value,
            ..Probe::default()
        };
        let decision = tree.evaluate(&mut probe, &ctx());

        assert!(decision.fired());
        assert_eq!(probe.predicate_calls.get(), 1);
        assert_eq!(probe.left + probe.right, 1);
        if value {
            assert_eq!(probe.left, 1);
            assert_eq!(decision.leaf_name(), Some("left"));
        } else {
            assert_eq!(probe.right, 1);
            assert_eq!(decision.leaf_name(), Some("right"));
        }
    }
}

#[test]
fn absent_child_halts_without_running_any_action() {
    let mut t = DecisionTreeBuilder::<Probe>::new("half_wired");
    let root = t.branch("flag", flag);
    let noop = t.leaf("noop", |p: &mut Probe, _: &TickContext| p.noop += 1);
    t.wire(root, Some(noop.into()), None).expect("wire root");
    let tree = t.build(root.into()).expect("valid tree");

    let mut probe = Probe::default();
    let decision = tree.evaluate(&mut probe, &ctx());

    assert_eq!(decision, Decision::NoTerminal { at: root });
    assert!(!decision.fired());
    assert_eq!(decision.leaf_name(), None);
    assert_eq!(probe.noop, 0);

    probe.flag = true;
    assert!(tree.evaluate(&mut probe, &ctx()).fired());
    assert_eq!(probe.noop, 1);
}

#[test]
fn fully_unwired_branch_is_a_valid_no_op_tree() {
    let mut t = DecisionTreeBuilder::<Probe>::new("empty");
    let root = t.branch("flag", flag);
    t.wire(root, None, None).expect("wire root");
    let tree = t.build(root.into()).expect("valid tree");

    let mut probe = Probe {
        flag: true,
        ..Probe::default()
    };
    assert_eq!(
        tree.evaluate(&mut probe, &ctx()),
        Decision::NoTerminal { at: root }
    );
}

#[test]
fn depth_counts_the_longest_root_to_terminal_walk() {
    let mut t = DecisionTreeBuilder::<Probe>::new("chain");
    let a = t.branch("a", flag);
    let b = t.branch("b", second);
    let c = t.branch("c", flag);
    let leaf = t.leaf("leaf", |p: &mut Probe, _: &TickContext| p.left += 1);
    t.wire(a, Some(b.into()), Some(leaf.into()))
        .and_then(|t| t.wire(b, Some(c.into()), None))
        .and_then(|t| t.wire(c, Some(leaf.into()), None))
        .expect("wire chain");
    let tree = t.build(a.into()).expect("valid tree");

    assert_eq!(tree.depth(), 4);
    assert_eq!(tree.branches().len(), 3);
    assert_eq!(tree.leaves().len(), 1);

    let mut probe = Probe {
        flag: true,
        second: true,
        ..Probe::default()
    };
    assert_eq!(tree.evaluate(&mut probe, &ctx()).leaf_name(), Some("leaf"));
    assert_eq!(probe.predicate_calls.get(), 3);
}

#[test]
fn leaf_root_fires_immediately() {
    let mut t = DecisionTreeBuilder::<Probe>::new("leaf_only");
    let leaf = t.leaf("leaf", |p: &mut Probe, _: &TickContext| p.left += 1);
    let tree = t.build(leaf.into()).expect("valid tree");

    let mut probe = Probe::default();
    assert!(tree.evaluate(&mut probe, &ctx()).fired());
    assert_eq!(tree.depth(), 1);
    assert_eq!(probe.left, 1);
}

#[test]
fn builder_rejects_cycles() {
    let mut t = DecisionTreeBuilder::<Probe>::new("loop");
    let a = t.branch("a", flag);
    let b = t.branch("b", second);
    t.wire(a, Some(b.into()), None).expect("wire a");
    t.wire(b, None, Some(a.into())).expect("wire b");

    let err = t.build(a.into()).expect_err("cycle must be rejected");
    assert_eq!(
        err,
        TreeError::Cycle {
            tree: "loop",
            branch: "a"
        }
    );
}

#[test]
fn builder_rejects_rewiring_a_branch() {
    let mut t = DecisionTreeBuilder::<Probe>::new("rewire");
    let a = t.branch("a", flag);
    let leaf = t.leaf("leaf", |_: &mut Probe, _: &TickContext| {});
    t.wire(a, Some(leaf.into()), None).expect("first wiring");

    let err = t
        .wire(a, None, Some(leaf.into()))
        .err()
        .expect("second wiring must fail");
    assert_eq!(
        err,
        TreeError::BranchRewired {
            tree: "rewire",
            branch: "a"
        }
    );
}

#[test]
fn builder_rejects_unwired_branches() {
    let mut t = DecisionTreeBuilder::<Probe>::new("unwired");
    let a = t.branch("a", flag);
    let b = t.branch("b", second);
    t.wire(a, Some(b.into()), None).expect("wire a");

    let err = t.build(a.into()).expect_err("b was never wired");
    assert_eq!(
        err,
        TreeError::UnwiredBranch {
            tree: "unwired",
            branch: "b"
        }
    );
}

#[test]
fn builder_rejects_ids_from_another_builder() {
    let mut other = DecisionTreeBuilder::<Probe>::new("other");
    for _ in 0..3 {
        other.leaf("filler", |_: &mut Probe, _: &TickContext| {});
    }
    let foreign = other.leaf("foreign", |_: &mut Probe, _: &TickContext| {});

    let mut t = DecisionTreeBuilder::<Probe>::new("mine");
    let a = t.branch("a", flag);
    t.leaf("own", |_: &mut Probe, _: &TickContext| {});

    let err = t
        .wire(a, Some(foreign.into()), None)
        .err()
        .expect("foreign leaf must be rejected");
    assert_eq!(
        err,
        TreeError::UnknownLeaf {
            tree: "mine",
            index: 3
        }
    );
}

#[test]
fn traced_evaluation_reports_every_visited_node() {
    let tree = two_way_tree();
    let mut sink = VecTraceSink::default();
    let mut probe = Probe {
        flag: true,
        ..Probe::default()
    };

    tree.evaluate_traced(&mut probe, &ctx(), &mut sink);

    assert_eq!(sink.tags(), vec!["dectree.branch", "dectree.leaf"]);
    assert!(sink.events.iter().all(|e| e.tick == 42));
    assert_eq!(sink.events[0].detail, 1);
    assert_eq!(sink.events[1].subject, 0);
}

#[test]
fn nodes_can_be_stepped_one_at_a_time() {
    let tree = two_way_tree();
    let mut probe = Probe::default();

    let root = tree.node(tree.root()).expect("root exists");
    assert!(!root.is_leaf());
    assert_eq!(root.name(), "flag");

    let Step::Next(next) = root.step(&mut probe, &ctx()) else {
        panic!("root is fully wired");
    };
    assert!(matches!(next, NodeRef::Leaf(_)));

    let leaf = tree.node(next).expect("leaf exists");
    assert!(matches!(leaf, DecisionNode::Leaf(_)));
    assert_eq!(leaf.step(&mut probe, &ctx()), Step::Fired);
    assert_eq!(probe.right, 1);
}
