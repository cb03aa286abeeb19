//! Singly linked list algorithms over id-linked arenas.

use algotrace_engine::{
    AlgorithmDef, AlgorithmError, Category, Descriptor, Difficulty, Input, InputShape, ParamSpec,
    Params, Pointers, RunResult, TimeComplexity, Tracer, Validation,
};
use algotrace_protocol::{NodeHighlight, Outcome};
use algotrace_snapshot::{walk, ListArena, ListView, NodeId};

use crate::support::{numbers, numbers_between, MAX_LIST_LEN};

fn validate_list(input: &Input) -> Validation {
    numbers_between(input, 1, MAX_LIST_LEN)
}

/// `3 → 2 → 1`
fn render(arenas: &[&ListArena], head: Option<NodeId>) -> String {
    walk(arenas, head)
        .into_iter()
        .filter_map(|id| arenas.iter().find_map(|a| a.value(id)))
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" → ")
}

// ---------------------------------------------------------------------------
// Reverse
// ---------------------------------------------------------------------------

const REVERSE: &[&str] = &[
    "prev = null; curr = head",
    "while curr != null",
    "  next = curr.next",
    "  curr.next = prev",
    "  prev = curr; curr = next",
    "head = prev",
];

pub fn reverse_linked_list() -> AlgorithmDef {
    AlgorithmDef::new(
        Descriptor {
            id: "reverse-linked-list",
            name: "Reverse Linked List",
            category: Category::LinkedLists,
            difficulty: Difficulty::Beginner,
            input: InputShape::Numbers,
            pseudocode: REVERSE,
            time: TimeComplexity::uniform("O(n)"),
            space: "O(1)",
            parameters: vec![],
        },
        validate_list,
        |input, params, tx| Box::pin(reverse(input, params, tx)),
    )
}

async fn reverse(input: Input, _: Params, tx: Tracer) -> RunResult {
    let (mut list, head) = ListArena::from_values(0, numbers(&input));
    tx.info(format!("Reversing {} nodes by flipping each next link", list.len()))
        .await?;

    let (mut prev, mut curr): (Option<NodeId>, Option<NodeId>) = (None, head);
    // Fixed while relinking; flipped links would otherwise end two chains.
    let last = walk(&[&list], head).last().copied();
    tx.highlight(&[1]).await?;
    let view = |prev: Option<NodeId>, curr: Option<NodeId>, next: Option<NodeId>| {
        ListView::new()
            .head(head)
            .tail(last)
            .highlight(prev, NodeHighlight::Previous)
            .highlight(next, NodeHighlight::Next)
            .highlight(curr, NodeHighlight::Current)
            .pointer("prev", prev)
            .pointer("curr", curr)
            .pointer("next", next)
    };
    tx.auxiliary(view(prev, curr, None).snapshot(&[&list])).await?;

    while let Some(id) = curr {
        tx.highlight(&[2, 3]).await?;
        let next = list.next(id);
        tx.auxiliary(view(prev, curr, next).snapshot(&[&list])).await?;

        tx.highlight(&[4]).await?;
        list.link(id, prev);
        tx.pointer(
            Pointers::new()
                .value("curr", list.value(id))
                .value("prev", prev.and_then(|p| list.value(p))),
        )
        .await?;
        tx.auxiliary(view(prev, curr, next).snapshot(&[&list])).await?;

        tx.highlight(&[5]).await?;
        prev = curr;
        curr = next;
    }

    tx.highlight(&[6]).await?;
    let done = ListView::new()
        .head(prev)
        .tail(head)
        .highlight(prev, NodeHighlight::Done)
        .pointer("head", prev);
    tx.auxiliary(done.snapshot(&[&list])).await?;
    tx.result(Outcome::String(render(&[&list], prev)), "Reversed list").await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Merge two sorted lists
// ---------------------------------------------------------------------------

const MERGE: &[&str] = &[
    "head = null; tail = null",
    "while a != null and b != null",
    "  if a.value <= b.value: take = a; a = a.next",
    "  else: take = b; b = b.next",
    "  append take after tail",
    "append whichever of a, b remains",
    "return head",
];

const DEFAULT_OTHER: &str = "1, 4, 6";
const OTHER_BASE: NodeId = 100;

pub fn merge_sorted_lists() -> AlgorithmDef {
    AlgorithmDef::new(
        Descriptor {
            id: "merge-sorted-lists",
            name: "Merge Two Sorted Lists",
            category: Category::LinkedLists,
            difficulty: Difficulty::Intermediate,
            input: InputShape::Numbers,
            pseudocode: MERGE,
            time: TimeComplexity::uniform("O(n + m)"),
            space: "O(1)",
            parameters: vec![ParamSpec::text("other", "Second list", 40, DEFAULT_OTHER)],
        },
        validate_merge,
        |input, params, tx| Box::pin(merge(input, params, tx)),
    )
}

fn validate_merge(input: &Input) -> Validation {
    let verdict = validate_list(input);
    if !verdict.is_ok() {
        return verdict;
    }
    Validation::require(numbers(input).windows(2).all(|w| w[0] <= w[1]), || {
        "The list must be sorted in ascending order".to_string()
    })
}

/// The second list from the `other` parameter, repaired rather than
/// rejected: unparsable text falls back to the default, oversized input is
/// truncated and unsorted input is sorted.
fn other_list(params: &Params) -> (Vec<i64>, Option<String>) {
    let raw = params
        .get("other")
        .map(ToString::to_string)
        .unwrap_or_else(|| DEFAULT_OTHER.to_string());
    let parsed = Input::parse_numbers(&raw)
        .ok()
        .and_then(|input| input.numbers().map(<[i64]>::to_vec));

    let (mut values, mut note) = match parsed {
        Some(values) if !values.is_empty() => (values, None),
        _ => (
            vec![1, 4, 6],
            Some(format!("Could not read `{raw}` as a list; using {DEFAULT_OTHER}")),
        ),
    };
    if values.len() > MAX_LIST_LEN {
        values.truncate(MAX_LIST_LEN);
        note = Some(format!("Second list cut to its first {MAX_LIST_LEN} values"));
    }
    if values.windows(2).any(|w| w[0] > w[1]) {
        values.sort_unstable();
        note = Some("Second list was not sorted; sorted it first".to_string());
    }
    (values, note)
}

struct Merge {
    a: ListArena,
    b: ListArena,
}

impl Merge {
    fn link(&mut self, id: NodeId, next: Option<NodeId>) {
        if self.a.contains(id) {
            self.a.link(id, next);
        } else {
            self.b.link(id, next);
        }
    }

    fn next(&self, id: NodeId) -> Option<NodeId> {
        self.a.next(id).or_else(|| self.b.next(id))
    }

    fn value(&self, id: NodeId) -> Option<i64> {
        self.a.value(id).or_else(|| self.b.value(id))
    }

    fn arenas(&self) -> [&ListArena; 2] {
        [&self.a, &self.b]
    }
}

async fn merge(input: Input, params: Params, tx: Tracer) -> RunResult {
    let (other, repaired) = other_list(&params);
    if let Some(note) = repaired {
        tx.note(note).await?;
    }
    let (a, head_a) = ListArena::from_values(0, numbers(&input));
    let (b, head_b) = ListArena::from_values(OTHER_BASE, &other);
    let mut run = Merge { a, b };
    tx.info(format!(
        "Merging {} and {} nodes by relinking, no copies",
        run.a.len(),
        run.b.len()
    ))
    .await?;

    let (mut head, mut tail): (Option<NodeId>, Option<NodeId>) = (None, None);
    let (mut pa, mut pb) = (head_a, head_b);
    tx.highlight(&[1]).await?;

    loop {
        let view = ListView::new()
            .head(head)
            .also_head(pa)
            .also_head(pb)
            .highlight(tail, NodeHighlight::Done)
            .highlight(pa, NodeHighlight::Current)
            .highlight(pb, NodeHighlight::Next)
            .pointer("a", pa)
            .pointer("b", pb)
            .pointer("tail", tail);
        tx.auxiliary(view.snapshot(&run.arenas())).await?;

        tx.highlight(&[2]).await?;
        let (Some(ia), Some(ib)) = (pa, pb) else {
            break;
        };
        let (va, vb) = match (run.value(ia), run.value(ib)) {
            (Some(va), Some(vb)) => (va, vb),
            _ => return Err(AlgorithmError::fault("merge cursor left the arenas")),
        };
        tx.pointer(Pointers::new().value("a", va).value("b", vb)).await?;

        let take = if va <= vb {
            tx.highlight(&[3]).await?;
            pa = run.next(ia);
            ia
        } else {
            tx.highlight(&[4]).await?;
            pb = run.next(ib);
            ib
        };

        tx.highlight(&[5]).await?;
        match tail {
            Some(t) => run.link(t, Some(take)),
            None => head = Some(take),
        }
        tail = Some(take);
    }

    tx.highlight(&[6]).await?;
    let rest = pa.or(pb);
    match tail {
        Some(t) => run.link(t, rest),
        None => head = rest,
    }
    if rest.is_some() {
        tx.explain("One list ran out; the rest of the other is already in order")
            .await?;
    }

    tx.highlight(&[7]).await?;
    let done = ListView::new()
        .head(head)
        .highlight(head, NodeHighlight::Done)
        .pointer("head", head);
    tx.auxiliary(done.snapshot(&run.arenas())).await?;
    tx.result(Outcome::String(render(&run.arenas(), head)), "Merged list")
        .await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Cycle detection
// ---------------------------------------------------------------------------

const FLOYD: &[&str] = &[
    "slow = head; fast = head",
    "while fast != null and fast.next != null",
    "  slow = slow.next; fast = fast.next.next",
    "  if slow == fast: break",
    "if no meeting: return false",
    "slow = head",
    "while slow != fast: slow = slow.next; fast = fast.next",
    "return true (cycle starts at slow)",
];

const DEFAULT_CYCLE_AT: i64 = 1;

pub fn detect_cycle() -> AlgorithmDef {
    AlgorithmDef::new(
        Descriptor {
            id: "detect-cycle",
            name: "Detect Cycle (Floyd)",
            category: Category::LinkedLists,
            difficulty: Difficulty::Intermediate,
            input: InputShape::Numbers,
            pseudocode: FLOYD,
            time: TimeComplexity::uniform("O(n)"),
            space: "O(1)",
            parameters: vec![ParamSpec::range(
                "cycle_at",
                "Tail links back to index (-1 for none)",
                -1,
                MAX_LIST_LEN as i64 - 1,
                DEFAULT_CYCLE_AT,
            )],
        },
        validate_list,
        |input, params, tx| Box::pin(floyd(input, params, tx)),
    )
}

async fn floyd(input: Input, params: Params, tx: Tracer) -> RunResult {
    let values = numbers(&input);
    let (mut list, head) = ListArena::from_values(0, values);
    let last = values.len() as NodeId - 1;

    let requested = params.number("cycle_at").unwrap_or(DEFAULT_CYCLE_AT);
    let cycle_at = match usize::try_from(requested) {
        Ok(i) if i < values.len() => Some(i as NodeId),
        Ok(_) => {
            tx.note(format!("No node at index {requested}; building the list without a cycle"))
                .await?;
            None
        }
        Err(_) => None,
    };
    if let Some(target) = cycle_at {
        list.link(last, Some(target));
    }
    tx.info("Tortoise moves one step, hare moves two").await?;

    let view = |slow: Option<NodeId>, fast: Option<NodeId>| {
        let base = ListView::new().head(head).tail(Some(last));
        let base = if slow.is_some() && slow == fast {
            base.highlight(slow, NodeHighlight::Meeting)
        } else {
            base.highlight(slow, NodeHighlight::Slow)
                .highlight(fast, NodeHighlight::Fast)
        };
        base.pointer("slow", slow).pointer("fast", fast)
    };

    tx.highlight(&[1]).await?;
    let (mut slow, mut fast) = (head, head);
    tx.auxiliary(view(slow, fast).snapshot(&[&list])).await?;

    let mut met = false;
    while let Some(f) = fast {
        tx.highlight(&[2]).await?;
        let Some(f1) = list.next(f) else {
            break;
        };
        tx.highlight(&[3]).await?;
        slow = slow.and_then(|s| list.next(s));
        fast = list.next(f1);
        tx.pointer(
            Pointers::new()
                .value("slow", slow.and_then(|s| list.value(s)))
                .value("fast", fast.and_then(|f| list.value(f))),
        )
        .await?;
        tx.auxiliary(view(slow, fast).snapshot(&[&list])).await?;

        tx.highlight(&[4]).await?;
        if fast.is_some() && slow == fast {
            tx.explain("The hare caught the tortoise, so the list loops").await?;
            met = true;
            break;
        }
    }

    if !met {
        tx.highlight(&[5]).await?;
        tx.explain("The hare reached the end of the list").await?;
        tx.result(Outcome::Boolean(false), "No cycle").await?;
        return Ok(());
    }

    tx.highlight(&[6]).await?;
    slow = head;
    tx.auxiliary(view(slow, fast).snapshot(&[&list])).await?;
    while slow != fast {
        tx.highlight(&[7]).await?;
        let (Some(s), Some(f)) = (slow, fast) else {
            return Err(AlgorithmError::fault("pointer fell off a cyclic list"));
        };
        slow = list.next(s);
        fast = list.next(f);
        tx.auxiliary(view(slow, fast).snapshot(&[&list])).await?;
    }

    tx.highlight(&[8]).await?;
    let start = slow.ok_or_else(|| AlgorithmError::fault("cycle start is missing"))?;
    let found = ListView::new()
        .head(head)
        .tail(Some(last))
        .cycle_start(Some(start))
        .highlight(Some(start), NodeHighlight::Meeting)
        .pointer("start", Some(start));
    tx.auxiliary(found.snapshot(&[&list])).await?;
    let value = list.value(start).unwrap_or_default();
    tx.result(
        Outcome::Boolean(true),
        format!("Cycle starts at index {start} (value {value})"),
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::testing::{drain, outcome, snapshots};
    use algotrace_engine::{Engine, ParamValue};
    use algotrace_protocol::{AuxSnapshot, LinkedListSnapshot};

    fn last_list(events: &[algotrace_protocol::Event]) -> &LinkedListSnapshot {
        match snapshots(events, "linked_list").last().copied() {
            Some(AuxSnapshot::LinkedList(list)) => list,
            _ => panic!("no linked list snapshot"),
        }
    }

    #[test]
    fn reverses_three_nodes() {
        let events = drain(&reverse_linked_list(), Input::Numbers(vec![1, 2, 3]), Params::new());
        assert_eq!(outcome(&events).0, Outcome::String("3 → 2 → 1".into()));

        let list = last_list(&events);
        let head = list.head_id.and_then(|id| list.node(id)).unwrap();
        assert_eq!(head.value, 3);
        assert!(head.is_head);
        assert_eq!(list.head_values(), vec![3, 2, 1]);
    }

    #[test]
    fn reverse_snapshots_keep_their_links() {
        let events = drain(&reverse_linked_list(), Input::Numbers(vec![1, 2]), Params::new());
        let first = match snapshots(&events, "linked_list").first().copied() {
            Some(AuxSnapshot::LinkedList(list)) => list,
            _ => panic!("no linked list snapshot"),
        };
        assert_eq!(first.head_values(), vec![1, 2]);
    }

    #[test]
    fn reverse_marks_a_single_tail() {
        let events = drain(&reverse_linked_list(), Input::Numbers(vec![1, 2, 3, 4]), Params::new());
        let lists = snapshots(&events, "linked_list");
        assert!(lists.len() > 2);
        for snapshot in lists {
            let AuxSnapshot::LinkedList(list) = snapshot else {
                panic!("expected a linked list");
            };
            let tails: Vec<u32> = list.nodes.iter().filter(|n| n.is_tail).map(|n| n.id).collect();
            assert_eq!(tails.len(), 1, "tails {tails:?}");
            assert_eq!(Some(tails[0]), list.tail_id);
        }
    }

    #[test]
    fn merges_with_default_other() {
        let events = drain(&merge_sorted_lists(), Input::Numbers(vec![1, 3, 5]), Params::new());
        assert_eq!(
            outcome(&events).0,
            Outcome::String("1 → 1 → 3 → 4 → 5 → 6".into())
        );
        let list = last_list(&events);
        assert_eq!(list.head_id, Some(0));
        assert!(list.nodes.iter().any(|n| n.id >= OTHER_BASE));
    }

    #[test]
    fn merge_repairs_unsorted_other() {
        let params = Params::new().with("other", ParamValue::Text("9 2".into()));
        let events = drain(&merge_sorted_lists(), Input::Numbers(vec![5]), params);
        assert_eq!(outcome(&events).0, Outcome::String("2 → 5 → 9".into()));
    }

    #[test]
    fn merge_requires_sorted_input() {
        let def = merge_sorted_lists();
        let started = Engine::default().start(&def, Input::Numbers(vec![3, 1]), &Params::new());
        assert!(started.is_err());
    }

    #[test]
    fn finds_cycle_start() {
        let params = Params::new().with("cycle_at", ParamValue::Number(2));
        let events = drain(&detect_cycle(), Input::Numbers(vec![10, 20, 30, 40, 50]), params);
        assert_eq!(outcome(&events).0, Outcome::Boolean(true));
        assert_eq!(last_list(&events).cycle_start_id, Some(2));
    }

    #[test]
    fn acyclic_list_reports_false() {
        let params = Params::new().with("cycle_at", ParamValue::Number(-1));
        let events = drain(&detect_cycle(), Input::Numbers(vec![1, 2, 3, 4]), params);
        assert_eq!(outcome(&events).0, Outcome::Boolean(false));
        assert!(snapshots(&events, "linked_list").iter().all(|s| match s {
            AuxSnapshot::LinkedList(list) => list.cycle_start_id.is_none(),
            _ => false,
        }));
    }

    #[test]
    fn self_loop_on_single_node() {
        let params = Params::new().with("cycle_at", ParamValue::Number(0));
        let events = drain(&detect_cycle(), Input::Numbers(vec![7]), params);
        assert_eq!(outcome(&events).0, Outcome::Boolean(true));
        assert_eq!(last_list(&events).cycle_start_id, Some(0));
    }
}
