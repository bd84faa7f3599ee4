//! `let` block declaration ordering (spec §4.4/§9): Tarjan's SCC
//! algorithm over the declaration dependency graph, then a topological
//! sort of the condensation, so each `Env::extend`/`extend_functions`
//! step below sees only bindings that are legal to introduce at that
//! point.
//!
//! Grounded on `ori_eval/src/exec/control.rs`'s `eval_block`, which
//! walks `let` declarations in source order and registers each as it
//! goes; that's sufficient for the teacher's language (no forward
//! references required within a block) but this surface language
//! allows mutual recursion among same-block function bindings, so the
//! dependency analysis here is new — grounded on the textbook
//! Tarjan/Kosaraju shape rather than any single teacher file.

use rustc_hash::{FxHashMap, FxHashSet};

use ml_ir::{ExprArena, ExprKind, LetDecl, LetDeclKind, Name, QualifiedName};

use crate::errors::{type_error, EvalError};

/// One resolved group of declarations, in the order they must be bound.
/// A group with more than one member is a legal mutual-recursion cycle
/// (every member is a zero-or-more-parameter `Function` binding).
pub struct DeclGroup<'a> {
    pub decls: Vec<&'a LetDecl>,
}

/// Orders `decls` into legal binding groups.
///
/// # Errors
/// Returns a `TypeError` if a cycle includes a `Destructuring`
/// declaration or a nullary (`CAF`) `Function` binding — spec §9: only
/// named functions with at least one parameter may participate in a
/// recursive cycle.
pub fn order_declarations<'a>(
    decls: &'a [LetDecl],
    arena: &ExprArena,
    call_stack: &[(Name, Name)],
) -> Result<Vec<DeclGroup<'a>>, EvalError> {
    let names: Vec<Name> = decls.iter().map(decl_name).collect();
    let index_of: FxHashMap<Name, usize> = names.iter().enumerate().map(|(i, n)| (*n, i)).collect();

    let mut deps: Vec<Vec<usize>> = Vec::with_capacity(decls.len());
    for decl in decls {
        let mut referenced = FxHashSet::default();
        collect_free_names(decl_body(decl), arena, &mut referenced);
        let mut edges: Vec<usize> = referenced
            .into_iter()
            .filter_map(|n| index_of.get(&n).copied())
            .collect();
        edges.sort_unstable();
        edges.dedup();
        deps.push(edges);
    }

    let sccs = tarjan_scc(&deps);

    let mut groups = Vec::with_capacity(sccs.len());
    for scc in sccs {
        if scc.len() > 1 {
            for &i in &scc {
                if !is_recursion_eligible(&decls[i]) {
                    return Err(type_error("illegal cycle in let block", call_stack));
                }
            }
        } else {
            let i = scc[0];
            // A nullary self-reference (`x = x`) is also an illegal
            // single-node cycle.
            if deps[i].contains(&i) && !is_recursion_eligible(&decls[i]) {
                return Err(type_error("illegal cycle in let block", call_stack));
            }
        }
        groups.push(DeclGroup {
            decls: scc.into_iter().map(|i| &decls[i]).collect(),
        });
    }
    Ok(groups)
}

fn decl_name(decl: &LetDecl) -> Name {
    match &decl.kind {
        LetDeclKind::Function { name, .. } => *name,
        LetDeclKind::Destructuring { pattern, .. } => first_pattern_name(pattern),
    }
}

fn first_pattern_name(pattern: &ml_ir::Pattern) -> Name {
    use ml_ir::PatternKind;
    match &pattern.kind {
        PatternKind::Var(n) => *n,
        PatternKind::As(_, n) => *n,
        // Tuple/record/ctor destructuring binds multiple names; any one
        // representative is enough to key the dependency graph node,
        // since the whole pattern is bound atomically.
        PatternKind::Tuple(ps) | PatternKind::List(ps) => ps.first().map(first_pattern_name).unwrap_or(*ps_fallback()),
        PatternKind::Cons(head, _) => first_pattern_name(head),
        PatternKind::Ctor { args, .. } => args.first().map(first_pattern_name).unwrap_or(*ps_fallback()),
        PatternKind::Record(fields) => *fields.first().unwrap_or(ps_fallback()),
        PatternKind::Wildcard | PatternKind::Literal(_) => *ps_fallback(),
    }
}

fn ps_fallback() -> &'static Name {
    // A destructuring pattern with no bindable name at all (`_ = expr`,
    // a bare literal) never needs to be looked up by dependents, so any
    // stable placeholder key works here.
    static PLACEHOLDER: std::sync::OnceLock<Name> = std::sync::OnceLock::new();
    PLACEHOLDER.get_or_init(|| Name::from_raw(u32::MAX))
}

fn decl_body(decl: &LetDecl) -> ml_ir::ExprId {
    match &decl.kind {
        LetDeclKind::Function { body, .. } => *body,
        LetDeclKind::Destructuring { expr, .. } => *expr,
    }
}

fn is_recursion_eligible(decl: &LetDecl) -> bool {
    matches!(&decl.kind, LetDeclKind::Function { params, .. } if !params.is_empty())
}

/// Collects every unqualified `Var` reference reachable from `root`
/// without descending into nested `let`/`lambda`/`case` binder scopes
/// that shadow the name — conservative over-approximation is fine here
/// since the only cost of a false dependency edge is a coarser (but
/// still legal) grouping.
fn collect_free_names(root: ml_ir::ExprId, arena: &ExprArena, out: &mut FxHashSet<Name>) {
    let node = arena.get(root);
    match &node.kind {
        ExprKind::Literal(_) | ExprKind::RecordAccessorFunction(_) => {}
        ExprKind::Var(QualifiedName { module: None, name }) => {
            out.insert(*name);
        }
        ExprKind::Var(QualifiedName { module: Some(_), .. }) => {}
        ExprKind::Negate(e) => collect_free_names(*e, arena, out),
        ExprKind::And(a, b) | ExprKind::Or(a, b) | ExprKind::BinOp { lhs: a, rhs: b, .. } => {
            collect_free_names(*a, arena, out);
            collect_free_names(*b, arena, out);
        }
        ExprKind::If { cond, then_branch, else_branch } => {
            collect_free_names(*cond, arena, out);
            collect_free_names(*then_branch, arena, out);
            collect_free_names(*else_branch, arena, out);
        }
        ExprKind::Tuple(items) | ExprKind::List(items) => {
            for item in items {
                collect_free_names(*item, arena, out);
            }
        }
        ExprKind::Record(fields) => {
            for (_, e) in fields {
                collect_free_names(*e, arena, out);
            }
        }
        ExprKind::RecordAccess { record, .. } => collect_free_names(*record, arena, out),
        ExprKind::RecordUpdate { fields, .. } => {
            for (_, e) in fields {
                collect_free_names(*e, arena, out);
            }
        }
        ExprKind::Lambda { body, .. } => collect_free_names(*body, arena, out),
        ExprKind::Let { decls, body } => {
            for decl in decls {
                collect_free_names(decl_body(decl), arena, out);
            }
            collect_free_names(*body, arena, out);
        }
        ExprKind::Case { scrutinee, arms } => {
            collect_free_names(*scrutinee, arena, out);
            for (_, e) in arms {
                collect_free_names(*e, arena, out);
            }
        }
        ExprKind::Application { func, args } => {
            collect_free_names(*func, arena, out);
            for arg in args {
                collect_free_names(*arg, arena, out);
            }
        }
    }
}

/// Tarjan's algorithm, returning strongly connected components in
/// reverse-topological order (a component's dependencies always appear
/// before it — safe to bind left-to-right).
fn tarjan_scc(deps: &[Vec<usize>]) -> Vec<Vec<usize>> {
    struct State {
        index: Vec<Option<usize>>,
        low_link: Vec<usize>,
        on_stack: Vec<bool>,
        stack: Vec<usize>,
        next_index: usize,
        sccs: Vec<Vec<usize>>,
    }

    fn strongconnect(v: usize, deps: &[Vec<usize>], st: &mut State) {
        st.index[v] = Some(st.next_index);
        st.low_link[v] = st.next_index;
        st.next_index += 1;
        st.stack.push(v);
        st.on_stack[v] = true;

        for &w in &deps[v] {
            if st.index[w].is_none() {
                strongconnect(w, deps, st);
                st.low_link[v] = st.low_link[v].min(st.low_link[w]);
            } else if st.on_stack[w] {
                st.low_link[v] = st.low_link[v].min(st.index[w].expect("checked Some"));
            }
        }

        if st.low_link[v] == st.index[v].expect("set above") {
            let mut component = Vec::new();
            loop {
                let w = st.stack.pop().expect("component root is on stack");
                st.on_stack[w] = false;
                component.push(w);
                if w == v {
                    break;
                }
            }
            st.sccs.push(component);
        }
    }

    let n = deps.len();
    let mut st = State {
        index: vec![None; n],
        low_link: vec![0; n],
        on_stack: vec![false; n],
        stack: Vec::new(),
        next_index: 0,
        sccs: Vec::new(),
    };
    for v in 0..n {
        if st.index[v].is_none() {
            strongconnect(v, deps, &mut st);
        }
    }
    st.sccs
}
