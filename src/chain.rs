//! Processor Chain.
//!
//! A linked list of processors is harder to extend and inspect than an
//! ordered vector of stages, so the chain here is a `Vec` of boxed
//! [`Planner`] stages rather than a recursive linked structure: appending a
//! stage collapses to a single push, and running the chain is a loop rather
//! than recursive descent.

/// One stage of the candidate-set pipeline. `execute` produces an initial
/// candidate vertex sequence (typically by handing the index query off to
/// the index engine); `filter` narrows a sequence already produced
/// upstream (typically by re-checking the graph residual). Neither method
/// executes a real engine itself — that's the caller's collaborator,
/// supplied as a closure via [`FnPlanner`] or a bespoke implementation.
pub trait Planner<V> {
    fn execute(&self) -> Vec<V>;
    fn filter(&self, candidates: Vec<V>) -> Vec<V>;
}

/// A [`Planner`] built from two closures, for the common case where a stage
/// has no state beyond "how do I produce/narrow candidates" — e.g. the
/// index-then-graph stage (`execute` = run the index query, `filter` = run
/// the graph residual against what the index returned), the graph-only
/// stage (`execute` = empty, `filter` = run the full-AST graph query), and
/// the classification-only stage (`execute`/`filter` = identity, used when
/// a caller only wants the classifier's diagnostics and attribute sets).
pub struct FnPlanner<V> {
    execute_fn: Box<dyn Fn() -> Vec<V>>,
    filter_fn: Box<dyn Fn(Vec<V>) -> Vec<V>>,
}

impl<V> FnPlanner<V> {
    pub fn new(execute_fn: impl Fn() -> Vec<V> + 'static, filter_fn: impl Fn(Vec<V>) -> Vec<V> + 'static) -> Self {
        Self {
            execute_fn: Box::new(execute_fn),
            filter_fn: Box::new(filter_fn),
        }
    }

    /// A stage whose `filter` is the identity function and whose `execute`
    /// always produces an empty candidate set — useful when a caller only
    /// wants the classifier's side effects on a shared `SearchContext` and
    /// has no candidates of its own to narrow.
    pub fn classification_only() -> Self {
        Self::new(Vec::new, |candidates| candidates)
    }
}

impl<V> Planner<V> for FnPlanner<V> {
    fn execute(&self) -> Vec<V> {
        (self.execute_fn)()
    }

    fn filter(&self, candidates: Vec<V>) -> Vec<V> {
        (self.filter_fn)(candidates)
    }
}

/// A linear composition of [`Planner`] stages.
///
/// `execute()` runs the head stage's own plan, then threads its results
/// through `filter()` of every subsequent stage in order. Empty input to a
/// `filter()` call short-circuits the remainder of the chain.
pub struct ProcessorChain<V> {
    stages: Vec<Box<dyn Planner<V>>>,
}

impl<V> Default for ProcessorChain<V> {
    fn default() -> Self {
        Self { stages: Vec::new() }
    }
}

impl<V> ProcessorChain<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage to the end of the chain.
    pub fn push(&mut self, stage: impl Planner<V> + 'static) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Run the whole chain: the head stage's `execute()`, then every
    /// remaining stage's `filter()` in order.
    pub fn execute(&self) -> Vec<V> {
        let mut stages = self.stages.iter();
        let Some(head) = stages.next() else {
            return Vec::new();
        };
        let mut candidates = head.execute();
        for stage in stages {
            if candidates.is_empty() {
                return candidates;
            }
            candidates = stage.filter(candidates);
        }
        candidates
    }
}
