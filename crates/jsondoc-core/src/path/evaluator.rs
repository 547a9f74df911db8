//! Lazy path evaluation.
//!
//! A [`Query`] walks the tree with an explicit stack of frames instead of
//! materialising the working set after every token. Results come out in the
//! same order as token-by-token set evaluation would produce them, but a
//! caller that only wants the first match stops the walk there.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::filter;
use super::token::{CompiledPath, PathToken};
use crate::value::Value;

impl CompiledPath {
    /// Start a fresh evaluation against `root`.
    ///
    /// Each call gets its own traversal state, so the same compiled path can
    /// be evaluated any number of times, concurrently, against any tree.
    pub fn evaluate<'a>(&self, root: &'a Value) -> Query<'a> {
        Query {
            tokens: self.shared_tokens(),
            stack: vec![Frame::Visit(root, 0)],
        }
    }
}

/// Iterator over the values a path selects. Yields references into the tree.
#[derive(Debug, Clone)]
pub struct Query<'a> {
    tokens: Arc<[PathToken]>,
    stack: Vec<Frame<'a>>,
}

#[derive(Debug, Clone)]
enum Frame<'a> {
    /// Apply `tokens[step..]` to this value.
    Visit(&'a Value, usize),
    /// Visit each child at `step`. With `descend`, each child's own subtree
    /// follows it (pre-order).
    Children {
        children: Children<'a>,
        step: usize,
        descend: bool,
    },
    /// Array items still to test against the filter at `tokens[step]`.
    Filter {
        items: std::slice::Iter<'a, Value>,
        step: usize,
    },
}

#[derive(Debug, Clone)]
enum Children<'a> {
    Array(std::slice::Iter<'a, Value>),
    Object(indexmap::map::Values<'a, Arc<str>, Value>),
    None,
}

impl<'a> Children<'a> {
    fn of(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => Children::Array(items.iter()),
            Value::Object(map) => Children::Object(map.values()),
            _ => Children::None,
        }
    }
}

impl<'a> Iterator for Children<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Children::Array(items) => items.next(),
            Children::Object(values) => values.next(),
            Children::None => None,
        }
    }
}

impl<'a> Query<'a> {
    /// Stop yielding once `token` is cancelled. The token is checked once per
    /// yielded element.
    pub fn cancellable(self, token: &CancellationToken) -> Cancellable<'a> {
        Cancellable {
            query: self,
            token: token.clone(),
        }
    }

    /// Replace the visit of `value` at `step` with the frames it expands to.
    fn expand(&mut self, value: &'a Value, step: usize) {
        let next = step + 1;
        match &self.tokens[step] {
            PathToken::Property(name) => {
                if let Some(child) = value.try_get_property(name) {
                    self.stack.push(Frame::Visit(child, next));
                }
            }
            PathToken::ArrayIndex(index) => {
                if let Some(child) = value.as_array().and_then(|items| pick(items, *index)) {
                    self.stack.push(Frame::Visit(child, next));
                }
            }
            PathToken::Wildcard => self.stack.push(Frame::Children {
                children: Children::of(value),
                step: next,
                descend: false,
            }),
            PathToken::RecursiveDescent => {
                self.stack.push(Frame::Children {
                    children: Children::of(value),
                    step: next,
                    descend: true,
                });
                // A trailing `..` selects descendants only; otherwise the
                // element itself also continues with the rest of the path.
                if next < self.tokens.len() {
                    self.stack.push(Frame::Visit(value, next));
                }
            }
            PathToken::Filter(_) => {
                if let Some(items) = value.as_array() {
                    self.stack.push(Frame::Filter {
                        items: items.iter(),
                        step,
                    });
                }
            }
        }
    }
}

/// Resolve a possibly negative index against `items`.
fn pick(items: &[Value], index: i64) -> Option<&Value> {
    let resolved = if index < 0 {
        items.len().checked_sub(usize::try_from(index.unsigned_abs()).ok()?)?
    } else {
        usize::try_from(index).ok()?
    };
    items.get(resolved)
}

impl<'a> Iterator for Query<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            match frame {
                Frame::Visit(value, step) => {
                    let (value, step) = (*value, *step);
                    self.stack.pop();
                    if step == self.tokens.len() {
                        return Some(value);
                    }
                    self.expand(value, step);
                }
                Frame::Children {
                    children,
                    step,
                    descend,
                } => {
                    let (step, descend) = (*step, *descend);
                    match children.next() {
                        Some(child) if descend => {
                            self.stack.push(Frame::Children {
                                children: Children::of(child),
                                step,
                                descend: true,
                            });
                            self.stack.push(Frame::Visit(child, step));
                        }
                        Some(child) => self.stack.push(Frame::Visit(child, step)),
                        None => {
                            self.stack.pop();
                        }
                    }
                }
                Frame::Filter { items, step } => {
                    let step = *step;
                    let PathToken::Filter(predicate) = &self.tokens[step] else {
                        self.stack.pop();
                        continue;
                    };
                    match items.find(|item| filter::matches(predicate, item)) {
                        Some(item) => self.stack.push(Frame::Visit(item, step + 1)),
                        None => {
                            self.stack.pop();
                        }
                    }
                }
            }
        }
    }
}

/// Shared flag for stopping a streaming query from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// A [`Query`] that ends early once its [`CancellationToken`] is cancelled.
#[derive(Debug, Clone)]
pub struct Cancellable<'a> {
    query: Query<'a>,
    token: CancellationToken,
}

impl<'a> Iterator for Cancellable<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        if self.token.is_cancelled() {
            return None;
        }
        self.query.next()
    }
}
