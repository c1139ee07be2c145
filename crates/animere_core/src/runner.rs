//! Animation runner
//!
//! Adds the class pair an external stylesheet keys its animation on, then
//! waits for the element's `animationend`. The wait is a [`Completion`]: a
//! future that resolves after the first end event, once both classes have
//! been removed again.
//!
//! Nothing blocks while waiting. The runner registers a once-listener on the
//! host and returns immediately; async hosts can `.await` the completion,
//! event-driven hosts pass a continuation that runs with the host when the
//! event arrives.

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use smallvec::SmallVec;

use crate::host::Host;

/// Continuation run with the host once an animation has finished
pub type FinishCallback<H> = Box<dyn FnOnce(&mut H, <H as Host>::Node)>;

/// Applies and clears animation classes
#[derive(Clone, Debug)]
pub struct AnimationRunner {
    class_prefix: String,
}

impl AnimationRunner {
    pub fn new(class_prefix: impl Into<String>) -> Self {
        Self {
            class_prefix: class_prefix.into(),
        }
    }

    pub fn class_prefix(&self) -> &str {
        &self.class_prefix
    }

    /// The two classes added for `animation`, e.g. `animate__animated` and
    /// `animate__bounce`
    pub fn classes(&self, animation: &str) -> [String; 2] {
        [
            format!("{}animated", self.class_prefix),
            format!("{}{}", self.class_prefix, animation),
        ]
    }

    /// Start `animation` on `node`
    pub fn run<H: Host>(&self, host: &mut H, node: H::Node, animation: &str) -> Completion<H> {
        self.start(host, node, animation, None)
    }

    /// Start `animation` on `node` and call `on_finish` once it has ended
    pub fn run_with<H, F>(
        &self,
        host: &mut H,
        node: H::Node,
        animation: &str,
        on_finish: F,
    ) -> Completion<H>
    where
        H: Host,
        F: FnOnce(&mut H, H::Node) + 'static,
    {
        self.start(host, node, animation, Some(Box::new(on_finish)))
    }

    fn start<H: Host>(
        &self,
        host: &mut H,
        node: H::Node,
        animation: &str,
        on_finish: Option<FinishCallback<H>>,
    ) -> Completion<H> {
        let classes = SmallVec::from_buf(self.classes(animation));
        for class in &classes {
            host.add_class(node, class);
        }

        tracing::trace!(?node, animation, "animation started");

        let completion = Completion {
            shared: Rc::new(RefCell::new(CompletionState {
                node,
                classes,
                done: false,
                waker: None,
                on_finish,
            })),
        };

        let listener = completion.clone();
        host.once_animation_end(
            node,
            Box::new(move |host, _node| {
                listener.finish(host);
            }),
        );

        completion
    }
}

impl Default for AnimationRunner {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_CLASS_PREFIX)
    }
}

struct CompletionState<H: Host> {
    node: H::Node,
    classes: SmallVec<[String; 2]>,
    done: bool,
    waker: Option<Waker>,
    on_finish: Option<FinishCallback<H>>,
}

/// Single-fire completion signal for one [`AnimationRunner::run`] call
///
/// Resolves at most once. The first call to [`finish`](Completion::finish),
/// whether from the `animationend` listener or a forced timeout, removes the
/// classes, runs the continuation and wakes any task awaiting it; later
/// calls do nothing.
pub struct Completion<H: Host> {
    shared: Rc<RefCell<CompletionState<H>>>,
}

impl<H: Host> Clone for Completion<H> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<H: Host> fmt::Debug for Completion<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.borrow();
        f.debug_struct("Completion")
            .field("node", &state.node)
            .field("done", &state.done)
            .finish()
    }
}

impl<H: Host> Completion<H> {
    pub fn node(&self) -> H::Node {
        self.shared.borrow().node
    }

    pub fn is_finished(&self) -> bool {
        self.shared.borrow().done
    }

    /// Resolve the completion
    ///
    /// Returns `false` if it had already resolved.
    pub fn finish(&self, host: &mut H) -> bool {
        let (node, classes, on_finish, waker) = {
            let mut state = self.shared.borrow_mut();
            if state.done {
                return false;
            }
            state.done = true;
            (
                state.node,
                std::mem::take(&mut state.classes),
                state.on_finish.take(),
                state.waker.take(),
            )
        };

        for class in &classes {
            host.remove_class(node, class);
        }

        tracing::trace!(?node, "animation finished");

        if let Some(on_finish) = on_finish {
            on_finish(host, node);
        }
        if let Some(waker) = waker {
            waker.wake();
        }
        true
    }
}

impl<H: Host> Future for Completion<H> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.shared.borrow_mut();
        if state.done {
            Poll::Ready(())
        } else {
            state.waker = Some(cx.waker().clone());
            Poll::Pending
        }
    }
}
