//! Document sessions: one open document, scoped work, and change notification.
//!
//! Editing surfaces are single-threaded, so sessions are `Rc`-shared and
//! edited through `RefCell`. Work that outlives an event (uploads) holds a
//! [`WeakSession`] and re-checks liveness before touching the document.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::document::EditorDocument;

/// Number assigned to each session a registry opens, increasing by one per open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

type ChangeListener = Box<dyn FnMut(&str)>;

struct SessionInner<D> {
    generation: Generation,
    live: Cell<bool>,
    doc: RefCell<D>,
    listeners: RefCell<Vec<ChangeListener>>,
    /// Texts waiting to be delivered, in edit order.
    queued: RefCell<VecDeque<String>>,
    notifying: Cell<bool>,
}

/// Handle to an open document.
pub struct DocumentSession<D> {
    inner: Rc<SessionInner<D>>,
}

impl<D> Clone for DocumentSession<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<D> fmt::Debug for DocumentSession<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentSession")
            .field("generation", &self.inner.generation)
            .field("live", &self.inner.live.get())
            .finish_non_exhaustive()
    }
}

impl<D: EditorDocument> DocumentSession<D> {
    /// A session outside any registry, with generation 0.
    pub fn standalone(doc: D) -> Self {
        Self::with_generation(doc, Generation(0))
    }

    fn with_generation(doc: D, generation: Generation) -> Self {
        Self {
            inner: Rc::new(SessionInner {
                generation,
                live: Cell::new(true),
                doc: RefCell::new(doc),
                listeners: RefCell::new(Vec::new()),
                queued: RefCell::new(VecDeque::new()),
                notifying: Cell::new(false),
            }),
        }
    }

    pub fn generation(&self) -> Generation {
        self.inner.generation
    }

    pub fn is_live(&self) -> bool {
        self.inner.live.get()
    }

    /// Mark the document discarded. Pending work against it will be dropped.
    pub fn close(&self) {
        if self.inner.live.replace(false) {
            tracing::debug!(generation = %self.inner.generation, "document session closed");
        }
    }

    pub fn downgrade(&self) -> WeakSession<D> {
        WeakSession {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Register a listener that receives the full text after every change.
    pub fn on_change(&self, listener: impl FnMut(&str) + 'static) {
        self.inner.listeners.borrow_mut().push(Box::new(listener));
    }

    /// Read the document.
    pub fn read<R>(&self, f: impl FnOnce(&D) -> R) -> R {
        f(&self.inner.doc.borrow())
    }

    /// Mutate the document, then notify listeners if its text changed.
    ///
    /// Listeners run after the document borrow is released, so they may read
    /// or edit the session.
    pub fn edit<R>(&self, f: impl FnOnce(&mut D) -> R) -> R {
        let (result, changed) = {
            let mut doc = self.inner.doc.borrow_mut();
            let before = doc.revision();
            let result = f(&mut doc);
            let changed = (doc.revision() != before).then(|| doc.content_string());
            (result, changed)
        };
        if let Some(text) = changed {
            self.notify(text);
        }
        result
    }

    pub fn text(&self) -> String {
        self.read(|doc| doc.content_string())
    }

    /// Deliver `text` to every listener.
    ///
    /// Edits made by a listener are queued and delivered, to all listeners,
    /// once the current round finishes.
    fn notify(&self, text: String) {
        self.inner.queued.borrow_mut().push_back(text);
        if self.inner.notifying.replace(true) {
            return;
        }

        loop {
            let Some(text) = self.inner.queued.borrow_mut().pop_front() else {
                break;
            };
            let mut listeners = std::mem::take(&mut *self.inner.listeners.borrow_mut());
            for listener in listeners.iter_mut() {
                listener(&text);
            }
            // Keep any listeners registered while we were calling out.
            let mut slot = self.inner.listeners.borrow_mut();
            listeners.append(&mut slot);
            *slot = listeners;
        }
        self.inner.notifying.set(false);
    }
}

/// Non-owning handle to a session, captured by work that spans an await.
pub struct WeakSession<D> {
    inner: Weak<SessionInner<D>>,
}

impl<D> Clone for WeakSession<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<D> WeakSession<D> {
    /// The session, if it still exists and has not been closed.
    pub fn upgrade(&self) -> Option<DocumentSession<D>> {
        let inner = self.inner.upgrade()?;
        inner.live.get().then_some(DocumentSession { inner })
    }
}

/// Opens sessions for an editing surface. At most one is current.
pub struct SessionRegistry<D> {
    last_generation: Cell<u64>,
    current: RefCell<Option<DocumentSession<D>>>,
}

impl<D> Default for SessionRegistry<D> {
    fn default() -> Self {
        Self {
            last_generation: Cell::new(0),
            current: RefCell::new(None),
        }
    }
}

impl<D: EditorDocument> SessionRegistry<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `doc` as the current session, closing the previous one.
    pub fn open(&self, doc: D) -> DocumentSession<D> {
        let generation = Generation(self.last_generation.get() + 1);
        self.last_generation.set(generation.0);

        let session = DocumentSession::with_generation(doc, generation);
        if let Some(previous) = self.current.replace(Some(session.clone())) {
            previous.close();
        }
        tracing::debug!(%generation, "document session opened");
        session
    }

    pub fn current(&self) -> Option<DocumentSession<D>> {
        self.current.borrow().clone()
    }

    /// Close the current session, if any.
    pub fn close_current(&self) {
        if let Some(session) = self.current.take() {
            session.close();
        }
    }
}
