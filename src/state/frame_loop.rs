use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Source of display-frame callbacks.
pub trait FrameScheduler {
    type Handle;
    fn request(&self, callback: Box<dyn FnOnce(f64)>) -> Self::Handle;
}

pub struct BrowserFrames;

impl FrameScheduler for BrowserFrames {
    type Handle = gloo::render::AnimationFrame;

    fn request(&self, callback: Box<dyn FnOnce(f64)>) -> Self::Handle {
        gloo::render::request_animation_frame(callback)
    }
}

/// Per-frame draw callback that re-registers itself while the gate is open.
/// Each `start` bumps the generation so a callback queued before a stop never
/// revives an old chain next to the new one.
pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    draw: Box<dyn Fn(f64)>,
    running: Cell<bool>,
    generation: Cell<u64>,
    pending: RefCell<Option<S::Handle>>,
}

impl<S: FrameScheduler + 'static> FrameLoop<S> {
    pub fn new(scheduler: S, draw: impl Fn(f64) + 'static) -> Rc<Self> {
        Rc::new(Self {
            scheduler,
            draw: Box::new(draw),
            running: Cell::new(false),
            generation: Cell::new(0),
            pending: RefCell::new(None),
        })
    }

    pub fn start(self: &Rc<Self>) {
        if self.running.get() {
            return;
        }
        self.running.set(true);
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.schedule(generation);
    }

    pub fn stop(&self) {
        self.running.set(false);
        self.generation.set(self.generation.get() + 1);
        self.pending.borrow_mut().take();
    }

    /// One-off redraw outside the loop (first paint before any frame is scheduled).
    pub fn draw_now(&self, timestamp: f64) {
        (self.draw)(timestamp);
    }

    fn schedule(self: &Rc<Self>, generation: u64) {
        let this = Rc::clone(self);
        let handle = self.scheduler.request(Box::new(move |timestamp| {
            if !this.running.get() || this.generation.get() != generation {
                return;
            }
            this.pending.borrow_mut().take();
            (this.draw)(timestamp);
            this.schedule(generation);
        }));
        if self.running.get() && self.generation.get() == generation {
            *self.pending.borrow_mut() = Some(handle);
        }
    }
}
