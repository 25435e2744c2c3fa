// File: crates/chart-core/src/dimension.rs
// Summary: Container size tracking fed by a host-supplied resize source.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::types::{Size, DEFAULT_WIDTH};

pub type ResizeCallback = Box<dyn FnMut(Size)>;

/// Host capability that reports the size of one container element.
pub trait ResizeSource {
    fn observe(&mut self, callback: ResizeCallback);
}

/// Tracks the current container size. Starts at `DEFAULT_WIDTH x requested height`
/// so the first frame is never zero-sized.
#[derive(Debug)]
pub struct DimensionObserver {
    tx: Arc<watch::Sender<Size>>,
    rx: watch::Receiver<Size>,
}

impl DimensionObserver {
    pub fn new(requested_height: f32) -> Self {
        let (tx, rx) = watch::channel(Size::new(DEFAULT_WIDTH, requested_height));
        Self { tx: Arc::new(tx), rx }
    }

    /// Subscribe to a resize source. `None` (no container yet) does nothing.
    pub fn attach<S: ResizeSource + ?Sized>(&self, source: Option<&mut S>) {
        let Some(source) = source else { return };
        let tx = Arc::clone(&self.tx);
        source.observe(Box::new(move |size| {
            update(&tx, size);
        }));
    }

    /// Apply a measured size directly.
    pub fn set(&self, size: Size) -> bool {
        update(&self.tx, size)
    }

    pub fn size(&self) -> Size {
        *self.rx.borrow()
    }

    /// True once per distinct size change since the last call.
    pub fn changed(&mut self) -> bool {
        let changed = self.rx.has_changed().unwrap_or(false);
        if changed {
            let _ = self.rx.borrow_and_update();
        }
        changed
    }
}

fn update(tx: &watch::Sender<Size>, size: Size) -> bool {
    if !size.is_usable() {
        return false;
    }
    let changed = tx.send_if_modified(|current| {
        if *current == size {
            false
        } else {
            *current = size;
            true
        }
    });
    if changed {
        debug!(width = size.width, height = size.height, "container resized");
    }
    changed
}

/// Resize source driven by the host: every `resize` call fans out to the observers.
#[derive(Default)]
pub struct ResizeHub {
    callbacks: Vec<ResizeCallback>,
}

impl ResizeHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resize(&mut self, size: Size) {
        for cb in &mut self.callbacks {
            cb(size);
        }
    }
}

impl ResizeSource for ResizeHub {
    fn observe(&mut self, callback: ResizeCallback) {
        self.callbacks.push(callback);
    }
}
