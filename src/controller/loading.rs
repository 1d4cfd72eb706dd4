use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Debug, Default)]
struct OverlayInner {
    next_token: u64,
    // (token, message) for every call still in flight, oldest first
    active: Vec<(u64, String)>,
}

/// Loading overlay driven by the number of in-flight requests. Visible while
/// at least one [`LoadingGuard`] is alive; shows the newest message.
#[derive(Debug, Clone, Default)]
pub struct LoadingOverlay {
    inner: Arc<Mutex<OverlayInner>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlaySnapshot {
    pub visible: bool,
    pub in_flight: usize,
    pub message: Option<String>,
}

impl LoadingOverlay {
    pub fn begin(&self, message: impl Into<String>) -> LoadingGuard {
        let mut inner = self.inner.lock();
        let token = inner.next_token;
        inner.next_token += 1;
        inner.active.push((token, message.into()));
        LoadingGuard {
            overlay: self.clone(),
            token,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.inner.lock().active.len()
    }

    pub fn is_visible(&self) -> bool {
        self.in_flight() > 0
    }

    pub fn snapshot(&self) -> OverlaySnapshot {
        let inner = self.inner.lock();
        OverlaySnapshot {
            visible: !inner.active.is_empty(),
            in_flight: inner.active.len(),
            message: inner.active.last().map(|(_, m)| m.clone()),
        }
    }

    fn finish(&self, token: u64) {
        self.inner.lock().active.retain(|(t, _)| *t != token);
    }
}

/// Ends its call on drop, whichever way the call went.
#[derive(Debug)]
pub struct LoadingGuard {
    overlay: LoadingOverlay,
    token: u64,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.overlay.finish(self.token);
    }
}
