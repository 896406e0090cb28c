/// "Pending flag" coalescing: any number of requests between two frames
/// collapse into a single scheduled recompute.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameGate {
    pending: bool,
}

impl FrameGate {
    /// Returns true only for the request that must actually schedule a frame.
    #[inline]
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Consume the pending request at frame time.
    #[inline]
    pub fn take(&mut self) -> bool {
        std::mem::replace(&mut self.pending, false)
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    #[inline]
    pub fn cancel(&mut self) {
        self.pending = false;
    }
}

/// Time-gated branch for work that must not run every frame.
#[derive(Clone, Copy, Debug)]
pub struct Throttle {
    interval_sec: f64,
    last_sec: Option<f64>,
}

impl Throttle {
    pub fn new(interval_sec: f64) -> Self {
        Self {
            interval_sec,
            last_sec: None,
        }
    }

    pub fn from_hz(hz: f64) -> Self {
        Self::new(if hz > 0.0 { 1.0 / hz } else { 0.0 })
    }

    /// True (and re-armed) when more than one interval has passed, or when
    /// `force` is set.
    pub fn ready(&mut self, now_sec: f64, force: bool) -> bool {
        let due = match self.last_sec {
            None => true,
            Some(last) => now_sec - last > self.interval_sec,
        };
        if due || force {
            self.last_sec = Some(now_sec);
            return true;
        }
        false
    }

    pub fn interval_sec(&self) -> f64 {
        self.interval_sec
    }
}
