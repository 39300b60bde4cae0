use std::time::Duration;

/// Waits out the device's settle window after a write.
pub trait Settle {
    fn settle(&mut self, duration: Duration);
}

/// Blocks the calling thread with [`std::thread::sleep`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadSleep;

impl Settle for ThreadSleep {
    fn settle(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

impl<S: Settle + ?Sized> Settle for &mut S {
    fn settle(&mut self, duration: Duration) {
        (**self).settle(duration);
    }
}
