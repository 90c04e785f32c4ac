//! Progress ticker
//!
//! Prints a dot at a fixed interval while a long search runs. The timer
//! waits on a channel, so `stop` returns as soon as the worker notices the
//! sender is gone rather than after a full interval.

use std::io::Write;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub struct ProgressTicker {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<usize>>,
}

impl ProgressTicker {
    /// Dots on stdout every `interval`.
    pub fn start(interval: Duration) -> Self {
        Self::start_with(interval, std::io::stdout)
    }

    /// Dots on a writer produced by `make_writer` for each tick.
    pub fn start_with<W, F>(interval: Duration, make_writer: F) -> Self
    where
        W: Write,
        F: Fn() -> W + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            let mut ticks = 0;
            while let Err(RecvTimeoutError::Timeout) = stop_rx.recv_timeout(interval) {
                let mut out = make_writer();
                let _ = out.write_all(b".");
                let _ = out.flush();
                ticks += 1;
            }
            ticks
        });

        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// Cancel the timer and wait for the worker. Returns the number of ticks.
    ///
    /// No tick is written after this returns.
    pub fn stop(mut self) -> usize {
        self.shutdown()
    }

    fn shutdown(&mut self) -> usize {
        drop(self.stop_tx.take());
        self.handle
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or(0)
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_ticks_while_running() {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let ticker = ProgressTicker::start_with(Duration::from_millis(20), move || writer.clone());
        thread::sleep(Duration::from_millis(150));
        let ticks = ticker.stop();

        let written = buf.0.lock().unwrap().clone();
        assert!(ticks >= 1, "expected ticks, got {}", ticks);
        assert_eq!(written.len(), ticks);
        assert!(written.iter().all(|&b| b == b'.'));
    }

    #[test]
    fn test_no_ticks_after_stop() {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let ticker = ProgressTicker::start_with(Duration::from_millis(10), move || writer.clone());
        thread::sleep(Duration::from_millis(50));
        ticker.stop();

        let after_stop = buf.0.lock().unwrap().len();
        thread::sleep(Duration::from_millis(50));
        assert_eq!(buf.0.lock().unwrap().len(), after_stop);
    }

    #[test]
    fn test_stop_does_not_wait_for_interval() {
        let ticker = ProgressTicker::start_with(Duration::from_secs(30), std::io::sink);
        let started = Instant::now();
        assert_eq!(ticker.stop(), 0);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_drop_stops_ticker() {
        let buf = SharedBuf::default();
        {
            let writer = buf.clone();
            let _ticker = ProgressTicker::start_with(Duration::from_millis(10), move || writer.clone());
            thread::sleep(Duration::from_millis(30));
        }
        let after_drop = buf.0.lock().unwrap().len();
        thread::sleep(Duration::from_millis(40));
        assert_eq!(buf.0.lock().unwrap().len(), after_drop);
    }
}
