use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;

/// How many audio frames the ingress queue holds before dropping.
/// Generous enough to absorb capture bursts without unbounded growth.
pub const AUDIO_QUEUE_CAPACITY: usize = 100;

/// Producer half of the bounded queue between the connection reader and
/// the upstream audio sender.
///
/// The backpressure policy favors latency over completeness: when audio
/// capture outpaces the recognition send loop, frames are dropped rather
/// than stalling the client connection. Dropping the queue (or calling
/// [`close`](Self::close)) signals the consumer that no more audio will
/// arrive.
pub struct AudioIngressQueue {
    tx: mpsc::Sender<Vec<u8>>,
}

impl AudioIngressQueue {
    pub fn new() -> (Self, mpsc::Receiver<Vec<u8>>) {
        let (tx, rx) = mpsc::channel(AUDIO_QUEUE_CAPACITY);
        (Self { tx }, rx)
    }

    /// Non-blocking enqueue. Returns `false` and discards the frame when
    /// the queue is full or already closed.
    pub fn push(&self, frame: Vec<u8>) -> bool {
        match self.tx.try_send(frame) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => false,
            Err(TrySendError::Closed(_)) => {
                debug!("audio queue consumer gone, discarding frame");
                false
            }
        }
    }

    /// Close the queue. The consumer observes closure as `None` after the
    /// remaining frames drain.
    pub fn close(self) {}
}
