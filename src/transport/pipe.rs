/*!
 * Command Pipe
 * One-directional byte channel from the commander to the process manager
 */

use crate::core::errors::TransportError;
use crate::core::limits::COMMAND_PIPE_CAPACITY;

/// Create a connected sender/receiver pair
pub fn pipe() -> (CommandSender, CommandReceiver) {
    let (tx, rx) = flume::bounded(COMMAND_PIPE_CAPACITY);
    (CommandSender { tx }, CommandReceiver { rx })
}

/// Write end of the command pipe
#[derive(Clone)]
pub struct CommandSender {
    tx: flume::Sender<u8>,
}

impl CommandSender {
    /// Send one byte, blocking while the pipe is full
    pub fn send(&self, byte: u8) -> Result<(), TransportError> {
        self.tx.send(byte).map_err(|_| TransportError::Closed)
    }

    pub async fn send_async(&self, byte: u8) -> Result<(), TransportError> {
        self.tx
            .send_async(byte)
            .await
            .map_err(|_| TransportError::Closed)
    }
}

/// Read end of the command pipe
pub struct CommandReceiver {
    rx: flume::Receiver<u8>,
}

impl CommandReceiver {
    /// Receive one byte, or `None` once every sender is gone
    pub fn recv(&self) -> Option<u8> {
        self.rx.recv().ok()
    }
}
