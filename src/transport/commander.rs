/*!
 * Commander
 * Reads command characters from input and forwards them over the pipe
 */

use super::pipe::CommandSender;
use crate::command::Command;
use crate::core::errors::SimResult;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

const PROMPT: &[u8] = b"Enter Q, P, U or T\n$ ";

/// Forward every non-whitespace byte of `input` to the manager
///
/// Input is read as raw bytes, so undecodable bytes reach the manager and are
/// rejected there like any other unknown command. Stops after forwarding `T`,
/// at end of input, on a read error, or when the manager has closed its end of
/// the pipe. Dropping the sender on return closes the pipe.
pub async fn run_commander<R, W>(sender: CommandSender, mut input: R, mut prompt: W) -> SimResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = Vec::new();

    loop {
        prompt.write_all(PROMPT).await?;
        prompt.flush().await?;

        line.clear();
        match input.read_until(b'\n', &mut line).await {
            Ok(0) => {
                debug!("commander input exhausted");
                return Ok(());
            }
            Ok(_) => {}
            Err(error) => {
                warn!(error = %error, "commander input failed, closing pipe");
                return Ok(());
            }
        }

        for &byte in line.iter().filter(|b| !b.is_ascii_whitespace()) {
            if sender.send_async(byte).await.is_err() {
                debug!("process manager closed the pipe");
                return Ok(());
            }
            if byte == Command::Terminate.byte() {
                return Ok(());
            }
        }
    }
}
