//! Headless test run execution.

use crate::command::TestCommand;
use crate::error::{AutomationError, Result};
use crate::interpreter::{LogInterpreter, RunEvent, RunSummary};
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

/// Runs a [`TestCommand`] and interprets its output as it arrives.
pub struct AutomationRunner;

impl AutomationRunner {
    /// Launch the command and feed every output line, from either stream,
    /// through a [`LogInterpreter`].
    ///
    /// `on_line` sees each event with the raw line it came from, in the
    /// order lines were read. Returns once the child has exited and both
    /// streams are drained.
    pub async fn run<F>(command: &TestCommand, mut on_line: F) -> Result<RunSummary>
    where
        F: FnMut(&RunEvent, &str),
    {
        let start = Instant::now();
        info!(
            program = %command.program.display(),
            filter = %command.filter,
            "launching automation run"
        );

        let mut child = Command::new(&command.program)
            .args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| AutomationError::Launch {
                program: command.program.clone(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AutomationError::Io(std::io::Error::other("stdout not captured")))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| AutomationError::Io(std::io::Error::other("stderr not captured")))?;

        let mut interpreter = LogInterpreter::new(command.filter.clone());
        let mut out = LineStream::new(stdout);
        let mut err = LineStream::new(stderr);

        while !(out.done && err.done) {
            let line = tokio::select! {
                line = out.next_line(), if !out.done => line?,
                line = err.next_line(), if !err.done => line?,
            };
            if let Some(line) = line {
                let event = interpreter.observe(&line);
                on_line(&event, &line);
            }
        }

        let status = child.wait().await?;
        let exit_code = status.code().unwrap_or(-1);
        let summary = interpreter.finish(exit_code);

        info!(
            exit_code,
            outcome = ?summary.outcome,
            duration_ms = start.elapsed().as_millis() as u64,
            "automation run finished"
        );
        Ok(summary)
    }
}

/// One output stream split into lines.
///
/// The partial line survives a cancelled read, so this can sit in a
/// `select!` next to another stream.
struct LineStream<R> {
    reader: BufReader<R>,
    buf: Vec<u8>,
    done: bool,
}

impl<R: AsyncRead + Unpin> LineStream<R> {
    fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
            buf: Vec::new(),
            done: false,
        }
    }

    /// Next complete line, the unterminated tail at EOF, or `None` once
    /// the stream is exhausted.
    async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        let read = self.reader.read_until(b'\n', &mut self.buf).await?;
        if read == 0 {
            self.done = true;
            if self.buf.is_empty() {
                debug!("output stream closed");
                return Ok(None);
            }
        }
        let line = decode_line(&self.buf);
        self.buf.clear();
        Ok(Some(line))
    }
}

fn decode_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(['\r', '\n'])
        .to_string()
}
