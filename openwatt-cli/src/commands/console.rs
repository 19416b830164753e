//! Interactive console command.

use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;

use openwatt_core::{ConsoleSession, ConsoleState};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::TryRecvError;

use crate::error::CliError;
use crate::util::{build_transport, create_runtime, load_settings, open_store, resolve_target};

const QUIT: &[&str] = &[":quit", ":q", ":exit"];
const CLEAR: &str = ":clear";

/// `console` command handler
///
/// Reads one command per line from stdin until EOF or `:quit`.
pub fn cmd_console(config_path: Option<&Path>, name: Option<&str>) -> Result<(), CliError> {
    let store = open_store(config_path)?;
    let endpoint = resolve_target(&store, name)?;
    let settings = load_settings(config_path)?;
    let transport = Arc::new(build_transport(&settings, None)?);
    let runtime = create_runtime()?;

    runtime.block_on(async {
        let session = ConsoleSession::initialize(&store, transport, endpoint.id)?;
        let state = session.subscribe();
        let mut errors = session.subscribe_errors();
        let mut printed = 0;
        let mut failed = 0usize;

        print_new_chunks(&state.borrow(), &mut printed)?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let input = line.trim();
            if QUIT.contains(&input) {
                break;
            }
            if input == CLEAR {
                session.clear();
                printed = 0;
                continue;
            }

            if let Some(handle) = session.submit(&line)
                && let Err(e) = handle.await
            {
                tracing::error!(%e, "Console command task failed");
            }
            print_new_chunks(&state.borrow(), &mut printed)?;

            loop {
                match errors.try_recv() {
                    Ok(_) | Err(TryRecvError::Lagged(_)) => failed += 1,
                    Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                }
            }
        }

        session.close();
        if failed > 0 {
            eprintln!("{failed} command(s) failed during this session");
        }
        Ok::<(), CliError>(())
    })
}

/// Writes transcript chunks that have not been printed yet
fn print_new_chunks(state: &ConsoleState, printed: &mut usize) -> Result<(), CliError> {
    let chunks = state.transcript.chunks();
    if *printed > chunks.len() {
        *printed = 0;
    }

    let mut stdout = std::io::stdout().lock();
    for chunk in &chunks[*printed..] {
        stdout.write_all(chunk.as_bytes())?;
    }
    stdout.flush()?;
    *printed = chunks.len();
    Ok(())
}
