//! One-shot command execution.

use std::path::Path;

use openwatt_core::{CommandRequest, CommandTransport};

use crate::error::CliError;
use crate::util::{build_transport, create_runtime, load_settings, open_store, resolve_target};

/// `exec` command handler
///
/// Prints the device's output on stdout. A structured error reported by the
/// device is returned as `CliError::Command`.
pub fn cmd_exec(
    config_path: Option<&Path>,
    name: Option<&str>,
    command: &[String],
) -> Result<(), CliError> {
    let request = CommandRequest::new(&command.join(" "))
        .ok_or_else(|| CliError::Validation("command must not be empty".to_string()))?;

    let store = open_store(config_path)?;
    let endpoint = resolve_target(&store, name)?;
    let settings = load_settings(config_path)?;
    let transport = build_transport(&settings, None)?;
    let runtime = create_runtime()?;

    tracing::debug!(endpoint = %endpoint.name, command = %request.command, "Running one-shot command");
    let response = runtime.block_on(transport.execute(&endpoint, &request.command))?;

    if let Some(error) = response.error {
        return Err(CliError::Command(error));
    }

    if response.output.ends_with('\n') {
        print!("{}", response.output);
    } else {
        println!("{}", response.output);
    }
    if response.exit_code != 0 {
        tracing::info!(exit_code = response.exit_code, "Device reported non-zero exit code");
    }

    Ok(())
}
