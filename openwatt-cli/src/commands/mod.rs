//! Command handler modules for the CLI.

mod add;
mod completions;
mod console;
mod delete;
mod exec;
mod list;
mod monitor;
mod select;
mod show;
mod update;

use std::path::Path;

use crate::cli::Commands;
use crate::error::CliError;
use crate::format::Palette;

/// Dispatch a CLI command to the appropriate handler.
pub fn dispatch(config_path: Option<&Path>, color: bool, command: Commands) -> Result<(), CliError> {
    let palette = Palette::new(color);
    match command {
        Commands::List { format } => list::cmd_list(config_path, format),
        Commands::Add {
            name,
            host,
            port,
            https,
            test,
        } => add::cmd_add(
            config_path,
            add::AddParams {
                name: &name,
                host: &host,
                port,
                https,
                test,
            },
        ),
        Commands::Update {
            name,
            new_name,
            host,
            port,
            https,
            http,
        } => update::cmd_update(
            config_path,
            update::UpdateParams {
                name: &name,
                new_name: new_name.as_deref(),
                host: host.as_deref(),
                port,
                https: (https || http).then_some(https),
            },
        ),
        Commands::Delete { name } => delete::cmd_delete(config_path, &name),
        Commands::Show { name } => show::cmd_show(config_path, &name),
        Commands::Use { name } => select::cmd_use(config_path, &name),
        Commands::Test { name, timeout } => {
            test::cmd_test(config_path, name.as_deref(), timeout, palette)
        }
        Commands::Exec { name, command } => exec::cmd_exec(config_path, name.as_deref(), &command),
        Commands::Console { name } => console::cmd_console(config_path, name.as_deref()),
        Commands::Monitor {
            name,
            interval,
            cycles,
        } => monitor::cmd_monitor(
            config_path,
            monitor::MonitorParams {
                name: name.as_deref(),
                interval,
                cycles,
            },
            palette,
        ),
        Commands::Completions { shell } => completions::cmd_completions(shell),
    }
}
