//! Register endpoint command.

use std::path::Path;

use openwatt_core::{EndpointDraft, Scheme, register, test_connection};

use crate::error::CliError;
use crate::util::{build_transport, create_runtime, load_settings, open_store};

/// Parameters for the `add` command
pub struct AddParams<'a> {
    pub name: &'a str,
    pub host: &'a str,
    pub port: u16,
    pub https: bool,
    pub test: bool,
}

/// Add endpoint command handler
pub fn cmd_add(config_path: Option<&Path>, params: AddParams<'_>) -> Result<(), CliError> {
    let draft = EndpointDraft::new(params.name, params.host)
        .with_port(params.port)
        .with_scheme(Scheme::from_https(params.https));
    draft.validate()?;

    if params.test {
        let settings = load_settings(config_path)?;
        let transport = build_transport(&settings, None)?;
        let runtime = create_runtime()?;

        let target = draft.to_transient();
        println!("Testing {}...", target.base_url());
        runtime
            .block_on(test_connection(
                &transport,
                &target.host,
                target.port,
                target.scheme,
            ))
            .map_err(|e| CliError::TestFailed(e.to_string()))?;
        println!("Connection OK");
    }

    let store = open_store(config_path)?;
    let endpoint = register(&store, &draft)?;

    println!(
        "Added endpoint '{}' ({}) with ID {}",
        endpoint.name,
        endpoint.base_url(),
        endpoint.id
    );
    println!("Now using '{}'", endpoint.name);

    Ok(())
}
