//! userdao binary: registers the demo user and reads it back.

use std::process::ExitCode;

use userdao_cli::{init_tracing, load_config, resolve_config_path, run_demo};

fn main() -> ExitCode {
    let (config_path, config_source) = resolve_config_path(
        std::env::args().nth(1),
        std::env::var("USERDAO_CONFIG_PATH").ok(),
    );

    let config = match load_config(Some(&config_path)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging);

    tracing::info!(
        source = config_source,
        path = %config_path,
        url = %config.database.url,
        "resolved startup configuration"
    );

    match run_demo(&config.database) {
        Ok(user) => {
            println!("{} registered successfully", user.id);
            println!("{}.name = {}", user.id, user.name);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "demo failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
