//! The server takes no command line arguments. Passing any prints a help text and the current configuration instead of
//! starting the server.
use std::env;

const HELP: &str = include_str!("./cli-help.txt");

/// Printed on request. `MCS_IDENTITY_SECRET` must never appear here.
const SHOWN_VARS: [&str; 9] = [
    "RUST_LOG",
    "MCS_HOST",
    "MCS_PORT",
    "MCS_DATABASE_URL",
    "MCS_MAX_DB_CONNECTIONS",
    "MCS_AUTO_MIGRATE",
    "MCS_USER_ID_HEADER",
    "MCS_IDENTITY_SIGNATURE_HEADER",
    "MCS_IDENTITY_CHECKS",
];

/// Returns true if help was printed, in which case the caller should exit.
pub fn handle_command_line_args() -> bool {
    if env::args_os().len() <= 1 {
        return false;
    }
    println!("\n{HELP}\n");
    println!("Configuration from the environment (secrets are not shown):");
    for line in env_summary() {
        println!("  {line}");
    }
    true
}

fn env_summary() -> Vec<String> {
    SHOWN_VARS
        .iter()
        .map(|name| {
            let value = env::var_os(name)
                .map(|v| v.to_string_lossy().into_owned())
                .unwrap_or_else(|| "(not set)".to_string());
            format!("{name:<32} {value}")
        })
        .collect()
}
