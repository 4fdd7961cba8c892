//! Jarvis Server CLI
//!
//! Starts the HTTP server for entity extraction.

use jarvis_server::{build_state, config::ServerConfig, init_tracing, serve, ServerError};
use std::env;
use std::process;

/// Environment variable naming the config file when `--config` is absent
const CONFIG_ENV: &str = "JARVIS_CONFIG";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ServerError> {
    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();

    let config_path = if args.len() > 2 && args[1] == "--config" {
        args[2].clone()
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else if let Ok(path) = env::var(CONFIG_ENV) {
        path
    } else {
        eprintln!("Usage: jarvis-server --config <path-to-config.toml>");
        return Err(ServerError::Config(
            jarvis_server::config::ConfigError::MissingField("--config".to_string()),
        ));
    };

    let config = ServerConfig::from_file(&config_path)?;

    init_tracing();

    // The LLM client blocks, so build it before entering the runtime
    let state = build_state(&config)?;

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| ServerError::Server(format!("Failed to start runtime: {}", e)))?;

    runtime.block_on(serve(config, state))
}

fn print_help() {
    println!("Jarvis Server - LLM-backed entity extraction");
    println!();
    println!("USAGE:");
    println!("    jarvis-server --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    JARVIS_CONFIG         Config file path when --config is not given");
    println!("    JARVIS_LLM_API_KEY    Overrides llm.api_key");
    println!("    RUST_LOG              Log filter (default: info)");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file should contain:");
    println!("    - bind_address / bind_port: where to listen (default 127.0.0.1:8080)");
    println!("    - [llm]: endpoint, api_key, model, api_version, request_timeout_secs");
    println!("    - [extractor]: optional function_name and function_description");
    println!("    - [cases.<UseCase>]: allowed_fields and required_fields");
    println!();
}
