// Copyright 2025 Alexandre D. Díaz
//! Prints a session token for an existing user.
//!
//! Usage: `issue-token <username> [short|long]`
use std::env;
use std::process::ExitCode;

use recordstore::models::user;
use recordstore::{DataError, RecordMapper};
use server::config::ServerConfig;
use sessiontoken::{Identity, TokenService, ValidityWindow};

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: {} <username> [short|long]", &args[0]);
        return ExitCode::from(2);
    }

    let config = match ServerConfig::new() {
        Ok(config) => config,
        Err(err) => {
            log::error!("can't read configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };
    let window = match args.get(2) {
        Some(raw) => match ValidityWindow::parse(raw) {
            Some(window) => window,
            None => {
                eprintln!("unknown validity window '{}'", raw);
                return ExitCode::from(2);
            }
        },
        None => config.get_token_window(),
    };

    let mapper = match RecordMapper::open(&config.store_config()) {
        Ok(mapper) => mapper,
        Err(err) => {
            log::error!("can't open the database: {}", err);
            return ExitCode::FAILURE;
        }
    };
    let found = user::get_by_username(&mapper, &args[1]);
    mapper.close();
    let found = match found {
        Ok(found) => found,
        Err(DataError::NotFound { .. }) => {
            eprintln!("no user named '{}'", &args[1]);
            return ExitCode::FAILURE;
        }
        Err(err) => {
            log::error!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    if !found.active {
        eprintln!("user '{}' is not active", &found.username);
        return ExitCode::FAILURE;
    }

    let tokens = TokenService::new(&config.token_config());
    let identity = Identity {
        id: found.id,
        name: found.username.clone(),
        level: found.level,
    };
    match tokens.issue(&identity, window) {
        Ok(token) => {
            println!("{}", token);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
