// This file is part of Docket.
// SPDX-License-Identifier: AGPL-3.0-or-later

use actix_web::rt::System;
use actix_web::{App, HttpServer, middleware::Logger, web};
use log::{LevelFilter, info};
use std::io::Write;
use std::sync::Arc;

use docket::app_state::AppState;
use docket::bootstrap;
use docket::config::ValidatedConfig;
use docket::runtime_paths::RuntimePaths;
use docket::{login, public};

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let parsed_args = match parse_args() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("❌ Invalid command line arguments: {}", error);
            eprintln!("❌ Use -C <root> to set the runtime directory.");
            return 1;
        }
    };

    if parsed_args.show_help {
        print!("{}", help_text());
        return 0;
    }

    let bootstrap = match bootstrap::bootstrap_runtime(&parsed_args.runtime_root) {
        Ok(result) => result,
        Err(error) => {
            eprintln!("❌ Bootstrap error: {}", error);
            eprintln!("❌ Application cannot start with invalid configuration.");
            return 1;
        }
    };

    if bootstrap.created_config || bootstrap.created_users {
        let mut created = Vec::new();
        if bootstrap.created_config {
            created.push("config.yaml");
        }
        if bootstrap.created_users {
            created.push("users.yaml");
        }
        eprintln!("[bootstrap] created {}", created.join(" and "));
    }

    match System::new().block_on(run_server(bootstrap)) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("❌ Server failed to start: {}", error);
            1
        }
    }
}

async fn run_server(bootstrap: bootstrap::BootstrapResult) -> std::io::Result<()> {
    let validated_config = Arc::new(bootstrap.validated_config);
    let runtime_paths = bootstrap.runtime_paths;

    init_logging(&validated_config);
    log_startup_info(&validated_config, &runtime_paths);

    let host = validated_config.server.host.clone();
    let port = validated_config.server.port;
    let workers = validated_config.server.workers;
    let upload_limit = validated_config.upload.max_image_size_bytes();

    let app_state = Arc::new(AppState::new(
        validated_config.clone(),
        runtime_paths.clone(),
    ));
    info!(
        "✅ App state initialized with app name: {}",
        validated_config.app.name
    );

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let runtime_paths = runtime_paths.clone();
        App::new()
            .app_data(web::Data::from(app_state))
            .app_data(web::PayloadConfig::new(upload_limit))
            // Document edits arrive as form posts; the default form limit
            // is too small for a large document body.
            .app_data(web::FormConfig::default().limit(1024 * 1024))
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T"#,
            ))
            .configure(login::configure)
            .configure(move |cfg| public::configure(cfg, &runtime_paths))
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

fn init_logging(config: &ValidatedConfig) {
    let log_level: LevelFilter = config.log_level();
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

fn log_startup_info(config: &ValidatedConfig, runtime_paths: &RuntimePaths) {
    info!("Starting {} - {}", config.app.name, config.app.description);
    info!("Workers: {}", config.server.workers);
    info!(
        "Listening on http://{}:{}",
        config.server.host, config.server.port
    );
    info!(
        "Documents directory (canonical): {}",
        runtime_paths.documents_dir.display()
    );
    info!(
        "Images directory (canonical): {}",
        runtime_paths.images_dir.display()
    );
    info!("Config file: {}", runtime_paths.config_file.display());
    info!("Users file: {}", runtime_paths.users_file.display());
    info!("Runtime root: {}", runtime_paths.root.display());

    if let Ok(current_dir) = std::env::current_dir() {
        info!("Working directory: {}", current_dir.display());
    }
}

fn help_text() -> String {
    [
        "docket - flat-file document CMS",
        "",
        "Usage: docket [-C <root>]",
        "",
        "  -C <root>    Runtime directory (default: current directory)",
        "  -h, --help   Show this help",
        "",
    ]
    .join("\n")
}

struct ParsedArgs {
    runtime_root: std::path::PathBuf,
    show_help: bool,
}

fn parse_args() -> Result<ParsedArgs, String> {
    parse_args_from(std::env::args().skip(1))
}

fn parse_args_from<I>(args: I) -> Result<ParsedArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        return Ok(ParsedArgs {
            runtime_root: std::path::PathBuf::from("."),
            show_help: true,
        });
    }

    let mut args = args.into_iter();
    let mut runtime_root = std::path::PathBuf::from(".");

    while let Some(arg) = args.next() {
        if arg == "-C" {
            let value = args
                .next()
                .ok_or_else(|| "Missing value for -C".to_string())?;
            runtime_root = std::path::PathBuf::from(value);
        } else {
            return Err(format!("Unknown argument '{}'", arg));
        }
    }

    let runtime_root = make_runtime_root_absolute(runtime_root)?;
    Ok(ParsedArgs {
        runtime_root,
        show_help: false,
    })
}

fn make_runtime_root_absolute(
    runtime_root: std::path::PathBuf,
) -> Result<std::path::PathBuf, String> {
    if runtime_root.is_absolute() {
        return Ok(runtime_root);
    }

    let current_dir = std::env::current_dir()
        .map_err(|error| format!("Failed to resolve current directory: {}", error))?;
    Ok(current_dir.join(runtime_root))
}
