//! controller-dispatch server and tooling.
//!
//! ```text
//! controller-dispatch [--config FILE] serve
//! controller-dispatch [--config FILE] url --controller users --action show --param 7
//! controller-dispatch [--config FILE] resolve /de/users/show/7 --method GET
//! ```

mod site;

use std::path::PathBuf;

use axum::http::Method;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use controller_dispatch::config::AppConfig;
use controller_dispatch::dispatch::{Miss, Outcome};
use controller_dispatch::lifecycle::{signals, startup, Shutdown};
use controller_dispatch::observability::{logging, metrics};
use controller_dispatch::registry::{ControllerRegistry, DirectoryProvider, StaticControllers};
use controller_dispatch::{Dispatcher, HttpServer, UrlBuilder, UrlSpec};

#[derive(Parser)]
#[command(name = "controller-dispatch")]
#[command(about = "Convention-based controller/action dispatcher", long_about = None)]
struct Cli {
    /// Configuration file (TOML). Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the controllers over HTTP (the default)
    Serve,
    /// Print the URL for a controller action
    Url {
        #[arg(long)]
        controller: Option<String>,
        #[arg(long)]
        action: Option<String>,
        /// Positional parameter, repeatable
        #[arg(long = "param")]
        params: Vec<String>,
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        base: Option<String>,
        /// Leave off the configured path suffix
        #[arg(long)]
        no_suffix: bool,
    },
    /// Show how a request path would be dispatched
    Resolve {
        path: String,
        #[arg(short, long, default_value = "GET")]
        method: String,
        /// Value of the language cookie
        #[arg(long)]
        cookie: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = startup::load_app_config(cli.config.as_deref())?;
    logging::init_logging(&config.observability);
    startup::report_config(cli.config.as_deref(), &config);

    let registry = build_registry(&config);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config, registry).await?,
        Commands::Url {
            controller,
            action,
            params,
            language,
            base,
            no_suffix,
        } => {
            let mut spec = UrlSpec::new().params(params).suffix(!no_suffix);
            if let Some(controller) = controller {
                spec = spec.controller(controller);
            }
            if let Some(action) = action {
                spec = spec.action(action);
            }
            if let Some(language) = language {
                spec = spec.language(language);
            }
            if let Some(base) = base {
                spec = spec.base(base);
            }
            println!("{}", UrlBuilder::new(config).build(&spec));
        }
        Commands::Resolve {
            path,
            method,
            cookie,
        } => {
            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;
            let resolution =
                Dispatcher::new(config, registry).resolve(&method, &path, cookie.as_deref());

            if let Some(language) = &resolution.language {
                println!("language:   {} ({:?})", language.code, language.source);
            }
            match &resolution.outcome {
                Outcome::Found(found) => {
                    println!("controller: {}", found.controller.name());
                    println!("action:     {}", found.action);
                    println!("params:     {:?}", found.params);
                }
                Outcome::Missed(Miss::Controller(name)) => {
                    println!("unhandled:  no controller '{}'", name);
                }
                Outcome::Missed(Miss::Action { controller, action }) => {
                    println!("unhandled:  controller '{}' has no action '{}'", controller, action);
                }
            }
        }
    }

    Ok(())
}

/// Controllers come from unit files in the configured directory; an empty
/// directory setting enables every built-in controller.
fn build_registry(config: &AppConfig) -> ControllerRegistry {
    let injected = std::sync::Arc::new(config.dispatch.injected.clone());
    let directory = &config.dispatch.controller_directory;

    if directory.is_empty() {
        let provider: StaticControllers = site::controllers().into_iter().collect();
        return ControllerRegistry::build(&provider, injected);
    }

    let provider = site::controllers()
        .into_iter()
        .fold(DirectoryProvider::new(directory), DirectoryProvider::with);
    ControllerRegistry::build(&provider, injected)
}

async fn serve(
    config: std::sync::Arc<AppConfig>,
    registry: ControllerRegistry,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("controller-dispatch v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        request_timeout_secs = config.timeouts.request_secs,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_ctrl_c(shutdown.clone()));

    let server = HttpServer::new(config, registry);
    server.run(listener, shutdown).await?;

    Ok(())
}
