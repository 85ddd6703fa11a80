use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trip_search_mcp::config::{find_config_file, load_config, Config};
use trip_search_mcp::mcp::server::McpServer;
use trip_search_mcp::models::{FlightQuery, TrainQuery};
use trip_search_mcp::sources::SourceRegistry;
use trip_search_mcp::utils::{render_flight_section, render_train_section};

/// Trip Search MCP - Search flights and train tickets on Chinese travel sites
#[derive(Parser, Debug)]
#[command(name = "trip-search-mcp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search flights and train tickets on Chinese travel sites", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search one-way flights between two cities
    #[command(alias = "f")]
    Flight {
        /// Departure city name, e.g. 上海
        from: String,

        /// Arrival city name, e.g. 北京
        to: String,

        /// Departure date (YYYY-MM-DD)
        date: String,

        /// Query a single source instead of all flight sources
        #[arg(long, short)]
        source: Option<String>,
    },

    /// Search train tickets between two stations
    #[command(alias = "t")]
    Train {
        /// Departure station or city name, e.g. 北京
        from: String,

        /// Arrival station or city name, e.g. 上海
        to: String,

        /// Departure date (YYYY-MM-DD)
        date: String,

        /// Query a specific source (default: 12306)
        #[arg(long, short)]
        source: Option<String>,
    },

    /// List available sources and their capabilities
    #[command(alias = "ls")]
    Sources {
        /// Show detailed information about each source
        #[arg(long, short)]
        detailed: bool,
    },

    /// Run the MCP server (for Claude Desktop and other MCP clients)
    Serve {
        /// Run in stdio mode (for MCP clients like Claude Desktop)
        #[arg(long, default_value_t = true)]
        stdio: bool,

        /// Run in HTTP/SSE mode (overrides --stdio)
        #[arg(long)]
        http: bool,

        /// Port for HTTP mode
        #[arg(long, short, default_value_t = 3001)]
        port: u16,

        /// Host to bind to for HTTP mode
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("trip_search_mcp={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from file if specified or found in default locations
    let config = if let Some(config_path) = &cli.config {
        load_config(config_path)?
    } else if let Some(config_path) = find_config_file() {
        tracing::info!("Using config file: {}", config_path.display());
        load_config(&config_path)?
    } else {
        Config::default()
    };

    let registry = SourceRegistry::new(&config);

    match cli.command {
        Some(Commands::Flight {
            from,
            to,
            date,
            source,
        }) => {
            let query = FlightQuery::new(&from, &to, &date);
            query.validate()?;

            let sources = match source {
                Some(id) => vec![registry.get_required(&id)?],
                None => registry.flight_sources(),
            };

            for src in sources {
                match src.search_flights(&query).await {
                    Ok(result) => {
                        println!("{}\n", render_flight_section(src.name(), &result));
                    }
                    Err(e) => {
                        if !cli.quiet {
                            eprintln!("Error searching {}: {}", src.id(), e);
                        }
                    }
                }
            }
        }

        Some(Commands::Train {
            from,
            to,
            date,
            source,
        }) => {
            let query = TrainQuery::new(&from, &to, &date);
            query.validate()?;

            let src = match source {
                Some(id) => registry.get_required(&id)?,
                None => registry
                    .preferred_train_source()
                    .ok_or_else(|| anyhow::anyhow!("No train search sources available"))?,
            };

            let result = src.search_trains(&query).await?;
            println!("{}", render_train_section(src.name(), &result));
        }

        Some(Commands::Sources { detailed }) => {
            let mut sources: Vec<_> = registry.all().collect();
            sources.sort_by_key(|s| s.id().to_string());

            for src in sources {
                if detailed {
                    println!("{} ({})", src.name(), src.id());
                    println!("  Capabilities: {:?}", src.capabilities());
                } else {
                    println!("{} - {}", src.id(), src.name());
                }
            }
        }

        Some(Commands::Serve {
            stdio,
            http,
            port,
            host,
        }) => {
            let server = McpServer::new(Arc::new(registry))?;

            // Use HTTP mode if --http flag is provided, otherwise use --stdio flag
            let use_http = http || !stdio;

            if use_http {
                let addr = format!("{}:{}", host, port);
                tracing::info!("Running MCP server in HTTP/SSE mode on {}", addr);
                let (bound_addr, handle) = server.run_http(&addr).await?;
                tracing::info!("MCP server listening on {}", bound_addr);

                handle
                    .await
                    .map_err(|e| anyhow::anyhow!("Server task failed: {}", e))?;
            } else {
                tracing::info!("Running MCP server in stdio mode");
                server.run().await?;
            }
        }

        None => {
            println!("No command provided. Use --help for usage information.");
            println!("Common commands:");
            println!("  flight <from> <to> <date>  - Search one-way flights");
            println!("  train <from> <to> <date>   - Search train tickets");
            println!("  sources                    - List available sources");
            println!("  serve                      - Run MCP server");
        }
    }

    Ok(())
}
