use anyhow::Result;
use axum::Router;
use clap::{Parser, Subcommand};
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};
use server::{build_app, open_engine, run_console};
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "server")]
#[command(about = "Query a tf/idf index interactively or over HTTP")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read queries from stdin until an empty line
    Console {
        /// Collection prefix; <prefix>.tf/.idf are built from <prefix>.xml if missing
        collection: PathBuf,
    },
    /// Serve GET /search over HTTP
    Serve {
        /// Collection prefix; <prefix>.tf/.idf are built from <prefix>.xml if missing
        collection: PathBuf,
        /// Host to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        /// Port to bind
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    match args.command {
        Command::Console { collection } => {
            println!("Reading index from file...");
            let engine = open_engine(&collection)?;
            println!("Done.");
            run_console(&engine, io::stdin().lock(), io::stdout().lock())
        }
        Command::Serve { collection, host, port } => {
            let engine = Arc::new(open_engine(&collection)?);
            serve(engine, &host, port)
        }
    }
}

#[tokio::main]
async fn serve(engine: Arc<search_core::QueryEngine>, host: &str, port: u16) -> Result<()> {
    let app: Router = build_app(engine);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
