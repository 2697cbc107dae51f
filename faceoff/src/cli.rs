use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report.
    HumanReadable,
    /// Emit the report as a single JSON document on stdout.
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "faceoff",
    author,
    version,
    about = "Compare two RPC transports under synthetic load",
    long_about = "faceoff drives the same query/mutation/streaming workload against a gRPC \
backend and an HTTP/JSON backend, and reports per-concurrency-level latency, throughput, \
error rate, and process resource usage.\n\nPoint it at running backends with --grpc-target \
and --http-url, or pass --embedded to benchmark the bundled reference backends.",
    after_help = "Examples:\n  faceoff run --embedded\n  faceoff run --grpc-target 127.0.0.1:50051 --http-url http://127.0.0.1:5000 --levels 1,5,10\n  faceoff run --embedded --stream-items 500 --output json\n  faceoff serve --embedded --bind 127.0.0.1:4600"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the comparison once and print the report
    Run(RunArgs),

    /// Host the benchmark control API (POST /api/run-benchmark, GET /api/results)
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
pub struct BackendArgs {
    /// gRPC backend target (host:port, or a full http:// url)
    #[arg(long, value_name = "HOST:PORT")]
    pub grpc_target: Option<String>,

    /// HTTP/JSON backend base url
    #[arg(long, value_name = "URL")]
    pub http_url: Option<String>,

    /// Start in-process reference backends and benchmark those
    #[arg(long)]
    pub embedded: bool,
}

#[derive(Debug, Args)]
pub struct BenchArgs {
    /// Concurrency levels in ascending order (e.g. 1,5,10,25,50,100)
    #[arg(long, value_delimiter = ',', value_name = "LEVELS")]
    pub levels: Option<Vec<u64>>,

    /// Items requested from each backend's stream in the single-shot pass
    #[arg(long, value_name = "N")]
    pub stream_items: Option<u32>,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub backends: BackendArgs,

    #[command(flatten)]
    pub bench: BenchArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::HumanReadable)]
    pub output: OutputFormat,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub backends: BackendArgs,

    #[command(flatten)]
    pub bench: BenchArgs,

    /// Control API bind address
    #[arg(long, default_value = "127.0.0.1:4600")]
    pub bind: SocketAddr,
}
