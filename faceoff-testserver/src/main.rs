use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let mut bind_addr: SocketAddr = "127.0.0.1:0".parse()?;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--bind" => {
                let addr = args.next().ok_or_else(|| {
                    anyhow::anyhow!("--bind requires an address, e.g. 127.0.0.1:0")
                })?;
                bind_addr = addr.parse()?;
            }
            "-h" | "--help" => {
                eprintln!(
                    "faceoff-testserver\n\nUSAGE:\n  faceoff-testserver [--bind 127.0.0.1:0]\n\nOUTPUT:\n  Prints HTTP_URL=<url> and GRPC_URL=<host:port> to stdout once ready."
                );
                return Ok(());
            }
            other => {
                return Err(anyhow::anyhow!("unknown argument: {other}"));
            }
        }
    }

    // Both protocol servers share one resource table, like the original
    // comparison service.
    let table = Arc::new(faceoff_testserver::ResourceTable::default());

    let listener = TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;

    let grpc = faceoff_testserver::GrpcTestServer::start_with_table(table.clone()).await?;

    let stats = faceoff_testserver::TestServerStats::default();
    let app = faceoff_testserver::router(table, stats);

    println!("HTTP_URL=http://{addr}");
    println!("GRPC_URL={}", grpc.target());

    let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = tokio::signal::ctrl_c().await;
    });

    serve.await?;

    grpc.shutdown().await;
    Ok(())
}
