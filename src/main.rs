use postgate::api;
use postgate::logger::*;
use postgate::server::*;
use postgate::settings::*;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use warp::Filter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    info!(?project_settings);
    logger.reload_from_config(&LogConfig::from(&project_settings.log))?;

    let address: SocketAddr = project_settings.http.address.parse()?;
    let server = Arc::new(Server::try_new(&project_settings).await?);

    let api_v1 = warp::path("api")
        .and(warp::path("v1"))
        .and(api::v1::routes(server.clone()))
        .recover(api::v1::recover_error);

    let cancel = CancellationToken::new();
    let stop_accepting = cancel.clone().cancelled_owned();
    let serving: Pin<Box<dyn Future<Output = ()> + Send>> =
        match (&project_settings.http.cert_path, &project_settings.http.key_path) {
            (Some(cert_path), Some(key_path)) => {
                let (bound, fut) = warp::serve(api_v1)
                    .tls()
                    .cert_path(cert_path)
                    .key_path(key_path)
                    .bind_with_graceful_shutdown(address, stop_accepting);
                info!(%bound, "listening (tls)");
                Box::pin(fut)
            }
            _ => {
                let (bound, fut) = warp::serve(api_v1)
                    .bind_with_graceful_shutdown(address, stop_accepting);
                info!(%bound, "listening");
                Box::pin(fut)
            }
        };
    let mut serving = tokio::spawn(serving);

    tokio::select! {
        r = shutdown_signal() => r?,
        r = &mut serving => {
            r?;
            warn!("http server exited without a shutdown signal");
            server.shutdown().await;
            return Ok(());
        }
    }

    cancel.cancel();
    drain_or_abort(serving, project_settings.http.shutdown_grace()).await;

    server.shutdown().await;
    drop(server);
    info!("server shutdown successfully");
    Ok(())
}

async fn shutdown_signal() -> anyhow::Result<()> {
    let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;
    tokio::select! {
        r = signal::ctrl_c() => r?,
        _ = terminate.recv() => {}
    }
    info!("shutdown signal received");
    Ok(())
}
