//! HTTP server

use axum::Router;
use tokio::net::TcpListener;

use crate::prelude::*;

async fn shutdown_signal() {
	match tokio::signal::ctrl_c().await {
		Ok(()) => info!("Shutdown requested"),
		Err(err) => error!("Cannot listen for the shutdown signal: {}", err),
	}
}

pub async fn serve(listen: &str, router: Router) -> ClResult<()> {
	let listener = TcpListener::bind(listen).await.map_err(|err| {
		error!("FATAL: Cannot listen on {}: {}", listen, err);
		err
	})?;
	info!("Listening on HTTP {}", listen);

	axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;
	info!("Server stopped");
	Ok(())
}

// vim: ts=4
