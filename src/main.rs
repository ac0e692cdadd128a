mod brave;
mod config;
mod error;
mod search;
mod server;
mod tools;

use std::sync::Arc;

use anyhow::Result;
use rmcp::{transport::stdio, ServiceExt};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::brave::BraveClient;
use crate::config::Config;
use crate::search::BraveSearchExecutor;
use crate::server::BraveSearchServer;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Brave Search MCP Server v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    tracing::debug!(
        api_key = %config.mask_api_key(),
        api_url = %config.api_url,
        timeout_secs = config.timeout_secs,
        max_retries = config.max_retries,
        default_country = %config.default_country,
        default_search_lang = %config.default_search_lang,
        default_ui_lang = %config.default_ui_lang,
        "Configuration loaded"
    );

    let client = BraveClient::new(&config)?;
    let executor = BraveSearchExecutor::new(client, tracing::info_span!("search_executor"));
    let server = BraveSearchServer::new(Arc::new(executor), tracing::info_span!("web_search_tool"));
    let service = server.serve(stdio()).await?;

    tokio::select! {
        result = service.waiting() => {
            if let Err(e) = result {
                tracing::warn!("Service ended with error: {}", e);
            }
        }
        reason = shutdown_requested() => {
            tracing::info!(reason = %reason, "Shutting down");
        }
    }

    tracing::info!("Brave Search MCP Server stopped");
    Ok(())
}

/// Resolves once the process should stop, naming what triggered it.
async fn shutdown_requested() -> &'static str {
    #[cfg(unix)]
    let sigterm = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("SIGTERM handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        result = signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::warn!("Ctrl+C handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
            "ctrl-c"
        }
        _ = sigterm => "sigterm",
        _ = host_pipe_closed() => "host exited",
    }
}

/// On Windows a host that dies without closing our stdin leaves the process
/// orphaned, so poll the pipe. Elsewhere rmcp sees EOF on its own.
#[cfg(windows)]
async fn host_pipe_closed() {
    use std::os::windows::io::AsRawHandle;
    use tokio::time::{interval, Duration};
    use windows_sys::Win32::Foundation::{
        GetLastError, ERROR_BROKEN_PIPE, ERROR_INVALID_HANDLE, ERROR_NO_DATA,
    };
    use windows_sys::Win32::Storage::FileSystem::{GetFileType, FILE_TYPE_PIPE};
    use windows_sys::Win32::System::Pipes::PeekNamedPipe;

    let stdin = std::io::stdin().as_raw_handle() as *mut std::ffi::c_void;
    if unsafe { GetFileType(stdin) } != FILE_TYPE_PIPE {
        tracing::debug!("stdin is not a pipe, host monitor disabled");
        return std::future::pending::<()>().await;
    }

    let mut poll = interval(Duration::from_millis(500));
    loop {
        poll.tick().await;
        let mut available: u32 = 0;
        let ok = unsafe {
            PeekNamedPipe(stdin, std::ptr::null_mut(), 0, std::ptr::null_mut(), &mut available, std::ptr::null_mut())
        };
        if ok == 0 && matches!(unsafe { GetLastError() }, ERROR_BROKEN_PIPE | ERROR_NO_DATA | ERROR_INVALID_HANDLE) {
            return;
        }
    }
}

#[cfg(not(windows))]
async fn host_pipe_closed() {
    std::future::pending::<()>().await
}
