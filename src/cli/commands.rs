use crate::cli::args::Args;
use crate::cli::output::{ConsoleWriter, OutputWriter};
use crate::core::capture::CaptureStatus;
use crate::core::grabber::run_capture;
use crate::core::{sink::Sink, transport::Connector};
use crate::domain::config::{GlobalConfig, LinkConfig};
use crate::domain::error::{SinkError, TdsGrabError, TdsGrabResult};
use crate::infrastructure::config::ConfigManager;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::serial::{available_ports, SerialTransport};
use crate::infrastructure::FileSink;
use std::future::Future;
use std::io;
use std::path::Path;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Execute CLI command
pub async fn execute_command(args: Args, writer: &ConsoleWriter) -> TdsGrabResult<()> {
    if args.version {
        writer.write_message(&format!("tdsgrab {}", env!("CARGO_PKG_VERSION")))?;
        return Ok(());
    }

    // Listing never touches the configuration file
    if args.list {
        if !args.quiet {
            init_logging(&GlobalConfig::default().log_level, args.verbose)?;
        }
        let ports = available_ports()?;
        writer.write_ports(&ports)?;
        return Ok(());
    }

    let config_manager = ConfigManager::new();
    let config = if let Some(config_path) = &args.config {
        config_manager.load_config_from_path(config_path)?
    } else {
        config_manager.load_config()?
    };

    if !args.quiet {
        init_logging(&config.global.log_level, args.verbose)?;
    }

    let destination = args.filename.clone().ok_or_else(|| TdsGrabError::Config {
        message: "a destination filename is required".to_string(),
    })?;
    let link = args.link_config(&config.link);

    if !link.is_standard_baud() {
        writer.write_warning(&format!("Non-standard baud rate {}, proceeding anyway", link.baud_rate))?;
    }

    let sink_path = destination.clone();
    capture(
        SerialTransport::open,
        link,
        move || FileSink::create(&sink_path),
        &destination,
        writer,
        tokio::signal::ctrl_c(),
    )
    .await
}

/// Run one capture on a blocking worker while the async side reports
/// progress and turns `shutdown` into a cancellation.
///
/// An interrupted capture is not an error: the device is released, the
/// interruption is reported and no summary is written.
async fn capture<C, S, F, W, Q>(
    connector: C,
    link: LinkConfig,
    open_sink: F,
    destination: &Path,
    writer: &W,
    shutdown: Q,
) -> TdsGrabResult<()>
where
    C: Connector + Send + 'static,
    S: Sink,
    F: FnOnce() -> Result<S, SinkError> + Send + 'static,
    W: OutputWriter + ?Sized,
    Q: Future<Output = io::Result<()>>,
{
    let cancel = CancellationToken::new();
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();

    let worker_cancel = cancel.clone();
    let worker = tokio::task::spawn_blocking(move || {
        run_capture(&connector, &link, open_sink, worker_cancel, Some(events_tx))
    });

    tokio::pin!(shutdown);
    let mut interrupted = false;
    loop {
        tokio::select! {
            event = events_rx.recv() => match event {
                Some(event) => {
                    if let Err(e) = writer.write_event(&event) {
                        cancel.cancel();
                        return Err(e.into());
                    }
                }
                None => break,
            },
            signal = &mut shutdown, if !interrupted => {
                interrupted = true;
                match signal {
                    Ok(()) => {
                        info!("Interrupt received, stopping capture");
                        cancel.cancel();
                    }
                    Err(e) => warn!("Unable to listen for interrupts: {}", e),
                }
            }
        }
    }

    let outcome = worker.await.map_err(|e| TdsGrabError::Task(e.to_string()))??;
    if outcome.status == CaptureStatus::Completed {
        writer.write_summary(&outcome, destination)?;
    }
    Ok(())
}
