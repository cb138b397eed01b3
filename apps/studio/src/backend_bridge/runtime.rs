//! Runtime bridge between UI command queue and backend event intake.

use std::{path::Path, sync::Arc, thread};

use client_core::{save_data_uri, ImageGenerator};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Spawns the backend worker. It serves commands in arrival order until the
/// command queue closes or the UI side stops listening.
pub fn launch(
    generator: Arc<dyn ImageGenerator>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                let event = match cmd {
                    BackendCommand::Generate(request) => {
                        UiEvent::GenerationFinished(generator.generate(&request).await)
                    }
                    BackendCommand::Download { data_uri, dir } => download(&data_uri, &dir),
                };

                if ui_tx.send(event).is_err() {
                    tracing::debug!("ui event receiver dropped; stopping backend worker");
                    break;
                }
            }
        });
    })
}

fn download(data_uri: &str, dir: &Path) -> UiEvent {
    let timestamp = chrono::Utc::now().timestamp_millis();
    match save_data_uri(data_uri, dir, timestamp) {
        Ok(path) => UiEvent::Saved(path),
        Err(err) => {
            tracing::error!("failed to save result image: {err}");
            UiEvent::Error(UiError::from_message(
                UiErrorContext::Download,
                err.to_string(),
            ))
        }
    }
}
