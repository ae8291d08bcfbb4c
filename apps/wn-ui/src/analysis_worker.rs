use std::sync::Arc;
use std::sync::mpsc::{Receiver, channel};
use std::thread::{self, JoinHandle};

use uuid::Uuid;
use wn_app::PendingAnalysis;
use wn_client::{AnalysisBackend, ClientResult};
use wn_core::AnalysisResult;

/// Runs one analysis request off the UI thread.
pub struct AnalysisWorker {
    pub id: Uuid,
    pub result_rx: Receiver<WorkerMessage>,
    _handle: JoinHandle<()>,
}

#[derive(Debug)]
pub enum WorkerMessage {
    Finished {
        id: Uuid,
        outcome: ClientResult<AnalysisResult>,
    },
}

impl AnalysisWorker {
    pub fn start(
        backend: Arc<dyn AnalysisBackend>,
        pending: PendingAnalysis,
        ctx: egui::Context,
    ) -> Self {
        let (tx, rx) = channel();
        let id = pending.id;

        let handle = thread::spawn(move || {
            let outcome = backend.run_analysis(&pending.request);
            // Receiver is gone after a reset; the outcome is simply dropped.
            let _ = tx.send(WorkerMessage::Finished {
                id: pending.id,
                outcome,
            });
            ctx.request_repaint();
        });

        Self {
            id,
            result_rx: rx,
            _handle: handle,
        }
    }
}
