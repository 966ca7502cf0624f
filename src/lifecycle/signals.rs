//! Interrupt delivery.
//!
//! # Responsibilities
//! - Register the OS interrupt handler (SIGINT / Ctrl+C) while the daemon serves
//! - Hand termination requests to the orchestrator through a single-slot mailbox
//! - Let tests inject interrupts without touching process signal state
//!
//! # Design Decisions
//! - Mailbox capacity is one: the first request wins, duplicates that arrive
//!   before it is consumed are coalesced, not queued
//! - Delivery never blocks the producer

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

/// Producer side of the interrupt mailbox.
#[derive(Debug, Clone)]
pub struct InterruptTrigger {
    tx: mpsc::Sender<()>,
}

impl InterruptTrigger {
    /// Deliver a termination request.
    ///
    /// Returns false when the request was coalesced with one already pending.
    pub fn fire(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) => true,
            Err(TrySendError::Full(())) => {
                tracing::debug!("Interrupt already pending, coalescing");
                false
            }
            Err(TrySendError::Closed(())) => false,
        }
    }
}

/// Consumer side of the interrupt mailbox, owned by the orchestrator.
pub struct Interrupts {
    tx: mpsc::Sender<()>,
    rx: mpsc::Receiver<()>,
    os: bool,
    listener: Option<JoinHandle<()>>,
}

impl Interrupts {
    fn with_source(os: bool) -> Self {
        let (tx, rx) = mpsc::channel(1);
        Self {
            tx,
            rx,
            os,
            listener: None,
        }
    }

    /// Interrupts delivered by the operating system.
    pub fn os() -> Self {
        Self::with_source(true)
    }

    /// Interrupts delivered only through the returned trigger.
    pub fn manual() -> (InterruptTrigger, Self) {
        let interrupts = Self::with_source(false);
        (interrupts.trigger(), interrupts)
    }

    /// A new producer handle for this mailbox.
    pub fn trigger(&self) -> InterruptTrigger {
        InterruptTrigger {
            tx: self.tx.clone(),
        }
    }

    /// Start listening for OS interrupts. No-op for manual sources or when already armed.
    pub fn arm(&mut self) {
        if !self.os || self.listener.is_some() {
            return;
        }

        let trigger = self.trigger();
        self.listener = Some(tokio::spawn(async move {
            loop {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "Failed to listen for interrupt signal");
                    break;
                }
                tracing::info!("Received interrupt signal");
                trigger.fire();
            }
        }));
        tracing::debug!("Interrupt handler installed");
    }

    /// Wait for the next termination request.
    pub async fn recv(&mut self) {
        // `self.tx` keeps the channel open, so this only returns on a delivery.
        let _ = self.rx.recv().await;
    }
}

impl Drop for Interrupts {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}
