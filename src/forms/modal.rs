// src/forms/modal.rs
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalKind {
    Create,
    Update,
    View,
    DeleteConfirm,
}

/// `Closed -> Loading -> Ready <-> Submitting -> Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalPhase {
    #[default]
    Closed,
    Loading,
    Ready,
    Submitting,
}

impl ModalPhase {
    pub fn is_open(&self) -> bool {
        !matches!(self, ModalPhase::Closed)
    }

    /// Submitting from any phase but `Ready` is a no-op.
    pub fn can_submit(&self) -> bool {
        matches!(self, ModalPhase::Ready)
    }
}

/// Whoever opened a modal and needs to hear how it ended.
#[async_trait]
pub trait ModalListener: Send + Sync {
    async fn on_success(&self, kind: ModalKind);

    fn on_close(&self) {}
}

/// Listener for modals nobody waits on.
pub struct NoopListener;

#[async_trait]
impl ModalListener for NoopListener {
    async fn on_success(&self, _kind: ModalKind) {}
}
