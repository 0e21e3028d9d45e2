use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::embedding::EmbeddingProvider;
use crate::evaluation::Evaluator;

/// Shared handler state: the single evaluator and the gate serializing its use.
pub struct HandlerState<P: EmbeddingProvider + 'static> {
    pub evaluator: Arc<Evaluator<P>>,

    /// One permit: evaluations run one at a time.
    pub gate: Arc<Semaphore>,
}

impl<P: EmbeddingProvider + 'static> Clone for HandlerState<P> {
    fn clone(&self) -> Self {
        Self {
            evaluator: Arc::clone(&self.evaluator),
            gate: Arc::clone(&self.gate),
        }
    }
}

impl<P: EmbeddingProvider + 'static> HandlerState<P> {
    pub fn new(evaluator: Arc<Evaluator<P>>) -> Self {
        Self {
            evaluator,
            gate: Arc::new(Semaphore::new(1)),
        }
    }

    pub fn model_name(&self) -> &str {
        self.evaluator.model_name()
    }

    pub fn is_stub(&self) -> bool {
        self.evaluator.provider().is_stub()
    }
}
