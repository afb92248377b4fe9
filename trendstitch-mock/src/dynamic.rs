use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use trendstitch_core::connector::{InterestProvider, TrendsConnector};
use trendstitch_core::{SegmentRequest, Series, StitchError};

/// Instruction for how a method should behave for one call.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(StitchError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

#[derive(Default)]
struct InternalState {
    interest_script: VecDeque<MockBehavior<Series>>,
    emulate_when_idle: bool,
    interest_requests: Vec<SegmentRequest>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Queue the behavior for the next unanswered `interest` call.
    pub async fn push_interest_behavior(&self, behavior: MockBehavior<Series>) {
        let mut guard = self.state.lock().await;
        guard.interest_script.push_back(behavior);
    }

    /// When the script is empty, answer with the vendor emulation instead of failing.
    pub async fn set_emulate_when_idle(&self, on: bool) {
        let mut guard = self.state.lock().await;
        guard.emulate_when_idle = on;
    }

    /// Return a copy of every `interest` request seen so far, in call order.
    pub async fn get_interest_requests(&self) -> Vec<SegmentRequest> {
        let guard = self.state.lock().await;
        guard.interest_requests.clone()
    }

    /// Clear all configured behaviors and request logs.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.interest_script.clear();
        guard.interest_requests.clear();
        guard.emulate_when_idle = false;
    }
}

/// A connector that defers all behavior to an external controller.
pub struct DynamicMockConnector {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockConnector {
    /// Create a new dynamic mock connector and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn TrendsConnector>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn TrendsConnector>, controller)
    }
}

impl TrendsConnector for DynamicMockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
    }

    fn as_interest_provider(&self) -> Option<&dyn InterestProvider> {
        Some(self as &dyn InterestProvider)
    }
}

#[async_trait]
impl InterestProvider for DynamicMockConnector {
    async fn interest(&self, req: SegmentRequest) -> Result<Series, StitchError> {
        // Log and take the next behavior without holding the lock across await points
        let (behavior, emulate) = {
            let mut guard = self.state.lock().await;
            guard.interest_requests.push(req.clone());
            (guard.interest_script.pop_front(), guard.emulate_when_idle)
        };

        match behavior {
            Some(MockBehavior::Return(s)) => Ok(s),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None if emulate => crate::emulate(&req),
            None => Err(StitchError::unsupported("interest")),
        }
    }
}
