use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use super::{Authorization, Fix, LocationProvider};

/// Holds the last fix reported by any feed. Clones share the same cache.
#[derive(Clone, Debug, Default)]
pub struct CachedLocation {
    state: Arc<RwLock<State>>,
}

#[derive(Debug, Default)]
struct State {
    fix: Option<Fix>,
    authorization: Authorization,
    answer: Option<Authorization>,
}

impl CachedLocation {
    /// An empty cache whose authorization prompt is granted.
    pub fn new() -> Self {
        Self::answering(Authorization::Authorized)
    }

    /// An empty cache whose authorization prompt resolves to `answer`.
    pub fn answering(answer: Authorization) -> Self {
        Self {
            state: Arc::new(RwLock::new(State {
                answer: Some(answer),
                ..State::default()
            })),
        }
    }

    /// Record a new last known fix, replacing the previous one.
    pub fn update(&self, fix: Fix) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        debug!(
            latitude = fix.coordinate.latitude,
            longitude = fix.coordinate.longitude,
            timestamp = %fix.timestamp,
            "recorded location fix"
        );
        state.fix = Some(fix);
    }
}

impl LocationProvider for CachedLocation {
    fn request_authorization(&self) -> Authorization {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.authorization == Authorization::NotDetermined {
            if let Some(answer) = state.answer {
                state.authorization = answer;
            }
        }
        state.authorization
    }

    fn authorization(&self) -> Authorization {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .authorization
    }

    fn current_location(&self) -> Option<Fix> {
        self.state.read().unwrap_or_else(PoisonError::into_inner).fix
    }
}
