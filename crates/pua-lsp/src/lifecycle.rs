//! Server lifecycle: initialize, shutdown, exit.

/// Where the server is in the initialize/shutdown/exit handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// No `initialize` request seen yet.
    #[default]
    Uninitialized,
    /// Initialized and serving requests.
    Running,
    /// `shutdown` was requested; still serving until `exit`.
    ShutdownRequested,
    /// `exit` received; the loop must stop.
    Exited {
        /// Whether `shutdown` preceded `exit`.
        clean: bool,
    },
}

/// Lifecycle tracker owned by the main loop.
#[derive(Debug, Default)]
pub struct Lifecycle {
    state: LifecycleState,
}

impl Lifecycle {
    /// Create a tracker in the `Uninitialized` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    /// Handle an `initialize` request.
    pub fn initialize(&mut self) {
        if self.state != LifecycleState::Uninitialized {
            tracing::warn!("initialize received in state {:?}", self.state);
        }
        if !self.shutdown_requested() {
            self.state = LifecycleState::Running;
        }
    }

    /// Handle a `shutdown` request.
    pub fn shutdown(&mut self) {
        if matches!(self.state, LifecycleState::Exited { .. }) {
            return;
        }
        self.state = LifecycleState::ShutdownRequested;
    }

    /// Handle an `exit` notification. Accepted in every state.
    pub fn exit(&mut self) {
        let clean = self.shutdown_requested();
        self.state = LifecycleState::Exited { clean };
    }

    /// Whether the read loop should stop.
    pub const fn is_exited(&self) -> bool {
        matches!(self.state, LifecycleState::Exited { .. })
    }

    /// Whether a `shutdown` request has been received at any point.
    pub const fn shutdown_requested(&self) -> bool {
        matches!(
            self.state,
            LifecycleState::ShutdownRequested | LifecycleState::Exited { clean: true }
        )
    }

    /// Process exit code: `0` after a shutdown request, `1` otherwise.
    pub const fn exit_code(&self) -> i32 {
        if self.shutdown_requested() {
            0
        } else {
            1
        }
    }
}
