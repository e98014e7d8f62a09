//! # Celebration Events
//!
//! Lock-free delivery of celebration requests from UI surfaces to the
//! engine owner.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Level-up   │──┐
//! └─────────────┘  │    ┌─────────────┐      ┌──────────────────┐
//! ┌─────────────┐  ├───>│   Event     │─────>│ CelebrationLoop  │
//! │ Login streak│──┤    │   Channel   │      │ (owns the engine)│
//! └─────────────┘  │    └─────────────┘      └──────────────────┘
//! ┌─────────────┐  │
//! │  Alliance   │──┘
//! └─────────────┘
//! ```
//!
//! Surfaces only say what happened and where; the tier comes from the
//! celebration kind unless they override it.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use fanfare_effects::{IntensityTier, OriginHint, StartOptions};

/// Something worth celebrating.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Celebration {
    /// The player reached a new level.
    LevelUp {
        /// New level.
        level: u32,
    },
    /// Daily login streak reward.
    LoginStreak {
        /// Consecutive days.
        days: u32,
    },
    /// Reward for returning after a break.
    WelcomeBack {
        /// Days since the last visit.
        days_away: u32,
    },
    /// An alliance member did something nice (gift, boost, join).
    AllianceAction {
        /// Alliance the action belongs to.
        alliance_id: u64,
    },
}

impl Celebration {
    /// Tier used when the request does not override it.
    #[must_use]
    pub const fn default_tier(&self) -> IntensityTier {
        match self {
            Self::LevelUp { .. } => IntensityTier::High,
            Self::LoginStreak { .. } | Self::WelcomeBack { .. } => IntensityTier::Medium,
            Self::AllianceAction { .. } => IntensityTier::Low,
        }
    }

    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LevelUp { .. } => "level_up",
            Self::LoginStreak { .. } => "login_streak",
            Self::WelcomeBack { .. } => "welcome_back",
            Self::AllianceAction { .. } => "alliance_action",
        }
    }
}

/// A celebration plus optional presentation overrides.
#[derive(Clone, Debug)]
pub struct CelebrationRequest {
    /// What happened.
    pub celebration: Celebration,
    /// Overrides the celebration's default tier.
    pub tier: Option<IntensityTier>,
    /// Where the burst should start.
    pub origin: Option<OriginHint>,
}

impl CelebrationRequest {
    /// Request with default tier and default origin.
    #[must_use]
    pub const fn new(celebration: Celebration) -> Self {
        Self {
            celebration,
            tier: None,
            origin: None,
        }
    }

    /// Overrides the tier.
    #[must_use]
    pub fn with_tier(mut self, tier: IntensityTier) -> Self {
        self.tier = Some(tier);
        self
    }

    /// Sets the origin hint.
    #[must_use]
    pub fn with_origin(mut self, origin: OriginHint) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Tier the engine should use.
    #[must_use]
    pub fn tier(&self) -> IntensityTier {
        self.tier.unwrap_or_else(|| self.celebration.default_tier())
    }

    /// Engine start options (without a callback).
    #[must_use]
    pub fn into_start_options(self) -> StartOptions {
        let tier = self.tier();
        StartOptions {
            tier,
            origin_hint: self.origin,
            on_complete: None,
        }
    }
}

impl From<Celebration> for CelebrationRequest {
    fn from(celebration: Celebration) -> Self {
        Self::new(celebration)
    }
}

/// Event bus for celebration requests.
///
/// Bounded so a runaway producer cannot grow memory.
pub struct EventBus {
    /// Sender end - held by UI surfaces.
    sender: Sender<CelebrationRequest>,
    /// Receiver end - held by the engine owner.
    receiver: Receiver<CelebrationRequest>,
}

impl EventBus {
    /// Creates a new event bus.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum requests in flight before sends fail.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Creates a sender handle (clone for multiple surfaces).
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle.
    #[must_use]
    pub fn receiver(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.receiver.clone(),
        }
    }

    /// Creates a new pair of sender and receiver.
    #[must_use]
    pub fn create_pair(capacity: usize) -> (EventSender, EventReceiver) {
        let bus = Self::new(capacity);
        (bus.sender(), bus.receiver())
    }
}

/// Handle for sending celebration requests.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<CelebrationRequest>,
}

impl EventSender {
    /// Sends a request (non-blocking).
    ///
    /// Returns `false` if the request was dropped.
    #[inline]
    pub fn send(&self, request: impl Into<CelebrationRequest>) -> bool {
        match self.sender.try_send(request.into()) {
            Ok(()) => true,
            Err(TrySendError::Full(request)) => {
                tracing::warn!(
                    celebration = request.celebration.name(),
                    "Celebration bus full, dropping request"
                );
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Handle for receiving celebration requests.
#[derive(Clone)]
pub struct EventReceiver {
    receiver: Receiver<CelebrationRequest>,
}

impl EventReceiver {
    /// Receives all pending requests (non-blocking), oldest first.
    #[inline]
    pub fn drain(&self) -> Vec<CelebrationRequest> {
        self.receiver.try_iter().collect()
    }

    /// Receives one request (non-blocking).
    #[inline]
    pub fn try_recv(&self) -> Option<CelebrationRequest> {
        self.receiver.try_recv().ok()
    }

    /// Returns the number of pending requests.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Checks if there are pending requests.
    #[inline]
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.receiver.is_empty()
    }
}
