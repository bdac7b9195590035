//! Hash-ring membership for alertmanager instances.
//!
//! The ring framework owns gossip, heartbeats and state transitions; this
//! module provides the ring descriptor model and the hooks it calls while an
//! alertmanager instance registers.

mod desc;
mod lifecycle;
mod tokens;

pub use desc::{Desc, InstanceDesc, InstanceState};
pub use lifecycle::{AlertmanagerRingDelegate, RingLifecycleDelegate, RING_NUM_TOKENS};
pub use tokens::{RandomTokenGenerator, TokenGenerator, Tokens};
