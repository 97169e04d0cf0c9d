//! The page's smaller animated collaborators.
//!
//! Each one is a host-independent state machine driven by explicit ticks and
//! timestamps. The web host wires them to DOM elements and timers; the
//! native host only uses [`visits`] and [`geo`].

pub mod contact;
pub mod effects;
pub mod geo;
pub mod loading;
pub mod metrics;
pub mod nav;
pub mod reveal;
pub mod typing;
pub mod visits;

pub use contact::copy_target;
pub use effects::{active_section, card_transform, smooth_scroll_target, ScrollEffects, TitleHue};
pub use geo::{LocationLabel, LocationLookup};
pub use loading::{LoadingPhase, LoadingProgress};
pub use metrics::LoadMetrics;
pub use nav::NavMenu;
pub use typing::{TypingCycle, TypingStep};
pub use visits::{CountUp, KeyValueStore, MemoryStore, VisitOutcome, VisitTracker};
