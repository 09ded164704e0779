//! State types for the watering session.

use uuid::Uuid;

use crate::gift::{FlowerKind, GiftDescriptor};

/// Phase of a watering session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Still being watered; holds the waterings done so far
    Pending(u32),
    /// Bloomed. Terminal.
    Completed,
}

impl Phase {
    /// Whether the flower has bloomed
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Emitted once, by the watering that makes the flower bloom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionEvent {
    /// Session that bloomed
    pub session_id: Uuid,
    /// The gift
    pub descriptor: GiftDescriptor,
    /// Unix time the flower bloomed
    pub completed_at: u64,
}

impl CompletionEvent {
    /// What the reveal view shows
    pub fn reveal(&self) -> Reveal<'_> {
        Reveal {
            flower: self.descriptor.flower(),
            image: self.descriptor.flower().image_name(),
            message: self.descriptor.message(),
            background_color: self.descriptor.theme().background_color(),
            sparkle: self.descriptor.sparkle(),
            music: self.descriptor.music(),
        }
    }
}

/// Contents of the reveal view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal<'a> {
    /// Flower kind
    pub flower: FlowerKind,
    /// Flower image asset
    pub image: String,
    /// Personal message
    pub message: &'a str,
    /// Page background
    pub background_color: &'static str,
    /// Show the sparkle overlay
    pub sparkle: bool,
    /// Music to play
    pub music: Option<&'a str>,
}
