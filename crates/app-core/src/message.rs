//! The narrow message contract between the host and the background context.
//!
//! Host → background: one surface handoff, pointer updates, one terminate.
//! Background → host: one `Ready`. Nothing else crosses the boundary.

use glam::Vec2;

/// Surface ownership moving into the background context.
#[derive(Debug)]
pub struct SurfaceHandoff<S> {
    pub surface: S,
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f64,
}

/// Latest pointer state as seen by the host.
///
/// `clicks` counts clicks since the previous update; surface size rides along
/// so resizes need no separate message.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerUpdate {
    pub ndc: Vec2,
    pub clicks: u32,
    pub width: u32,
    pub height: u32,
}

pub const POINTER_WORDS: usize = 5;

impl PointerUpdate {
    /// Flat `f32` encoding used on the web message channel.
    pub fn to_words(&self) -> [f32; POINTER_WORDS] {
        [
            self.ndc.x,
            self.ndc.y,
            self.clicks as f32,
            self.width as f32,
            self.height as f32,
        ]
    }

    pub fn from_words(words: &[f32]) -> Option<Self> {
        if words.len() < POINTER_WORDS || words.iter().take(POINTER_WORDS).any(|w| !w.is_finite()) {
            return None;
        }
        let count = |w: f32| w.max(0.0).round() as u32;
        Some(Self {
            ndc: Vec2::new(words[0].clamp(-1.0, 1.0), words[1].clamp(-1.0, 1.0)),
            clicks: count(words[2]),
            width: count(words[3]),
            height: count(words[4]),
        })
    }

    /// Fold a newer update into this one: position and size follow the
    /// newer update, clicks accumulate.
    pub fn merge(self, newer: PointerUpdate) -> PointerUpdate {
        PointerUpdate {
            clicks: self.clicks.saturating_add(newer.clicks),
            ..newer
        }
    }
}

#[derive(Debug)]
pub enum HostMessage<S> {
    Surface(SurfaceHandoff<S>),
    Pointer(PointerUpdate),
    Terminate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerMessage {
    Ready,
}

/// Discriminant carried in the `kind` field of web messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Surface,
    Pointer,
    Terminate,
    Ready,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Surface => "surface",
            MessageKind::Pointer => "pointer",
            MessageKind::Terminate => "terminate",
            MessageKind::Ready => "ready",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "surface" => Some(MessageKind::Surface),
            "pointer" => Some(MessageKind::Pointer),
            "terminate" => Some(MessageKind::Terminate),
            "ready" => Some(MessageKind::Ready),
            _ => None,
        }
    }
}
