//! Toss simulation types
//!
//! Positions are in screen pixels (origin top-left, y down); velocities are pixels per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// Progress of the current toss round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundState {
    /// Objects parked or hidden, waiting for a launch
    #[default]
    Idle,
    /// Objects in flight
    Active,
    /// Both objects at rest; outcome decided, waiting for the settle delay
    Resolving { success: bool },
}

/// A landing zone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub rect: Rect,
    pub label: String,
    /// Fill color (0xRRGGBB), also used for the landing splash
    pub color: u32,
}

impl Zone {
    /// Box used for landing tests
    pub fn hit_box(&self) -> Rect {
        self.rect.inset(ZONE_HIT_INSET)
    }
}

/// Compute the two zones for a (clamped) viewport, laid out side by side
pub fn layout_zones(viewport: Vec2) -> [Zone; 2] {
    let width = ZONE_MAX_WIDTH.min(viewport.x * ZONE_WIDTH_FRACTION);
    let total = width * 2.0 + ZONE_SPACING;
    let start_x = (viewport.x - total) / 2.0;
    let y = viewport.y * ZONE_TOP_FRACTION;

    [
        Zone {
            rect: Rect::new(start_x, y, width, ZONE_HEIGHT),
            label: "sweet-sour".to_string(),
            color: 0xE6_51_00,
        },
        Zone {
            rect: Rect::new(start_x + width + ZONE_SPACING, y, width, ZONE_HEIGHT),
            label: "honey".to_string(),
            color: 0xFD_D8_35,
        },
    ]
}

/// A physics-simulated toss object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TossObject {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Rotation (radians)
    pub angle: f32,
    /// Rotation per tick (radians)
    pub spin: f32,
    pub size: Vec2,
    pub resting: bool,
    /// Zone the object settled in; `None` while airborne or after a miss
    pub zone_index: Option<usize>,
    pub visible: bool,
}

impl TossObject {
    /// A hidden, resting object parked at `pos`
    pub fn parked(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            spin: 0.0,
            size: Vec2::new(OBJECT_WIDTH, OBJECT_HEIGHT),
            resting: true,
            zone_index: None,
            visible: false,
        }
    }

    /// Whether the object came to rest inside a zone
    pub fn landed(&self) -> bool {
        self.resting && self.zone_index.is_some()
    }

    /// Settle into `zone`: stop all motion and snap into the zone
    pub fn settle(&mut self, index: usize, zone: &Zone) {
        self.vel = Vec2::ZERO;
        self.spin = 0.0;
        self.pos.y = zone.rect.center().y;
        self.pos.x = zone.rect.clamp_x(self.pos.x, ZONE_REST_MARGIN);
        self.resting = true;
        self.zone_index = Some(index);
    }
}

/// Park positions for the pair, just above the viewport
pub fn park_positions(viewport: Vec2) -> [Vec2; 2] {
    let cx = viewport.x / 2.0;
    [
        Vec2::new(cx - OBJECT_PARK_SPREAD, OBJECT_PARK_Y),
        Vec2::new(cx + OBJECT_PARK_SPREAD, OBJECT_PARK_Y),
    ]
}

/// Round success: both objects landed, in different zones
pub fn round_succeeded(objects: &[TossObject; 2]) -> bool {
    match (objects[0].landed(), objects[1].landed()) {
        (true, true) => objects[0].zone_index != objects[1].zone_index,
        _ => false,
    }
}
