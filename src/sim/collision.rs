//! Landing detection for toss objects
//!
//! Objects are tested by their reference point (center) against each zone's
//! inset hit-box. Zones are checked in order and the first hit wins.

use glam::Vec2;

use super::state::Zone;
use crate::consts::MISS_DEPTH;

/// Result of a landing check
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Landing {
    /// Still falling
    Airborne,
    /// Inside the hit-box of the zone at this index
    Zone(usize),
    /// Dropped past the bottom of the viewport
    Missed,
}

/// Classify a point against the zones and the viewport bottom
pub fn check_landing(pos: Vec2, zones: &[Zone], viewport_height: f32) -> Landing {
    if let Some(index) = zones.iter().position(|z| z.hit_box().contains_point(pos)) {
        return Landing::Zone(index);
    }
    if pos.y > viewport_height + MISS_DEPTH {
        return Landing::Missed;
    }
    Landing::Airborne
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::Rect;

    fn zone(x: f32) -> Zone {
        Zone {
            rect: Rect::new(x, 300.0, 130.0, 70.0),
            label: String::new(),
            color: 0,
        }
    }

    #[test]
    fn test_point_in_zone() {
        let zones = [zone(100.0), zone(260.0)];
        assert_eq!(check_landing(Vec2::new(165.0, 335.0), &zones, 600.0), Landing::Zone(0));
        assert_eq!(check_landing(Vec2::new(325.0, 335.0), &zones, 600.0), Landing::Zone(1));
    }

    #[test]
    fn test_inset_margin_is_not_a_hit() {
        let zones = [zone(100.0)];
        // Inside the drawn rectangle but within the 10px margin
        assert_eq!(check_landing(Vec2::new(105.0, 335.0), &zones, 600.0), Landing::Airborne);
        assert_eq!(check_landing(Vec2::new(165.0, 365.0), &zones, 600.0), Landing::Airborne);
    }

    #[test]
    fn test_first_zone_wins_on_overlap() {
        let zones = [zone(100.0), zone(120.0)];
        assert_eq!(check_landing(Vec2::new(170.0, 335.0), &zones, 600.0), Landing::Zone(0));
    }

    #[test]
    fn test_missed_below_viewport() {
        let zones = [zone(100.0)];
        assert_eq!(check_landing(Vec2::new(10.0, 700.0), &zones, 600.0), Landing::Airborne);
        assert_eq!(check_landing(Vec2::new(10.0, 700.5), &zones, 600.0), Landing::Missed);
    }
}
