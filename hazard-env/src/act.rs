//! Action for [HazardEnv](crate::HazardEnv) and the fixed action table.
use crate::geometry::Vec2;
use hazard_core::Act;

/// Display label of an action id outside the table.
pub const UNKNOWN_LABEL: &str = "unknown";

/// The nine movements of the agent, in action-id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    UpLeft,
    Up,
    UpRight,
    Left,
    Stay,
    Right,
    DownLeft,
    Down,
    DownRight,
}

impl Direction {
    /// All directions; the index of a direction is its action id.
    pub const ALL: [Direction; 9] = [
        Direction::UpLeft,
        Direction::Up,
        Direction::UpRight,
        Direction::Left,
        Direction::Stay,
        Direction::Right,
        Direction::DownLeft,
        Direction::Down,
        Direction::DownRight,
    ];

    /// Looks up the direction of an action id, `None` outside `0..=8`.
    pub fn from_id(id: i64) -> Option<Direction> {
        usize::try_from(id)
            .ok()
            .and_then(|ix| Self::ALL.get(ix).copied())
    }

    /// Looks up the direction of a display label.
    pub fn from_label(label: &str) -> Option<Direction> {
        Self::ALL.iter().copied().find(|d| d.label() == label)
    }

    pub fn id(&self) -> i64 {
        *self as i64
    }

    /// Unit step of the direction. Diagonals are not normalized.
    pub fn vector(&self) -> Vec2 {
        let (x, y) = match self {
            Direction::UpLeft => (-1.0, 1.0),
            Direction::Up => (0.0, 1.0),
            Direction::UpRight => (1.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Stay => (0.0, 0.0),
            Direction::Right => (1.0, 0.0),
            Direction::DownLeft => (-1.0, -1.0),
            Direction::Down => (0.0, -1.0),
            Direction::DownRight => (1.0, -1.0),
        };
        Vec2::new(x, y)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::UpLeft => "up-left",
            Direction::Up => "up",
            Direction::UpRight => "up-right",
            Direction::Left => "left",
            Direction::Stay => "stay",
            Direction::Right => "right",
            Direction::DownLeft => "down-left",
            Direction::Down => "down",
            Direction::DownRight => "down-right",
        }
    }
}

/// Movement vector of an action id. Unknown ids do not move.
pub fn decode_vector(id: i64) -> Vec2 {
    Direction::from_id(id).map_or(Vec2::ZERO, |d| d.vector())
}

/// Display label of an action id, [`UNKNOWN_LABEL`] for unknown ids.
pub fn decode_label(id: i64) -> &'static str {
    Direction::from_id(id).map_or(UNKNOWN_LABEL, |d| d.label())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Action for [HazardEnv](crate::HazardEnv).
///
/// Holds a raw action id; ids outside the table are tolerated and mean "stay".
pub struct HazardAct {
    pub id: i64,
}

impl HazardAct {
    pub fn new(id: i64) -> Self {
        Self { id }
    }

    pub fn direction(&self) -> Option<Direction> {
        Direction::from_id(self.id)
    }

    pub fn vector(&self) -> Vec2 {
        decode_vector(self.id)
    }

    pub fn label(&self) -> &'static str {
        decode_label(self.id)
    }
}

impl Act for HazardAct {}

impl From<i64> for HazardAct {
    fn from(id: i64) -> Self {
        Self { id }
    }
}

impl From<Direction> for HazardAct {
    fn from(d: Direction) -> Self {
        Self { id: d.id() }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_is_bijective() {
        let expected = [
            ("up-left", (-1.0, 1.0)),
            ("up", (0.0, 1.0)),
            ("up-right", (1.0, 1.0)),
            ("left", (-1.0, 0.0)),
            ("stay", (0.0, 0.0)),
            ("right", (1.0, 0.0)),
            ("down-left", (-1.0, -1.0)),
            ("down", (0.0, -1.0)),
            ("down-right", (1.0, -1.0)),
        ];
        let mut labels = HashSet::new();

        for (id, (label, (x, y))) in expected.iter().enumerate() {
            let id = id as i64;
            let d = Direction::from_id(id).unwrap();
            assert_eq!(d.id(), id);
            assert_eq!(decode_label(id), *label);
            assert_eq!(decode_vector(id), Vec2::new(*x, *y));
            assert_eq!(Direction::from_label(label), Some(d));
            labels.insert(*label);
        }
        assert_eq!(labels.len(), 9);
    }

    #[test]
    fn test_unknown_ids_stay_and_display_unknown() {
        for id in [-1, 9, 42, i64::MIN, i64::MAX] {
            assert_eq!(Direction::from_id(id), None);
            assert_eq!(decode_vector(id), Vec2::ZERO);
            assert_eq!(decode_label(id), UNKNOWN_LABEL);
            assert_eq!(HazardAct::new(id).vector(), Vec2::ZERO);
        }
        assert_eq!(Direction::from_label(UNKNOWN_LABEL), None);
    }
}
