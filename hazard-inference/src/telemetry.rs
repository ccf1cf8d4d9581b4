//! Live game telemetry.
//!
//! Telemetry comes from an external game client and is parsed leniently:
//! every missing or malformed field takes a default (`[0, 0]` for vectors,
//! empty lists, `false`, `0`), and an unparsable body is an empty telemetry.
use hazard_env::{geometry::Vec2, geometry::Wall, MovingEntity, Snapshot};
use serde::Deserialize;
use serde_json::Value;

/// State of the player.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerState {
    #[serde(deserialize_with = "lenient::vec2")]
    pub position: Vec2,
    #[serde(deserialize_with = "lenient::vec2")]
    pub velocity: Vec2,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_dead: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub reached_goal: bool,
    #[serde(deserialize_with = "lenient::count")]
    pub steps_taken: usize,
}

/// A moving obstacle, i.e. a hazard.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ObstacleState {
    #[serde(deserialize_with = "lenient::vec2")]
    pub position: Vec2,
    #[serde(deserialize_with = "lenient::vec2")]
    pub velocity: Vec2,
    #[serde(deserialize_with = "lenient::number")]
    pub size: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GoalArea {
    #[serde(deserialize_with = "lenient::vec2")]
    pub position: Vec2,
    #[serde(deserialize_with = "lenient::number")]
    pub size: f32,
}

/// Entities around the player.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnvironmentState {
    #[serde(deserialize_with = "lenient::walls")]
    pub walls: Vec<Wall>,
    #[serde(deserialize_with = "lenient::list")]
    pub moving_obstacles: Vec<ObstacleState>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub goal_area: GoalArea,
}

/// A snapshot of the game as reported by the client.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Telemetry {
    #[serde(deserialize_with = "lenient::or_default")]
    pub player: PlayerState,
    #[serde(deserialize_with = "lenient::or_default")]
    pub environment: EnvironmentState,
}

/// Field deserializers that fall back to defaults instead of failing.
mod lenient {
    use super::Vec2;
    use hazard_env::geometry::Wall;
    use serde::{de::DeserializeOwned, Deserialize, Deserializer};
    use serde_json::Value;

    fn as_f32(v: Option<&Value>) -> f32 {
        v.and_then(Value::as_f64).unwrap_or(0.0) as f32
    }

    pub fn or_default<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        Ok(serde_json::from_value(Value::deserialize(d)?).unwrap_or_default())
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f32, D::Error> {
        Ok(as_f32(Some(&Value::deserialize(d)?)))
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(Value::deserialize(d)?.as_bool().unwrap_or(false))
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<usize, D::Error> {
        Ok(match Value::deserialize(d)?.as_f64() {
            Some(n) if n > 0.0 => n as usize,
            _ => 0,
        })
    }

    pub fn vec2<'de, D: Deserializer<'de>>(d: D) -> Result<Vec2, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(xs) => Vec2::new(as_f32(xs.first()), as_f32(xs.get(1))),
            _ => Vec2::ZERO,
        })
    }

    /// Objects of an array; other entries are skipped.
    pub fn list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let items = match Value::deserialize(d)? {
            Value::Array(xs) => xs,
            _ => return Ok(vec![]),
        };
        let n_items = items.len();
        let parsed: Vec<T> = items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|x| serde_json::from_value(x).ok())
            .collect();
        if parsed.len() < n_items {
            log::debug!("Skipped {} malformed entries", n_items - parsed.len());
        }
        Ok(parsed)
    }

    #[derive(Default, Deserialize)]
    #[serde(default)]
    struct WallState {
        #[serde(deserialize_with = "vec2")]
        position: Vec2,
        #[serde(deserialize_with = "vec2")]
        size: Vec2,
    }

    pub fn walls<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Wall>, D::Error> {
        Ok(list::<D, WallState>(d)?
            .into_iter()
            .map(|w| Wall::new(w.position.x, w.position.y, w.size.x, w.size.y))
            .collect())
    }
}

impl Telemetry {
    /// Parses telemetry from a JSON value. Never fails.
    pub fn from_value(value: &Value) -> Self {
        Self::deserialize(value).unwrap_or_else(|e| {
            log::debug!("Unreadable telemetry, treated as empty: {}", e);
            Self::default()
        })
    }

    /// Parses telemetry from a request body. An invalid body gives an empty telemetry.
    pub fn from_json(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                log::warn!("Invalid telemetry body, treated as empty: {}", e);
                Self::default()
            }
        }
    }

    /// View of the telemetry for the observation encoder.
    ///
    /// `steps_taken / max_steps` is reported as the elapsed fraction of the episode.
    pub fn snapshot(&self, max_steps: usize) -> Snapshot<'_> {
        let environment = &self.environment;
        Snapshot {
            agent: self.player.position,
            walls: &environment.walls,
            hazards: environment
                .moving_obstacles
                .iter()
                .map(|o| MovingEntity {
                    position: o.position,
                    velocity: o.velocity,
                })
                .collect(),
            goal: environment.goal_area.position,
            time_fraction: Some(self.player.steps_taken as f32 / max_steps.max(1) as f32),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_telemetry() {
        let value = json!({
            "player": {
                "position": [3.0, 4.5],
                "velocity": [1, -1],
                "is_dead": false,
                "reached_goal": true,
                "steps_taken": 12
            },
            "environment": {
                "walls": [{ "position": [1, 2], "size": [3, 1] }],
                "moving_obstacles": [{ "position": [7, 7], "velocity": [0.5, 0], "size": 0.8 }],
                "goal_area": { "position": [9, 1], "size": 1 }
            }
        });
        let t = Telemetry::from_value(&value);

        assert_eq!(t.player.position, Vec2::new(3.0, 4.5));
        assert_eq!(t.player.velocity, Vec2::new(1.0, -1.0));
        assert!(t.player.reached_goal);
        assert_eq!(t.player.steps_taken, 12);
        assert_eq!(t.environment.walls, vec![Wall::new(1.0, 2.0, 3.0, 1.0)]);
        assert_eq!(t.environment.moving_obstacles[0].velocity, Vec2::new(0.5, 0.0));
        assert_eq!(t.environment.goal_area.position, Vec2::new(9.0, 1.0));

        let snapshot = t.snapshot(100);
        assert_eq!(snapshot.hazards.len(), 1);
        assert_eq!(snapshot.time_fraction, Some(0.12));
    }

    #[test]
    fn test_malformed_fields_default() {
        let value = json!({
            "player": { "position": "here", "velocity": [1], "is_dead": 1, "steps_taken": -3 },
            "environment": {
                "walls": [7, { "size": [2, 2] }],
                "moving_obstacles": null
            }
        });
        let t = Telemetry::from_value(&value);

        assert_eq!(t.player.position, Vec2::ZERO);
        assert_eq!(t.player.velocity, Vec2::new(1.0, 0.0));
        assert!(!t.player.is_dead);
        assert_eq!(t.player.steps_taken, 0);
        assert_eq!(t.environment.walls, vec![Wall::new(0.0, 0.0, 2.0, 2.0)]);
        assert!(t.environment.moving_obstacles.is_empty());
        assert_eq!(t.environment.goal_area, GoalArea::default());
    }

    #[test]
    fn test_wrong_container_types_default() {
        let value = json!({
            "player": [1, 2],
            "environment": {
                "walls": { "position": [1, 1] },
                "moving_obstacles": [[1, 2], { "position": [2, 3], "size": "big" }],
                "goal_area": 4
            }
        });
        let t = Telemetry::from_value(&value);

        assert_eq!(t.player, PlayerState::default());
        assert!(t.environment.walls.is_empty());
        assert_eq!(
            t.environment.moving_obstacles,
            vec![ObstacleState {
                position: Vec2::new(2.0, 3.0),
                ..Default::default()
            }]
        );
        assert_eq!(t.environment.goal_area, GoalArea::default());
    }

    #[test]
    fn test_invalid_body_is_empty() {
        assert_eq!(Telemetry::from_json("not json {"), Telemetry::default());
        assert_eq!(Telemetry::from_json("[1, 2]"), Telemetry::default());
    }
}
