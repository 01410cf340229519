// Spawn-level queries over decoded tiles.
//
// Line of sight is answered by intersecting one bounded ray against every
// spawn's box and keeping the nearest hit. No caching or tile eviction
// happens here; callers decide which tiles to load and for how long.

use crate::math::Vector3;
use crate::ray::{Ray, RayHit};
use crate::spawn::ModelSpawn;

/// A ray hit attributed to the spawn whose bound was struck.
#[derive(Clone, Copy, Debug)]
pub struct SpawnHit<'a> {
    pub spawn: &'a ModelSpawn,
    pub hit: RayHit,
}

/// Intersect `ray` against every spawn's bound and return the hit with
/// the minimum parametric distance, if any.
pub fn nearest_hit<'a>(ray: &Ray, spawns: &'a [ModelSpawn]) -> Option<SpawnHit<'a>> {
    let mut nearest: Option<SpawnHit<'a>> = None;
    for spawn in spawns {
        let Some(hit) = ray.intersect(&spawn.bound) else {
            continue;
        };
        match nearest {
            Some(best) if best.hit.distance <= hit.distance => {}
            _ => nearest = Some(SpawnHit { spawn, hit }),
        }
    }
    nearest
}

/// Check the sight line from `from` to `to` against the given spawns.
///
/// Returns the nearest blocking hit, or `None` when the line is clear.
/// Identical endpoints trivially have nothing to obstruct.
pub fn line_of_sight<'a>(
    from: Vector3,
    to: Vector3,
    spawns: &'a [ModelSpawn],
) -> Option<SpawnHit<'a>> {
    nearest_hit(&Ray::between(from, to), spawns)
}

/// Spawns whose position lies within `radius` of `center`, paired with
/// their distance and ordered nearest first.
pub fn spawns_in_radius<'a>(
    center: Vector3,
    radius: f32,
    spawns: &'a [ModelSpawn],
) -> Vec<(&'a ModelSpawn, f32)> {
    let mut found: Vec<(&ModelSpawn, f32)> = spawns
        .iter()
        .map(|spawn| (spawn, center.distance(spawn.position)))
        .filter(|(_, distance)| *distance <= radius)
        .collect();
    found.sort_by(|a, b| a.1.total_cmp(&b.1));
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::AABox;
    use crate::spawn::MOD_HAS_BOUND;

    fn spawn_at(id: u32, center: Vector3, half: f32) -> ModelSpawn {
        ModelSpawn {
            flags: MOD_HAS_BOUND,
            adt_id: 0,
            id,
            position: center,
            rotation: Vector3::ZERO,
            scale: 1.0,
            bound: AABox::new(
                center - Vector3::new(half, half, half),
                center + Vector3::new(half, half, half),
            ),
            name: format!("model_{}.wmo", id),
        }
    }

    #[test]
    fn test_nearest_hit_picks_closer_spawn() {
        let spawns = vec![
            spawn_at(1, Vector3::new(0.0, 0.0, 20.0), 1.0),
            spawn_at(2, Vector3::new(0.0, 0.0, 5.0), 1.0),
        ];
        let ray = Ray::new(Vector3::ZERO, Vector3::new(0.0, 0.0, 1.0), 100.0);

        let hit = nearest_hit(&ray, &spawns).unwrap();
        assert_eq!(hit.spawn.id, 2);
        assert_eq!(hit.hit.distance, 4.0);
    }

    #[test]
    fn test_line_of_sight_blocked_and_clear() {
        let spawns = vec![spawn_at(7, Vector3::new(0.0, 0.0, 10.0), 2.0)];

        let blocked =
            line_of_sight(Vector3::ZERO, Vector3::new(0.0, 0.0, 30.0), &spawns).unwrap();
        assert_eq!(blocked.spawn.id, 7);
        assert_eq!(blocked.hit.distance, 8.0);

        // The segment ends before the obstacle.
        assert!(line_of_sight(Vector3::ZERO, Vector3::new(0.0, 0.0, 6.0), &spawns).is_none());
        // A sideways segment never crosses the box.
        assert!(
            line_of_sight(Vector3::ZERO, Vector3::new(30.0, 0.0, 0.0), &spawns).is_none()
        );
    }

    #[test]
    fn test_line_of_sight_identical_endpoints_is_clear() {
        let p = Vector3::new(0.0, 0.0, 10.0);
        let spawns = vec![spawn_at(1, Vector3::new(50.0, 0.0, 0.0), 2.0)];
        assert!(line_of_sight(p, p, &spawns).is_none());
    }

    #[test]
    fn test_spawns_in_radius_sorted_and_bounded() {
        let spawns = vec![
            spawn_at(1, Vector3::new(10.0, 0.0, 0.0), 1.0),
            spawn_at(2, Vector3::new(3.0, 0.0, 0.0), 1.0),
            spawn_at(3, Vector3::new(0.0, 40.0, 0.0), 1.0),
            spawn_at(4, Vector3::new(0.0, 0.0, 25.0), 1.0),
        ];

        let found = spawns_in_radius(Vector3::ZERO, 25.0, &spawns);
        let ids: Vec<u32> = found.iter().map(|(s, _)| s.id).collect();
        // Radius is inclusive, ordering nearest first.
        assert_eq!(ids, vec![2, 1, 4]);
        assert_eq!(found[0].1, 3.0);
        assert_eq!(found[2].1, 25.0);
    }

    #[test]
    fn test_unbounded_spawn_is_a_point_obstacle() {
        // A spawn without stored bounds decodes to the zero box at the
        // origin; it only blocks rays that pass exactly through (0,0,0).
        let spawn = ModelSpawn {
            flags: 0,
            adt_id: 0,
            id: 9,
            position: Vector3::new(5.0, 5.0, 5.0),
            rotation: Vector3::ZERO,
            scale: 1.0,
            bound: AABox::default(),
            name: "no_bounds.m2".to_string(),
        };
        let spawns = vec![spawn];

        assert!(line_of_sight(
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            &spawns
        )
        .is_some());
        assert!(line_of_sight(
            Vector3::new(-1.0, 2.0, 0.0),
            Vector3::new(1.0, 2.0, 0.0),
            &spawns
        )
        .is_none());
    }
}
