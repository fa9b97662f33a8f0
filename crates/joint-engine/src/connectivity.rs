//! Which member pairs touch, and how.

use std::collections::HashSet;

use frame_types::AxisEnd;
use nalgebra::Point3;
use tracing::debug;

use crate::member::MemberId;
use crate::store::MemberStore;

/// How two members meet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Connection {
    /// An endpoint of `a` coincides with an endpoint of `b`.
    Physical { a_end: AxisEnd, b_end: AxisEnd },
    /// An endpoint of `branch` lies strictly inside the segment of `through`.
    TJunction {
        through: MemberId,
        branch: MemberId,
        branch_end: AxisEnd,
        point: Point3<f64>,
    },
}

/// Unordered identity of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey(MemberId, MemberId);

impl PairKey {
    pub fn new(a: MemberId, b: MemberId) -> Self {
        if a <= b {
            PairKey(a, b)
        } else {
            PairKey(b, a)
        }
    }
}

/// A connected pair. `a` is the first member as requested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionPair {
    pub a: MemberId,
    pub b: MemberId,
    pub connection: Connection,
}

impl ConnectionPair {
    pub fn key(&self) -> PairKey {
        PairKey::new(self.a, self.b)
    }

    pub fn is_physical(&self) -> bool {
        matches!(self.connection, Connection::Physical { .. })
    }
}

const ENDS: [AxisEnd; 2] = [AxisEnd::Start, AxisEnd::End];

/// Classify one pair. T-junctions are only considered when `include_t` is set.
pub fn classify_pair(
    store: &MemberStore,
    a: MemberId,
    b: MemberId,
    tol: f64,
    include_t: bool,
) -> Option<ConnectionPair> {
    if a == b {
        return None;
    }
    let ma = store.member(a).ok()?;
    let mb = store.member(b).ok()?;

    let mut best: Option<(f64, AxisEnd, AxisEnd)> = None;
    for ea in ENDS {
        for eb in ENDS {
            let d = (ma.world_endpoint(ea) - mb.world_endpoint(eb)).norm();
            if d < tol && best.map_or(true, |(bd, _, _)| d < bd) {
                best = Some((d, ea, eb));
            }
        }
    }
    if let Some((_, a_end, b_end)) = best {
        return Some(ConnectionPair {
            a,
            b,
            connection: Connection::Physical { a_end, b_end },
        });
    }

    if !include_t {
        return None;
    }
    let (wa, wb) = (ma.world_axis(), mb.world_axis());
    let (da, db) = (wa.direction()?, wb.direction()?);
    if da.cross(&db).norm() < tol {
        return None;
    }
    for (branch, through, branch_axis, through_axis) in [(a, b, &wa, &wb), (b, a, &wb, &wa)] {
        let len = through_axis.length();
        for end in ENDS {
            let p = branch_axis.endpoint(end);
            if through_axis.distance_to_line(&p) >= tol {
                continue;
            }
            let t = through_axis.parameter_of(&p);
            let margin = tol / len;
            if t > margin && t < 1.0 - margin {
                return Some(ConnectionPair {
                    a,
                    b,
                    connection: Connection::TJunction {
                        through,
                        branch,
                        branch_end: end,
                        point: p,
                    },
                });
            }
        }
    }
    None
}

/// Deduplicated connected pairs among `candidates`, in discovery order.
pub fn connected_pairs(
    store: &MemberStore,
    candidates: &[(MemberId, MemberId)],
    tol: f64,
    include_t: bool,
) -> Vec<ConnectionPair> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for &(a, b) in candidates {
        if !seen.insert(PairKey::new(a, b)) {
            continue;
        }
        if let Some(pair) = classify_pair(store, a, b, tol, include_t) {
            out.push(pair);
        }
    }
    debug!(candidates = candidates.len(), connected = out.len(), "connectivity analyzed");
    out
}

/// Every unordered pair of `members`, first-listed member first.
pub fn all_pairs(members: &[MemberId]) -> Vec<(MemberId, MemberId)> {
    let mut pairs = Vec::with_capacity(members.len() * members.len().saturating_sub(1) / 2);
    for (i, &a) in members.iter().enumerate() {
        for &b in &members[i + 1..] {
            pairs.push((a, b));
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Bench;
    use approx::assert_relative_eq;

    #[test]
    fn shared_corner_is_physical() {
        let mut b = Bench::new();
        let a = b.bar("a", [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 0.05);
        let c = b.bar("c", [0.0, 1.0, 0.0], [0.0, 0.0, 0.0], 0.05);
        let pair = classify_pair(&b.store, a, c, 1e-6, false).unwrap();
        assert_eq!(
            pair.connection,
            Connection::Physical {
                a_end: AxisEnd::Start,
                b_end: AxisEnd::End
            }
        );
    }

    #[test]
    fn endpoint_inside_segment_is_a_t_junction() {
        let mut b = Bench::new();
        let through = b.bar("through", [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 0.05);
        let branch = b.bar("branch", [0.5, 0.0, 0.0], [0.5, 1.0, 0.0], 0.05);
        assert!(classify_pair(&b.store, through, branch, 1e-6, false).is_none());

        let pair = classify_pair(&b.store, through, branch, 1e-6, true).unwrap();
        match pair.connection {
            Connection::TJunction {
                through: t,
                branch: br,
                branch_end,
                point,
            } => {
                assert_eq!(t, through);
                assert_eq!(br, branch);
                assert_eq!(branch_end, AxisEnd::Start);
                assert_relative_eq!(point, Point3::new(0.5, 0.0, 0.0), epsilon = 1e-12);
            }
            other => panic!("expected a T-junction, got {:?}", other),
        }
    }

    #[test]
    fn touching_the_end_of_the_through_member_is_not_a_tee() {
        let mut b = Bench::new();
        let a = b.bar("a", [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 0.05);
        let c = b.bar("c", [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], 0.05);
        let pair = classify_pair(&b.store, a, c, 1e-6, true).unwrap();
        assert!(pair.is_physical());
    }

    #[test]
    fn disjoint_members_do_not_connect() {
        let mut b = Bench::new();
        let a = b.bar("a", [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 0.05);
        let c = b.bar("c", [0.0, 0.5, 0.0], [1.0, 0.5, 0.0], 0.05);
        assert!(classify_pair(&b.store, a, c, 1e-6, true).is_none());
        assert!(classify_pair(&b.store, a, a, 1e-6, true).is_none());
    }

    #[test]
    fn reversed_duplicates_are_dropped() {
        let mut b = Bench::new();
        let a = b.bar("a", [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 0.05);
        let c = b.bar("c", [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], 0.05);
        let d = b.bar("d", [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], 0.05);
        let pairs = connected_pairs(&b.store, &[(a, c), (c, a), (a, d)], 1e-6, false);
        assert_eq!(pairs.len(), 2);
        assert_eq!((pairs[0].a, pairs[0].b), (a, c));
        assert_eq!((pairs[1].a, pairs[1].b), (a, d));
    }

    #[test]
    fn all_pairs_is_every_unordered_pair() {
        let mut b = Bench::new();
        let ids: Vec<_> = (0..4)
            .map(|i| {
                let x = i as f64;
                b.bar(&format!("m{i}"), [x, 0.0, 0.0], [x, 1.0, 0.0], 0.05)
            })
            .collect();
        let pairs = all_pairs(&ids);
        assert_eq!(pairs.len(), 6);
        assert!(pairs.iter().all(|(a, c)| a != c));
    }
}
