//! Latitude-partitioned ball tree used to find the nearest existing spot.
//!
//! The tree splits on latitude only: every node holds one point, its left
//! subtree holds points with latitude `<=` the node's, its right subtree points
//! with latitude `>=` the node's (ties go right on insertion and either side on
//! build).
//!
//! # Rebalancing
//!
//! Insertion descends like a plain binary search tree and attaches a leaf.
//! On the way back up every ancestor compares the heights of its two
//! subtrees; when the difference exceeds the imbalance tolerance the whole
//! subtree is collected in order and rebuilt by median splitting. The lowest
//! unbalanced ancestor is rebuilt first and the check continues up to the root
//! on the new heights. There are no rotations: an ordinary insertion costs
//! O(height), a rebalancing one O(s log s) for a subtree of s points. A freshly
//! built subtree has height difference at most 1 everywhere, so it needs at
//! least `tolerance` further insertions below it before it can be rebuilt
//! again.
//!
//! # Query pruning
//!
//! [`PruningMode::LatitudeDelta`] is the historical rule: after searching the
//! child on the target's side, the sibling is searched when
//! `target.lat + worst >= node.lat` (sibling on the right) or
//! `target.lat - worst <= node.lat` (sibling on the left), where `worst` is the
//! largest distance kept so far. `worst` is in meters and the latitudes are in
//! degrees. A degree of latitude spans about 111 km, so the rule never skips a
//! closer point, but it rarely skips anything unless `worst` is below a few
//! meters. Outputs of existing graphs depend on it and it is the default.
//!
//! [`PruningMode::SubtreeRadius`] uses the radius cached in every node (the
//! largest haversine distance from the node's point to any point below it).
//! By the triangle inequality no point in a child subtree is closer than
//! `d(target, child) - child.radius`, so the child is skipped only when that
//! bound exceeds `worst` and the result list is already full.

use crate::spatial::{Neighbor, haversine_distance};
use geo::Point;
use geonet_types::point::SpotPoint;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Rule deciding whether the sibling subtree is searched during a k-NN query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PruningMode {
    /// Compare the worst kept distance against the raw latitude delta
    #[default]
    LatitudeDelta,
    /// Use the cached subtree radius as a lower bound on distance
    SubtreeRadius,
}

#[derive(Debug)]
struct TreeNode {
    point: SpotPoint,
    /// Height of the subtree rooted here, a leaf has height 1
    height: usize,
    /// Largest haversine distance from `point` to any point of the subtree
    radius: f64,
    left: Option<Box<TreeNode>>,
    right: Option<Box<TreeNode>>,
}

impl TreeNode {
    fn leaf(point: SpotPoint) -> Self {
        Self {
            point,
            height: 1,
            radius: 0.0,
            left: None,
            right: None,
        }
    }

    fn refresh_height(&mut self) {
        self.height = 1 + height_of(&self.left).max(height_of(&self.right));
    }

    fn imbalance(&self) -> usize {
        height_of(&self.left).abs_diff(height_of(&self.right))
    }

    fn max_imbalance(&self) -> usize {
        let left = self.left.as_deref().map_or(0, TreeNode::max_imbalance);
        let right = self.right.as_deref().map_or(0, TreeNode::max_imbalance);
        self.imbalance().max(left).max(right)
    }

    fn collect_in_order(&self, out: &mut Vec<SpotPoint>) {
        if let Some(left) = self.left.as_deref() {
            left.collect_in_order(out);
        }
        out.push(self.point);
        if let Some(right) = self.right.as_deref() {
            right.collect_in_order(out);
        }
    }

    fn into_points(self: Box<Self>, out: &mut Vec<SpotPoint>) {
        let TreeNode {
            point, left, right, ..
        } = *self;
        if let Some(left) = left {
            left.into_points(out);
        }
        out.push(point);
        if let Some(right) = right {
            right.into_points(out);
        }
    }
}

fn height_of(slot: &Option<Box<TreeNode>>) -> usize {
    slot.as_ref().map_or(0, |node| node.height)
}

/// Build a subtree by median split on latitude.
fn build_subtree(mut points: Vec<SpotPoint>) -> Option<Box<TreeNode>> {
    points.sort_by(|a, b| a.latitude().total_cmp(&b.latitude()));
    build_sorted(&points)
}

fn build_sorted(points: &[SpotPoint]) -> Option<Box<TreeNode>> {
    if points.is_empty() {
        return None;
    }

    let median = points.len() / 2;
    let point = points[median];
    let radius = points
        .iter()
        .map(|member| haversine_distance(&point.point, &member.point))
        .fold(0.0, f64::max);

    let left = build_sorted(&points[..median]);
    let right = build_sorted(&points[median + 1..]);
    let height = 1 + height_of(&left).max(height_of(&right));

    Some(Box::new(TreeNode {
        point,
        height,
        radius,
        left,
        right,
    }))
}

/// Rebuild bookkeeping threaded through one insertion.
struct Rebalance {
    tolerance: usize,
    rebuilds: u64,
    rebuilt_points: u64,
}

impl Rebalance {
    fn rebuild(&mut self, slot: &mut Option<Box<TreeNode>>) {
        let Some(node) = slot.take() else {
            return;
        };

        let height_before = node.height;
        let mut points = Vec::new();
        node.into_points(&mut points);

        log::info!(
            "balancing ball tree node, height: {}, points: {}",
            height_before,
            points.len()
        );

        self.rebuilds += 1;
        self.rebuilt_points += points.len() as u64;
        *slot = build_subtree(points);

        log::info!("node balancing done, height: {}", height_of(slot));
    }
}

fn insert_into(slot: &mut Option<Box<TreeNode>>, point: SpotPoint, rebalance: &mut Rebalance) {
    let Some(node) = slot.as_deref_mut() else {
        *slot = Some(Box::new(TreeNode::leaf(point)));
        return;
    };

    node.radius = node
        .radius
        .max(haversine_distance(&node.point.point, &point.point));

    if point.latitude() < node.point.latitude() {
        insert_into(&mut node.left, point, rebalance);
    } else {
        insert_into(&mut node.right, point, rebalance);
    }

    node.refresh_height();
    if node.imbalance() > rebalance.tolerance {
        rebalance.rebuild(slot);
    }
}

/// Bounded, ascending list of the best neighbors found so far.
struct BestList {
    k: usize,
    items: SmallVec<[Neighbor; 4]>,
}

impl BestList {
    fn new(k: usize) -> Self {
        Self {
            k,
            items: SmallVec::new(),
        }
    }

    /// Keep `candidate` if it ranks among the k best. Equal distances keep
    /// the earlier entry in front; a NaN distance ranks nowhere.
    fn offer(&mut self, candidate: Neighbor) {
        if candidate.distance.is_nan() {
            return;
        }
        let position = self
            .items
            .partition_point(|kept| kept.distance <= candidate.distance);
        if position >= self.k {
            return;
        }
        self.items.insert(position, candidate);
        self.items.truncate(self.k);
    }

    fn worst(&self) -> f64 {
        self.items.last().map_or(f64::INFINITY, |n| n.distance)
    }

    fn is_full(&self) -> bool {
        self.items.len() >= self.k
    }

    fn may_improve(&self, lower_bound: f64) -> bool {
        !self.is_full() || lower_bound <= self.worst()
    }

    fn into_vec(self) -> Vec<Neighbor> {
        self.items.into_vec()
    }
}

/// Summary of the index shape, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpatialIndexStats {
    /// Number of stored points
    pub points: usize,
    pub height: usize,
    /// Subtree rebuilds triggered by insertions
    pub rebuilds: u64,
    /// Points moved by those rebuilds, counted once per rebuild
    pub rebuilt_points: u64,
    /// Largest height difference between sibling subtrees
    pub max_imbalance: usize,
}

/// Ball tree over spot points.
///
/// # Examples
///
/// ```rust
/// use geonet::{NodeId, Point, PruningMode, SpatialIndex, SpotPoint};
///
/// let mut index = SpatialIndex::new(1, PruningMode::LatitudeDelta);
/// index.insert(SpotPoint::from_lat_lon(52.5200, 13.4050, NodeId(0))); // Berlin
/// index.insert(SpotPoint::from_lat_lon(48.8566, 2.3522, NodeId(1))); // Paris
///
/// let nearest = index.nearest(&Point::new(2.35, 48.85)).unwrap();
/// assert_eq!(nearest.point.id, NodeId(1));
/// ```
#[derive(Debug)]
pub struct SpatialIndex {
    root: Option<Box<TreeNode>>,
    len: usize,
    imbalance_tolerance: usize,
    pruning: PruningMode,
    rebuilds: u64,
    rebuilt_points: u64,
}

impl SpatialIndex {
    /// Create an empty index.
    pub fn new(imbalance_tolerance: usize, pruning: PruningMode) -> Self {
        Self {
            root: None,
            len: 0,
            imbalance_tolerance,
            pruning,
            rebuilds: 0,
            rebuilt_points: 0,
        }
    }

    /// Build an index from a set of points by recursive median split.
    pub fn build(points: Vec<SpotPoint>, imbalance_tolerance: usize, pruning: PruningMode) -> Self {
        let len = points.len();
        Self {
            root: build_subtree(points),
            len,
            ..Self::new(imbalance_tolerance, pruning)
        }
    }

    /// Insert a point, rebuilding any ancestor subtree that becomes unbalanced.
    pub fn insert(&mut self, point: SpotPoint) {
        let mut rebalance = Rebalance {
            tolerance: self.imbalance_tolerance,
            rebuilds: 0,
            rebuilt_points: 0,
        };

        insert_into(&mut self.root, point, &mut rebalance);

        self.len += 1;
        self.rebuilds += rebalance.rebuilds;
        self.rebuilt_points += rebalance.rebuilt_points;
    }

    /// Return up to `k` stored points closest to `target`, nearest first.
    ///
    /// An empty index or `k == 0` gives an empty result.
    pub fn query(&self, target: &Point, k: usize) -> Vec<Neighbor> {
        let Some(root) = self.root.as_deref() else {
            return Vec::new();
        };
        if k == 0 {
            return Vec::new();
        }

        let mut best = BestList::new(k);
        let distance = haversine_distance(target, &root.point.point);
        self.search(root, distance, target, &mut best);
        best.into_vec()
    }

    /// The single closest point, if the index is not empty.
    pub fn nearest(&self, target: &Point) -> Option<Neighbor> {
        self.query(target, 1).into_iter().next()
    }

    fn search(&self, node: &TreeNode, distance: f64, target: &Point, best: &mut BestList) {
        best.offer(Neighbor {
            distance,
            point: node.point,
        });

        let target_lat = target.y();
        let node_lat = node.point.latitude();
        let target_below = target_lat < node_lat;
        let (near, far) = if target_below {
            (node.left.as_deref(), node.right.as_deref())
        } else {
            (node.right.as_deref(), node.left.as_deref())
        };

        if let Some(child) = near {
            let child_distance = haversine_distance(target, &child.point.point);
            let visit = match self.pruning {
                PruningMode::LatitudeDelta => true,
                PruningMode::SubtreeRadius => best.may_improve(child_distance - child.radius),
            };
            if visit {
                self.search(child, child_distance, target, best);
            }
        }

        if let Some(child) = far {
            let child_distance = haversine_distance(target, &child.point.point);
            let visit = match self.pruning {
                PruningMode::LatitudeDelta => {
                    let worst = best.worst();
                    if target_below {
                        target_lat + worst >= node_lat
                    } else {
                        target_lat - worst <= node_lat
                    }
                }
                PruningMode::SubtreeRadius => best.may_improve(child_distance - child.radius),
            };
            if visit {
                self.search(child, child_distance, target, best);
            }
        }
    }

    /// Height of the tree, 0 when empty.
    pub fn height(&self) -> usize {
        height_of(&self.root)
    }

    /// All stored points in order of latitude (in-order traversal).
    pub fn points(&self) -> Vec<SpotPoint> {
        let mut out = Vec::with_capacity(self.len);
        if let Some(root) = self.root.as_deref() {
            root.collect_in_order(&mut out);
        }
        out
    }

    /// Collect every point and rebuild the whole tree from scratch.
    pub fn rebuild(&mut self) {
        let mut rebalance = Rebalance {
            tolerance: self.imbalance_tolerance,
            rebuilds: 0,
            rebuilt_points: 0,
        };
        rebalance.rebuild(&mut self.root);
        self.rebuilds += rebalance.rebuilds;
        self.rebuilt_points += rebalance.rebuilt_points;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn imbalance_tolerance(&self) -> usize {
        self.imbalance_tolerance
    }

    pub fn pruning(&self) -> PruningMode {
        self.pruning
    }

    /// Largest height difference between sibling subtrees anywhere in the tree.
    pub fn max_imbalance(&self) -> usize {
        self.root.as_deref().map_or(0, TreeNode::max_imbalance)
    }

    pub fn stats(&self) -> SpatialIndexStats {
        SpatialIndexStats {
            points: self.len,
            height: self.height(),
            rebuilds: self.rebuilds,
            rebuilt_points: self.rebuilt_points,
            max_imbalance: self.max_imbalance(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::knn;
    use geonet_types::point::NodeId;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn cities() -> Vec<SpotPoint> {
        vec![
            SpotPoint::from_lat_lon(52.5200, 13.4050, NodeId(0)),   // Berlin
            SpotPoint::from_lat_lon(48.8566, 2.3522, NodeId(1)),    // Paris
            SpotPoint::from_lat_lon(40.7128, -74.0060, NodeId(2)),  // New York
            SpotPoint::from_lat_lon(34.0522, -118.2437, NodeId(3)), // Los Angeles
        ]
    }

    fn random_points(rng: &mut StdRng, count: usize, lat: (f64, f64)) -> Vec<SpotPoint> {
        (0..count)
            .map(|i| {
                SpotPoint::from_lat_lon(
                    rng.random_range(lat.0..=lat.1),
                    rng.random_range(-180.0..=180.0),
                    NodeId(i as u64),
                )
            })
            .collect()
    }

    fn sorted_ids(points: &[SpotPoint]) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = points.iter().map(|p| p.id).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_empty_index() {
        let index = SpatialIndex::new(1, PruningMode::LatitudeDelta);

        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.height(), 0);
        assert!(index.query(&Point::new(0.0, 0.0), 3).is_empty());
        assert!(index.nearest(&Point::new(0.0, 0.0)).is_none());
        assert!(index.points().is_empty());
    }

    #[test]
    fn test_build_from_empty_set() {
        let index = SpatialIndex::build(Vec::new(), 1, PruningMode::LatitudeDelta);
        assert!(index.is_empty());
        assert_eq!(index.height(), 0);
    }

    #[test]
    fn test_query_with_zero_k() {
        let index = SpatialIndex::build(cities(), 1, PruningMode::LatitudeDelta);
        assert!(index.query(&Point::new(0.0, 0.0), 0).is_empty());
    }

    #[test]
    fn test_inserted_cities_query() {
        for tolerance in [1, 150] {
            for pruning in [PruningMode::LatitudeDelta, PruningMode::SubtreeRadius] {
                let mut index = SpatialIndex::new(tolerance, pruning);
                for city in cities() {
                    index.insert(city);
                }

                let la = Point::new(-118.2437, 34.0522);
                let nearest = index.query(&la, 2);

                assert_eq!(nearest.len(), 2);
                assert_eq!(nearest[0].point.id, NodeId(3));
                assert_eq!(nearest[0].distance, 0.0);
                assert_eq!(nearest[1].point.id, NodeId(2));
                assert!((nearest[1].distance - 3_935_746.25).abs() < 0.01);
            }
        }
    }

    #[test]
    fn test_built_cities_query() {
        let index = SpatialIndex::build(cities(), 1, PruningMode::LatitudeDelta);
        let nearest = index.query(&Point::new(-118.2437, 34.0522), 2);

        let ids: Vec<NodeId> = nearest.iter().map(|n| n.point.id).collect();
        assert_eq!(ids, vec![NodeId(3), NodeId(2)]);
    }

    #[test]
    fn test_build_splits_at_median() {
        let index = SpatialIndex::build(cities(), 1, PruningMode::LatitudeDelta);

        // 4 points: sorted LA, NY, Paris, Berlin, median index 2 is Paris
        let root = index.root.as_deref().unwrap();
        assert_eq!(root.point.id, NodeId(1));
        assert_eq!(index.height(), 3);

        let latitudes: Vec<f64> = index.points().iter().map(|p| p.latitude()).collect();
        assert_eq!(latitudes, vec![34.0522, 40.7128, 48.8566, 52.5200]);
    }

    #[test]
    fn test_build_is_balanced() {
        let mut rng = StdRng::seed_from_u64(11);
        let points = random_points(&mut rng, 1000, (-60.0, 60.0));
        let index = SpatialIndex::build(points, 1, PruningMode::LatitudeDelta);

        assert_eq!(index.len(), 1000);
        // floor(log2(1000)) + 1
        assert_eq!(index.height(), 10);
        assert!(index.max_imbalance() <= 1);
    }

    #[test]
    fn test_strict_tolerance_holds_after_every_insert() {
        let mut index = SpatialIndex::new(1, PruningMode::LatitudeDelta);

        // A track heading north always descends right, the worst case
        for i in 0..300 {
            index.insert(SpotPoint::from_lat_lon(
                45.0 + i as f64 * 0.001,
                7.0,
                NodeId(i),
            ));
            assert!(index.max_imbalance() <= 1, "unbalanced after insert {}", i);
        }

        let stats = index.stats();
        assert_eq!(stats.points, 300);
        assert!(stats.rebuilds > 0);
        assert!(stats.height <= 12);
    }

    #[test]
    fn test_loose_tolerance_defers_rebuilds() {
        let mut strict = SpatialIndex::new(1, PruningMode::LatitudeDelta);
        let mut loose = SpatialIndex::new(150, PruningMode::LatitudeDelta);

        for i in 0..400 {
            let point = SpotPoint::from_lat_lon(-10.0 + i as f64 * 0.01, 20.0, NodeId(i));
            strict.insert(point);
            loose.insert(point);
            assert!(loose.max_imbalance() <= 150);
        }

        assert!(loose.stats().rebuilds < strict.stats().rebuilds);
        assert!(loose.height() > strict.height());
        assert!(loose.stats().rebuilds >= 1);
    }

    #[test]
    fn test_reflexive_query() {
        let mut rng = StdRng::seed_from_u64(3);
        let points = random_points(&mut rng, 300, (-89.0, 89.0));

        for pruning in [PruningMode::LatitudeDelta, PruningMode::SubtreeRadius] {
            let mut index = SpatialIndex::new(2, pruning);
            for point in &points {
                index.insert(*point);
            }

            for point in &points {
                let nearest = index.nearest(&point.point).unwrap();
                assert_eq!(nearest.distance, 0.0);
                assert_eq!(nearest.point.point, point.point);
            }
        }
    }

    #[test]
    fn test_rebuild_keeps_point_set() {
        let mut rng = StdRng::seed_from_u64(5);
        let points = random_points(&mut rng, 257, (-30.0, 70.0));

        let mut index = SpatialIndex::new(150, PruningMode::LatitudeDelta);
        for point in &points {
            index.insert(*point);
        }
        let before = sorted_ids(&index.points());

        index.rebuild();
        let after = sorted_ids(&index.points());

        assert_eq!(before, after);
        assert_eq!(after, sorted_ids(&points));
        assert_eq!(index.len(), 257);
        assert!(index.max_imbalance() <= 1);
    }

    #[test]
    fn test_points_are_in_latitude_order() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut index = SpatialIndex::new(3, PruningMode::LatitudeDelta);
        for point in random_points(&mut rng, 200, (-80.0, 80.0)) {
            index.insert(point);
        }

        let points = index.points();
        assert_eq!(points.len(), 200);
        assert!(points.windows(2).all(|w| w[0].latitude() <= w[1].latitude()));
    }

    #[test]
    fn test_k_larger_than_size_returns_everything_sorted() {
        let index = SpatialIndex::build(cities(), 1, PruningMode::SubtreeRadius);
        let nearest = index.query(&Point::new(13.4, 52.5), 10);

        assert_eq!(nearest.len(), 4);
        assert_eq!(nearest[0].point.id, NodeId(0));
        assert!(nearest.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_duplicate_coordinates() {
        let mut index = SpatialIndex::new(1, PruningMode::LatitudeDelta);
        for i in 0..5 {
            index.insert(SpotPoint::from_lat_lon(10.0, 10.0, NodeId(i)));
        }

        let nearest = index.query(&Point::new(10.0, 10.0), 3);
        assert_eq!(nearest.len(), 3);
        assert!(nearest.iter().all(|n| n.distance == 0.0));
    }

    #[test]
    fn test_best_list_keeps_first_of_equal_distances() {
        let a = SpotPoint::from_lat_lon(0.0, 1.0, NodeId(0));
        let b = SpotPoint::from_lat_lon(0.0, -1.0, NodeId(1));

        let mut best = BestList::new(1);
        best.offer(Neighbor { distance: 5.0, point: a });
        best.offer(Neighbor { distance: 5.0, point: b });
        best.offer(Neighbor { distance: 7.0, point: b });

        let kept = best.into_vec();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].point.id, NodeId(0));
    }

    #[test]
    fn test_best_list_ignores_nan_distance() {
        let a = SpotPoint::from_lat_lon(0.0, 1.0, NodeId(0));
        let b = SpotPoint::from_lat_lon(0.0, -1.0, NodeId(1));

        let mut best = BestList::new(1);
        best.offer(Neighbor { distance: 10.0, point: a });
        best.offer(Neighbor { distance: f64::NAN, point: b });
        assert_eq!(best.worst(), 10.0);

        let kept = best.into_vec();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].point.id, NodeId(0));

        // A NaN offered into an empty list does not fill it either
        let mut best = BestList::new(2);
        best.offer(Neighbor { distance: f64::NAN, point: b });
        assert!(!best.is_full());
        best.offer(Neighbor { distance: 3.0, point: a });
        assert_eq!(best.into_vec().len(), 1);
    }

    #[test]
    fn test_nearest_beside_antipodal_spot() {
        let target = Point::new(-65.8878472637746, -67.59805069954345);
        let near = SpotPoint::new(
            Point::new(target.x(), target.y() + 10.0 / 111_194.926_644_558_73),
            NodeId(0),
        );
        let antipode = SpotPoint::from_lat_lon(67.59805040309126, 114.11215339695579, NodeId(1));

        for pruning in [PruningMode::LatitudeDelta, PruningMode::SubtreeRadius] {
            let mut index = SpatialIndex::new(1, pruning);
            index.insert(near);
            index.insert(antipode);

            let found = index.query(&target, 2);
            assert_eq!(found.len(), 2);
            assert_eq!(found[0].point.id, NodeId(0));
            assert!((found[0].distance - 10.0).abs() < 1e-6);
            assert!(found[1].distance.is_finite());
        }
    }

    /// Both pruning rules are kept; the latitude-delta rule stays the default
    /// and matches a full scan on these data sets, including polar clusters,
    /// antimeridian crossings and repeated latitudes.
    #[test]
    fn test_pruning_modes_match_brute_force() {
        assert_eq!(PruningMode::default(), PruningMode::LatitudeDelta);

        let mut rng = StdRng::seed_from_u64(42);
        let layouts = [(-90.0, 90.0), (84.0, 90.0), (-90.0, -86.0), (-0.5, 0.5)];

        for (round, lat_range) in layouts.iter().cycle().take(40).enumerate() {
            let count = rng.random_range(1..120);
            let mut points = random_points(&mut rng, count, *lat_range);
            if round % 4 == 3 {
                // Many shared latitudes
                for point in &mut points {
                    let lat = (point.latitude() * 10.0).round() / 10.0;
                    *point = SpotPoint::from_lat_lon(lat, point.longitude(), point.id);
                }
            }

            for pruning in [PruningMode::LatitudeDelta, PruningMode::SubtreeRadius] {
                let (seed, rest) = points.split_at(points.len() / 2);
                let mut index = SpatialIndex::build(seed.to_vec(), 2, pruning);
                for point in rest {
                    index.insert(*point);
                }

                for _ in 0..10 {
                    let target = Point::new(
                        rng.random_range(-180.0..=180.0),
                        rng.random_range(lat_range.0..=lat_range.1),
                    );
                    let k = rng.random_range(1..=5);

                    let expected: Vec<f64> =
                        knn(&target, &points, k).iter().map(|n| n.distance).collect();
                    let actual: Vec<f64> =
                        index.query(&target, k).iter().map(|n| n.distance).collect();

                    assert_eq!(expected.len(), actual.len());
                    for (e, a) in expected.iter().zip(&actual) {
                        assert!((e - a).abs() < 1e-6, "{:?}: {} vs {}", pruning, e, a);
                    }
                }
            }
        }
    }

    #[test]
    fn test_subtree_radius_covers_members() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut index = SpatialIndex::new(4, PruningMode::SubtreeRadius);
        for point in random_points(&mut rng, 150, (40.0, 50.0)) {
            index.insert(point);
        }

        fn check(node: &TreeNode) {
            let mut members = Vec::new();
            node.collect_in_order(&mut members);
            for member in members {
                let d = haversine_distance(&node.point.point, &member.point);
                assert!(d <= node.radius + 1e-9);
            }
            if let Some(left) = node.left.as_deref() {
                check(left);
            }
            if let Some(right) = node.right.as_deref() {
                check(right);
            }
        }

        check(index.root.as_deref().unwrap());
    }
}
