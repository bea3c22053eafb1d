//! Incremental force-directed layout.
//!
//! Forces follow the Fruchterman-Reingold shape: pairwise repulsion falling
//! off with squared distance, spring attraction along edges toward a target
//! length. Unlike a batch layout, the engine persists per-node velocities
//! across ticks so a topology change is a sparse patch (seed the new nodes,
//! keep everything else as a warm start) rather than a full relayout.

use std::collections::{HashMap, HashSet};

use rand::Rng;

use crate::graph::model::{Graph, NodeId, Point};

#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Desired edge length in world units.
    pub target_edge_len: f32,
    /// Strength of the 1/d² pair repulsion.
    pub repulsion: f32,
    /// Spring constant for edge attraction.
    pub spring: f32,
    /// Velocity retained per integration step (< 1).
    pub damping: f32,
    /// Integration timestep.
    pub timestep: f32,
    /// Per-node displacement cap per pass, in world units.
    pub max_step: f32,
    /// Converged when no node moves further than this in a pass.
    pub convergence_eps: f32,
    /// Force/integration passes per tick, so input latency stays bounded.
    pub passes_per_tick: usize,
    /// Radius of the random offset applied when seeding a new node.
    pub seed_jitter: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            target_edge_len: 10.0,
            repulsion: 120.0,
            spring: 0.08,
            damping: 0.85,
            timestep: 0.9,
            max_step: 2.5,
            convergence_eps: 0.02,
            passes_per_tick: 3,
            seed_jitter: 2.0,
        }
    }
}

#[derive(Debug)]
pub struct LayoutEngine {
    config: LayoutConfig,
    velocities: HashMap<NodeId, (f32, f32)>,
    seen_revision: u64,
    spawned_isolated: usize,
    converged: bool,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            velocities: HashMap::new(),
            seen_revision: 0,
            spawned_isolated: 0,
            converged: false,
        }
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Reset convergence without reseeding. Called on pin-state changes and
    /// manual node drags, which move mass without touching topology.
    pub fn invalidate(&mut self) {
        self.converged = false;
    }

    /// Consume the store's topology-changed notification: drop simulation
    /// state for removed nodes, seed unseen nodes near their neighbors'
    /// centroid, and restart the simulation. Existing nodes keep position
    /// and velocity.
    pub fn sync(&mut self, graph: &mut Graph) {
        if graph.revision() == self.seen_revision {
            return;
        }
        self.velocities.retain(|id, _| graph.node(*id).is_some());

        let unseen: Vec<NodeId> = graph
            .node_ids()
            .into_iter()
            .filter(|id| !self.velocities.contains_key(id))
            .collect();
        let mut rng = rand::thread_rng();
        for id in unseen {
            let pos = self.seed_position(graph, id, &mut rng);
            if let Some(node) = graph.node_mut(id) {
                node.pos = pos;
            }
            self.velocities.insert(id, (0.0, 0.0));
        }

        self.seen_revision = graph.revision();
        self.converged = false;
    }

    fn seed_position(&mut self, graph: &Graph, id: NodeId, rng: &mut impl Rng) -> Point {
        let j = self.config.seed_jitter;
        let known: Vec<Point> = graph
            .neighbors(id)
            .into_iter()
            .filter(|n| self.velocities.contains_key(n))
            .filter_map(|n| graph.node(n).map(|node| node.pos))
            .collect();
        if !known.is_empty() {
            let cx = known.iter().map(|p| p.x).sum::<f32>() / known.len() as f32;
            let cy = known.iter().map(|p| p.y).sum::<f32>() / known.len() as f32;
            return Point::new(
                cx + rng.gen_range(-j..=j),
                cy + rng.gen_range(-j..=j),
            );
        }

        // No placed neighbor: walk a golden-angle spiral out from the origin
        // so bulk loads start spread instead of stacked.
        let k = self.spawned_isolated as f32;
        self.spawned_isolated += 1;
        let angle = k * 2.399_963;
        let radius = self.config.target_edge_len * (k + 1.0).sqrt();
        Point::new(
            radius * angle.cos() + rng.gen_range(-j..=j),
            radius * angle.sin() + rng.gen_range(-j..=j),
        )
    }

    /// Register a node the controller placed explicitly (created at the view
    /// center). The node joins the simulation where it is instead of being
    /// reseeded on the next sync.
    pub fn place(&mut self, graph: &mut Graph, id: NodeId, pos: Point) {
        if let Some(node) = graph.node_mut(id) {
            node.pos = pos;
        }
        self.velocities.insert(id, (0.0, 0.0));
        self.converged = false;
    }

    /// Run one bounded simulation tick. Returns the maximum node
    /// displacement seen in the final pass; sets the convergence flag when
    /// it drops below the threshold. A converged engine ticks for free.
    pub fn tick(&mut self, graph: &mut Graph) -> f32 {
        if self.converged || graph.node_count() < 2 {
            if graph.node_count() < 2 {
                self.converged = true;
            }
            return 0.0;
        }

        let ids = graph.node_ids();
        let pinned: HashSet<NodeId> = graph
            .nodes()
            .filter(|n| n.pinned)
            .map(|n| n.id)
            .collect();
        let springs: Vec<(NodeId, NodeId, f32)> = graph
            .edges()
            .map(|e| (e.a, e.b, e.weight.unwrap_or(1.0)))
            .collect();
        let mut positions: HashMap<NodeId, Point> = ids
            .iter()
            .filter_map(|id| graph.node(*id).map(|n| (*id, n.pos)))
            .collect();

        let cfg = &self.config;
        let mut max_disp = 0.0f32;

        for _ in 0..cfg.passes_per_tick {
            let mut forces: HashMap<NodeId, (f32, f32)> =
                ids.iter().map(|id| (*id, (0.0, 0.0))).collect();

            // Repulsion between all pairs, pinned nodes included as sources.
            for i in 0..ids.len() {
                for k in (i + 1)..ids.len() {
                    let (pi, pk) = (positions[&ids[i]], positions[&ids[k]]);
                    let dx = pi.x - pk.x;
                    let dy = pi.y - pk.y;
                    let dist_sq = (dx * dx + dy * dy).max(0.01);
                    let dist = dist_sq.sqrt();
                    let push = cfg.repulsion / dist_sq;
                    let fx = (dx / dist) * push;
                    let fy = (dy / dist) * push;
                    let fi = forces.get_mut(&ids[i]).expect("force slot");
                    fi.0 += fx;
                    fi.1 += fy;
                    let fk = forces.get_mut(&ids[k]).expect("force slot");
                    fk.0 -= fx;
                    fk.1 -= fy;
                }
            }

            // Spring attraction along edges, proportional to the deviation
            // from the target length and scaled by edge weight.
            for (a, b, weight) in &springs {
                let (Some(&pa), Some(&pb)) = (positions.get(a), positions.get(b)) else {
                    continue;
                };
                let dx = pb.x - pa.x;
                let dy = pb.y - pa.y;
                let dist = (dx * dx + dy * dy).sqrt().max(0.01);
                let stretch = dist - cfg.target_edge_len;
                let pull = cfg.spring * stretch * weight;
                let fx = (dx / dist) * pull;
                let fy = (dy / dist) * pull;
                if let Some(fa) = forces.get_mut(a) {
                    fa.0 += fx;
                    fa.1 += fy;
                }
                if let Some(fb) = forces.get_mut(b) {
                    fb.0 -= fx;
                    fb.1 -= fy;
                }
            }

            max_disp = 0.0;
            for id in &ids {
                if pinned.contains(id) {
                    // Pinned nodes exert forces but are not integrated.
                    self.velocities.insert(*id, (0.0, 0.0));
                    continue;
                }
                let (fx, fy) = forces[id];
                let vel = self.velocities.entry(*id).or_insert((0.0, 0.0));
                vel.0 = (vel.0 + fx * cfg.timestep) * cfg.damping;
                vel.1 = (vel.1 + fy * cfg.timestep) * cfg.damping;

                let mut sx = vel.0 * cfg.timestep;
                let mut sy = vel.1 * cfg.timestep;
                let step = (sx * sx + sy * sy).sqrt();
                if step > cfg.max_step {
                    let scale = cfg.max_step / step;
                    sx *= scale;
                    sy *= scale;
                }
                if let Some(pos) = positions.get_mut(id) {
                    pos.x += sx;
                    pos.y += sy;
                }
                max_disp = max_disp.max(step.min(cfg.max_step));
            }
        }

        for node in graph.nodes_mut() {
            if let Some(pos) = positions.get(&node.id) {
                node.pos = *pos;
            }
        }

        if max_disp < cfg.convergence_eps {
            self.converged = true;
        }
        max_disp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Graph {
        let mut g = Graph::new(false);
        let a = g.add_node("a");
        let b = g.add_node("b");
        let c = g.add_node("c");
        g.add_edge(a, b, None).unwrap();
        g.add_edge(b, c, None).unwrap();
        g.add_edge(c, a, None).unwrap();
        g
    }

    fn run_until_converged(engine: &mut LayoutEngine, graph: &mut Graph, max_ticks: usize) -> bool {
        for _ in 0..max_ticks {
            engine.tick(graph);
            if engine.converged() {
                return true;
            }
        }
        false
    }

    #[test]
    fn converges_within_bounded_ticks() {
        let mut g = triangle();
        let mut engine = LayoutEngine::new(LayoutConfig::default());
        engine.sync(&mut g);
        assert!(
            run_until_converged(&mut engine, &mut g, 2000),
            "layout did not converge"
        );
    }

    #[test]
    fn connected_nodes_end_up_closer_than_disconnected() {
        let mut g = Graph::new(false);
        let a = g.add_node("a");
        let b = g.add_node("b");
        let c = g.add_node("c");
        g.add_edge(a, b, None).unwrap();
        g.add_edge(b, c, None).unwrap();

        let mut engine = LayoutEngine::new(LayoutConfig::default());
        engine.sync(&mut g);
        run_until_converged(&mut engine, &mut g, 2000);

        let pa = g.node(a).unwrap().pos;
        let pb = g.node(b).unwrap().pos;
        let pc = g.node(c).unwrap().pos;
        assert!(pa.distance(&pb) < pa.distance(&pc));
    }

    #[test]
    fn warm_start_keeps_existing_positions_on_sync() {
        let mut g = triangle();
        let mut engine = LayoutEngine::new(LayoutConfig::default());
        engine.sync(&mut g);
        run_until_converged(&mut engine, &mut g, 2000);
        let settled: Vec<_> = g.node_ids().iter().map(|id| g.node(*id).unwrap().pos).collect();

        let anchor = g.node_ids()[0];
        let d = g.add_node("d");
        g.add_edge(anchor, d, None).unwrap();
        engine.sync(&mut g);

        for (id, before) in g.node_ids().iter().zip(settled.iter()) {
            if *id == d {
                continue;
            }
            let after = g.node(*id).unwrap().pos;
            assert_eq!(after, *before, "sync must not move existing nodes");
        }
        assert!(!engine.converged(), "topology change resets convergence");
    }

    #[test]
    fn new_node_seeds_near_neighbor_centroid() {
        let mut g = triangle();
        let mut engine = LayoutEngine::new(LayoutConfig::default());
        engine.sync(&mut g);
        run_until_converged(&mut engine, &mut g, 2000);

        let a = g.node_ids()[0];
        let b = g.node_ids()[1];
        let d = g.add_node("d");
        g.add_edge(a, d, None).unwrap();
        g.add_edge(b, d, None).unwrap();
        engine.sync(&mut g);

        let pa = g.node(a).unwrap().pos;
        let pb = g.node(b).unwrap().pos;
        let centroid = Point::new((pa.x + pb.x) / 2.0, (pa.y + pb.y) / 2.0);
        let seeded = g.node(d).unwrap().pos;
        let max_offset = LayoutConfig::default().seed_jitter * 2.0f32.sqrt() + 0.001;
        assert!(
            seeded.distance(&centroid) <= max_offset,
            "seeded at {seeded:?}, centroid {centroid:?}"
        );
    }

    #[test]
    fn pinned_node_does_not_move_but_others_do() {
        let mut g = triangle();
        let pinned_id = g.node_ids()[0];
        let mut engine = LayoutEngine::new(LayoutConfig::default());
        engine.sync(&mut g);
        g.set_pinned(pinned_id, true).unwrap();
        engine.invalidate();

        let before = g.node(pinned_id).unwrap().pos;
        let others_before: Vec<_> = g
            .nodes()
            .filter(|n| n.id != pinned_id)
            .map(|n| (n.id, n.pos))
            .collect();
        for _ in 0..10 {
            engine.tick(&mut g);
        }

        assert_eq!(g.node(pinned_id).unwrap().pos, before);
        let moved = others_before
            .iter()
            .any(|(id, pos)| g.node(*id).unwrap().pos.distance(pos) > 0.0);
        assert!(moved, "unpinned nodes should still respond to forces");
    }

    #[test]
    fn single_node_is_trivially_converged() {
        let mut g = Graph::new(false);
        g.add_node("solo");
        let mut engine = LayoutEngine::new(LayoutConfig::default());
        engine.sync(&mut g);
        assert_eq!(engine.tick(&mut g), 0.0);
        assert!(engine.converged());
    }

    #[test]
    fn invalidate_resets_convergence() {
        let mut g = triangle();
        let mut engine = LayoutEngine::new(LayoutConfig::default());
        engine.sync(&mut g);
        run_until_converged(&mut engine, &mut g, 2000);
        assert!(engine.converged());
        engine.invalidate();
        assert!(!engine.converged());
    }
}
