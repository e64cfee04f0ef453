//! Mirror hooks driven through a registry.

use proptest::prelude::*;
use rupture_core::{
    CellMaterialData, ClusterId, LayerKind, LayeredMaterials, ParameterStore, Rank, RuptureError,
};
use rupture_lts::{ClusterGraph, Ownership};
use rupture_mirror::{apply_scaling, MirrorTarget, ParameterMirrorController};
use rupture_sync::{HookState, SingleRank, SyncEvent, SyncRegistry};

struct Scene {
    clusters: ClusterGraph,
    materials: LayeredMaterials,
    recomputed: Vec<Vec<usize>>,
}

impl MirrorTarget for Scene {
    fn clusters_mut(&mut self) -> &mut ClusterGraph {
        &mut self.clusters
    }

    fn materials_mut(&mut self) -> &mut dyn ParameterStore {
        &mut self.materials
    }

    fn recompute_operators(&mut self, affected: &[usize]) -> Result<(), RuptureError> {
        self.recomputed.push(affected.to_vec());
        Ok(())
    }
}

fn scene() -> Scene {
    let mut clusters = ClusterGraph::multi_rate(0.01, 2, 3).unwrap();
    clusters
        .add_cluster(ClusterId(7), 0.04, Ownership::Remote(Rank(1)))
        .unwrap();
    clusters.connect(ClusterId(2), ClusterId(7)).unwrap();

    let granite = CellMaterialData::new(2700.0, 3.2e10, 3.2e10);
    let mut materials = LayeredMaterials::new();
    materials.push_layer(LayerKind::Interior, vec![granite; 4]);
    materials.push_layer(LayerKind::Copy, vec![granite; 2]);
    materials.push_layer(LayerKind::Ghost, vec![granite; 3]);
    Scene {
        clusters,
        materials,
        recomputed: Vec::new(),
    }
}

fn densities(scene: &Scene) -> Vec<f64> {
    scene
        .materials
        .layers()
        .iter()
        .flat_map(|l| l.cells.iter().map(|c| c.rho))
        .collect()
}

fn steps(scene: &Scene) -> Vec<f64> {
    scene.clusters.iter().map(|c| c.step_size()).collect()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs())
}

#[test]
fn forward_scaling_touches_owned_cells_and_every_cluster() {
    let mut s = scene();
    let report = apply_scaling(&mut s, 2.0).unwrap();
    assert_eq!(report.cells, 6);
    assert_eq!(report.clusters, 4);
    assert_eq!(s.recomputed, vec![vec![0, 1, 2, 3, 4, 5]]);

    let rho = densities(&s);
    assert!(rho[..6].iter().all(|&r| r == 2700.0 * 4.0));
    assert!(rho[6..].iter().all(|&r| r == 2700.0));
    assert_eq!(steps(&s), vec![0.005, 0.01, 0.02, 0.02]);
    s.clusters.verify_ratios().unwrap();
}

#[test]
fn paired_hooks_fire_once_each_and_restore_the_state() {
    let mut s = scene();
    let before_rho = densities(&s);
    let before_steps = steps(&s);

    let mut registry = SyncRegistry::new();
    let pair = ParameterMirrorController::new(2.0, 1.0, 0.5)
        .unwrap()
        .arm(&mut registry)
        .unwrap();
    assert_eq!(registry.next_sync_time(0.0), Some(1.0));

    let report = registry
        .fire(SyncEvent::SynchronizationPoint, 1.0, &mut s, &mut SingleRank)
        .unwrap();
    assert_eq!(report.fired, vec![pair.forward]);
    assert_eq!(registry.state(pair.forward), Some(HookState::Disabled));
    assert_eq!(registry.state(pair.reverse), Some(HookState::Armed));
    assert!(close(steps(&s)[0], 0.005));
    assert_eq!(registry.next_sync_time(1.0), Some(1.5));

    // A second visit at the trigger time does nothing.
    let again = registry
        .fire(SyncEvent::SynchronizationPoint, 1.0, &mut s, &mut SingleRank)
        .unwrap();
    assert!(again.fired.is_empty());

    let report = registry
        .fire(SyncEvent::SynchronizationPoint, 1.5, &mut s, &mut SingleRank)
        .unwrap();
    assert_eq!(report.fired, vec![pair.reverse]);
    assert_eq!(registry.armed_count(SyncEvent::SynchronizationPoint), 0);
    assert_eq!(registry.next_sync_time(1.5), None);

    for (a, b) in densities(&s).iter().zip(&before_rho) {
        assert!(close(*a, *b));
    }
    for (a, b) in steps(&s).iter().zip(&before_steps) {
        assert!(close(*a, *b));
    }
    s.clusters.verify_ratios().unwrap();
    assert_eq!(s.recomputed.len(), 2);
}

#[test]
fn arming_needs_the_events_apart_by_more_than_the_tolerance() {
    let controller = ParameterMirrorController::new(2.0, 1.0, 1e-4).unwrap();
    let mut registry: SyncRegistry<Scene> = SyncRegistry::with_tolerance(1e-3);
    assert!(controller.arm(&mut registry).is_err());
    assert!(registry.is_empty());

    let mut registry: SyncRegistry<Scene> = SyncRegistry::new();
    let pair = controller.arm(&mut registry).unwrap();
    assert_eq!(registry.due_labels(SyncEvent::SynchronizationPoint, 1.0), ["itm-forward"]);
    assert_eq!(registry.next_sync_time(1.0), Some(controller.reverse_time()));
    assert_ne!(pair.forward, pair.reverse);
}

#[test]
fn collaborator_failure_propagates() {
    struct Failing(Scene);
    impl MirrorTarget for Failing {
        fn clusters_mut(&mut self) -> &mut ClusterGraph {
            &mut self.0.clusters
        }
        fn materials_mut(&mut self) -> &mut dyn ParameterStore {
            &mut self.0.materials
        }
        fn recompute_operators(&mut self, _: &[usize]) -> Result<(), RuptureError> {
            Err(RuptureError::Collaborator {
                name: "operators".to_owned(),
                reason: "out of memory".to_owned(),
            })
        }
    }

    let mut target = Failing(scene());
    let before = steps(&target.0);
    let err = apply_scaling(&mut target, 2.0).unwrap_err();
    assert!(matches!(err, RuptureError::Collaborator { .. }));
    assert_eq!(steps(&target.0), before);
}

proptest! {
    #[test]
    fn round_trip_restores_state(factor in 0.05f64..20.0, t0 in 0.01f64..10.0, eps in 1e-3f64..5.0) {
        let mut s = scene();
        let before_rho = densities(&s);
        let before_steps = steps(&s);

        let mut registry = SyncRegistry::new();
        ParameterMirrorController::new(factor, t0, eps)
            .unwrap()
            .arm(&mut registry)
            .unwrap();
        let mut now = 0.0;
        while let Some(next) = registry.next_sync_time(now) {
            registry
                .fire(SyncEvent::SynchronizationPoint, next, &mut s, &mut SingleRank)
                .unwrap();
            now = next;
        }

        for (a, b) in densities(&s).iter().zip(&before_rho) {
            prop_assert!(close(*a, *b));
        }
        for (a, b) in steps(&s).iter().zip(&before_steps) {
            prop_assert!(close(*a, *b));
        }
        prop_assert!(s.clusters.verify_ratios().is_ok());
    }
}
