//! Grid and controller behaviour through the public API

use tree_fire_core::{
    BaselineImage, CellState, FireEvent, FireParameters, KernelBackend, PropagationGrid,
    SequentialKernel, SpreadParams, TileSimulationController, Vec2,
};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn fuel(resolution: usize) -> BaselineImage {
    BaselineImage::from_cells(resolution, vec![CellState::Fuel; resolution * resolution]).unwrap()
}

fn windy() -> FireParameters {
    FireParameters {
        wind_direction: 45.0,
        wind_speed: 5.0,
        natural_spread: 45.0,
        step_interval: 0.5,
    }
}

fn ignitions(events: &[FireEvent]) -> Vec<Vec2> {
    events
        .iter()
        .filter_map(|event| match event {
            FireEvent::Ignition(batch) => Some(batch.positions.clone()),
            FireEvent::Burnout(_) => None,
        })
        .flatten()
        .collect()
}

#[test]
fn known_burnt_set_only_grows_and_never_repeats() {
    let mut grid = PropagationGrid::new(fuel(32)).unwrap();
    grid.mark(16, 16, CellState::Burning);

    let mut reported = std::collections::HashSet::new();
    let mut previous = 0;
    for seed in 0..40 {
        let params = SpreadParams {
            wind_direction: 90.0,
            wind_speed: 3.0,
            natural_spread: 30.0,
            seed,
        };
        let cells = grid.step(&SequentialKernel, &params);
        for index in cells.ignited {
            assert!(reported.insert(index), "cell {index} reported twice");
        }
        assert!(grid.known_burnt_count() >= previous);
        previous = grid.known_burnt_count();
    }
    assert_eq!(previous, reported.len());
    assert!(previous > 1, "fire should have spread");
}

#[test]
fn zero_parameters_do_not_spread_after_reset() {
    let still = FireParameters {
        wind_direction: 0.0,
        wind_speed: 0.0,
        natural_spread: 0.0,
        step_interval: 0.0,
    };
    let mut ctrl =
        TileSimulationController::new(fuel(64), still, KernelBackend::Sequential, Some(1)).unwrap();
    ctrl.reset();
    ctrl.mark(10, 20, CellState::Burning);

    let first = ignitions(&ctrl.step_now());
    assert_eq!(first, vec![Vec2::new(10.0 / 64.0, 20.0 / 64.0)]);

    for _ in 0..30 {
        assert!(ignitions(&ctrl.step_now()).is_empty());
    }
}

#[test]
fn single_ignition_spreads_to_neighbours_only() {
    let resolution = 512;
    let mut ctrl =
        TileSimulationController::new(fuel(resolution), windy(), KernelBackend::default(), Some(99))
            .unwrap();
    ctrl.mark(256, 256, CellState::Burning);

    let reported = ignitions(&ctrl.step_now());
    assert!(!reported.is_empty());

    let source = Vec2::new(0.5, 0.5);
    let radius = 1.0 / resolution as f32 + 1e-6;
    assert!(reported.contains(&source));
    for position in &reported {
        let offset = position - source;
        assert!(
            offset.x.abs() <= radius && offset.y.abs() <= radius,
            "{position:?} is beyond one cell of the source"
        );
    }
}

#[test]
fn controller_steps_only_while_running() {
    let mut ctrl =
        TileSimulationController::new(fuel(16), windy(), KernelBackend::Sequential, Some(5)).unwrap();
    ctrl.mark(8, 8, CellState::Burning);

    assert!(ctrl.tick(1.0).is_empty());
    ctrl.start();
    assert!(ctrl.tick(0.25).is_empty());
    let events = ctrl.tick(0.25);
    assert!(!ignitions(&events).is_empty());

    ctrl.stop();
    assert!(ctrl.tick(10.0).is_empty());
    assert_eq!(ctrl.steps(), 1);
}

#[test]
fn burning_cells_eventually_burn_out() {
    let mut ctrl =
        TileSimulationController::new(fuel(16), windy(), KernelBackend::Sequential, Some(8)).unwrap();
    ctrl.mark(8, 8, CellState::Burning);

    let mut burnt_out = 0;
    for _ in 0..200 {
        for event in ctrl.step_now() {
            if let FireEvent::Burnout(batch) = event {
                burnt_out += batch.len();
            }
        }
    }
    assert!(burnt_out > 0);
    assert_eq!(ctrl.grid().count(CellState::Burning), 0);
    assert_eq!(burnt_out, ctrl.grid().count(CellState::Burnt));
}

#[test]
fn manual_override_reaches_both_buffers() {
    let mut grid = PropagationGrid::new(fuel(16)).unwrap();
    grid.mark(3, 3, CellState::Ground);
    let params = SpreadParams {
        wind_direction: 0.0,
        wind_speed: 0.0,
        natural_spread: 0.0,
        seed: 0,
    };
    for _ in 0..3 {
        grid.step(&SequentialKernel, &params);
        assert_eq!(grid.cell(3, 3), CellState::Ground);
    }
}

#[cfg(feature = "parallel")]
#[test]
fn kernels_agree() {
    use tree_fire_core::{ParallelKernel, TransitionKernel};

    let mut sequential = PropagationGrid::new(fuel(64)).unwrap();
    let mut parallel = PropagationGrid::new(fuel(64)).unwrap();
    for grid in [&mut sequential, &mut parallel] {
        grid.mark(32, 32, CellState::Burning);
        grid.mark(5, 60, CellState::Burning);
    }

    let kernels: [&dyn TransitionKernel; 2] = [&SequentialKernel, &ParallelKernel];
    for seed in 0..25 {
        let params = SpreadParams {
            wind_direction: 200.0,
            wind_speed: 4.0,
            natural_spread: 40.0,
            seed,
        };
        let a = sequential.step(kernels[0], &params);
        let b = parallel.step(kernels[1], &params);
        assert_eq!(a, b);
        assert_eq!(sequential.cells(), parallel.cells());
    }
}
