#![allow(clippy::needless_return)]

use b2_descriptor::{B2Calculator, B2Parameters, CutoffFunction, RadialBasis};
use b2_descriptor::{NeighborList, SimpleSystem, SingleBond, Vector3D, B2};

use criterion::{BenchmarkGroup, Criterion, measurement::WallTime, SamplingMode};
use criterion::{black_box, criterion_group, criterion_main};

/// Diamond-like lattice of alternating atomic types 1 and 2, with the
/// neighbor list of all atoms within `cutoff`
fn lattice(n_cells: usize, cutoff: f64) -> (SimpleSystem, NeighborList) {
    let mut system = SimpleSystem::new();
    let basis = [
        Vector3D::new(0.0, 0.0, 0.0),
        Vector3D::new(0.0, 1.78, 1.78),
        Vector3D::new(1.78, 0.0, 1.78),
        Vector3D::new(1.78, 1.78, 0.0),
        Vector3D::new(0.89, 0.89, 0.89),
        Vector3D::new(0.89, 2.67, 2.67),
        Vector3D::new(2.67, 0.89, 2.67),
        Vector3D::new(2.67, 2.67, 0.89),
    ];
    for i in 0..n_cells {
        for j in 0..n_cells {
            for k in 0..n_cells {
                let shift = Vector3D::new(i as f64, j as f64, k as f64) * 3.56;
                for (a, position) in basis.iter().enumerate() {
                    system.add_atom(1 + (a % 2) as i32, shift + position);
                }
            }
        }
    }

    let positions = system.positions();
    let mut neighbors = NeighborList::new();
    for i in 0..system.size() {
        let around = (0..system.size())
            .filter(|&j| j != i && (positions[j] - positions[i]).norm() < cutoff)
            .collect::<Vec<_>>();
        neighbors.add_center(i, &around);
    }

    return (system, neighbors);
}

fn parameters(max_radial: usize, max_angular: usize) -> B2Parameters {
    B2Parameters {
        cutoff: 4.0,
        max_radial,
        max_angular,
        species: vec![1, 2],
        radial_basis: RadialBasis::Chebyshev { min_distance: 0.0 },
        cutoff_function: CutoffFunction::ShiftedCosine { width: 0.5 },
    }
}

fn run_kernels(mut group: BenchmarkGroup<WallTime>) {
    let (system, neighbors) = lattice(3, 4.0);
    // an atom in the middle of the lattice, with a full environment
    let center = 13 * 8;
    let positions = system.positions();
    let index = neighbors.centers().iter().position(|&c| c == center).expect("missing center");
    let displacements = neighbors.neighbors(index)
        .map(|j| positions[j] - positions[center])
        .collect::<Vec<_>>();
    let species = neighbors.neighbors(index)
        .map(|j| (system.types()[j] - 1) as usize)
        .collect::<Vec<_>>();

    for &max_radial in black_box(&[2, 8, 14]) {
        for &max_angular in black_box(&[1, 7, 15]) {
            let calculator = B2Calculator::new(parameters(max_radial, max_angular)).unwrap();
            let shape = calculator.shape();
            let tables = calculator.compute_tables(&displacements).unwrap();

            let mut bond = SingleBond::new(shape);
            let mut b2 = B2::new(shape);

            group.bench_function(&format!("n_max = {}, l_max = {}", max_radial, max_angular), |b| b.iter(|| {
                bond.compute(&species, tables.radial.view(), tables.angular.view());
                b2.compute(&bond);
            }));
        }
    }
}

fn run_calculator(mut group: BenchmarkGroup<WallTime>) {
    let (system, neighbors) = lattice(3, 4.0);
    let n_centers = neighbors.len();

    for &max_radial in black_box(&[2, 8]) {
        for &max_angular in black_box(&[1, 7]) {
            let calculator = B2Calculator::new(parameters(max_radial, max_angular)).unwrap();

            group.bench_function(&format!("n_max = {}, l_max = {}", max_radial, max_angular), |b| b.iter_custom(|repeat| {
                let start = std::time::Instant::now();
                for _ in 0..repeat {
                    calculator.compute(&system, &neighbors).unwrap();
                }
                start.elapsed() / n_centers as u32
            }));
        }
    }
}

fn b2_descriptor(c: &mut Criterion) {
    let mut group = c.benchmark_group("B2 kernels (per atom)");
    group.noise_threshold(0.05);
    group.sampling_mode(SamplingMode::Flat);
    run_kernels(group);

    let mut group = c.benchmark_group("B2 calculator (per atom)");
    group.noise_threshold(0.05);
    group.measurement_time(std::time::Duration::from_secs(30));
    group.sampling_mode(SamplingMode::Flat);
    run_calculator(group);
}

criterion_group!(all, b2_descriptor);
criterion_main!(all);
