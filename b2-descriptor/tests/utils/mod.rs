#![allow(dead_code)]

use approx::assert_relative_eq;
use ndarray::Array1;

use b2_descriptor::{B2Calculator, NeighborList, SimpleSystem, Vector3D};

pub fn methane() -> SimpleSystem {
    let mut system = SimpleSystem::new();
    system.add_atom(6, Vector3D::new(5.0000, 5.0000, 5.0000));
    system.add_atom(1, Vector3D::new(5.5288, 5.1610, 5.9359));
    system.add_atom(1, Vector3D::new(5.2051, 5.8240, 4.3214));
    system.add_atom(1, Vector3D::new(5.3345, 4.0686, 4.5504));
    system.add_atom(1, Vector3D::new(3.9315, 4.9463, 5.1921));
    return system;
}

/// Small disordered cluster with two atomic types
pub fn cluster() -> SimpleSystem {
    let mut system = SimpleSystem::new();
    system.add_atom(1, Vector3D::new(0.0, 0.0, 0.0));
    system.add_atom(2, Vector3D::new(1.1, 0.3, -0.4));
    system.add_atom(1, Vector3D::new(-0.7, 1.2, 0.5));
    system.add_atom(2, Vector3D::new(0.2, -1.3, 0.9));
    system.add_atom(2, Vector3D::new(-1.0, -0.6, -1.1));
    system.add_atom(1, Vector3D::new(1.4, 1.5, 1.2));
    system.add_atom(1, Vector3D::new(-0.3, 0.4, 2.1));
    system.add_atom(2, Vector3D::new(2.3, -0.8, 0.1));
    return system;
}

/// Full neighbor list of all atoms within `cutoff`, built by checking all
/// pairs
pub fn full_neighbor_list(system: &SimpleSystem, cutoff: f64) -> NeighborList {
    let positions = system.positions();
    let mut list = NeighborList::new();
    for i in 0..system.size() {
        let neighbors = (0..system.size())
            .filter(|&j| j != i && (positions[j] - positions[i]).norm() < cutoff)
            .collect::<Vec<_>>();
        list.add_center(i, &neighbors);
    }
    return list;
}

/// Rotation matrix of `angle` around `axis`, using Rodrigues' formula
pub fn rotation(axis: Vector3D, angle: f64) -> [[f64; 3]; 3] {
    let k = axis.normalized();
    let (sin, cos) = angle.sin_cos();
    let mut matrix = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            let delta = if i == j { 1.0 } else { 0.0 };
            matrix[i][j] = cos * delta + (1.0 - cos) * k[i] * k[j];
        }
    }
    matrix[0][1] -= sin * k[2];
    matrix[0][2] += sin * k[1];
    matrix[1][0] += sin * k[2];
    matrix[1][2] -= sin * k[0];
    matrix[2][0] -= sin * k[1];
    matrix[2][1] += sin * k[0];
    return matrix;
}

pub fn rotate(matrix: &[[f64; 3]; 3], vector: Vector3D) -> Vector3D {
    Vector3D::new(
        matrix[0][0] * vector[0] + matrix[0][1] * vector[1] + matrix[0][2] * vector[2],
        matrix[1][0] * vector[0] + matrix[1][1] * vector[1] + matrix[1][2] * vector[2],
        matrix[2][0] * vector[0] + matrix[2][1] * vector[1] + matrix[2][2] * vector[2],
    )
}

/// Check that analytical gradients agree with a finite difference calculation
/// of the gradients, moving each atom of the system in turn.
///
/// The neighbor list is kept fixed while the atoms move. Moving a neighbor
/// changes the descriptor through its own gradient, moving the center
/// changes all displacements at once.
pub fn finite_differences(calculator: &B2Calculator, mut system: SimpleSystem, neighbors: &NeighborList, max_relative: f64) {
    let reference = calculator.compute(&system, neighbors).unwrap();

    let delta = 1e-6;
    for atom in 0..system.size() {
        for spatial in 0..3 {
            system.positions_mut()[atom][spatial] += delta;
            let positive = calculator.compute(&system, neighbors).unwrap();

            system.positions_mut()[atom][spatial] -= 2.0 * delta;
            let negative = calculator.compute(&system, neighbors).unwrap();

            system.positions_mut()[atom][spatial] += delta;

            for (i, descriptor) in reference.iter().enumerate() {
                let mut gradient = Array1::<f64>::zeros(descriptor.values.len());
                for (jj, &neighbor) in descriptor.neighbors.iter().enumerate() {
                    let neighbor_gradient = descriptor.gradients.slice(ndarray::s![jj, spatial, ..]);
                    if neighbor == atom {
                        gradient += &neighbor_gradient;
                    }
                    if descriptor.center == atom {
                        gradient -= &neighbor_gradient;
                    }
                }

                let finite_difference = (&positive[i].values - &negative[i].values) / (2.0 * delta);
                assert_relative_eq!(
                    finite_difference, gradient,
                    epsilon = 1e-7,
                    max_relative = max_relative,
                );
            }
        }
    }
}
