use crate::Vector3D;
use super::{SimpleSystem, NeighborList};

pub fn test_system(name: &str) -> SimpleSystem {
    match name {
        "methane" => get_methane(),
        "water" => get_water(),
        "CH" => get_ch(),
        _ => panic!("unknown test system {}", name)
    }
}

fn get_methane() -> SimpleSystem {
    let mut system = SimpleSystem::new();
    system.add_atom(6, Vector3D::new(5.0000, 5.0000, 5.0000));
    system.add_atom(1, Vector3D::new(5.5288, 5.1610, 5.9359));
    system.add_atom(1, Vector3D::new(5.2051, 5.8240, 4.3214));
    system.add_atom(1, Vector3D::new(5.3345, 4.0686, 4.5504));
    system.add_atom(1, Vector3D::new(3.9315, 4.9463, 5.1921));
    return system;
}

fn get_water() -> SimpleSystem {
    let mut system = SimpleSystem::new();
    // types do not have to be atomic number
    system.add_atom(-42, Vector3D::new(0.0, 0.0, 0.0));
    system.add_atom(1, Vector3D::new(0.0, 0.75545, -0.58895));
    system.add_atom(1, Vector3D::new(0.0, -0.75545, -0.58895));
    return system;
}

fn get_ch() -> SimpleSystem {
    let mut system = SimpleSystem::new();
    system.add_atom(6, Vector3D::new(0.0, 0.0, 0.0));
    system.add_atom(1, Vector3D::new(0.0, 1.2, 0.0));
    return system;
}

/// Full neighbor list (both `i-j` and `j-i`) of all atoms within `cutoff`,
/// built by checking all pairs
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
