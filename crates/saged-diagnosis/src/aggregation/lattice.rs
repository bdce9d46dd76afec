//! The grouping lattice: every subset of the specification dimensions.

use saged_core::types::collections::DimensionVec;
use saged_core::types::Dimension;

/// Every distinct subset of `specifications`, from the fully collapsed
/// (empty) grouping up to the full-detail grouping.
///
/// Ordered by subset size, then by the position of each member in
/// `specifications`. Repeated dimensions in the input collapse.
pub fn grouping_lattice(specifications: &[Dimension]) -> Vec<DimensionVec<Dimension>> {
    let mut dims: DimensionVec<Dimension> = DimensionVec::new();
    for dim in specifications {
        if !dims.contains(dim) {
            dims.push(*dim);
        }
    }

    let mut combos: Vec<DimensionVec<Dimension>> = (0u32..(1 << dims.len()))
        .map(|mask| {
            dims.iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, d)| *d)
                .collect()
        })
        .collect();

    combos.sort_by_key(|combo| {
        let positions: DimensionVec<usize> = combo
            .iter()
            .filter_map(|d| dims.iter().position(|x| x == d))
            .collect();
        (combo.len(), positions)
    });
    combos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_dimension() {
        let lattice = grouping_lattice(&[Dimension::Concept]);
        assert_eq!(lattice.len(), 2);
        assert!(lattice[0].is_empty());
        assert_eq!(lattice[1].as_slice(), &[Dimension::Concept]);
    }

    #[test]
    fn test_two_dimensions_ordered_by_size_then_position() {
        let lattice = grouping_lattice(&[Dimension::Domain, Dimension::Concept]);
        let sizes: Vec<usize> = lattice.iter().map(|c| c.len()).collect();
        assert_eq!(sizes, vec![0, 1, 1, 2]);
        assert_eq!(lattice[1].as_slice(), &[Dimension::Domain]);
        assert_eq!(lattice[2].as_slice(), &[Dimension::Concept]);
        assert_eq!(lattice[3].as_slice(), &[Dimension::Domain, Dimension::Concept]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let lattice = grouping_lattice(&[Dimension::Concept, Dimension::Concept]);
        assert_eq!(lattice.len(), 2);
    }

    #[test]
    fn test_full_lattice_size() {
        assert_eq!(grouping_lattice(&Dimension::ALL).len(), 8);
    }
}
