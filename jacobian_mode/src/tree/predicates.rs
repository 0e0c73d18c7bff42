//! Real/complex class predicates over tree leaves.
//!
//! Integer and `Bool` leaves count as real. An empty tree has neither real
//! nor complex leaves and is therefore homogeneous and not complex.

use super::Tree;
use crate::lattice::ShapeDtype;

/// Returns true iff at least one leaf has a complex dtype.
pub fn has_complex_leaf<L: ShapeDtype>(tree: &Tree<L>) -> bool {
    tree.leaves().iter().any(|leaf| leaf.dtype().is_complex())
}

/// Returns true iff at least one leaf has a real (non-complex) dtype.
pub fn has_real_leaf<L: ShapeDtype>(tree: &Tree<L>) -> bool {
    tree.leaves().iter().any(|leaf| leaf.dtype().is_real())
}

/// Returns true iff the leaves do not mix real and complex dtypes.
pub fn is_homogeneous<L: ShapeDtype>(tree: &Tree<L>) -> bool {
    !(has_real_leaf(tree) && has_complex_leaf(tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DType;
    use crate::lattice::AbstractArray;

    fn leaf(dtype: DType) -> Tree<AbstractArray> {
        Tree::leaf(AbstractArray::new(vec![2], dtype))
    }

    #[test]
    fn test_all_real() {
        let tree = Tree::dict([("a", leaf(DType::Float64)), ("b", leaf(DType::Int32))]);
        assert!(is_homogeneous(&tree));
        assert!(!has_complex_leaf(&tree));
        assert!(has_real_leaf(&tree));
    }

    #[test]
    fn test_all_complex() {
        let tree = Tree::list([leaf(DType::Complex64), leaf(DType::Complex128)]);
        assert!(is_homogeneous(&tree));
        assert!(has_complex_leaf(&tree));
        assert!(!has_real_leaf(&tree));
    }

    #[test]
    fn test_mixed() {
        let tree = Tree::dict([
            ("a", leaf(DType::Float32)),
            ("nested", Tree::dict([("b", leaf(DType::Complex64))])),
        ]);
        assert!(!is_homogeneous(&tree));
        assert!(has_complex_leaf(&tree));
    }

    #[test]
    fn test_empty_is_homogeneous_real() {
        let tree: Tree<AbstractArray> = Tree::Dict(Default::default());
        assert!(is_homogeneous(&tree));
        assert!(!has_complex_leaf(&tree));
        assert!(!has_real_leaf(&tree));
    }

    #[test]
    fn test_bool_leaf_is_real() {
        let tree = Tree::list([leaf(DType::Bool), leaf(DType::Complex128)]);
        assert!(!is_homogeneous(&tree));
    }
}
