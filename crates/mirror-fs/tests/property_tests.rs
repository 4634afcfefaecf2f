use mirror_fs::TreePath;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_normalization_invariants(s in "\\PC*") {
        let path = TreePath::new(&s);
        let as_str = path.as_str();

        prop_assert!(!as_str.contains('\\'));
        prop_assert!(!as_str.contains("//"));
        prop_assert!(!as_str.starts_with('/'));
        prop_assert!(!as_str.ends_with('/'));

        // Normalizing twice changes nothing
        prop_assert_eq!(TreePath::new(as_str), path.clone());
    }

    #[test]
    fn test_resolve_then_relative_to(rel in "[a-z]{1,8}(/[a-z]{1,8}){0,3}") {
        let root = std::path::Path::new("/mirror/root");
        let path = TreePath::new(&rel);
        let native = path.resolve(root);

        prop_assert!(native.starts_with(root));
        prop_assert_eq!(TreePath::relative_to(root, &native), Some(path));
    }
}
