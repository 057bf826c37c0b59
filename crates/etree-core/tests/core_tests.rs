use std::path::PathBuf;
use std::time::Duration;

use etree_core::{
    ErrorPolicy, FileTree, Filter, NodeKind, ScanConfig, ScanError, SizeMode, Subtotals,
    TreeNode, TreeStats,
};

fn sample_tree(track_disk_usage: bool) -> TreeNode {
    let disk = |bytes: u64| track_disk_usage.then_some(bytes);

    let sub = TreeNode::directory_with(
        "sub",
        vec![
            TreeNode::new_file("b.txt", 300, disk(4096)),
            TreeNode::new_other("link"),
        ],
        track_disk_usage,
    );

    TreeNode::directory_with(
        "root",
        vec![
            TreeNode::new_file("a.txt", 100, disk(4096)),
            sub,
            TreeNode::directory_with("empty", Vec::new(), track_disk_usage),
        ],
        track_disk_usage,
    )
}

fn assert_invariants(node: &TreeNode) {
    assert!(node.is_sealed(), "{} is not sealed", node.name);
    if !node.is_dir() {
        assert!(node.children.is_empty(), "{} has children", node.name);
        return;
    }

    let size: u64 = node.children.iter().filter_map(|c| c.size).sum();
    let count: u64 = node.children.iter().map(TreeNode::countable).sum();
    assert_eq!(node.size, Some(size), "size of {}", node.name);
    assert_eq!(node.child_count, count, "child_count of {}", node.name);

    if node.disk_usage.is_some() {
        let usage: u64 = node.children.iter().filter_map(|c| c.disk_usage).sum();
        assert_eq!(node.disk_usage, Some(usage), "disk_usage of {}", node.name);
    }

    for child in &node.children {
        assert_invariants(child);
    }
}

#[test]
fn test_directory_aggregates_hold_recursively() {
    let tree = sample_tree(false);
    assert_invariants(&tree);

    assert_eq!(tree.size, Some(400));
    assert_eq!(tree.child_count, 3);
    assert_eq!(tree.find("sub").unwrap().size, Some(300));
    assert_eq!(tree.find("sub").unwrap().child_count, 2);
    assert_eq!(tree.find("empty").unwrap().size, Some(0));
    assert_eq!(tree.find("empty").unwrap().child_count, 0);
}

#[test]
fn test_disk_usage_aggregates_when_tracked() {
    let tree = sample_tree(true);
    assert_invariants(&tree);

    assert_eq!(tree.disk_usage, Some(8192));
    assert_eq!(tree.usage(), Some(8192));
    assert_eq!(tree.find("empty").unwrap().disk_usage, Some(0));
}

#[test]
fn test_disk_usage_absent_when_not_tracked() {
    let tree = sample_tree(false);
    assert_eq!(tree.disk_usage, None);
    assert_eq!(tree.usage(), Some(400));
}

#[test]
fn test_find_follows_nested_names() {
    let tree = sample_tree(false);
    let link = tree.find("sub/link").unwrap();
    assert_eq!(link.kind, NodeKind::Other);
    assert!(tree.find("sub/missing").is_none());
    assert_eq!(tree.find("").unwrap().name, "root");
}

#[test]
fn test_subtotals_match_directory_with() {
    let children = vec![
        TreeNode::new_file("x", 5, None),
        TreeNode::new_file("y", 7, None),
    ];
    let mut totals = Subtotals::new(false);
    for child in &children {
        totals.add(child);
    }

    let mut manual = TreeNode::new_directory("d");
    manual.children = children.clone();
    manual.seal(totals);

    assert_eq!(manual, TreeNode::directory_with("d", children, false));
}

#[test]
fn test_stats_counts_and_depth() {
    let mut stats = TreeStats::new(false);
    stats.record_file(100, None, 1);
    stats.record_dir(1);
    stats.record_file(300, None, 2);
    stats.record_other(3);

    assert_eq!(stats.total_size, 400);
    assert_eq!(stats.files, 2);
    assert_eq!(stats.directories, 1);
    assert_eq!(stats.others, 1);
    assert_eq!(stats.max_depth, 3);
    assert_eq!(format!("{:.2}", stats.percentage(100)), "25.00");
}

#[test]
fn test_filter_independent_of_depth_for_exclusion() {
    let filter = Filter::new().with_excludes(["target"]).with_level(1);

    for depth in 1..10 {
        assert!(!filter.should_visit("target", depth));
        assert!(filter.should_visit("src", depth));
    }
}

#[test]
fn test_scan_config_roundtrips_through_serde_defaults() {
    let config: ScanConfig = serde_json::from_str(r#"{"root": "/data"}"#).unwrap();
    assert_eq!(config.size_mode, SizeMode::Apparent);
    assert_eq!(config.error_policy, ErrorPolicy::FailFast);
    assert_eq!(config.filter, Filter::default());
}

#[test]
fn test_invalid_config_message() {
    let err = Filter::new().with_level(0).validate().unwrap_err();
    assert!(matches!(err, ScanError::InvalidConfig { .. }));
    assert_eq!(
        err.to_string(),
        "Invalid configuration: level must be at least 1"
    );
}

#[test]
fn test_file_tree_serialized_fields() {
    let tree = FileTree::new(
        sample_tree(false),
        PathBuf::from("/data/root"),
        ScanConfig::new("/data/root"),
        TreeStats::new(false),
        Duration::from_millis(5),
        Vec::new(),
    );

    let value = serde_json::to_value(&tree).unwrap();
    let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(
        keys,
        vec!["config", "root", "root_path", "scan_duration", "stats", "warnings"]
    );
}

#[test]
fn test_every_error_variant_has_a_message() {
    let errors = [
        ScanError::PermissionDenied { path: "/a".into() },
        ScanError::NotFound { path: "/a".into() },
        ScanError::io("/a", std::io::Error::other("boom")),
        ScanError::Interrupted,
        ScanError::InvalidConfig { message: "bad".into() },
        ScanError::NotADirectory { path: "/a".into() },
    ];

    for err in &errors {
        let entry_failure = match err {
            ScanError::PermissionDenied { .. }
            | ScanError::NotFound { .. }
            | ScanError::Io { .. } => true,
            ScanError::Interrupted
            | ScanError::InvalidConfig { .. }
            | ScanError::NotADirectory { .. } => false,
        };
        assert_eq!(err.is_entry_failure(), entry_failure, "{err}");
        assert!(!err.to_string().is_empty());
    }
}
