use otty_ui_tree_state::{
    FlatTree, NavigationCommand, NavigatorOptions, NestedNode, TreeError,
    TreeState, WalkOptions, build_flat_tree, map_tree, next_active_node,
    toggle_tree_node, visible_ids,
};

const TREE: &str = r#"{
    "id": "root",
    "isOpenByDefault": true,
    "children": [
        {
            "id": "docs",
            "isOpenByDefault": true,
            "children": [
                { "id": "intro" },
                {
                    "id": "guides",
                    "isOpenByDefault": true,
                    "children": [{ "id": "install" }, { "id": "usage" }]
                },
                {
                    "id": "api",
                    "children": [{ "id": "types" }, { "id": "errors" }]
                }
            ]
        },
        { "id": "changelog" },
        {
            "id": "src",
            "isOpenByDefault": true,
            "children": [
                { "id": "lib" },
                { "id": "nested", "children": [{ "id": "deep" }] }
            ]
        }
    ]
}"#;

fn load() -> anyhow::Result<FlatTree<String>> {
    let root: NestedNode<String> = serde_json::from_str(TREE)?;
    Ok(build_flat_tree(&root)?)
}

fn step(
    tree: &FlatTree<String>,
    active: &str,
    command: NavigationCommand,
) -> anyhow::Result<String> {
    let mut requested = 0;
    let next = next_active_node(
        tree,
        &active.to_owned(),
        command,
        NavigatorOptions::default(),
        |_| requested += 1,
    )?;
    assert_eq!(requested, 0, "{command} on {active} requested a toggle");
    Ok(next)
}

#[test]
fn built_tree_has_one_record_per_node_and_one_root() -> anyhow::Result<()> {
    let tree = load()?;

    assert_eq!(tree.len(), 14);
    let roots: Vec<_> = tree.iter().filter(|node| node.is_root()).collect();
    assert_eq!(roots.len(), 1);
    assert_eq!(tree.root_id().map(String::as_str), Some("root"));

    for node in &tree {
        if let Some(parent) = &node.parent {
            let parent = tree.get(parent).expect("parent record");
            assert_eq!(parent.children[node.index], node.id);
        }
    }
    Ok(())
}

#[test]
fn default_walk_is_preorder_without_root() -> anyhow::Result<()> {
    let tree = load()?;
    let order = map_tree(&tree, WalkOptions::default(), |node, _| {
        node.id.clone()
    })?
    .expect("non-empty tree");

    assert_eq!(
        order,
        vec![
            "docs",
            "intro",
            "guides",
            "install",
            "usage",
            "api",
            "types",
            "errors",
            "changelog",
            "src",
            "lib",
            "nested",
            "deep",
        ]
    );

    let position = |id: &str| order.iter().position(|item| item == id);
    for node in &tree {
        if let (Some(parent), Some(own)) =
            (node.parent.as_deref(), position(node.id.as_str()))
        {
            if let Some(parent) = position(parent) {
                assert!(parent < own, "{} visited before its parent", node.id);
            }
        }
    }
    Ok(())
}

#[test]
fn toggling_every_branch_round_trips() -> anyhow::Result<()> {
    let tree = load()?;

    for node in tree.iter().filter(|node| !node.is_leaf) {
        let same = toggle_tree_node(&tree, &node.id, node.is_open)?;
        assert!(same.ptr_eq(&tree), "{} no-op toggle copied", node.id);

        let flipped = toggle_tree_node(&tree, &node.id, !node.is_open)?;
        let restored = toggle_tree_node(&flipped, &node.id, node.is_open)?;
        assert_eq!(restored, tree, "{} did not round trip", node.id);
    }
    Ok(())
}

#[test]
fn down_and_up_step_through_visible_rows() -> anyhow::Result<()> {
    let tree = load()?;
    let rows = visible_ids(&tree, false)?;
    assert_eq!(
        rows,
        vec![
            "docs",
            "intro",
            "guides",
            "install",
            "usage",
            "api",
            "changelog",
            "src",
            "lib",
            "nested",
        ]
    );

    for pair in rows.windows(2) {
        assert_eq!(step(&tree, &pair[0], NavigationCommand::Down)?, pair[1]);
        assert_eq!(step(&tree, &pair[1], NavigationCommand::Up)?, pair[0]);
    }

    let first = rows.first().expect("rows");
    let last = rows.last().expect("rows");
    assert_eq!(&step(&tree, first, NavigationCommand::Up)?, first);
    assert_eq!(&step(&tree, last, NavigationCommand::Down)?, last);
    Ok(())
}

#[test]
fn keyboard_session_through_tree_state() -> anyhow::Result<()> {
    let root: NestedNode<String> = serde_json::from_str(TREE)?;
    let mut state = TreeState::from_root(&root, NavigatorOptions::default())?;
    let active = |state: &TreeState<String>| state.active().cloned();

    assert_eq!(active(&state).as_deref(), Some("docs"));

    for key in ["Down", "Down", "Down", "Down", "Down"] {
        state.handle(key.parse()?)?;
    }
    assert_eq!(active(&state).as_deref(), Some("api"));

    // expand in place, enter, collapse via parent
    state.handle("ArrowRight".parse()?)?;
    assert_eq!(active(&state).as_deref(), Some("api"));
    assert!(state.visible_ids()?.contains(&"types".to_owned()));

    state.handle("ArrowRight".parse()?)?;
    assert_eq!(active(&state).as_deref(), Some("types"));

    state.handle("ArrowLeft".parse()?)?;
    assert_eq!(active(&state).as_deref(), Some("api"));
    state.handle("ArrowLeft".parse()?)?;
    assert!(!state.tree().get(&"api".to_owned()).expect("api").is_open);

    state.handle("Enter".parse()?)?;
    assert!(state.tree().get(&"api".to_owned()).expect("api").is_open);
    state.handle("Enter".parse()?)?;
    assert!(!state.tree().get(&"api".to_owned()).expect("api").is_open);

    assert_eq!(
        "PageDown".parse::<NavigationCommand>(),
        Err(TreeError::UnknownCommand("PageDown".to_owned()))
    );
    Ok(())
}

#[test]
fn flat_tree_survives_json_round_trip() -> anyhow::Result<()> {
    let tree = load()?;
    let json = serde_json::to_string(&tree)?;
    let restored: FlatTree<String> = serde_json::from_str(&json)?;

    assert_eq!(restored, tree);
    assert_eq!(restored.root_id(), tree.root_id());
    Ok(())
}
