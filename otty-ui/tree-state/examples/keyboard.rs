//! Drive a tree from the keyboard on stdin.
//!
//! Type key names (`Up`, `Down`, `Left`, `Right`, `Enter`), one per line,
//! and the tree is printed after each of them. Run with `RUST_LOG=debug`
//! to see the state transitions.

use std::io::{self, BufRead};

use otty_ui_tree_state::{
    FlatNode, NavigationCommand, NavigatorOptions, NestedNode, TreeState,
};

const TREE: &str = r#"{
    "id": "Settings",
    "isOpenByDefault": true,
    "children": [
        {
            "id": "General",
            "isOpenByDefault": true,
            "children": [{ "id": "Terminal" }, { "id": "Theme" }]
        },
        {
            "id": "Profiles",
            "children": [{ "id": "Local" }, { "id": "Remote" }]
        },
        { "id": "About" }
    ]
}"#;

fn render_row(node: &FlatNode<String>, is_active: bool) -> String {
    let marker = if is_active { ">" } else { " " };
    let indent = "  ".repeat(node.level.saturating_sub(1));
    format!("{marker} {indent}{} {}", toggle_icon(node), node.id)
}

fn toggle_icon(node: &FlatNode<String>) -> &'static str {
    if node.is_leaf {
        "   "
    } else if node.is_open {
        "[-]"
    } else {
        "[+]"
    }
}

fn view(state: &TreeState<String>) -> anyhow::Result<()> {
    for id in state.visible_ids()? {
        if let Some(node) = state.tree().get(&id) {
            println!("{}", render_row(node, state.active() == Some(&id)));
        }
    }
    println!();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let root: NestedNode<String> = serde_json::from_str(TREE)?;
    let mut state = TreeState::from_root(&root, NavigatorOptions::default())?;
    view(&state)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        match line.trim().parse::<NavigationCommand>() {
            Ok(command) => {
                if state.handle(command)? {
                    view(&state)?;
                }
            },
            Err(err) => eprintln!("{err}"),
        }
    }

    Ok(())
}
