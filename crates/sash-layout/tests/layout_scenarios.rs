#![forbid(unsafe_code)]

//! End-to-end layout and drag scenarios.
//!
//! Run:
//!   cargo test -p sash-layout --test layout_scenarios

use proptest::prelude::*;
use sash_layout::{
    LayoutHost, LayoutTree, NodeId, NullHost, Orientation, PointerEvent, Rect, SashDragController,
    SashLayout, SashLayoutConfig, SizeSpec, SpecEncoding, WidgetId,
};
use std::collections::BTreeMap;

#[derive(Default)]
struct BoundsHost {
    bounds: BTreeMap<WidgetId, Rect>,
    redraws: usize,
}

impl LayoutHost for BoundsHost {
    fn set_bounds(&mut self, widget: WidgetId, bounds: Rect) {
        self.bounds.insert(widget, bounds);
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }
}

fn mapped_leaf(tree: &mut LayoutTree, parent: NodeId, data: &str) -> NodeId {
    let id = tree.add_leaf(parent, data).unwrap();
    tree.set_widget(id, Some(WidgetId(id.get()))).unwrap();
    id
}

fn axis(rect: Rect, orientation: Orientation) -> i32 {
    match orientation {
        Orientation::Horizontal => rect.width,
        Orientation::Vertical => rect.height,
    }
}

/// Walk every container and check sash count, weighted child and conservation.
fn assert_invariants(tree: &LayoutTree, layout: &SashLayout, encoding: SpecEncoding) {
    let sash = layout.config().sash_width;
    for node in tree.nodes().filter(|n| n.is_container()) {
        let children = tree.visible_children(node.id);
        if children.is_empty() {
            continue;
        }
        let orientation = node.orientation().unwrap();
        let sashes = layout
            .sashes()
            .iter()
            .filter(|s| s.container == node.id)
            .count();
        assert_eq!(sashes, children.len() - 1, "sash count for {}", node.id);

        let specs: Vec<SizeSpec> = children
            .iter()
            .map(|&c| SizeSpec::parse(encoding, tree.container_data(c).unwrap()))
            .collect();
        assert!(
            specs
                .iter()
                .any(|s| s.is_relative_weighted() && s.max.is_none()),
            "{} has no unbounded weighted child",
            node.id
        );

        let extent = if node.id == tree.root() {
            axis(layout.frame().bounds, orientation)
        } else {
            axis(layout.rect_of(node.id).unwrap(), orientation)
        };
        let used: i32 = children
            .iter()
            .map(|&c| axis(layout.rect_of(c).unwrap(), orientation))
            .sum::<i32>()
            + (children.len() as i32 - 1) * sash;
        assert!(
            (used - extent).abs() <= children.len() as i32,
            "{}: used {used} of {extent}",
            node.id
        );
    }
}

#[test]
fn scenario_even_weights_split_after_sash() {
    let mut tree = LayoutTree::new(Orientation::Horizontal);
    let root = tree.root();
    let a = mapped_leaf(&mut tree, root, "50");
    let b = mapped_leaf(&mut tree, root, "50");
    let mut layout = SashLayout::new(SashLayoutConfig::default().with_sash_width(4));
    let mut host = BoundsHost::default();
    layout.layout(&mut tree, &mut host, Rect::from_size(400, 300));

    assert_eq!(host.bounds[&WidgetId(a.get())].width, 198);
    assert_eq!(host.bounds[&WidgetId(b.get())].width, 198);
    assert_invariants(&tree, &layout, SpecEncoding::Extended);
}

#[test]
fn scenario_fixed_child_keeps_pixels() {
    for weight in ["1", "10000", "0.001"] {
        let mut tree = LayoutTree::new(Orientation::Horizontal);
        let root = tree.root();
        let fixed = mapped_leaf(&mut tree, root, "fixed;100px");
        let weighted = mapped_leaf(&mut tree, root, &format!("weighted;{weight}"));
        let config = SashLayoutConfig::default()
            .with_sash_width(0)
            .with_encoding(SpecEncoding::ModeTagged);
        let mut layout = SashLayout::new(config);
        layout.layout(&mut tree, &mut NullHost, Rect::from_size(300, 40));

        assert_eq!(layout.rect_of(fixed).unwrap().width, 100);
        assert_eq!(layout.rect_of(weighted).unwrap().width, 200);
    }
}

#[test]
fn scenario_drag_near_right_edge() {
    let mut tree = LayoutTree::new(Orientation::Horizontal);
    let root = tree.root();
    let left = mapped_leaf(&mut tree, root, "50");
    let right = mapped_leaf(&mut tree, root, "50");
    let config = SashLayoutConfig::default().with_min_pane(20, 20);
    let mut layout = SashLayout::new(config);
    let mut host = BoundsHost::default();
    layout.layout(&mut tree, &mut host, Rect::from_size(400, 300));

    let mut controller = SashDragController::new();
    controller.handle_event(&mut layout, &mut tree, &mut host, &PointerEvent::down(200, 10));
    controller.handle_event(&mut layout, &mut tree, &mut host, &PointerEvent::drag(350, 10));
    controller.handle_event(&mut layout, &mut tree, &mut host, &PointerEvent::up(350, 10));

    let left_width = host.bounds[&WidgetId(left.get())].width;
    let right_width = host.bounds[&WidgetId(right.get())].width;
    assert!((left_width - 346).abs() <= 1, "left {left_width}");
    assert!((right_width - 50).abs() <= 1, "right {right_width}");
    assert_eq!(host.redraws, 1);
    assert!(!controller.is_dragging());
    assert_invariants(&tree, &layout, SpecEncoding::Extended);
}

#[test]
fn mixed_tree_keeps_invariants() {
    let mut tree = LayoutTree::new(Orientation::Horizontal);
    let root = tree.root();
    mapped_leaf(&mut tree, root, "fixed:120px");
    let split = tree.add_split(root, Orientation::Vertical, "70;max:600px").unwrap();
    mapped_leaf(&mut tree, split, "min:40px;1");
    mapped_leaf(&mut tree, split, "200px;max:250px");
    let hidden = mapped_leaf(&mut tree, split, "3");
    tree.set_visible(hidden, false).unwrap();
    mapped_leaf(&mut tree, root, "30;max:90%");

    let mut layout = SashLayout::new(SashLayoutConfig::default());
    layout.layout(&mut tree, &mut NullHost, Rect::from_size(1000, 700));
    assert_invariants(&tree, &layout, SpecEncoding::Extended);
    assert_eq!(layout.rect_of(hidden), None);
}

fn arb_spec() -> impl Strategy<Value = String> {
    prop_oneof![
        (1u32..500).prop_map(|w| w.to_string()),
        (0u32..200).prop_map(|px| format!("{px}px")),
        (0u32..200).prop_map(|px| format!("fixed;{px}px")),
        (1u32..500, 10u32..300).prop_map(|(w, max)| format!("{w};max:{max}px")),
        (1u32..500, 0u32..60).prop_map(|(w, min)| format!("min:{min}px;{w}")),
        Just(String::new()),
    ]
}

proptest! {
    #[test]
    fn any_flat_container_conserves_extent(
        specs in proptest::collection::vec(arb_spec(), 1..7),
        width in 400i32..2000,
        sash in 0i32..8,
    ) {
        let mut tree = LayoutTree::new(Orientation::Horizontal);
        let root = tree.root();
        let mut children = Vec::new();
        for spec in &specs {
            children.push(mapped_leaf(&mut tree, root, spec));
        }
        let mut layout = SashLayout::new(SashLayoutConfig::default().with_sash_width(sash));
        layout.layout(&mut tree, &mut NullHost, Rect::from_size(width, 100));

        prop_assert_eq!(layout.sashes().len(), children.len() - 1);
        let parsed: Vec<SizeSpec> = children
            .iter()
            .map(|&c| SizeSpec::parse(SpecEncoding::Extended, tree.container_data(c).unwrap()))
            .collect();
        prop_assert!(parsed.iter().any(|s| s.is_relative_weighted() && s.max.is_none()));

        // Absolute children that fit, and mins that fit, leave nothing uncovered.
        let absolute: f64 = parsed
            .iter()
            .filter(|s| s.is_absolute())
            .map(|s| s.default_value)
            .sum();
        let mins: f64 = parsed
            .iter()
            .filter_map(|s| s.min.map(|b| b.value))
            .sum();
        let budget = f64::from(width - (children.len() as i32 - 1) * sash);
        if absolute + mins < budget {
            let used: i32 = children
                .iter()
                .map(|&c| layout.rect_of(c).unwrap().width)
                .sum::<i32>()
                + (children.len() as i32 - 1) * sash;
            prop_assert!((used - width).abs() <= children.len() as i32);
        }
    }
}
