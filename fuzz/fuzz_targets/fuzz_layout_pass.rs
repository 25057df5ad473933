#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sash_layout::{
    LayoutTree, NullHost, Orientation, PointerEvent, Rect, SashDragController, SashLayout,
    SashLayoutConfig, WidgetId,
};

#[derive(Debug, Arbitrary)]
struct Input {
    vertical: bool,
    width: u16,
    height: u16,
    sash_width: u8,
    children: Vec<Child>,
    drags: Vec<(i16, i16)>,
}

#[derive(Debug, Arbitrary)]
struct Child {
    spec: String,
    visible: bool,
    mapped: bool,
}

fuzz_target!(|input: Input| {
    if input.children.len() > 32 || input.drags.len() > 64 {
        return;
    }
    let orientation = if input.vertical {
        Orientation::Vertical
    } else {
        Orientation::Horizontal
    };
    let mut tree = LayoutTree::new(orientation);
    let root = tree.root();
    for child in &input.children {
        let Ok(id) = tree.add_leaf(root, child.spec.as_str()) else {
            return;
        };
        if child.mapped {
            let _ = tree.set_widget(id, Some(WidgetId(id.get())));
        }
        let _ = tree.set_visible(id, child.visible);
    }

    let config = SashLayoutConfig::default().with_sash_width(i32::from(input.sash_width % 16));
    let mut layout = SashLayout::new(config);
    let area = Rect::from_size(i32::from(input.width), i32::from(input.height));
    let _ = layout.layout(&mut tree, &mut NullHost, area);

    let visible = tree.visible_children(root).len();
    assert_eq!(layout.sashes().len(), visible.saturating_sub(1));

    // Drags over whatever sash exists must never panic.
    let Some(sash) = layout.sashes().first().copied() else {
        return;
    };
    let mut controller = SashDragController::new();
    let _ = controller.handle_event(
        &mut layout,
        &mut tree,
        &mut NullHost,
        &PointerEvent::down(sash.rect.x, sash.rect.y),
    );
    for (dx, dy) in input.drags {
        let _ = controller.handle_event(
            &mut layout,
            &mut tree,
            &mut NullHost,
            &PointerEvent::drag(sash.rect.x + i32::from(dx), sash.rect.y + i32::from(dy)),
        );
    }
    let _ = controller.handle_event(&mut layout, &mut tree, &mut NullHost, &PointerEvent::up(0, 0));
    assert!(!controller.is_dragging());
});
