use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::scene::DrawList;

/// The fixed scene drawn every frame, in paint order.
pub fn demo_shapes() -> DrawList {
    let mut list = DrawList::new();

    list.push_rect(Rect::new(50.0, 50.0, 200.0, 100.0), Color::rgb8(255, 0, 0));
    list.push_circle(Vec2::new(400.0, 300.0), 50.0, Color::rgb8(0, 0, 255));
    list.push_line(
        Vec2::new(600.0, 100.0),
        Vec2::new(700.0, 500.0),
        5.0,
        Color::rgb8(0, 255, 0),
    );
    list.push_ellipse(Rect::new(300.0, 400.0, 150.0, 80.0), Color::rgb8(255, 255, 0));

    list
}
