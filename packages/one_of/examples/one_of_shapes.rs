//! Example demonstrating hierarchy-aware dispatch over a closed set of shapes.
//!
//! Handlers can be supplied for concrete types or for the trait objects they are declared to
//! extend. The nearest applicable handler runs.

use one_of::{Cloned, OneOf, when, when_ref};

trait Shape {
    fn area(&self) -> u32;
}

trait Polygon: Shape {
    fn corners(&self) -> u32;
}

#[derive(Clone, Debug)]
struct Circle {
    radius: u32,
}

#[derive(Clone, Debug)]
struct Rectangle {
    width: u32,
    height: u32,
}

#[derive(Clone, Debug)]
struct Square {
    side: u32,
}

impl Shape for Circle {
    fn area(&self) -> u32 {
        // Close enough for a demonstration.
        self.radius.saturating_mul(self.radius).saturating_mul(3)
    }
}

impl Shape for Rectangle {
    fn area(&self) -> u32 {
        self.width.saturating_mul(self.height)
    }
}

impl Shape for Square {
    fn area(&self) -> u32 {
        self.side.saturating_mul(self.side)
    }
}

impl Polygon for Rectangle {
    fn corners(&self) -> u32 {
        4
    }
}

impl Polygon for Square {
    fn corners(&self) -> u32 {
        4
    }
}

#[one_of::variants]
#[derive(Clone, Debug)]
enum AnyShape {
    #[extends(dyn Shape)]
    Circle(Circle),
    #[extends(dyn Polygon)]
    #[extends(dyn Shape)]
    Rectangle(Rectangle),
    #[extends(dyn Polygon)]
    #[extends(dyn Shape)]
    Square(Square),
}

fn describe(shape: &OneOf<AnyShape, Cloned>) -> String {
    when_ref!(shape, {
        Square => |s| format!("square with side {}", s.side),
        dyn Polygon => |p| format!("polygon with {} corners and area {}", p.corners(), p.area()),
        dyn Shape => |s| format!("shape with area {}", s.area()),
    })
}

fn main() {
    println!("=== OneOf: hierarchy-aware dispatch ===");

    let mut shapes = vec![
        OneOf::<AnyShape, Cloned>::new(Circle { radius: 2 }),
        OneOf::new(Rectangle {
            width: 3,
            height: 5,
        }),
        OneOf::new(Square { side: 4 }),
    ];

    for shape in &shapes {
        println!("{}", describe(shape));
    }

    println!();
    println!("Doubling every shape...");

    for shape in &mut shapes {
        when!(shape, {
            Circle => |c| c.radius = c.radius.saturating_mul(2),
            Rectangle => |r| {
                r.width = r.width.saturating_mul(2);
                r.height = r.height.saturating_mul(2);
            },
            Square => |s| s.side = s.side.saturating_mul(2),
        });
    }

    for shape in &shapes {
        println!("{}", describe(shape));
    }

    // Every candidate extends `dyn Shape`, so it can be extracted from any of them.
    let total: u32 = shapes
        .iter()
        .map(|shape| shape.extract::<dyn Shape>().area())
        .sum();
    println!();
    println!("Total area: {total}");

    // The cloned policy gives each copy its own value.
    let original = OneOf::<AnyShape, Cloned>::new(Square { side: 1 });
    let mut copy = original.clone();
    copy.set(Circle { radius: 1 });

    println!("Original: {}", describe(&original));
    println!("Copy: {}", describe(&copy));
}
