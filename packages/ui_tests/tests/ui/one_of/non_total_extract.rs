use one_of::OneOf;

trait Warm {}

struct Red;
struct Blue;

impl Warm for Red {}

#[one_of::variants]
enum Color {
    #[extends(dyn Warm)]
    Red(Red),
    Blue(Blue),
}

fn main() {
    let mut color = OneOf::<Color>::new(Blue);
    color.set(Red);

    let _warm = color.extract::<dyn Warm>();
}
