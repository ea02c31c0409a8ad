use one_of::OneOf;

#[derive(Clone)]
struct Red;

#[one_of::variants]
#[derive(Clone)]
enum Color {
    Red(Red),
}

fn main() {
    let color = OneOf::<Color>::new(Red);
    let _copy = color.clone();
}
