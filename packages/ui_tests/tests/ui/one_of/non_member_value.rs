use one_of::OneOf;

struct Red;

#[one_of::variants]
enum Color {
    Red(Red),
}

fn main() {
    let mut color = OneOf::<Color>::new(Red);
    color.set(String::from("red"));
}
