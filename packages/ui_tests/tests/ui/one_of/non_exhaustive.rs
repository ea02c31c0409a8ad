use one_of::OneOf;

struct Red;
struct Green;

#[one_of::variants]
enum Color {
    Red(Red),
    Green(Green),
}

fn red(_: &mut Red) -> u32 {
    1
}

fn main() {
    let mut color = OneOf::<Color>::new(Green);
    color.set(Red);

    let _value = color.when().on::<Red, _>(red).run();
}
