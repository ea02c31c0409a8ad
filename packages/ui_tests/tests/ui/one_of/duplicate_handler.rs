use one_of::OneOf;

struct Red;

#[one_of::variants]
enum Color {
    Red(Red),
}

fn first(_: &mut Red) -> u32 {
    1
}

fn second(_: &mut Red) -> u32 {
    2
}

fn main() {
    let mut color = OneOf::<Color>::new(Red);

    let _value = color
        .when()
        .on::<Red, _>(first)
        .on::<Red, _>(second)
        .run();
}
