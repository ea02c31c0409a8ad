use one_of::OneOf;

struct Red;

#[one_of::variants]
enum Color {
    Red(Red),
}

fn red(_: &mut Red) -> u32 {
    1
}

fn text(_: &mut String) -> u32 {
    2
}

fn main() {
    let mut color = OneOf::<Color>::new(Red);

    let _value = color
        .when()
        .on::<Red, _>(red)
        .on::<String, _>(text)
        .run();
}
