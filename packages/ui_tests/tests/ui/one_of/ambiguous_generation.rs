use one_of::OneOf;

trait Swims {}
trait Walks {}

struct Frog;

impl Swims for Frog {}
impl Walks for Frog {}

#[one_of::variants]
enum Animal {
    #[extends(dyn Swims, dyn Walks)]
    Frog(Frog),
}

fn swims(_: &mut (dyn Swims + 'static)) -> u32 {
    1
}

fn walks(_: &mut (dyn Walks + 'static)) -> u32 {
    2
}

fn main() {
    let mut animal = OneOf::<Animal>::new(Frog);

    let _value = animal
        .when()
        .on::<dyn Swims, _>(swims)
        .on::<dyn Walks, _>(walks)
        .run();
}
