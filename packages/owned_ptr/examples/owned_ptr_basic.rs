//! Walks an owned value through its lifecycle with `tracing` output enabled, showing which
//! operations the owner refuses while handles are live.

use owned_ptr::{Error, OwnedPtr};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_target(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = OwnedPtr::new(vec!["alpha".to_owned(), "beta".to_owned()]);

    let reader = config.handle()?;
    let writer = reader.clone();

    writer.with_mut(|entries| entries.push("gamma".to_owned()))?;
    println!("Entries seen by reader: {:?}", reader.with(Vec::clone)?);

    match config.release() {
        Err(Error::ReferencesStillExist { count }) => {
            println!("Owner kept the value because {count} handles are live");
        }
        other => println!("Unexpected release outcome: {other:?}"),
    }

    drop(reader);
    drop(writer);

    config.release()?;
    println!("Released; owner is good: {}", config.is_good());

    if let Err(error) = config.with(Vec::len) {
        println!("Access after release fails: {error}");
    }

    // An owner dropped while a handle is live logs a warning and invalidates the handle.
    let owner = OwnedPtr::new(42);
    let orphan = owner.handle()?;
    drop(owner);
    println!("Orphaned handle is good: {}", orphan.is_good());

    Ok(())
}
