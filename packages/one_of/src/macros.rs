/// Dispatches a [`OneOf`][crate::OneOf] to the handler that best matches the held value,
/// granting each handler exclusive access.
///
/// Shorthand for [`OneOf::when()`][crate::OneOf::when] followed by one
/// [`on()`][crate::When::on] per handler and a final [`run()`][crate::When::run].
///
/// # Example
///
/// ```
/// use one_of::{OneOf, when};
///
/// struct Counter(u32);
/// struct Label(String);
///
/// #[one_of::variants]
/// enum Widget {
///     Counter(Counter),
///     Label(Label),
/// }
///
/// let mut widget = OneOf::<Widget>::new(Counter(1));
///
/// when!(widget, {
///     Counter => |c| c.0 += 1,
///     Label => |l| l.0.push('!'),
/// });
///
/// let value = when!(widget, {
///     Counter => |c| c.0,
///     Label => |_| 0,
/// });
///
/// assert_eq!(value, 2);
/// ```
#[macro_export]
macro_rules! when {
    ($variant:expr, { $($ty:ty => $handler:expr),+ $(,)? }) => {
        $variant.when()$(.on::<$ty, _>($handler))+.run()
    };
}

/// Dispatches a [`OneOf`][crate::OneOf] to the handler that best matches the held value,
/// granting each handler shared access.
///
/// Shorthand for [`OneOf::when_ref()`][crate::OneOf::when_ref] followed by one
/// [`on()`][crate::WhenRef::on] per handler and a final [`run()`][crate::WhenRef::run].
///
/// # Example
///
/// ```
/// use one_of::{OneOf, when_ref};
///
/// trait Describe {
///     fn describe(&self) -> String;
/// }
///
/// struct Port(u16);
/// struct Path(String);
///
/// impl Describe for Port {
///     fn describe(&self) -> String {
///         format!("port {}", self.0)
///     }
/// }
///
/// #[one_of::variants]
/// enum Endpoint {
///     #[extends(dyn Describe)]
///     Port(Port),
///     Path(Path),
/// }
///
/// let endpoint = OneOf::<Endpoint>::new(Port(8080));
///
/// let text = when_ref!(endpoint, {
///     dyn Describe => |d| d.describe(),
///     Path => |p| p.0.clone(),
/// });
///
/// assert_eq!(text, "port 8080");
/// ```
#[macro_export]
macro_rules! when_ref {
    ($variant:expr, { $($ty:ty => $handler:expr),+ $(,)? }) => {
        $variant.when_ref()$(.on::<$ty, _>($handler))+.run()
    };
}
