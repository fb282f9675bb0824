//! Declarative registration helper

/// Register several applications in the order they are written
///
/// Each entry is either `"Name" => setup_fn, tick_fn` for a function pair or
/// `"Name" => app` for anything that coerces to `&mut dyn Application`.
/// Entries are separated by `;`.
///
/// ```
/// use appfw_core::{register_apps, AppContext};
///
/// fn blink_setup() {}
/// fn blink_tick() {}
///
/// let mut ctx: AppContext<'_, 4> = AppContext::new();
/// register_apps!(ctx,
///     "Blink" => blink_setup, blink_tick;
/// );
/// assert_eq!(ctx.count(), 1);
/// ```
#[macro_export]
macro_rules! register_apps {
    (@one $ctx:expr, $name:literal, $setup:expr, $tick:expr) => {
        $ctx.register($name, $setup, $tick)
    };
    (@one $ctx:expr, $name:literal, $app:expr) => {
        $ctx.register_app($name, $app)
    };
    ($ctx:expr, $($name:literal => $first:expr $(, $second:expr)?);* $(;)?) => {{
        $(
            $crate::register_apps!(@one $ctx, $name, $first $(, $second)?);
        )*
    }};
}
