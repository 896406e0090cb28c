pub mod pointer;
pub mod scroll;

pub use pointer::wire_pointer;
pub use scroll::{wire_scroll, LayoutObserver};
