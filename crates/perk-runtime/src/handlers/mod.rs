//! One handler per action kind.

mod like;
mod share;
mod simple;
mod view;

pub use like::LikePostHandler;
pub use share::SharePostHandler;
pub use view::ViewPostHandler;
