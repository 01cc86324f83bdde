//! Generation strategies.

mod content;
mod images;
mod stream;
mod wire;

pub use content::ContentStrategy;
pub use images::ImagesStrategy;
pub use stream::StreamStrategy;
