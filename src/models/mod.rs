pub mod character;
pub mod page;
pub mod planet;

pub use character::{Character, Transformation};
pub use page::{Page, PageMeta};
pub use planet::Planet;
