pub mod node;
pub mod request;
pub mod validate;
pub mod xml;

pub use node::{Node, NodeKind, Placement};
pub use request::{Request, TextFormat, Tour};
pub use validate::RspecError;
pub use xml::render;
