//! Typed property containers.
//!
//! Every container (a view, a theme style rule, a composite such as
//! [`BoundsProperty`](crate::style::BoundsProperty)) is described by a
//! [`Schema`]: the canonical tags it recognises, the [`Kind`] each tag is
//! coerced to, an alias table, and the routes that send compound tags such as
//! `margin-top` into nested composites.

pub mod container;
pub mod enums;
pub mod kind;
pub mod schema;
pub mod value;

pub use container::{fill_from_object, Properties, PropertyContainer, PropertyObject};
pub(crate) use container::set_in;
pub use kind::Kind;
pub use schema::Schema;
pub use value::Value;
