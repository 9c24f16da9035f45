//! Static record descriptors and the runtime values they describe.

mod descriptor;
mod path;
mod value;

pub use descriptor::{Constraints, FieldDescriptor, FieldKind, Record, RecordDescriptor};
pub use path::{FieldPath, describe, describe_indexed, describe_keyed};
pub use value::{Element, FieldValue, Scalar};
