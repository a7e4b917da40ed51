//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared entirely by their attribute
/// values: two `Money` amounts of `100.00` are the same value, while two
/// customers with the same name are still distinct entities. To "modify" a
/// value object, construct a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
