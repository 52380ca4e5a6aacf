pub(crate) mod node;
pub(crate) mod ops;
