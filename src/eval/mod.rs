pub(crate) mod chain;
pub(crate) mod resolver;
