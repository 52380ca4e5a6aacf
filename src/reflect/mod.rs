pub(crate) mod member;
