pub(crate) mod logical;
pub(crate) mod normalize;
pub(crate) mod properties;
pub(crate) mod validate;
pub(crate) mod yaml;
