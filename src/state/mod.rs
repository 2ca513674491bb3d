pub(crate) mod freshness;
pub(crate) mod status;
