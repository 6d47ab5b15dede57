pub(crate) mod migrate;
pub(crate) mod rates;
pub(crate) mod report;
pub(crate) mod serve;
