//! Per-record decoders. Each module turns the tokens of one DBC statement into
//! updates of the [`Database`](crate::dbc::types::database::Database).

pub(crate) mod attributes;
pub(crate) mod bo_;
pub(crate) mod bo_tx_bu_;
pub(crate) mod bu_;
pub(crate) mod cm_;
pub(crate) mod sg_;
pub(crate) mod sg_mul_val_;
pub(crate) mod sig_group_;
pub(crate) mod sig_valtype_;
pub(crate) mod strings;
pub(crate) mod val_;
pub(crate) mod version;
