// https://www.bls.gov/cew/additional-resources/open-data/

pub mod http;
pub mod qcew;
pub mod table;

pub use self::qcew::{Method, QcewParams, UrlTemplate};
pub use self::table::QcewTable;

pub const API_ROOT: &str = "https://data.bls.gov/cew/data/api";
pub const USER_AGENT: &str = "qcew-data-acquisition/0.1";
