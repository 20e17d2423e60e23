//! Retrieval of BLS Quarterly Census of Employment and Wages (QCEW) CSV slices.
//!
//! ```no_run
//! use qcew::bls::qcew::fetch;
//! use qcew::bls::QcewParams;
//!
//! let params = QcewParams::new().year("2017").quarter("1").area("26000");
//! let table = fetch("area", &params).unwrap();
//! println!("{} rows", table.len());
//! ```

pub mod bls;
pub mod config;
pub mod error;

pub use error::{QcewError, Result};
