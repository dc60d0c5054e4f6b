mod ons_column;
mod postcode;
mod ward;
mod ward_lookup;
pub mod ward_ops;

pub use ons_column::OnsColumn;
pub use postcode::{read_postcodes, Postcode};
pub use ward::Ward;
pub use ward_lookup::{WardLookup, WardLookupRow};
