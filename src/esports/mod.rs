pub mod grouping;
pub mod leagues;
