pub mod policy;
pub mod result;
pub mod runner;
pub mod testcase;

pub use policy::*;
pub use result::*;
pub use runner::*;
pub use testcase::*;
