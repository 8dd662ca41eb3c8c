pub mod results;
pub mod run;
pub mod social;
