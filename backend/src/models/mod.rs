pub mod observation;
pub mod report;
pub mod series;
pub mod time;

pub use observation::*;
pub use report::*;
pub use series::*;
pub use time::*;
