pub mod attendee;
pub mod page;
pub mod session;
pub mod speaker;
pub mod speech;

pub use attendee::*;
pub use page::*;
pub use session::*;
pub use speaker::*;
pub use speech::*;
