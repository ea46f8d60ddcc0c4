pub mod batch;
pub mod pipeline;
pub mod stage0_preamble;
pub mod stage1_attendees;
pub mod stage2_speeches;
pub mod stage3_resolve;
pub mod stage_session;
pub mod stage_speaker_name;

pub use batch::*;
pub use pipeline::*;
pub use stage0_preamble::*;
pub use stage1_attendees::*;
pub use stage2_speeches::*;
pub use stage3_resolve::*;
pub use stage_session::*;
pub use stage_speaker_name::*;
