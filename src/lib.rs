pub mod directory;
pub mod heuristics;
pub mod io;
pub mod models;
pub mod stages;

pub use directory::{AliasTable, Speaker, SpeakerDirectory};
pub use heuristics::{Lexicon, ParserConfig, RoleTable};
pub use io::{load_directory, load_pages, save_directory, write_json, HumanMinutes, InputError};
pub use models::{
    AliasEntry, AliasType, Attendee, AttendeeCategory, Confidence, MatchStrategy, PageText,
    RawSpeechSegment, ResolveResult, SessionInfo, SessionType, SpeakerName, SpeakerRole,
};
pub use stages::{
    derive_session_info, extract_preamble, parse_attendees, parse_document, parse_speaker_name,
    parse_speeches, resolve_document, run_batch, AliasIndex, AttendeeIndex, AttendeeParser,
    BatchSummary, ParsedDocument, PipelineConfig, ResolvedDocument, ResolvedSpeech,
    SpeakerResolver, SpeechParser,
};
