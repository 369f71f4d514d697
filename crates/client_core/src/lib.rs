pub mod error;
pub mod gateway;
pub mod intake;
pub mod render;
pub mod session;
pub mod settings;

pub use error::ClientError;
pub use gateway::{DraftGateway, HttpDraftGateway};
pub use intake::{candidate_from_path, IntakeOutcome, IntakeWarning, PendingFileSet};
pub use render::{human_readable_bytes, transform_text_to_html, transform_text_to_plain};
pub use session::{
    AdjustmentFailurePolicy, RequestKind, ResultScreen, Screen, ScreenKind, Session,
    SessionEffect, SessionEvent, Transition, UploadScreen,
};
pub use settings::{load_settings, ClientSettings};
