pub mod admin;
pub mod consultation;
pub mod specs;

pub use admin::{ApprovalDecision, PendingUser, RegistrationRequest, ServerMessage};
pub use consultation::{
    ConsultationRequest, ConsultationResponse, DeepDiveRequest, Industry, Role, SystemType,
};
pub use specs::{DeepDiveSelection, FileStatus, SpecsUpload, UploadReceipt};
