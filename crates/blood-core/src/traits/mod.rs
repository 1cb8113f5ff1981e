//! Ports implemented by the infrastructure crates

mod repositories;
mod stores;

pub use repositories::{
    DonorRepository, DonorSearch, FeedbackRepository, OtpRepository, Page, PatientRepository,
    PatientSearch, RepoResult, UserQuery, UserRepository,
};
pub use stores::{PendingLoginStore, RefreshTokenStore};
