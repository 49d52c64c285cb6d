pub mod claims;
pub mod contact;
pub mod favicon;
pub mod likes;
pub mod projects;
pub mod uploads;

pub use claims::{ClaimManager, ClaimSettings};
pub use contact::ContactRelay;
pub use favicon::AvatarProxy;
pub use likes::LikeManager;
pub use projects::ProjectManager;
pub use uploads::ImageUploads;
