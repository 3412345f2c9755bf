pub mod google;
pub mod osrm;
pub mod otp;
pub mod valhalla;

pub use google::{GoogleAuth, GoogleMatrixBackend};
pub use osrm::OsrmBackend;
pub use otp::{ItinerarySource, OtpBackend};
pub use valhalla::ValhallaBackend;
