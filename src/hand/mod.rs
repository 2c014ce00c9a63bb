#[cfg(feature = "desktop")]
pub mod detector;
pub mod landmark;
pub mod palm;
#[cfg(feature = "desktop")]
pub mod palm_detector;
#[cfg(feature = "desktop")]
pub mod preprocess;
pub mod roi;
pub mod skeleton;

#[cfg(feature = "desktop")]
pub use detector::HandDetector;
pub use landmark::{Hand, Landmark, LandmarkIndex};
pub use palm::{roi_from_palm, PalmBox};
#[cfg(feature = "desktop")]
pub use palm_detector::PalmDetector;
#[cfg(feature = "desktop")]
pub use preprocess::{preprocess_for_hand, PixelRange};
pub use roi::{remap_landmarks, roi_from_hand, square_region, CropRegion, Letterbox, PixelRect};
pub use skeleton::HAND_CONNECTIONS;
